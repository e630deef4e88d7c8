use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::transport::{Channel, Socket};

/// Преобразование имени топика перед адресацией канала,
/// например для добавления пространства имён.
pub type TopicFn = Box<dyn Fn(&str) -> String + Send>;

/// Реестр каналов по топикам.
///
/// Лениво создаёт и присоединяет канал при первом обращении к топику,
/// дальше возвращает закэшированный хэндл. Ключ — имя топика после
/// преобразования; отображение только растёт, записи не вытесняются.
///
/// Реестром владеет единственный цикл обработки команд, поэтому
/// check-then-create выполняется без блокировок: между проверкой и вставкой
/// никто другой реестр не трогает.
pub struct TopicRegistry {
    socket: Box<dyn Socket>,
    topic_fn: TopicFn,
    channels: HashMap<String, Arc<dyn Channel>>,
}

impl TopicRegistry {
    /// Создаёт реестр поверх подключённого сокета.
    ///
    /// Без `topic_fn` имена топиков используются как есть.
    pub fn new(socket: Box<dyn Socket>, topic_fn: Option<TopicFn>) -> Self {
        Self {
            socket,
            topic_fn: topic_fn.unwrap_or_else(|| Box::new(|topic| topic.to_string())),
            channels: HashMap::new(),
        }
    }

    /// Возвращает канал для raw-имени топика.
    ///
    /// При первом обращении запрашивает канал у сокета и ровно один раз
    /// вызывает `join`; при повторных — возвращает кэш без обращений к
    /// транспорту. Ошибки join здесь не обрабатываются: они приходят через
    /// собственные колбэки транспорта.
    pub fn resolve(&mut self, topic: &str) -> Arc<dyn Channel> {
        let key = (self.topic_fn)(topic);
        if let Some(channel) = self.channels.get(&key) {
            return channel.clone();
        }

        debug!(topic, transformed = %key, "joining channel");
        let channel = self.socket.channel(&key);
        channel.join();
        self.channels.insert(key, channel.clone());
        channel
    }

    /// Количество присоединённых каналов.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::mux::testing::RecordingTransport;

    fn registry_with(topic_fn: Option<TopicFn>) -> (TopicRegistry, Arc<crate::mux::testing::RecordingState>) {
        let (transport, state) = RecordingTransport::new();
        let registry = TopicRegistry::new(Box::new(transport.socket()), topic_fn);
        (registry, state)
    }

    /// Проверяет, что первое обращение создаёт и присоединяет канал.
    #[test]
    fn test_first_resolve_creates_and_joins() {
        let (mut registry, state) = registry_with(None);
        assert!(registry.is_empty());

        registry.resolve("room:lobby");

        assert_eq!(state.channel_calls_for("room:lobby"), 1);
        assert_eq!(
            state.channel("room:lobby").join_calls.load(Ordering::Relaxed),
            1
        );
        assert_eq!(registry.len(), 1);
    }

    /// Проверяет, что повторные обращения не трогают транспорт,
    /// сколько бы их ни было и с какими бы другими топиками они ни
    /// перемежались.
    #[test]
    fn test_repeated_resolve_reuses_channel() {
        let (mut registry, state) = registry_with(None);

        registry.resolve("a");
        registry.resolve("b");
        registry.resolve("a");
        registry.resolve("a");
        registry.resolve("b");

        assert_eq!(state.channel_calls_for("a"), 1);
        assert_eq!(state.channel_calls_for("b"), 1);
        assert_eq!(state.channel("a").join_calls.load(Ordering::Relaxed), 1);
        assert_eq!(state.channel("b").join_calls.load(Ordering::Relaxed), 1);
        assert_eq!(registry.len(), 2);
    }

    /// Проверяет, что топик проходит через преобразование до адресации.
    #[test]
    fn test_resolve_applies_topic_fn() {
        let (mut registry, state) =
            registry_with(Some(Box::new(|topic| format!("{topic}:test"))));

        registry.resolve("room");

        assert_eq!(state.channel_calls_for("room:test"), 1);
        assert_eq!(state.channel_calls_for("room"), 0);
    }

    /// Проверяет, что два raw-топика с одним образом преобразования
    /// сходятся в один канал.
    #[test]
    fn test_transform_collisions_share_channel() {
        let (mut registry, state) = registry_with(Some(Box::new(|_| "shared".to_string())));

        let first = registry.resolve("one");
        let second = registry.resolve("two");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(state.channel_calls_for("shared"), 1);
        assert_eq!(registry.len(), 1);
    }
}
