use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use super::{Command, Notification, TopicRegistry};

/// Диспетчер команд.
///
/// Разрешает топик через реестр и переводит команду в вызовы транспорта:
/// `send` — немедленный push, `listen` — регистрация обработчика входящих
/// событий, не более одного на пару (канал, событие). Обе операции
/// fire-and-forget: результат транспортного вызова здесь не наблюдается.
pub struct Dispatcher {
    registry: TopicRegistry,
    events: UnboundedSender<Notification>,
}

impl Dispatcher {
    pub fn new(registry: TopicRegistry, events: UnboundedSender<Notification>) -> Self {
        Self { registry, events }
    }

    pub fn dispatch(&mut self, command: Command) {
        match command {
            Command::Send {
                topic,
                event,
                payload,
            } => self.handle_send(&topic, &event, payload),
            Command::Listen { topic, event } => self.handle_listen(&topic, &event),
        }
    }

    /// Отправляет событие в топик.
    ///
    /// Push выполняется сразу после разрешения канала, без ожидания
    /// завершения join — очередь, если она нужна, живёт в транспорте.
    /// Отсутствующий payload уходит как null.
    fn handle_send(&mut self, topic: &str, event: &str, payload: Option<Value>) {
        let channel = self.registry.resolve(topic);
        channel.push(event, payload.unwrap_or(Value::Null));
    }

    /// Регистрирует подписку на событие топика.
    ///
    /// Список привязок канала — источник истины: если событие уже привязано
    /// (в том числе до того, как реестр увидел канал), повторная регистрация
    /// не выполняется. Это единственный путь, расширяющий множество подписок.
    fn handle_listen(&mut self, topic: &str, event: &str) {
        let channel = self.registry.resolve(topic);
        if channel.bindings().iter().any(|bound| bound == event) {
            debug!(topic, event, "already subscribed");
            return;
        }

        // Обработчик захватывает raw-топик: уведомления сообщают имя,
        // которым оперировал хост, а не преобразованное.
        let raw_topic = topic.to_string();
        let event_name = event.to_string();
        let events = self.events.clone();
        channel.on(
            event,
            Box::new(move |payload| {
                let note = Notification::new(raw_topic.clone(), event_name.clone(), payload);
                if events.send(note).is_err() {
                    warn!("notification sink closed, dropping inbound event");
                }
            }),
        );
    }
}
