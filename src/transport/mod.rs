//! Транспортный слой.
//!
//! Ядро мультиплексора не знает, как устроен транспорт — ему нужен лишь
//! минимальный набор возможностей:
//!
//! - `Transport`: построить сокет по адресу и опциям.
//! - `Socket`: подключиться и выдать канал для топика.
//! - `Channel`: присоединиться к топику, отправить событие, зарегистрировать
//!   обработчик входящих событий, показать список уже привязанных событий.
//!
//! Жизненный цикл соединения (heartbeat, переподключение, long-poll) —
//! забота реализации транспорта; ядро лишь передаёт ей опции.
//!
//! - `local`: внутрипроцессный loopback-транспорт для тестов и демонстраций.

pub mod local;

use std::sync::Arc;

use serde_json::Value;

use crate::{config::SocketOptions, error::ConfigError};

pub use local::{LocalSocket, LocalTransport};

/// Обработчик входящего события на канале.
///
/// Вызывается транспортом на каждую доставку; получает только payload —
/// топик и имя события обработчик знает сам.
pub type InboundHandler = Box<dyn Fn(Value) + Send + Sync>;

/// Возможность построить транспортную сессию.
pub trait Transport {
    type Socket: Socket;

    /// Создаёт сокет для указанного адреса.
    ///
    /// Опции передаются реализации без изменений. Никаких сетевых операций
    /// здесь не происходит — подключение выполняет `Socket::connect`.
    ///
    /// # Возвращает
    /// - `Ok(Socket)` если сокет построен
    /// - `Err(ConfigError::Transport)` если возможность не в состоянии
    ///   выдать сокет (ошибка конфигурации, а не сети)
    fn open(&self, endpoint: &str, options: SocketOptions) -> Result<Self::Socket, ConfigError>;
}

/// Транспортная сессия.
pub trait Socket: Send + Sync {
    /// Инициирует подключение. Не блокирует: результат подключения транспорт
    /// сообщает через собственные механизмы.
    fn connect(&self);

    /// Выдаёт канал для топика. Сам по себе канал ещё не присоединён.
    fn channel(&self, topic: &str) -> Arc<dyn Channel>;
}

/// Канал одного топика.
pub trait Channel: Send + Sync {
    /// Запрашивает присоединение к топику. Не блокирует.
    fn join(&self);

    /// Отправляет событие с payload. Безопасно сразу после `join` —
    /// очередь, если она нужна, живёт внутри транспорта.
    fn push(&self, event: &str, payload: Value);

    /// Регистрирует обработчик входящих событий с данным именем.
    fn on(&self, event: &str, handler: InboundHandler);

    /// Имена событий, для которых обработчики уже зарегистрированы.
    fn bindings(&self) -> Vec<String>;
}
