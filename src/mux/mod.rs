//! Ядро мультиплексора.
//!
//! Этот модуль сводит пары (топик, событие) в одну двунаправленную
//! абстракцию поверх транспорта с явным join каналов и явной подпиской
//! на события:
//!
//! - `command`: команды хоста и единая форма уведомлений.
//! - `registry`: ленивый реестр каналов по топикам, один join на топик.
//! - `dispatcher`: перевод команд в вызовы транспорта, идемпотентные
//!   подписки, fan-in входящих событий в один сток.
//! - `ports`: точка интеграции с хостом.
//! - `session`: построение сессии и цикл обработки команд.
//!
//! Публичный API переэкспортирует основные типы всех подмодулей.

pub mod command;
pub mod dispatcher;
pub mod ports;
pub mod registry;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use command::{Command, Notification};
pub use dispatcher::Dispatcher;
pub use ports::{HostPorts, Ports};
pub use registry::{TopicFn, TopicRegistry};
pub use session::Session;
