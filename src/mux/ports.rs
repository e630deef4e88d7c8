use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::{Command, Notification};

/// Порты ядра: единственная точка интеграции с хостом.
///
/// Команды входят через `commands`, уведомления выходят через `events`.
/// Обе очереди неограниченны: ядро никогда не блокирует ни хост, ни
/// транспортные колбэки.
pub struct Ports {
    pub commands: UnboundedReceiver<Command>,
    pub events: UnboundedSender<Notification>,
}

/// Хостовая сторона портов.
pub struct HostPorts {
    pub commands: UnboundedSender<Command>,
    pub events: UnboundedReceiver<Notification>,
}

impl Ports {
    /// Создаёт связанную пару: порты для ядра и их хостовые концы.
    pub fn channel() -> (Self, HostPorts) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        (
            Self {
                commands: command_rx,
                events: event_tx,
            },
            HostPorts {
                commands: command_tx,
                events: event_rx,
            },
        )
    }
}
