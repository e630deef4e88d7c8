use tracing::{debug, info};

use super::{Dispatcher, Ports, TopicFn, TopicRegistry};
use crate::{
    config::SocketOptions,
    error::ConfigError,
    transport::{Socket, Transport},
};

/// Сессия мультиплексора.
///
/// Собирается один раз при старте: проверяет входные данные, строит сокет
/// через транспортную возможность и ровно один раз инициирует подключение.
/// Дальше `register` подключает ядро к портам хоста.
pub struct Session {
    socket: Box<dyn Socket>,
    topic_fn: Option<TopicFn>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("socket", &"<dyn Socket>")
            .field("topic_fn", &self.topic_fn.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl Session {
    /// Открывает транспортную сессию.
    ///
    /// Опции уходят транспорту без изменений; `None` означает значения по
    /// умолчанию. Повторных попыток здесь нет: неудача подключения — забота
    /// транспорта, и наблюдается она через его собственные механизмы.
    ///
    /// # Возвращает
    /// - `Ok(Session)` — сокет построен, connect инициирован
    /// - `Err(ConfigError)` — возможность не выдала сокет; connect при этом
    ///   не вызывался
    pub fn connect<T>(
        transport: &T,
        endpoint: &str,
        options: Option<SocketOptions>,
        topic_fn: Option<TopicFn>,
    ) -> Result<Self, ConfigError>
    where
        T: Transport,
        T::Socket: 'static,
    {
        let options = options.unwrap_or_default();
        let socket = transport.open(endpoint, options)?;
        socket.connect();
        info!(endpoint, "session connected");

        Ok(Self {
            socket: Box::new(socket),
            topic_fn,
        })
    }

    /// Подключает ядро к портам хоста и запускает цикл обработки команд.
    ///
    /// Единственный последовательный цикл: он владеет реестром и
    /// диспетчером, поэтому инварианты «один join на топик» и «один
    /// обработчик на событие» держатся без блокировок. Завершается, когда
    /// хост закрывает командную сторону портов.
    pub async fn register(self, mut ports: Ports) {
        let registry = TopicRegistry::new(self.socket, self.topic_fn);
        let mut dispatcher = Dispatcher::new(registry, ports.events);

        while let Some(command) = ports.commands.recv().await {
            dispatcher.dispatch(command);
        }
        debug!("command lane closed, session loop finished");
    }
}
