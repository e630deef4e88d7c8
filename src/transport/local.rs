use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{Channel, InboundHandler, Socket, Transport};
use crate::{config::SocketOptions, error::ConfigError};

/// Ёмкость hub'а топика по умолчанию.
const DEFAULT_HUB_CAPACITY: usize = 64;

type TopicKey = Arc<str>;

/// Событие, циркулирующее внутри hub'а одного топика.
#[derive(Debug, Clone)]
struct TopicEvent {
    event: Arc<str>,
    payload: Value,
}

/// Внутрипроцессный loopback-транспорт.
///
/// Каждому топику соответствует свой hub — `broadcast`-канал заданной
/// ёмкости. `push` на канале рассылает событие всем обработчикам,
/// зарегистрированным через `on` на том же сокете. Сеть не используется,
/// доставка детерминирована — этого достаточно для тестов и демонстраций.
pub struct LocalTransport {
    capacity: usize,
}

impl LocalTransport {
    /// Создаёт транспорт с заданной ёмкостью hub'ов.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }
}

impl Default for LocalTransport {
    fn default() -> Self {
        Self::new(DEFAULT_HUB_CAPACITY)
    }
}

impl Transport for LocalTransport {
    type Socket = LocalSocket;

    fn open(&self, endpoint: &str, options: SocketOptions) -> Result<LocalSocket, ConfigError> {
        if endpoint.is_empty() {
            return Err(ConfigError::Transport(
                "endpoint must not be empty".to_string(),
            ));
        }
        Ok(LocalSocket {
            endpoint: endpoint.to_string(),
            capacity: self.capacity,
            hubs: Arc::new(DashMap::new()),
            options,
            connected: AtomicBool::new(false),
        })
    }
}

/// Сокет loopback-транспорта.
///
/// Hub'ы топиков → `Sender`, один на имя топика.
pub struct LocalSocket {
    endpoint: String,
    capacity: usize,
    hubs: Arc<DashMap<TopicKey, broadcast::Sender<TopicEvent>>>,
    options: SocketOptions,
    connected: AtomicBool,
}

impl LocalSocket {
    /// Проверяет, был ли вызван `connect`.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for LocalSocket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSocket")
            .field("endpoint", &self.endpoint)
            .field("capacity", &self.capacity)
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl Socket for LocalSocket {
    fn connect(&self) {
        self.connected.store(true, Ordering::Relaxed);
        self.options
            .log("socket", "connect", &json!({ "endpoint": self.endpoint }));
        debug!(endpoint = %self.endpoint, "local socket connected");
    }

    fn channel(&self, topic: &str) -> Arc<dyn Channel> {
        let key: TopicKey = Arc::from(topic);
        let tx = self
            .hubs
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone();
        Arc::new(LocalChannel {
            topic: key,
            tx,
            joined: AtomicBool::new(false),
            bindings: Mutex::new(Vec::new()),
            options: self.options.clone(),
        })
    }
}

/// Канал одного топика поверх hub'а.
pub struct LocalChannel {
    topic: TopicKey,
    tx: broadcast::Sender<TopicEvent>,
    joined: AtomicBool,
    bindings: Mutex<Vec<String>>,
    options: SocketOptions,
}

impl Channel for LocalChannel {
    fn join(&self) {
        self.joined.store(true, Ordering::Relaxed);
        self.options
            .log("channel", "join", &json!({ "topic": &*self.topic }));
        debug!(topic = %self.topic, "channel joined");
    }

    fn push(&self, event: &str, payload: Value) {
        if !self.joined.load(Ordering::Relaxed) {
            debug!(topic = %self.topic, event, "push before join completion");
        }
        self.options.log(
            "channel",
            "push",
            &json!({ "topic": &*self.topic, "event": event }),
        );
        let delivered = self
            .tx
            .send(TopicEvent {
                event: Arc::from(event),
                payload,
            })
            .is_ok();
        if !delivered {
            // Нет ни одного обработчика — событие уходит в никуда.
            debug!(topic = %self.topic, event, "push without subscribers");
        }
    }

    fn on(&self, event: &str, handler: InboundHandler) {
        self.bindings.lock().push(event.to_string());

        let wanted: Arc<str> = Arc::from(event);
        let topic = self.topic.clone();
        let mut rx = self.tx.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(delivery) if delivery.event == wanted => handler(delivery.payload),
                    Ok(_) => {}
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(topic = %topic, event = %wanted, missed, "subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn bindings(&self) -> Vec<String> {
        self.bindings.lock().clone()
    }
}
