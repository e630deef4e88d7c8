//! Записывающий транспорт для unit-тестов ядра.
//!
//! Считает вызовы connect/channel/join/push/on и позволяет вручную
//! доставить входящее событие зарегистрированному обработчику.

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use parking_lot::Mutex;
use serde_json::Value;

use crate::{
    config::SocketOptions,
    error::ConfigError,
    transport::{Channel, InboundHandler, Socket, Transport},
};

#[derive(Default)]
pub(crate) struct RecordingState {
    pub connect_calls: AtomicUsize,
    /// Топики в порядке вызовов `Socket::channel`.
    pub channel_calls: Mutex<Vec<String>>,
    pub channels: Mutex<HashMap<String, Arc<RecordingChannel>>>,
    /// Привязки, которые канал «уже имеет» к моменту создания.
    pub seeded_bindings: Mutex<HashMap<String, Vec<String>>>,
}

impl RecordingState {
    /// Канал по (преобразованному) имени топика.
    pub fn channel(&self, topic: &str) -> Arc<RecordingChannel> {
        self.channels
            .lock()
            .get(topic)
            .cloned()
            .unwrap_or_else(|| panic!("no channel was created for topic {topic:?}"))
    }

    pub fn channel_calls_for(&self, topic: &str) -> usize {
        self.channel_calls
            .lock()
            .iter()
            .filter(|called| called.as_str() == topic)
            .count()
    }

    pub fn seed_bindings(&self, topic: &str, events: &[&str]) {
        self.seeded_bindings.lock().insert(
            topic.to_string(),
            events.iter().map(|event| event.to_string()).collect(),
        );
    }
}

pub(crate) struct RecordingChannel {
    pub join_calls: AtomicUsize,
    pub pushes: Mutex<Vec<(String, Value)>>,
    bindings: Mutex<Vec<String>>,
    handlers: Mutex<HashMap<String, InboundHandler>>,
}

impl RecordingChannel {
    fn with_bindings(seeded: Vec<String>) -> Self {
        Self {
            join_calls: AtomicUsize::new(0),
            pushes: Mutex::new(Vec::new()),
            bindings: Mutex::new(seeded),
            handlers: Mutex::new(HashMap::new()),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.lock().len()
    }

    /// Имитация входящей доставки от транспорта.
    pub fn deliver(&self, event: &str, payload: Value) {
        let handlers = self.handlers.lock();
        let handler = handlers
            .get(event)
            .unwrap_or_else(|| panic!("no handler registered for event {event:?}"));
        handler(payload);
    }
}

impl Channel for RecordingChannel {
    fn join(&self) {
        self.join_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn push(&self, event: &str, payload: Value) {
        self.pushes.lock().push((event.to_string(), payload));
    }

    fn on(&self, event: &str, handler: InboundHandler) {
        self.bindings.lock().push(event.to_string());
        self.handlers.lock().insert(event.to_string(), handler);
    }

    fn bindings(&self) -> Vec<String> {
        self.bindings.lock().clone()
    }
}

pub(crate) struct RecordingSocket {
    state: Arc<RecordingState>,
}

impl Socket for RecordingSocket {
    fn connect(&self) {
        self.state.connect_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn channel(&self, topic: &str) -> Arc<dyn Channel> {
        self.state.channel_calls.lock().push(topic.to_string());
        let seeded = self
            .state
            .seeded_bindings
            .lock()
            .get(topic)
            .cloned()
            .unwrap_or_default();
        self.state
            .channels
            .lock()
            .entry(topic.to_string())
            .or_insert_with(|| Arc::new(RecordingChannel::with_bindings(seeded)))
            .clone()
    }
}

pub(crate) struct RecordingTransport {
    state: Arc<RecordingState>,
    fail: bool,
}

impl RecordingTransport {
    pub fn new() -> (Self, Arc<RecordingState>) {
        let state = Arc::new(RecordingState::default());
        (
            Self {
                state: state.clone(),
                fail: false,
            },
            state,
        )
    }

    /// Возможность, не способная выдать сокет.
    pub fn failing() -> (Self, Arc<RecordingState>) {
        let state = Arc::new(RecordingState::default());
        (
            Self {
                state: state.clone(),
                fail: true,
            },
            state,
        )
    }

    pub fn socket(&self) -> RecordingSocket {
        RecordingSocket {
            state: self.state.clone(),
        }
    }
}

impl Transport for RecordingTransport {
    type Socket = RecordingSocket;

    fn open(&self, _endpoint: &str, _options: SocketOptions) -> Result<RecordingSocket, ConfigError> {
        if self.fail {
            return Err(ConfigError::Transport(
                "capability does not expose connect/channel".to_string(),
            ));
        }
        Ok(self.socket())
    }
}
