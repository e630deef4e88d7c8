use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Команда ядру от хоста.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Send {
        topic: String,
        event: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<Value>,
    },
    Listen {
        topic: String,
        event: String,
    },
}

impl Command {
    pub fn send(
        topic: impl Into<String>,
        event: impl Into<String>,
        payload: Option<Value>,
    ) -> Self {
        Self::Send {
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }

    pub fn listen(topic: impl Into<String>, event: impl Into<String>) -> Self {
        Self::Listen {
            topic: topic.into(),
            event: event.into(),
        }
    }

    /// Разбирает команду send из проводной формы `[topic, event, payload?]`.
    ///
    /// Возвращает `None`, если значение не массив из двух или трёх
    /// элементов со строковыми topic и event.
    pub fn send_from_wire(raw: &Value) -> Option<Self> {
        match raw.as_array()?.as_slice() {
            [Value::String(topic), Value::String(event)] => {
                Some(Self::send(topic.as_str(), event.as_str(), None))
            }
            [Value::String(topic), Value::String(event), payload] => {
                Some(Self::send(topic.as_str(), event.as_str(), Some(payload.clone())))
            }
            _ => None,
        }
    }

    /// Разбирает команду listen из проводной пары `[topic, event]`.
    pub fn listen_from_wire(raw: &Value) -> Option<Self> {
        match raw.as_array()?.as_slice() {
            [Value::String(topic), Value::String(event)] => {
                Some(Self::listen(topic.as_str(), event.as_str()))
            }
            _ => None,
        }
    }
}

/// Уведомление хосту: единая форма для любого входящего события,
/// независимо от топика и имени события.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub topic: String,
    pub event: String,
    pub payload: Value,
}

impl Notification {
    pub fn new(
        topic: impl Into<String>,
        event: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            topic: topic.into(),
            event: event.into(),
            payload,
        }
    }

    /// Представление `[topic, event, payload]` для выдачи наружу.
    pub fn into_triple(self) -> Value {
        json!([self.topic, self.event, self.payload])
    }
}
