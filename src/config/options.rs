use std::{fmt, sync::Arc, time::Duration};

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Функция сериализации кадра перед отправкой. Передаётся транспорту как есть.
pub type EncodeFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Функция десериализации входящего кадра. Передаётся транспорту как есть.
pub type DecodeFn = Arc<dyn Fn(&str) -> Value + Send + Sync>;

/// Диагностический хук транспорта: `(kind, message, data)`.
///
/// Ядро не перехватывает транспортные ошибки — всё, что транспорт хочет
/// сообщить оператору, идёт через этот хук.
pub type LoggerFn = Arc<dyn Fn(&str, &str, &Value) + Send + Sync>;

/// Опции транспортной сессии.
///
/// Все поля опциональны: отсутствующее значение означает «значение по
/// умолчанию транспорта». Ядро опции не интерпретирует, а передаёт
/// транспорту без изменений, включая нераспознанные ключи в `extra`.
#[derive(Clone, Default)]
pub struct SocketOptions {
    /// Таймаут одного запроса.
    pub timeout: Option<Duration>,
    /// Интервал heartbeat-сообщений.
    pub heartbeat_interval: Option<Duration>,
    /// Пауза перед попыткой переподключения.
    pub reconnect_after: Option<Duration>,
    /// Таймаут long-poll fallback'а.
    pub longpoller_timeout: Option<Duration>,
    /// Произвольный payload, отправляемый при подключении (например, токен).
    pub params: Option<Value>,
    pub encode: Option<EncodeFn>,
    pub decode: Option<DecodeFn>,
    pub logger: Option<LoggerFn>,
    /// Нераспознанные ключи исходного объекта опций, как есть.
    pub extra: Map<String, Value>,
}

impl SocketOptions {
    /// Разбирает опции из JSON-значения.
    ///
    /// Значение обязано быть объектом. Распознанные ключи совпадают с
    /// контрактом транспорта: `timeout`, `heartbeatIntervalMs`,
    /// `reconnectAfterMs`, `longpollerTimeout`, `params`. Остальные ключи
    /// сохраняются в `extra` без интерпретации.
    ///
    /// # Возвращает
    /// - `Ok(SocketOptions)` для объекта с корректно типизированными ключами
    /// - `Err(ConfigError::OptionsNotObject)` если значение — не объект
    /// - `Err(ConfigError::InvalidOption)` если распознанный ключ имеет
    ///   неожиданный тип
    pub fn from_value(raw: &Value) -> Result<Self, ConfigError> {
        let object = raw
            .as_object()
            .ok_or(ConfigError::OptionsNotObject(value_kind(raw)))?;

        let mut options = Self::default();
        for (key, value) in object {
            match key.as_str() {
                "timeout" => options.timeout = Some(millis(key, value)?),
                "heartbeatIntervalMs" => options.heartbeat_interval = Some(millis(key, value)?),
                "reconnectAfterMs" => options.reconnect_after = Some(millis(key, value)?),
                "longpollerTimeout" => options.longpoller_timeout = Some(millis(key, value)?),
                "params" => options.params = Some(value.clone()),
                _ => {
                    options.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(options)
    }

    /// Вызывает диагностический хук, если он задан.
    pub fn log(&self, kind: &str, message: &str, data: &Value) {
        if let Some(logger) = &self.logger {
            logger(kind, message, data);
        }
    }
}

impl fmt::Debug for SocketOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketOptions")
            .field("timeout", &self.timeout)
            .field("heartbeat_interval", &self.heartbeat_interval)
            .field("reconnect_after", &self.reconnect_after)
            .field("longpoller_timeout", &self.longpoller_timeout)
            .field("params", &self.params)
            .field("encode", &self.encode.as_ref().map(|_| "<fn>"))
            .field("decode", &self.decode.as_ref().map(|_| "<fn>"))
            .field("logger", &self.logger.as_ref().map(|_| "<fn>"))
            .field("extra", &self.extra)
            .finish()
    }
}

fn millis(key: &str, value: &Value) -> Result<Duration, ConfigError> {
    value
        .as_u64()
        .map(Duration::from_millis)
        .ok_or_else(|| ConfigError::InvalidOption {
            key: key.to_string(),
            reason: format!("expected milliseconds, got {}", value_kind(value)),
        })
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
