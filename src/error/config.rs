use thiserror::Error;

/// Ошибка конфигурации сессии.
///
/// Возникает только синхронно, на этапе построения: либо сессия собрана
/// целиком, либо не собрана вовсе. Ошибки транспортного уровня (обрыв
/// соединения, отказ join, таймауты) сюда не попадают — они проходят через
/// собственные механизмы транспорта.
#[derive(Debug, Error)]
pub enum ConfigError {
    // ==== Транспортная возможность ====
    #[error("transport capability failed to produce a socket: {0}")]
    Transport(String),

    // ==== Опции ====
    #[error("socket options must be an object, got {0}")]
    OptionsNotObject(&'static str),

    #[error("invalid option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    // ==== Настройки окружения ====
    #[error("settings error: {0}")]
    Settings(#[from] config::ConfigError),
}
