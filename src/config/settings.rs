use config::{Config, Environment};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Настройки демонстрационного процесса.
#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub endpoint: String,
    pub hub_capacity: usize,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg = Config::builder()
            // Добавляем значения по умолчанию
            .set_default("endpoint", "/socket")?
            .set_default("hub_capacity", 64)?
            // Добавляем переменные окружения с префиксом CHANMUX_
            .add_source(Environment::with_prefix("CHANMUX"))
            .build()?;

        // Десериализуем конфигурацию в нашу структуру
        Ok(cfg.try_deserialize()?)
    }
}
