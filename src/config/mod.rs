pub mod options;
pub mod settings;

pub use options::{DecodeFn, EncodeFn, LoggerFn, SocketOptions};
pub use settings::Settings;
