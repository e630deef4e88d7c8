/// Socket options and runtime settings.
pub mod config;
/// Common error types.
pub mod error;
/// Multiplexer core: session, registry, dispatcher, ports.
pub mod mux;
/// Transport abstraction and the in-process loopback transport.
pub mod transport;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

/// Transport options and demo-process settings.
pub use config::{DecodeFn, EncodeFn, LoggerFn, Settings, SocketOptions};
/// Construction-time errors.
pub use error::ConfigError;
/// Core API: commands in, notifications out.
pub use mux::{
    Command, Dispatcher, HostPorts, Notification, Ports, Session, TopicFn, TopicRegistry,
};
/// Transport capability set and the bundled loopback transport.
pub use transport::{Channel, InboundHandler, LocalSocket, LocalTransport, Socket, Transport};
