//! Infrastructure adapters for the application ports.

#![forbid(unsafe_code)]

mod env_config;
mod in_memory_session_storage;
mod tracing_notification_sink;

pub use env_config::{AuthRuntimeConfig, init_tracing};
pub use in_memory_session_storage::InMemorySessionStorage;
pub use tracing_notification_sink::TracingNotificationSink;
