//! Shared error plumbing and the warning capability used across satchel crates.

pub mod context;
pub mod warn;

pub use {
    context::FromMessage,
    warn::{NoopWarnLog, RecordingWarnLog, TracingWarnLog, WarnLog},
};
