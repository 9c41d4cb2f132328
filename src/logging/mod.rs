//! Structured logging orchestrator.
//!
//! Events are serialized as one JSON object per line. Figure sessions accept
//! an optional [`Logger`]; without one, composition stays completely silent.

mod core;

pub use core::{
    FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink, event, event_with, kv,
};
