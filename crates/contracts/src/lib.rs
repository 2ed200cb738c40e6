//! # Contracts
//!
//! Shared interface contracts for the event exporter: the Kubernetes event
//! model handed to sinks, receiver configuration, the sink trait and the
//! unified error type. Every other crate in the workspace depends on this one;
//! reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Event timestamps are UTC (`chrono::DateTime<Utc>`)
//! - Markers carry whole Unix seconds

mod config;
mod error;
mod event;
mod sink;

pub use config::*;
pub use error::*;
pub use event::*;
pub use sink::*;
