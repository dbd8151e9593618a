//! A second-resolution timer with per-tick and one-shot callbacks.
//!
//! The synchronous timer lives in `core`; `infra` drives it from a tokio
//! task fed by an injectable tick source and exposes a cloneable async
//! handle.

pub mod core;
pub mod infra;
pub mod utils;

pub use crate::core::{CallbackId, EachCallback, OnceCallback, Seconds, Timer};
pub use crate::infra::{IntervalTickSource, TickSource, TimerApp, TimerHandle};
