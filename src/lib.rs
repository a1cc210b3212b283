//! episeq: episode log to instruction sequence translation.
//!
//! Reads timestamped multi-agent interaction logs, orders them, folds motion
//! into net moves and turns, names objects, and pairs pick-ups with
//! placements and pours.

pub mod annotate;
pub mod batch;
pub mod cli;
pub mod config;
pub mod core;
pub mod logging;
