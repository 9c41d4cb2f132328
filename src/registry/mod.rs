//! Panel registry orchestrator.

mod core;

pub use core::{PanelRegistry, PanelState};
