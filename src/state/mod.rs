//! State module for tracking harvest progress
//!
//! # Components
//!
//! - `Cursor`: The pagination position echoed back to the server
//! - `HarvestState`: The fetch loop's state machine states
//! - `TerminationReason`: Why a run ended

mod cursor;
mod harvest_state;

// Re-export main types
pub use cursor::{format_cursor_date, Cursor};
pub use harvest_state::{HarvestState, TerminationReason};
