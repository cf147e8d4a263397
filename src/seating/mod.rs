//! The seat availability core: vocabulary normalization, grid generation,
//! occupancy overlay and viewer-local selection. Everything in here is pure;
//! persistence and HTTP stay in the surrounding layers.

pub mod grid;
pub mod normalize;
pub mod overlay;
pub mod selection;

pub use grid::{generate_grid, FALLBACK_GRID_COLUMNS, FALLBACK_GRID_ROWS};
pub use overlay::{apply_bookings, apply_bookings_with_stats, OverlayStats};
pub use selection::{ClickOutcome, SelectionState};
