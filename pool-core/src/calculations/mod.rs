//! Estimate calculations for pool construction.
//!
//! Everything here is pure: functions take a [`Selection`](crate::Selection)
//! or plain numbers and return new values without touching storage.

pub mod common;
pub mod delivery;
pub mod engine;
pub mod estimate_items;
pub mod filtration;
pub mod totals;
pub mod works;

pub use delivery::{delivery_cost, delivery_item};
pub use engine::PoolMetrics;
pub use estimate_items::generate_estimate_items;
pub use filtration::{FlowRating, TurnoverOption, required_flow};
pub use totals::{CustomItem, CustomItemUpdate, CustomItems, EstimateSummary, calculate_total};
pub use works::{WorkDefinition, WorksEditor, WorksError, calculate_auto_works};
