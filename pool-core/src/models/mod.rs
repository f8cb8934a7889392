mod catalog;
mod dimensions;
mod equipment;
mod estimate_item;
mod history_estimate;
mod material;
mod selection;
mod work;

pub use catalog::{Catalog, Product, ProductCategory};
pub use dimensions::Dimensions;
pub use equipment::{Equipment, PartKind};
pub use estimate_item::{EstimateItem, group_by_section, sections};
pub use history_estimate::{EstimateStatus, HistoryEstimate, NewHistoryEstimate};
pub use material::{Bowl, Material, MaterialKind};
pub use selection::{ClientInfo, Selection, SelectionHistory, SelectionUpdate};
pub use work::{SelectedWork, WorkCategory};
