pub mod config;
pub mod flags;
pub mod harvest;

pub use config::{DelayPolicy, HarvestConfig};
pub use flags::FlagMap;
pub use harvest::{
    HarvestEvent, HarvestProgressCallback, HarvestSummary, collect_flags,
    discover_municipalities, execute_harvest,
};
