//! zonesync-core – configuration, the zone resource adapter and the
//! adapter registry.

pub mod adapter;
pub mod cfg;
pub mod error;
pub mod registry;

#[cfg(test)]
mod testutil;

pub use adapter::{ZoneAdapter, ZoneState};
pub use cfg::{AppConfig, load_config};
pub use error::{AdapterError, ConfigError};
pub use registry::{AdapterRegistry, ZONE_RESOURCE, build_registry};
