//! Resource-type registry: explicit composition at startup, no global
//! registration.

use crate::adapter::ZoneAdapter;
use crate::cfg::AppConfig;
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Resource-type name the zone adapter registers under.
pub const ZONE_RESOURCE: &str = "zone";

/// Owns the mapping from resource-type name to adapter instance.
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<ZoneAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, resource_type: impl Into<String>, adapter: Arc<ZoneAdapter>) {
        self.adapters.insert(resource_type.into(), adapter);
    }

    pub fn get(&self, resource_type: &str) -> Option<Arc<ZoneAdapter>> {
        self.adapters.get(resource_type).cloned()
    }
}

/// Builds the startup registry from configuration. The API client is
/// selected by `api.kind`; unknown kinds are a startup error.
pub fn build_registry(cfg: &AppConfig) -> Result<AdapterRegistry> {
    let mut reg = AdapterRegistry::new();
    match cfg.api.kind.to_ascii_lowercase().as_str() {
        #[cfg(feature = "zonesync-api-cloudflare")]
        "cloudflare" => {
            let api = match cfg.api.endpoint.as_deref() {
                Some(ep) => {
                    zonesync_api_cloudflare::CloudflareZoneApi::with_endpoint(&cfg.api.token, ep)?
                }
                None => zonesync_api_cloudflare::CloudflareZoneApi::new(&cfg.api.token)?,
            };
            reg.register(ZONE_RESOURCE, Arc::new(ZoneAdapter::new(Arc::new(api))));
        }
        other => anyhow::bail!("unknown api kind `{other}`"),
    }
    Ok(reg)
}
