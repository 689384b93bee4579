//! Parse `zonesync.toml` into `AppConfig` (environment overrides supported)

use crate::error::ConfigError;
use anyhow::Result;
use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, File};
use serde::Deserialize;
use std::{collections::HashMap, env, path::Path};
use validator::Validate;
use zonesync_api::PlanTier;

/*──────── API ────────*/
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ApiCfg {
    /// remote service kind; `cloudflare` is the only one shipped today
    #[serde(default = "default_kind")]
    pub kind: String,
    #[validate(length(min = 1))]
    pub token: String,
    /// endpoint override (tests, self-hosted gateways)
    #[serde(default)]
    pub endpoint: Option<String>,
}
fn default_kind() -> String {
    "cloudflare".to_string()
}

/*──────── Zone ────────*/
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ZoneCfg {
    #[validate(length(min = 1))]
    pub domain: String,
    /// creation-time record-import directive; immutable, default true
    #[serde(default = "default_true")]
    pub jump_start: bool,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// desired plan tier; `None` leaves the remote default in place
    #[serde(default)]
    pub plan: Option<PlanTier>,
}
fn default_true() -> bool {
    true
}

/*──────── Root & AppConfig ────────*/
#[derive(Debug, Deserialize)]
struct Root {
    api: ApiCfg,
    #[serde(default)]
    zone: Vec<ZoneCfg>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiCfg,
    pub zone: Vec<ZoneCfg>,
}

impl AppConfig {
    /// Declared `[[zone]]` block for `domain`, if any.
    pub fn zone(&self, domain: &str) -> Option<&ZoneCfg> {
        self.zone.iter().find(|z| z.domain == domain)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.api.validate()?;
        for z in &self.zone {
            z.validate()?;
        }
        Ok(())
    }
}

/// Convert a raw environment value into a `toml::Value`.
///
/// * `"true"` / `"false"`  → `Boolean`
/// * valid integer         → `Integer` (`i64`)
/// * everything else       → `String`
fn parse_val(raw: &str) -> toml::Value {
    let lower = raw.to_ascii_lowercase();
    if lower == "true" || lower == "false" {
        toml::Value::Boolean(lower == "true")
    } else if let Ok(i) = raw.parse::<i64>() {
        toml::Value::Integer(i)
    } else {
        toml::Value::String(raw.to_owned())
    }
}

/// Collect env-encoded `[[zone]]` entries from the given key/value
/// pairs (the process environment in production, literal pairs in
/// tests).
///
/// Example:
/// `ZONESYNC_ZONE_0_DOMAIN=example.com` → `zone[0].domain = "example.com"`.
///
/// Returns `Ok(None)` when no matching variables are found.
fn collect_zone_array(
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<Option<Vec<ZoneCfg>>> {
    let prefix = "ZONESYNC_ZONE_";
    let mut buckets: HashMap<usize, toml::Table> = HashMap::new();

    for (k, v) in vars {
        if let Some(rest) = k.strip_prefix(prefix) {
            // split into "<idx>" and "<FIELD>"
            let mut it = rest.splitn(2, '_');
            let idx = it
                .next()
                .and_then(|s| s.parse::<usize>().ok())
                .ok_or_else(|| anyhow::anyhow!("bad env var: {k}"))?;
            let field = it
                .next()
                .ok_or_else(|| anyhow::anyhow!("bad env var: {k}"))?
                .to_ascii_lowercase();

            buckets.entry(idx).or_default().insert(field, parse_val(&v));
        }
    }

    if buckets.is_empty() {
        return Ok(None);
    }

    let mut idxs: Vec<_> = buckets.keys().cloned().collect();
    idxs.sort_unstable();
    let mut out = Vec::new();
    for i in idxs {
        out.push(buckets.remove(&i).unwrap().try_into()?);
    }
    Ok(Some(out))
}

/// Inject scalar environment variables into a `ConfigBuilder`.
///
/// `ZONESYNC_API_TOKEN` → `api.token`. Keys beginning with `ZONE_` are
/// skipped because they belong to the array handled by
/// [`collect_zone_array`].
fn add_scalar_env(
    mut b: ConfigBuilder<DefaultState>,
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Result<ConfigBuilder<DefaultState>> {
    let plen = prefix.len();
    for (k, v) in vars {
        if !k.starts_with(prefix) {
            continue;
        }
        let key = &k[plen..];
        if key.starts_with("ZONE_") {
            continue; // handled separately
        }
        let path = key.to_ascii_lowercase().replace('_', ".");
        match parse_val(&v) {
            toml::Value::Boolean(bv) => b = b.set_override(path, bv)?,
            toml::Value::Integer(iv) => b = b.set_override(path, iv)?,
            toml::Value::String(sv) => b = b.set_override(path, sv)?,
            _ => unreachable!("only scalar types appear here"),
        }
    }
    Ok(b)
}

/// Load configuration from an optional TOML file **and** environment
/// variables.
///
/// Priority (high → low):
/// 1. Environment zone array (`ZONESYNC_ZONE_n_*`)
/// 2. Environment scalars (`ZONESYNC_API_TOKEN`, …)
/// 3. Values in `zonesync.toml` (if the file exists)
pub fn load_config(path: &str) -> Result<AppConfig> {
    let mut builder = Config::builder();
    if Path::new(path).exists() {
        builder = builder.add_source(File::with_name(path).required(true));
    } else {
        tracing::info!("config file `{path}` not found; environment-only mode");
    }

    builder = add_scalar_env(builder, "ZONESYNC_", env::vars())?;

    let mut root: Root = builder.build()?.try_deserialize()?;

    if let Some(v) = collect_zone_array(env::vars())? {
        root.zone = v;
    }

    let cfg = AppConfig {
        api: root.api,
        zone: root.zone,
    };
    cfg.validate()?;
    Ok(cfg)
}
