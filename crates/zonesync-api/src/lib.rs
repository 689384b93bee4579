//! Collaborator interface consumed by the zone resource adapter.
//!
//! * [`ZoneApi`] is the remote zone-management surface: create, lookup,
//!   subscription handling and deletion.
//! * Transport concerns (auth, retries, rate limiting) belong to the
//!   implementing crate, not to this interface.
//! * Not-found is a **typed** condition ([`ApiError::InvalidIdentifier`]),
//!   never a message to string-match against.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Plan name the remote side reports for zones on the free tier.
/// Read uses it to skip the subscription lookup entirely.
pub const FREE_PLAN_NAME: &str = "Free Website";

/*──────── plan tier ────────*/

/// Subscription level applied to a zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Pro,
    Business,
    Enterprise,
}

impl PlanTier {
    /// Maps a remote rate-plan identifier back onto a tier.
    pub fn from_rate_plan(id: &str) -> Option<Self> {
        match id {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            "business" => Some(Self::Business),
            "enterprise" => Some(Self::Enterprise),
            _ => None,
        }
    }

    /// Rate-plan identifier sent on subscription updates.
    pub fn rate_plan_id(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
            Self::Business => "business",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rate_plan_id())
    }
}

/*──────── neutral records ────────*/

/// A hosted zone as the remote service reports it.
#[derive(Clone, Debug)]
pub struct Zone {
    /// Identifier assigned by the remote system at creation; the sole
    /// key for every subsequent call.
    pub id: String,
    /// Domain name.
    pub name: String,
    /// Authoritative name servers, remote-computed.
    pub name_servers: Vec<String>,
    /// Owning organization, if any.
    pub owner_id: Option<String>,
    /// Human-readable plan name (see [`FREE_PLAN_NAME`]).
    pub plan_name: String,
}

/// Subscription attached to a zone.
#[derive(Clone, Debug)]
pub struct ZoneSubscription {
    pub rate_plan_id: String,
}

/*──────── errors ────────*/

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote system does not know the given zone identifier.
    #[error("invalid zone identifier `{id}`")]
    InvalidIdentifier { id: String },

    #[error("api error {code}: {message}")]
    Api { code: u32, message: String },
}

/*──────── trait ────────*/

#[async_trait]
pub trait ZoneApi: Send + Sync {
    /// Creates a new zone. Never idempotent: every call creates a fresh
    /// remote zone.
    async fn create_zone(
        &self,
        domain: &str,
        jump_start: bool,
        organization: Option<&str>,
    ) -> Result<Zone, ApiError>;

    /// Fetches zone details by identifier. Unknown identifiers fail with
    /// [`ApiError::InvalidIdentifier`].
    async fn zone_details(&self, zone_id: &str) -> Result<Zone, ApiError>;

    /// Fetches the subscription currently attached to a zone.
    async fn zone_subscription(&self, zone_id: &str) -> Result<ZoneSubscription, ApiError>;

    /// Moves a zone onto the given rate plan.
    async fn update_zone_subscription(
        &self,
        zone_id: &str,
        rate_plan_id: &str,
    ) -> Result<ZoneSubscription, ApiError>;

    /// Deletes a zone by identifier.
    async fn delete_zone(&self, zone_id: &str) -> Result<(), ApiError>;
}
