//! Zone resource adapter: declarative zone state in, remote lifecycle
//! calls out, remote state back into the record.
//!
//! Five operations (create / read / update / delete / import), each a
//! sequential translation with no caching and no state shared between
//! invocations. The remote identifier, once assigned, is the sole key
//! for every call.

use crate::error::AdapterError;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use zonesync_api::{ApiError, FREE_PLAN_NAME, PlanTier, ZoneApi};

/// Locally managed view of one hosted zone.
///
/// `id` is `None` until the zone is created or adopted, and is cleared
/// again when Read discovers the remote zone is gone. `jump_start` is a
/// one-time creation directive; no operation ever writes it back from
/// remote state because the remote side does not expose it.
#[derive(Clone, Debug, Serialize)]
pub struct ZoneState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub domain: String,
    pub jump_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub name_servers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<PlanTier>,
}

impl ZoneState {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            id: None,
            domain: domain.into(),
            jump_start: true,
            organization_id: None,
            name_servers: Vec::new(),
            plan: None,
        }
    }
}

/// Adapter over an injected [`ZoneApi`] handle.
pub struct ZoneAdapter {
    api: Arc<dyn ZoneApi>,
}

impl ZoneAdapter {
    pub fn new(api: Arc<dyn ZoneApi>) -> Self {
        Self { api }
    }

    /// Create: one create-zone call, an optional subscription update for
    /// non-free plans, then a refresh via [`read`](Self::read) on every
    /// path, whatever the plan step did.
    ///
    /// The identifier is committed to the state before the plan step, so
    /// a failing subscription call leaves the zone alive remotely (on its
    /// default plan) and the identifier locally. The concluding refresh
    /// still runs, and the plan failure is then returned as the overall
    /// create failure. Never idempotent: every call creates a fresh
    /// remote zone.
    pub async fn create(&self, state: &mut ZoneState) -> Result<(), AdapterError> {
        let zone = self
            .api
            .create_zone(
                &state.domain,
                state.jump_start,
                state.organization_id.as_deref(),
            )
            .await
            .map_err(AdapterError::CreateZone)?;
        info!("created zone {} id={}", zone.name, zone.id);
        state.id = Some(zone.id.clone());

        let mut plan_err = None;
        if let Some(plan) = state.plan {
            if plan != PlanTier::Free {
                if let Err(e) = self
                    .api
                    .update_zone_subscription(&zone.id, plan.rate_plan_id())
                    .await
                {
                    plan_err = Some(AdapterError::UpdatePlan(e));
                }
            }
        }

        let refreshed = self.read(state).await;
        match plan_err {
            Some(e) => Err(e),
            None => refreshed,
        }
    }

    /// Read: refresh every field from the remote source of truth.
    ///
    /// An invalid identifier is the not-found convention: the identifier
    /// is cleared and `Ok(())` returned, so callers silently drop the
    /// zone from managed state. The plan is always re-derived remotely;
    /// the free-tier plan name short-circuits the subscription lookup,
    /// anything else costs exactly one further call.
    pub async fn read(&self, state: &mut ZoneState) -> Result<(), AdapterError> {
        let id = state.id.clone().ok_or(AdapterError::MissingId)?;
        let zone = match self.api.zone_details(&id).await {
            Ok(z) => z,
            Err(ApiError::InvalidIdentifier { .. }) => {
                info!("zone {id} not found");
                state.id = None;
                return Ok(());
            }
            Err(e) => return Err(AdapterError::ReadZone(e)),
        };

        state.plan = Some(if zone.plan_name == FREE_PLAN_NAME {
            PlanTier::Free
        } else {
            let sub = self
                .api
                .zone_subscription(&zone.id)
                .await
                .map_err(AdapterError::ReadSubscription)?;
            PlanTier::from_rate_plan(&sub.rate_plan_id)
                .ok_or_else(|| AdapterError::UnknownPlan(sub.rate_plan_id.clone()))?
        });

        state.domain = zone.name;
        state.organization_id = zone.owner_id;
        state.name_servers = zone.name_servers;
        Ok(())
    }

    /// Update: only the plan tier is mutable post-creation. An absent
    /// plan is a no-op success with zero remote calls; otherwise one
    /// subscription update followed by a full refresh.
    pub async fn update(&self, state: &mut ZoneState) -> Result<(), AdapterError> {
        let Some(plan) = state.plan else {
            return Ok(());
        };
        let id = state.id.clone().ok_or(AdapterError::MissingId)?;
        self.api
            .update_zone_subscription(&id, plan.rate_plan_id())
            .await
            .map_err(AdapterError::UpdatePlan)?;
        self.read(state).await
    }

    /// Delete: one delete-zone call; any failure is surfaced as-is, with
    /// no idempotent already-deleted handling.
    pub async fn delete(&self, zone_id: &str) -> Result<(), AdapterError> {
        self.api
            .delete_zone(zone_id)
            .await
            .map_err(AdapterError::DeleteZone)?;
        info!("deleted zone {zone_id}");
        Ok(())
    }

    /// Import: adopt an existing remote zone. The state must carry the
    /// identifier to adopt; everything else is populated by
    /// [`read`](Self::read). `jump_start` keeps whatever local value it
    /// already has. Adopting an identifier the remote side does not know
    /// is an error, not a silent empty record.
    pub async fn import(&self, state: &mut ZoneState) -> Result<(), AdapterError> {
        let id = state.id.clone().ok_or(AdapterError::MissingId)?;
        self.read(state).await?;
        if state.id.is_none() {
            return Err(AdapterError::ImportNotFound(id));
        }
        info!("imported zone {} id={id}", state.domain);
        Ok(())
    }
}
