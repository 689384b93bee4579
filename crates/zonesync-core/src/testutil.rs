//! Scripted [`ZoneApi`] double shared by the adapter and registry tests.

use async_trait::async_trait;
use std::sync::Mutex;
use zonesync_api::{ApiError, FREE_PLAN_NAME, Zone, ZoneApi, ZoneSubscription};

pub(crate) fn zone(id: &str, name: &str, plan_name: &str) -> Zone {
    Zone {
        id: id.into(),
        name: name.into(),
        name_servers: vec!["ns1.example.net".into(), "ns2.example.net".into()],
        owner_id: Some("org-1".into()),
        plan_name: plan_name.into(),
    }
}

/// Records every call it receives; behavior is scripted through the
/// `fail_*` switches and the seeded zone.
#[derive(Default)]
pub(crate) struct MockApi {
    pub(crate) calls: Mutex<Vec<String>>,
    pub(crate) zone: Mutex<Option<Zone>>,
    pub(crate) rate_plan: Mutex<String>,
    pub(crate) fail_plan_update: bool,
    pub(crate) fail_delete: bool,
}

impl MockApi {
    pub(crate) fn with_zone(zone: Zone, rate_plan: &str) -> Self {
        Self {
            zone: Mutex::new(Some(zone)),
            rate_plan: Mutex::new(rate_plan.into()),
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ZoneApi for MockApi {
    async fn create_zone(
        &self,
        domain: &str,
        jump_start: bool,
        organization: Option<&str>,
    ) -> Result<Zone, ApiError> {
        self.log(format!(
            "create_zone {domain} jump_start={jump_start} org={organization:?}"
        ));
        let z = Zone {
            id: "z-1".into(),
            name: domain.into(),
            name_servers: vec!["ns1.example.net".into(), "ns2.example.net".into()],
            owner_id: organization.map(Into::into),
            plan_name: FREE_PLAN_NAME.into(),
        };
        *self.zone.lock().unwrap() = Some(z.clone());
        *self.rate_plan.lock().unwrap() = "free".into();
        Ok(z)
    }

    async fn zone_details(&self, zone_id: &str) -> Result<Zone, ApiError> {
        self.log(format!("zone_details {zone_id}"));
        match self.zone.lock().unwrap().clone() {
            Some(z) if z.id == zone_id => Ok(z),
            _ => Err(ApiError::InvalidIdentifier {
                id: zone_id.into(),
            }),
        }
    }

    async fn zone_subscription(&self, zone_id: &str) -> Result<ZoneSubscription, ApiError> {
        self.log(format!("zone_subscription {zone_id}"));
        Ok(ZoneSubscription {
            rate_plan_id: self.rate_plan.lock().unwrap().clone(),
        })
    }

    async fn update_zone_subscription(
        &self,
        zone_id: &str,
        rate_plan_id: &str,
    ) -> Result<ZoneSubscription, ApiError> {
        self.log(format!("update_zone_subscription {zone_id} {rate_plan_id}"));
        if self.fail_plan_update {
            return Err(ApiError::Api {
                code: 1207,
                message: "plan not available".into(),
            });
        }
        *self.rate_plan.lock().unwrap() = rate_plan_id.into();
        if let Some(z) = self.zone.lock().unwrap().as_mut() {
            z.plan_name = if rate_plan_id == "free" {
                FREE_PLAN_NAME.into()
            } else {
                format!("{rate_plan_id} website")
            };
        }
        Ok(ZoneSubscription {
            rate_plan_id: rate_plan_id.into(),
        })
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), ApiError> {
        self.log(format!("delete_zone {zone_id}"));
        if self.fail_delete {
            return Err(ApiError::Api {
                code: 1232,
                message: "zone already deleted".into(),
            });
        }
        *self.zone.lock().unwrap() = None;
        Ok(())
    }
}
