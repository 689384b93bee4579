//! Cloudflare zones API client
//!
//! * Implements [`zonesync_api::ZoneApi`] against the v4 REST API.
//! * Auth via **API Token** – needs `Zone:Read` and `Zone:Edit`.
//! * The "invalid zone identifier" error code is mapped to
//!   [`ApiError::InvalidIdentifier`] so callers never inspect message text.

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, info};
use zonesync_api::{ApiError, Zone, ZoneApi, ZoneSubscription};

const API_ROOT: &str = "https://api.cloudflare.com/client/v4";

/// Error code returned when a zone identifier does not route anywhere.
const INVALID_ZONE_IDENTIFIER: u32 = 7003;

/*──────── wire format ────────*/

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    #[serde(default)]
    errors: Vec<CfError>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct CfError {
    code: u32,
    message: String,
}

#[derive(Deserialize)]
struct CfZone {
    id: String,
    name: String,
    #[serde(default)]
    name_servers: Vec<String>,
    owner: Option<CfOwner>,
    plan: Option<CfPlan>,
}

#[derive(Deserialize)]
struct CfOwner {
    id: Option<String>,
}

#[derive(Deserialize)]
struct CfPlan {
    name: String,
}

#[derive(Deserialize)]
struct CfSubscription {
    rate_plan: CfRatePlan,
}

#[derive(Deserialize)]
struct CfRatePlan {
    id: String,
}

impl From<CfZone> for Zone {
    fn from(z: CfZone) -> Self {
        Zone {
            id: z.id,
            name: z.name,
            name_servers: z.name_servers,
            owner_id: z.owner.and_then(|o| o.id),
            plan_name: z.plan.map(|p| p.name).unwrap_or_default(),
        }
    }
}

/*──────── client ────────*/

pub struct CloudflareZoneApi {
    endpoint: String,
    client: Client,
}

impl CloudflareZoneApi {
    pub fn new(token: &str) -> anyhow::Result<Self> {
        Self::with_endpoint(token, API_ROOT)
    }

    /// Same as [`new`](Self::new) but against a custom endpoint; used by
    /// tests and self-hosted API gateways.
    pub fn with_endpoint(token: &str, endpoint: &str) -> anyhow::Result<Self> {
        let mut hdr = HeaderMap::new();
        hdr.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        hdr.insert(USER_AGENT, HeaderValue::from_static("zonesync (+github)"));
        hdr.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            client: Client::builder().default_headers(hdr).build()?,
        })
    }

    /*──────── tiny HTTP wrapper ────────*/

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        debug!("GET {path}");
        check(self.client.get(format!("{}{path}", self.endpoint)).send().await?).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        debug!("POST {path}");
        check(
            self.client
                .post(format!("{}{path}", self.endpoint))
                .json(&body)
                .send()
                .await?,
        )
        .await
    }

    async fn put<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, ApiError> {
        debug!("PUT {path}");
        check(
            self.client
                .put(format!("{}{path}", self.endpoint))
                .json(&body)
                .send()
                .await?,
        )
        .await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        debug!("DELETE {path}");
        let resp = self
            .client
            .delete(format!("{}{path}", self.endpoint))
            .send()
            .await?;
        // delete responses may carry a null result on success
        let env: Envelope<Value> = resp.json().await?;
        if env.success {
            Ok(())
        } else {
            Err(envelope_error(env.errors))
        }
    }
}

fn envelope_error(errors: Vec<CfError>) -> ApiError {
    let (code, message) = errors
        .into_iter()
        .next()
        .map(|e| (e.code, e.message))
        .unwrap_or((0, "unknown error".to_owned()));
    ApiError::Api { code, message }
}

async fn check<T: DeserializeOwned>(resp: Response) -> Result<T, ApiError> {
    let env: Envelope<T> = resp.json().await?;
    if env.success {
        env.result.ok_or(ApiError::Api {
            code: 0,
            message: "response missing result".to_owned(),
        })
    } else {
        Err(envelope_error(env.errors))
    }
}

/*──────── ZoneApi impl ────────*/

#[async_trait]
impl ZoneApi for CloudflareZoneApi {
    async fn create_zone(
        &self,
        domain: &str,
        jump_start: bool,
        organization: Option<&str>,
    ) -> Result<Zone, ApiError> {
        let mut body = json!({
            "name":       domain,
            "jump_start": jump_start,
        });
        if let Some(org) = organization {
            body["organization"] = json!({ "id": org });
        }
        let z: CfZone = self.post("/zones", body).await?;
        info!("cloudflare created zone {} id={}", z.name, z.id);
        Ok(z.into())
    }

    async fn zone_details(&self, zone_id: &str) -> Result<Zone, ApiError> {
        let z: Result<CfZone, ApiError> = self.get(&format!("/zones/{zone_id}")).await;
        match z {
            Ok(z) => Ok(z.into()),
            Err(ApiError::Api { code, .. }) if code == INVALID_ZONE_IDENTIFIER => {
                Err(ApiError::InvalidIdentifier {
                    id: zone_id.to_owned(),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn zone_subscription(&self, zone_id: &str) -> Result<ZoneSubscription, ApiError> {
        let s: CfSubscription = self.get(&format!("/zones/{zone_id}/subscription")).await?;
        Ok(ZoneSubscription {
            rate_plan_id: s.rate_plan.id,
        })
    }

    async fn update_zone_subscription(
        &self,
        zone_id: &str,
        rate_plan_id: &str,
    ) -> Result<ZoneSubscription, ApiError> {
        let body = json!({ "rate_plan": { "id": rate_plan_id } });
        let s: CfSubscription = self
            .put(&format!("/zones/{zone_id}/subscription"), body)
            .await?;
        info!("cloudflare zone {zone_id} moved to plan {}", s.rate_plan.id);
        Ok(ZoneSubscription {
            rate_plan_id: s.rate_plan.id,
        })
    }

    async fn delete_zone(&self, zone_id: &str) -> Result<(), ApiError> {
        self.delete(&format!("/zones/{zone_id}")).await?;
        info!("cloudflare deleted zone {zone_id}");
        Ok(())
    }
}

/*──────── tests (wiremock) ────────*/

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn zone_body(id: &str, name: &str, plan: &str) -> Value {
        json!({
            "success": true,
            "errors": [],
            "result": {
                "id": id,
                "name": name,
                "name_servers": ["lara.ns.cloudflare.com", "hugh.ns.cloudflare.com"],
                "owner": { "id": "org-9f2" },
                "plan": { "name": plan },
            }
        })
    }

    async fn client(server: &MockServer) -> CloudflareZoneApi {
        CloudflareZoneApi::with_endpoint("test-token", &server.uri()).unwrap()
    }

    #[tokio::test]
    async fn create_zone_posts_domain_and_jump_start() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones"))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({
                "name": "example.com",
                "jump_start": true,
                "organization": { "id": "org-9f2" },
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(zone_body("023e105f", "example.com", "Free Website")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        let z = api
            .create_zone("example.com", true, Some("org-9f2"))
            .await
            .unwrap();
        assert_eq!(z.id, "023e105f");
        assert_eq!(z.name, "example.com");
        assert_eq!(z.owner_id.as_deref(), Some("org-9f2"));
        assert_eq!(z.plan_name, "Free Website");
    }

    #[tokio::test]
    async fn create_zone_omits_organization_when_absent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones"))
            .and(body_json(json!({
                "name": "example.com",
                "jump_start": false,
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(zone_body("023e105f", "example.com", "Free Website")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        api.create_zone("example.com", false, None).await.unwrap();
    }

    #[tokio::test]
    async fn zone_details_maps_invalid_identifier() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/deadbeef"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 7003, "message": "Could not route to /zones/deadbeef" }],
                "result": null,
            })))
            .mount(&server)
            .await;

        let api = client(&server).await;
        let err = api.zone_details("deadbeef").await.unwrap_err();
        assert!(matches!(
            err,
            ApiError::InvalidIdentifier { ref id } if id == "deadbeef"
        ));
    }

    #[tokio::test]
    async fn zone_details_passes_other_errors_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/023e105f"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 9109, "message": "Access denied" }],
                "result": null,
            })))
            .mount(&server)
            .await;

        let api = client(&server).await;
        let err = api.zone_details("023e105f").await.unwrap_err();
        assert!(matches!(err, ApiError::Api { code: 9109, .. }));
    }

    #[tokio::test]
    async fn subscription_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/zones/023e105f/subscription"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "rate_plan": { "id": "pro" } },
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/zones/023e105f/subscription"))
            .and(body_json(json!({ "rate_plan": { "id": "business" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "rate_plan": { "id": "business" } },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server).await;
        let s = api.zone_subscription("023e105f").await.unwrap();
        assert_eq!(s.rate_plan_id, "pro");
        let s = api
            .update_zone_subscription("023e105f", "business")
            .await
            .unwrap();
        assert_eq!(s.rate_plan_id, "business");
    }

    #[tokio::test]
    async fn delete_zone_surfaces_api_failure() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/zones/023e105f"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 1232, "message": "zone already deleted" }],
                "result": null,
            })))
            .mount(&server)
            .await;

        let api = client(&server).await;
        let err = api.delete_zone("023e105f").await.unwrap_err();
        assert_eq!(err.to_string(), "api error 1232: zone already deleted");
    }

    #[tokio::test]
    async fn delete_zone_ok() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/zones/023e105f"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "id": "023e105f" },
            })))
            .mount(&server)
            .await;

        let api = client(&server).await;
        api.delete_zone("023e105f").await.unwrap();
    }
}
