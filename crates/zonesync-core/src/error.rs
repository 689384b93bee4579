use thiserror::Error;
use zonesync_api::ApiError;

/// Validation errors in configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("validation failed: {0}")]
    Validate(#[from] validator::ValidationErrors),
}

/// Errors raised by the zone resource adapter.
///
/// One variant per remote operation, so a failure always names the call
/// that produced it. Nothing here retries.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("failed to create zone: {0}")]
    CreateZone(#[source] ApiError),

    #[error("failed to update zone plan: {0}")]
    UpdatePlan(#[source] ApiError),

    #[error("failed to read zone: {0}")]
    ReadZone(#[source] ApiError),

    #[error("failed to read zone subscription details: {0}")]
    ReadSubscription(#[source] ApiError),

    #[error("error deleting zone: {0}")]
    DeleteZone(#[source] ApiError),

    /// The operation needs an identifier the state does not carry.
    #[error("zone state carries no identifier")]
    MissingId,

    /// The remote subscription reports a rate plan outside the known tiers.
    #[error("unknown rate plan `{0}` reported by remote subscription")]
    UnknownPlan(String),

    /// Import found nothing to adopt under the given identifier.
    #[error("zone `{0}` not found; nothing to import")]
    ImportNotFound(String),
}
