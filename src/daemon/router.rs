use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;
use uuid::Uuid;

use crate::application::claim_subdomain::ClaimSubdomain;
use crate::application::connect_domain::ConnectDomain;
use crate::application::remove_domain::RemoveDomain;
use crate::application::resolve_hostname::ResolveHostname;
use crate::application::verify_domain::{VerifyDomain, VerifyOutcome};
use crate::application::{ClaimError, Identity};
use crate::domain::{DnsRecordInstruction, DomainKind, DomainRecord, Hostname, PageId, VerificationStatus};

use super::Core;
use super::auth::BearerAuth;
use super::recheck::RecheckScheduler;

/// Shared state for the router.
pub struct AppState {
    pub core: Arc<Core>,
    pub auth: BearerAuth,
    pub recheck: RecheckScheduler,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/resolve", get(resolve))
        .route("/api/account/domains/connect", post(connect_domain))
        .route("/api/account/domains/verify", post(verify_domain))
        .route("/api/account/domains/status", get(domain_status))
        .route("/api/account/domains", delete(remove_domain))
        .route("/api/subdomains", post(claim_subdomain))
        .route("/api/domains/check/{hostname}", get(check_availability))
        .route("/api/domains/{id}", delete(remove_record))
        .with_state(state)
}

// ---------------------------------------------------------------------
// Error mapping

/// JSON error envelope. DNS-check outcomes never pass through here;
/// they are 200 responses with `verified: false`. Only synchronous
/// rejections and store faults become error statuses.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: "Authentication required".to_string(),
        }
    }
}

impl From<ClaimError> for ApiError {
    fn from(e: ClaimError) -> Self {
        let status = match &e {
            ClaimError::Hostname(_) | ClaimError::Label(_) | ClaimError::Reserved(_) => {
                StatusCode::BAD_REQUEST
            }
            ClaimError::NoDomainConfigured => StatusCode::BAD_REQUEST,
            ClaimError::AlreadyClaimed(_) => StatusCode::CONFLICT,
            ClaimError::NotFound(_) | ClaimError::PageNotFound(_) => StatusCode::NOT_FOUND,
            ClaimError::NotAuthorized => StatusCode::FORBIDDEN,
            ClaimError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl From<crate::infrastructure::store::StoreError> for ApiError {
    fn from(e: crate::infrastructure::store::StoreError) -> Self {
        ApiError::from(ClaimError::from(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "message": self.message }))).into_response()
    }
}

fn require_auth(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    state
        .auth
        .identify(authorization)
        .ok_or_else(ApiError::unauthorized)
}

// ---------------------------------------------------------------------
// Response shapes

#[derive(Serialize)]
struct RecordView {
    id: Uuid,
    hostname: String,
    kind: DomainKind,
    status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<PageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verified_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_checked_at: Option<String>,
}

impl From<DomainRecord> for RecordView {
    fn from(record: DomainRecord) -> Self {
        Self {
            id: record.id,
            hostname: record.hostname.to_string(),
            kind: record.kind,
            status: record.status,
            page: record.page,
            verified_at: record.verified_at.map(rfc3339),
            last_checked_at: record.last_checked_at.map(rfc3339),
        }
    }
}

fn rfc3339(t: OffsetDateTime) -> String {
    t.format(&Rfc3339).unwrap_or_else(|_| t.to_string())
}

// ---------------------------------------------------------------------
// Handlers

async fn health() -> &'static str {
    "ok"
}

#[derive(Deserialize)]
struct ConnectBody {
    domain: String,
}

#[derive(Serialize)]
struct ConnectResponse {
    domain: RecordView,
    verification_token: String,
    dns_records: Vec<DnsRecordInstruction>,
    instructions: String,
}

async fn connect_domain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ConnectBody>,
) -> Result<Json<ConnectResponse>, ApiError> {
    let identity = require_auth(&state, &headers)?;
    let core = &state.core;

    let connect = ConnectDomain::new(&core.store, &core.platform_domain, &core.targets);
    let result = connect.execute(&identity.user_id, &body.domain)?;

    // Keep checking in the background until DNS converges.
    state.recheck.watch(result.record.id);

    let routing_kind = if result.record.hostname.is_root_domain() {
        "A"
    } else {
        "CNAME"
    };
    let token = result
        .record
        .token
        .clone()
        .map(|t| t.as_str().to_string())
        .unwrap_or_default();

    Ok(Json(ConnectResponse {
        domain: result.record.into(),
        verification_token: token,
        dns_records: result.instructions,
        instructions: format!(
            "Add the TXT record for verification, then add the {} record to point your domain to LinkHub.",
            routing_kind
        ),
    }))
}

#[derive(Serialize)]
struct VerifyResponse {
    success: bool,
    verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    txt_verified: Option<bool>,
    domain: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected_record: Option<DnsRecordInstruction>,
}

async fn verify_domain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, ApiError> {
    let identity = require_auth(&state, &headers)?;
    let core = &state.core;

    let verify = VerifyDomain::new(&core.store, core.checker.as_ref(), &core.targets);
    let outcome = verify.execute_for_owner(&identity.user_id).await?;

    let response = match outcome {
        VerifyOutcome::AlreadyVerified(record) => VerifyResponse {
            success: true,
            verified: true,
            txt_verified: None,
            domain: record.hostname.to_string(),
            message: "Domain is already verified".to_string(),
            expected_record: None,
        },
        VerifyOutcome::Verified(record) => VerifyResponse {
            success: true,
            verified: true,
            txt_verified: Some(true),
            domain: record.hostname.to_string(),
            message: "Domain verified successfully! Your pages are now accessible at your custom domain."
                .to_string(),
            expected_record: None,
        },
        VerifyOutcome::OwnershipUnproven { record, expected } => VerifyResponse {
            success: false,
            verified: false,
            txt_verified: Some(false),
            domain: record.hostname.to_string(),
            message: format!(
                "TXT record not found. Add a TXT record at {} with value: {}",
                expected.host, expected.value
            ),
            expected_record: Some(expected),
        },
        VerifyOutcome::RoutingNotConfigured { record, expected } => VerifyResponse {
            success: false,
            verified: false,
            txt_verified: Some(true),
            domain: record.hostname.to_string(),
            message: format!(
                "Domain DNS not configured. Add a {} record pointing to {}",
                expected.record_type, expected.value
            ),
            expected_record: Some(expected),
        },
        VerifyOutcome::LookupFailed(record) => VerifyResponse {
            success: false,
            verified: false,
            txt_verified: None,
            domain: record.hostname.to_string(),
            message: "DNS lookup did not complete. Please try again in a moment.".to_string(),
            expected_record: None,
        },
    };

    Ok(Json(response))
}

#[derive(Serialize)]
struct StatusResponse {
    connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<RecordView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verification_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dns_records: Option<Vec<DnsRecordInstruction>>,
}

async fn domain_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatusResponse>, ApiError> {
    let identity = require_auth(&state, &headers)?;
    let core = &state.core;

    let Some(record) = core.store.find_custom_by_owner(&identity.user_id)? else {
        return Ok(Json(StatusResponse {
            connected: false,
            domain: None,
            verification_token: None,
            dns_records: None,
        }));
    };

    // Pending domains get their instructions back on every status poll,
    // so the dashboard can re-render them without a reconnect.
    let (token, dns_records) = match (&record.token, record.is_verified()) {
        (Some(token), false) => (
            Some(token.as_str().to_string()),
            Some(crate::domain::instructions_for(
                &record.hostname,
                token,
                &core.targets,
            )),
        ),
        _ => (None, None),
    };

    Ok(Json(StatusResponse {
        connected: true,
        domain: Some(record.into()),
        verification_token: token,
        dns_records,
    }))
}

async fn remove_domain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let identity = require_auth(&state, &headers)?;

    let removed = RemoveDomain::new(&state.core.store).execute_for_owner(&identity.user_id)?;
    info!(hostname = %removed.hostname, "domain disconnected via API");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Custom domain removed successfully",
    })))
}

#[derive(Deserialize)]
struct SubdomainBody {
    page_id: String,
    subdomain: String,
}

async fn claim_subdomain(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<SubdomainBody>,
) -> Result<Json<RecordView>, ApiError> {
    let identity = require_auth(&state, &headers)?;
    let core = &state.core;

    let claim = ClaimSubdomain::new(&core.store, &core.reserved, &core.platform_domain);
    let record = claim.execute(
        &identity.user_id,
        &PageId::new(body.page_id),
        &body.subdomain,
    )?;

    Ok(Json(record.into()))
}

#[derive(Serialize)]
struct AvailabilityResponse {
    hostname: String,
    available: bool,
}

async fn check_availability(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(hostname): Path<String>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let identity = require_auth(&state, &headers)?;
    let core = &state.core;

    let hostname = Hostname::parse(&hostname, &core.platform_domain).map_err(ClaimError::from)?;
    let available = core.store.is_available(&hostname, &identity.user_id);

    Ok(Json(AvailabilityResponse {
        hostname: hostname.to_string(),
        available,
    }))
}

async fn remove_record(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let identity = require_auth(&state, &headers)?;

    RemoveDomain::new(&state.core.store).execute_record(&identity.user_id, id)?;
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Deserialize)]
struct ResolveParams {
    hostname: Option<String>,
}

/// Public endpoint the edge calls before it knows which tenant a
/// request belongs to. Answers identity only; content is fetched by
/// the page-serving path.
async fn resolve(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Response {
    let Some(hostname) = params.hostname else {
        return ApiError {
            status: StatusCode::BAD_REQUEST,
            message: "Hostname is required".to_string(),
        }
        .into_response();
    };

    let resolve = ResolveHostname::new(&state.core.store);
    match resolve.execute(&hostname) {
        Ok(Some(tenant)) => Json(tenant).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "message": "This domain is not connected to any LinkHub page yet.",
                "not_connected": true,
            })),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}
