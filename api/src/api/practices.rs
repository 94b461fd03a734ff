//! Practice endpoints.
//!
//! Writes are tenant-scoped (the auth layer injects the tenant claim);
//! reads are public so the patient-facing app can render practice pages.

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use medbook_core::catalog::{Practice, PracticeDraft};
use medbook_core::environment::{Clock, IdSource};
use medbook_core::store::PracticeStore;
use medbook_core::types::PracticeId;
use medbook_web::{AppError, StrictJson, TenantClaim};
use serde::Serialize;

/// How many practices the unfiltered listing returns.
const LIST_LIMIT: u32 = 50;

/// Practice listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeListResponse {
    /// Most recently registered practices, newest first.
    pub practices: Vec<Practice>,
    /// Number of practices returned.
    pub count: usize,
}

/// Register a practice under the caller's tenant.
///
/// # Errors
///
/// 400 on validation failure, 401 without a tenant claim, 500 on storage
/// failure.
pub async fn create_practice(
    State(state): State<AppState>,
    TenantClaim(tenant_id): TenantClaim,
    StrictJson(draft): StrictJson<PracticeDraft>,
) -> Result<(StatusCode, Json<Practice>), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::validation(vec![serde_json::json!({
            "field": "name",
            "message": "is required",
        })]));
    }

    let now = state.clock.now();
    let practice = Practice {
        practice_id: PracticeId::new(state.ids.entity_id("prac")),
        tenant_id,
        name: draft.name,
        abn: draft.abn,
        address: draft.address,
        geo: draft.geo,
        services: draft.services,
        hours: draft.hours,
        billing_policy: draft.billing_policy,
        created_at: now,
        updated_at: now,
    };

    state
        .practices
        .put(practice.clone())
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    tracing::info!(
        practice_id = %practice.practice_id,
        tenant_id = %practice.tenant_id,
        "practice created"
    );

    Ok((StatusCode::CREATED, Json(practice)))
}

/// Fetch a practice by id. Public read path.
///
/// # Errors
///
/// 404 when unknown, 500 on storage failure.
pub async fn get_practice(
    State(state): State<AppState>,
    Path(practice_id): Path<String>,
) -> Result<Json<Practice>, AppError> {
    let practice = state
        .practices
        .fetch(PracticeId::new(practice_id.clone()))
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    match practice {
        Some(practice) => Ok(Json(practice)),
        None => {
            tracing::warn!(practice_id = %practice_id, "practice not found");
            Err(AppError::not_found("Practice not found"))
        }
    }
}

/// List recently registered practices. Public read path.
///
/// Geographic search ranking is handled elsewhere; this returns the
/// newest practices for the admin views.
///
/// # Errors
///
/// 500 on storage failure.
pub async fn list_practices(
    State(state): State<AppState>,
) -> Result<Json<PracticeListResponse>, AppError> {
    let practices = state
        .practices
        .list_recent(LIST_LIMIT)
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    let count = practices.len();
    Ok(Json(PracticeListResponse { practices, count }))
}
