//! Provider endpoints.
//!
//! Same access pattern as practices: tenant-scoped writes, public reads.
//! The listing accepts an optional `practiceId` filter so booking flows
//! can show one practice's practitioners.

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use medbook_core::catalog::{Provider, ProviderDraft};
use medbook_core::environment::{Clock, IdSource};
use medbook_core::store::ProviderStore;
use medbook_core::types::{PracticeId, ProviderId};
use medbook_web::{AppError, StrictJson, TenantClaim};
use serde::{Deserialize, Serialize};

/// Query parameters for the provider listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProviderListQuery {
    /// Narrow to one practice.
    pub practice_id: Option<String>,
}

/// Provider listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderListResponse {
    /// Providers, in id order.
    pub providers: Vec<Provider>,
    /// Number of providers returned.
    pub count: usize,
    /// The practice filter that was applied, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub practice_id: Option<PracticeId>,
}

fn required(field: &str) -> AppError {
    AppError::validation(vec![serde_json::json!({
        "field": field,
        "message": "is required",
    })])
}

/// Register a provider under the caller's tenant.
///
/// # Errors
///
/// 400 on validation failure, 401 without a tenant claim, 500 on storage
/// failure.
pub async fn create_provider(
    State(state): State<AppState>,
    TenantClaim(tenant_id): TenantClaim,
    StrictJson(draft): StrictJson<ProviderDraft>,
) -> Result<(StatusCode, Json<Provider>), AppError> {
    if draft.name.trim().is_empty() {
        return Err(required("name"));
    }
    if draft.practice_id.as_str().trim().is_empty() {
        return Err(required("practiceId"));
    }

    let now = state.clock.now();
    let provider = Provider {
        provider_id: ProviderId::new(state.ids.entity_id("prov")),
        tenant_id,
        practice_id: draft.practice_id,
        name: draft.name,
        gender: draft.gender,
        languages: draft.languages,
        specialties: draft.specialties,
        session_rules: draft.session_rules,
        created_at: now,
        updated_at: now,
    };

    state
        .providers
        .put(provider.clone())
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    tracing::info!(
        provider_id = %provider.provider_id,
        practice_id = %provider.practice_id,
        tenant_id = %provider.tenant_id,
        "provider created"
    );

    Ok((StatusCode::CREATED, Json(provider)))
}

/// Fetch a provider by id. Public read path.
///
/// # Errors
///
/// 404 when unknown, 500 on storage failure.
pub async fn get_provider(
    State(state): State<AppState>,
    Path(provider_id): Path<String>,
) -> Result<Json<Provider>, AppError> {
    let provider = state
        .providers
        .fetch(ProviderId::new(provider_id.clone()))
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    match provider {
        Some(provider) => Ok(Json(provider)),
        None => {
            tracing::warn!(provider_id = %provider_id, "provider not found");
            Err(AppError::not_found("Provider not found"))
        }
    }
}

/// List providers, optionally filtered by practice. Public read path.
///
/// # Errors
///
/// 500 on storage failure.
pub async fn list_providers(
    State(state): State<AppState>,
    Query(query): Query<ProviderListQuery>,
) -> Result<Json<ProviderListResponse>, AppError> {
    let practice_id = query
        .practice_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PracticeId::new);

    let providers = state
        .providers
        .list(practice_id.clone())
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    tracing::info!(
        practice_id = ?practice_id,
        count = providers.len(),
        "providers listed"
    );

    let count = providers.len();
    Ok(Json(ProviderListResponse {
        providers,
        count,
        practice_id,
    }))
}
