//! Slot search endpoint.
//!
//! `GET /v1/slots?practiceId=…&providerId=…&from=…&to=…`
//!
//! Queries the practice's session documents over the date range and
//! flattens them into concrete bookable slots. Only slots whose
//! `available` flag is set are returned. Defaults: `from` is today,
//! `to` a week out.

use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, NaiveDate};
use medbook_core::environment::Clock;
use medbook_core::session::Slot;
use medbook_core::store::SessionStore;
use medbook_core::types::{PracticeId, ProviderId};
use medbook_web::AppError;
use serde::{Deserialize, Serialize};

/// Query parameters for slot search.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SlotSearchQuery {
    /// Practice to search (required).
    pub practice_id: Option<String>,
    /// Narrow to one provider.
    pub provider_id: Option<String>,
    /// First day of the range, inclusive; defaults to today.
    pub from: Option<NaiveDate>,
    /// Last day of the range, inclusive; defaults to a week from today.
    pub to: Option<NaiveDate>,
}

/// Echo of the parameters the search actually ran with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// Practice searched.
    pub practice_id: PracticeId,
    /// Provider filter, when given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<ProviderId>,
    /// First day of the range.
    pub from: NaiveDate,
    /// Last day of the range.
    pub to: NaiveDate,
}

/// Slot search response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotSearchResponse {
    /// Available slots, in session-date order.
    pub slots: Vec<Slot>,
    /// Number of slots returned.
    pub count: usize,
    /// The effective search parameters.
    pub search_params: SearchParams,
}

/// Search available slots for a practice.
///
/// # Errors
///
/// 400 when `practiceId` is missing, 500 on storage failure.
pub async fn search_slots(
    State(state): State<AppState>,
    Query(query): Query<SlotSearchQuery>,
) -> Result<Json<SlotSearchResponse>, AppError> {
    let practice_id = query
        .practice_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(PracticeId::new)
        .ok_or_else(|| AppError::bad_request("practiceId is required"))?;

    let today = state.clock.now().date_naive();
    let from = query.from.unwrap_or(today);
    let to = query.to.unwrap_or(today + Duration::days(7));
    let provider_id = query.provider_id.map(ProviderId::new);

    let sessions = state
        .sessions
        .query_range(practice_id.clone(), from, to)
        .await
        .map_err(|e| AppError::internal().with_source(anyhow::Error::new(e)))?;

    let slots: Vec<Slot> = sessions
        .iter()
        .filter(|session| {
            provider_id
                .as_ref()
                .is_none_or(|provider| session.provider_id == *provider)
        })
        .flat_map(|session| session.available_slots())
        .collect();

    tracing::info!(
        practice_id = %practice_id,
        provider_id = ?provider_id,
        %from,
        %to,
        slot_count = slots.len(),
        "slots retrieved"
    );

    let count = slots.len();
    Ok(Json(SlotSearchResponse {
        slots,
        count,
        search_params: SearchParams {
            practice_id,
            provider_id,
            from,
            to,
        },
    }))
}
