//! Axum route handlers for the CV builder. Reads return the store as-is;
//! writes call exactly one named store operation and answer with the view.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::cv::UiLanguage;
use crate::models::patch::PersonalInfoPatch;
use crate::persistence::{self, CvSnapshot, CvSnapshotState};
use crate::scoring::{
    compute_ats_breakdown, compute_completion_report, AtsBreakdown, AtsRating, CompletionReport,
};
use crate::state::AppState;
use crate::store::{Collection, CvStore, TextDirection};

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Everything the presentation layer reads: content, interface state,
/// stored metrics and the document direction.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvView {
    #[serde(flatten)]
    pub state: CvSnapshotState,
    pub direction: TextDirection,
}

impl From<&CvStore> for CvView {
    fn from(store: &CvStore) -> Self {
        Self {
            state: store.snapshot_state(),
            direction: store.direction(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CvReportResponse {
    pub completion: CompletionReport,
    pub ats: AtsBreakdown,
    pub rating: AtsRating,
}

#[derive(Debug, Deserialize)]
pub struct TemplateRequest {
    pub template: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    pub language: UiLanguage,
}

#[derive(Debug, Deserialize)]
pub struct SectionRequest {
    pub section: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Runs one store operation and persists the resulting snapshot, both under
/// the store lock, so snapshots reach the slot in mutation order.
///
/// A failed save answers `PERSISTENCE_ERROR` but the operation stays applied
/// in memory; clients should re-read the CV rather than replay the request.
async fn mutate(
    state: &AppState,
    op: impl FnOnce(&mut CvStore) + Send,
) -> Result<Json<CvView>, AppError> {
    let mut store = state.store.lock().await;
    op(&mut *store);
    let view = CvView::from(&*store);
    let snapshot = CvSnapshot::capture(&*store);
    persistence::save_snapshot(state.snapshots.as_ref(), &state.config.snapshot_key, &snapshot)
        .await?;
    drop(store);
    Ok(Json(view))
}

/// Parses a new collection entry, filling in a fresh id when the client
/// sent none.
fn parse_new_entry<E: Collection>(body: Value) -> Result<E, AppError> {
    let Value::Object(mut fields) = body else {
        return Err(AppError::Validation(format!(
            "{} entry must be a JSON object",
            E::NAME
        )));
    };
    let has_id = matches!(fields.get("id"), Some(Value::String(id)) if !id.is_empty());
    if !has_id {
        fields.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
    }
    serde_json::from_value(Value::Object(fields))
        .map_err(|e| AppError::Validation(format!("Invalid {} entry: {e}", E::NAME)))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/cv
pub async fn handle_get_cv(State(state): State<AppState>) -> Json<CvView> {
    let store = state.store.lock().await;
    Json(CvView::from(&*store))
}

/// GET /api/v1/cv/report
/// Computed fresh from current content; stored metrics are not touched.
pub async fn handle_get_report(State(state): State<AppState>) -> Json<CvReportResponse> {
    let store = state.store.lock().await;
    let completion = compute_completion_report(store.document());
    let ats = compute_ats_breakdown(store.document());
    let rating = AtsRating::from_score(ats.total);
    Json(CvReportResponse {
        completion,
        ats,
        rating,
    })
}

/// PATCH /api/v1/cv/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Json(patch): Json<PersonalInfoPatch>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| store.update_personal_info(patch)).await
}

/// POST /api/v1/cv/{collection}
pub async fn handle_add_entry<E: Collection>(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Result<Json<CvView>, AppError> {
    let entry = parse_new_entry::<E>(body)?;
    mutate(&state, |store| E::add(store, entry)).await
}

/// PATCH /api/v1/cv/{collection}/:id
pub async fn handle_update_entry<E: Collection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| E::update(store, &id, patch)).await
}

/// DELETE /api/v1/cv/{collection}/:id
pub async fn handle_remove_entry<E: Collection>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| E::remove(store, &id)).await
}

/// PUT /api/v1/cv/template
pub async fn handle_set_template(
    State(state): State<AppState>,
    Json(req): Json<TemplateRequest>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| store.set_current_template(req.template)).await
}

/// PUT /api/v1/cv/language
pub async fn handle_set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| store.set_language(req.language)).await
}

/// PUT /api/v1/cv/section
pub async fn handle_set_section(
    State(state): State<AppState>,
    Json(req): Json<SectionRequest>,
) -> Result<Json<CvView>, AppError> {
    mutate(&state, |store| store.set_current_section(req.section)).await
}

/// POST /api/v1/cv/recalculate
pub async fn handle_recalculate(State(state): State<AppState>) -> Result<Json<CvView>, AppError> {
    mutate(&state, CvStore::recalculate).await
}
