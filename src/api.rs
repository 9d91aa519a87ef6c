// Bloomwell - JSON API
//
// Thin HTTP layer over the calculator and the inventory store. Every
// response uses the same envelope: {success, data, error?}.

use crate::entities::{Client, Entity, Product, Shipment};
use crate::guidelines::WeightGainGuideline;
use crate::pregnancy::{date_at_midnight, MaternalHealth, PregnancyInfo, WeightGainStatus};
use crate::storage::SelectionStorage;
use crate::store::{InventoryStore, SelectionState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, patch, post, put},
    Router,
};
use chrono::{NaiveDate, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tower_http::cors::CorsLayer;

pub type SharedStore = InventoryStore<Box<dyn SelectionStorage + Send>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<SharedStore>>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// A panicked handler must not take the store down with it
    fn lock(&self) -> MutexGuard<'_, SharedStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

fn respond<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(ApiResponse::ok(data))).into_response()
}

fn fail(status: StatusCode, message: String) -> Response {
    let body: ApiResponse<()> = ApiResponse {
        success: false,
        data: None,
        error: Some(message),
    };
    (status, Json(body)).into_response()
}

fn storage_failure(action: &str, err: crate::Error) -> Response {
    error!("event=api_error action={} error={}", action, err);
    fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

// ============================================================================
// Pregnancy Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

#[derive(Debug, Deserialize)]
struct ProgressQuery {
    start: NaiveDate,
    due: NaiveDate,
    now: Option<NaiveDate>,
}

/// GET /api/pregnancy/progress?start=..&due=..[&now=..]
async fn pregnancy_progress(Query(query): Query<ProgressQuery>) -> Response {
    let now = query.now.map(date_at_midnight).unwrap_or_else(Utc::now);

    match PregnancyInfo::new(date_at_midnight(query.start), date_at_midnight(query.due), now) {
        Ok(info) => respond(StatusCode::OK, info.progress()),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct WeightQuery {
    gain: f64,
    min: f64,
    max: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeightStatusResponse {
    pub status: WeightGainStatus,
    pub weight_gain_kg: f64,
    pub target_min_kg: f64,
    pub target_max_kg: f64,
}

/// GET /api/pregnancy/weight-status?gain=..&min=..&max=..
async fn weight_status(Query(query): Query<WeightQuery>) -> Response {
    match MaternalHealth::new(query.gain, query.min, query.max) {
        Ok(health) => respond(
            StatusCode::OK,
            WeightStatusResponse {
                status: health.status(),
                weight_gain_kg: health.weight_gain_kg,
                target_min_kg: health.target_min_kg,
                target_max_kg: health.target_max_kg,
            },
        ),
        Err(e) => fail(StatusCode::BAD_REQUEST, e.to_string()),
    }
}

#[derive(Debug, Deserialize)]
struct GuidelineQuery {
    bmi: f64,
    week: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuidelineResponse {
    pub guideline: WeightGainGuideline,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_range_kg: Option<(f64, f64)>,
}

/// GET /api/pregnancy/guideline?bmi=..[&week=..]
async fn guideline(Query(query): Query<GuidelineQuery>) -> Response {
    if !(query.bmi > 0.0) {
        return fail(StatusCode::BAD_REQUEST, format!("bmi must be positive, got {}", query.bmi));
    }

    let guideline = WeightGainGuideline::for_bmi(query.bmi);
    let target_range_kg = query.week.map(|week| guideline.target_range_at_week(week));
    respond(StatusCode::OK, GuidelineResponse { guideline, target_range_kg })
}

// ============================================================================
// Entity Handlers (one generic set, routed per collection)
// ============================================================================

/// GET /api/{collection}
async fn list_entities<E: Entity>(State(state): State<AppState>) -> Response {
    let store = state.lock();
    respond(StatusCode::OK, store.all::<E>().to_vec())
}

/// PUT /api/{collection} - replace wholesale (upstream refresh)
async fn replace_entities<E: Entity>(
    State(state): State<AppState>,
    Json(items): Json<Vec<E>>,
) -> Response {
    let mut store = state.lock();
    let count = items.len();

    match store.set_all(items) {
        Ok(()) => respond(StatusCode::OK, count),
        Err(e) => storage_failure("set_all", e),
    }
}

/// POST /api/{collection}
async fn add_entity<E: Entity>(State(state): State<AppState>, Json(entity): Json<E>) -> Response {
    let mut store = state.lock();

    match store.add(entity.clone()) {
        Ok(()) => respond(StatusCode::CREATED, entity),
        Err(e) => storage_failure("add", e),
    }
}

/// PATCH /api/{collection}/:id
async fn update_entity<E: Entity>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<E::Patch>,
) -> Response {
    let mut store = state.lock();

    if let Err(e) = store.update::<E>(&id, patch) {
        return storage_failure("update", e);
    }

    match store.get::<E>(&id) {
        Some(entity) => respond(StatusCode::OK, entity.clone()),
        None => fail(
            StatusCode::NOT_FOUND,
            format!("{} not found: {}", E::KIND.as_str(), id),
        ),
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// DELETE /api/{collection}/:id
async fn delete_entity<E: Entity>(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.lock();
    let existed = store.get::<E>(&id).is_some();

    match store.delete::<E>(&id) {
        Ok(()) => respond(StatusCode::OK, DeleteResponse { deleted: existed }),
        Err(e) => storage_failure("delete", e),
    }
}

fn entity_routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_entities::<E>)
                .put(replace_entities::<E>)
                .post(add_entity::<E>),
        )
        .route("/:id", patch(update_entity::<E>).delete(delete_entity::<E>))
}

// ============================================================================
// Selection Handlers
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    #[serde(flatten)]
    pub selection: SelectionState,
    /// Selected client id with no matching client loaded
    pub dangling_client: Option<String>,
}

fn selection_response(store: &SharedStore) -> SelectionResponse {
    SelectionResponse {
        selection: store.selection().clone(),
        dangling_client: store.state().dangling_client_selection().map(str::to_string),
    }
}

/// GET /api/selection
async fn get_selection(State(state): State<AppState>) -> Response {
    let store = state.lock();
    respond(StatusCode::OK, selection_response(&store))
}

/// DELETE /api/selection
async fn clear_selection(State(state): State<AppState>) -> Response {
    let mut store = state.lock();
    match store.clear_selection() {
        Ok(()) => respond(StatusCode::OK, selection_response(&store)),
        Err(e) => storage_failure("clear_selection", e),
    }
}

/// POST /api/selection/products/:id/toggle
async fn toggle_product(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let mut store = state.lock();
    match store.toggle_selection(&id) {
        Ok(()) => respond(StatusCode::OK, selection_response(&store)),
        Err(e) => storage_failure("toggle_selection", e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectClientBody {
    client_id: Option<String>,
}

/// PUT /api/selection/client - {"clientId": "..."} or {"clientId": null}
async fn select_client(
    State(state): State<AppState>,
    Json(body): Json<SelectClientBody>,
) -> Response {
    let mut store = state.lock();
    match store.select_client(body.client_id.as_deref()) {
        Ok(()) => respond(StatusCode::OK, selection_response(&store)),
        Err(e) => storage_failure("select_client", e),
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/pregnancy/progress", get(pregnancy_progress))
        .route("/pregnancy/weight-status", get(weight_status))
        .route("/pregnancy/guideline", get(guideline))
        .nest("/products", entity_routes::<Product>())
        .nest("/clients", entity_routes::<Client>())
        .nest("/shipments", entity_routes::<Shipment>())
        .route("/selection", get(get_selection).delete(clear_selection))
        .route("/selection/products/:id/toggle", post(toggle_product))
        .route("/selection/client", put(select_client))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================
