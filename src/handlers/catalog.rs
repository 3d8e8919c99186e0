use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::{AddOn, Package};
use crate::state::AppState;

// GET /api/bookings — the wizard fetches both halves of the catalog in one go.
#[derive(Serialize)]
pub struct CatalogResponse {
    pub packages: Vec<Package>,
    pub addons: Vec<AddOn>,
}

pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CatalogResponse>, BookingError> {
    let (packages, addons) = {
        let db = state.db.lock().unwrap();
        (queries::get_packages(&db)?, queries::get_addons(&db)?)
    };

    Ok(Json(CatalogResponse { packages, addons }))
}
