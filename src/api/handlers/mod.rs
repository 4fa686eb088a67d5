mod pages;

pub use pages::*;

use axum::{
    extract::{FromRequest, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use crate::inventory::{Inventory, InventoryError};
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

/// Map an inventory error to a status code and message.
///
/// Client errors are returned as-is. Storage and image failures are logged
/// in full and the client only sees a generic message.
fn error_response(e: InventoryError) -> (StatusCode, String) {
    match e {
        InventoryError::Validation(_) | InventoryError::InvalidStatus(_) => {
            tracing::warn!("Validation error: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        InventoryError::NotFound => (StatusCode::NOT_FOUND, e.to_string()),
        InventoryError::Code(_) => {
            tracing::error!("QR code error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate QR code".to_string(),
            )
        }
        InventoryError::Storage(_) => {
            tracing::error!("Internal error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Equipment
// ============================================================

/// Register an item from either a JSON body or the HTML form.
///
/// JSON callers get `201 Created` with the new record. Form submissions are
/// redirected back to the list page.
pub async fn add_equipment(
    State(inventory): State<Inventory>,
    request: Request,
) -> Result<Response, (StatusCode, String)> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));

    if is_json {
        let Json(input) = Json::<CreateEquipmentInput>::from_request(request, &())
            .await
            .map_err(|e| (e.status(), e.body_text()))?;

        let equipment = inventory.create(input).map_err(error_response)?;
        Ok((StatusCode::CREATED, Json(equipment)).into_response())
    } else {
        let Form(input) = Form::<CreateEquipmentInput>::from_request(request, &())
            .await
            .map_err(|e| (e.status(), e.body_text()))?;

        inventory.create(input).map_err(error_response)?;
        Ok(Redirect::to("/").into_response())
    }
}

pub async fn list_equipment(
    State(inventory): State<Inventory>,
) -> Result<Json<Vec<Equipment>>, (StatusCode, String)> {
    inventory.list().map(Json).map_err(error_response)
}

pub async fn get_equipment(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
) -> Result<Json<EquipmentDetail>, (StatusCode, String)> {
    inventory.fetch(&id).map(Json).map_err(error_response)
}

pub async fn update_status(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
    Json(input): Json<StatusUpdateInput>,
) -> Result<Json<Equipment>, (StatusCode, String)> {
    inventory
        .change_status(&id, &input.status)
        .map(Json)
        .map_err(error_response)
}

pub async fn add_history_entry(
    State(inventory): State<Inventory>,
    Path(id): Path<String>,
    Json(input): Json<CreateHistoryInput>,
) -> Result<(StatusCode, Json<EquipmentDetail>), (StatusCode, String)> {
    inventory
        .append_history(&id, input)
        .map(|d| (StatusCode::CREATED, Json(d)))
        .map_err(error_response)
}
