use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};

use crate::api::views;
use crate::inventory::{Inventory, InventoryError};

type PageResult = Result<Html<String>, (StatusCode, Html<String>)>;

fn error_page(e: InventoryError) -> (StatusCode, Html<String>) {
    match e {
        InventoryError::NotFound => (
            StatusCode::NOT_FOUND,
            Html(views::error_page(
                "Equipment not found",
                "No item is registered under this code.",
            )),
        ),
        other => {
            tracing::error!("Failed to render page: {}", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(views::error_page(
                    "Something went wrong",
                    "The page could not be loaded. Please try again.",
                )),
            )
        }
    }
}

pub async fn index_page(State(inventory): State<Inventory>) -> PageResult {
    let equipment = inventory.list().map_err(error_page)?;
    Ok(Html(views::index_page(&equipment)))
}

pub async fn scan_page() -> Html<String> {
    Html(views::scan_page())
}

pub async fn item_page(State(inventory): State<Inventory>, Path(id): Path<String>) -> PageResult {
    let detail = inventory.fetch(&id).map_err(error_page)?;
    Ok(Html(views::item_page(&detail)))
}
