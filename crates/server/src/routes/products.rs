//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use cartify_core::ProductId;

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::product::{NewProduct, Product};
use crate::state::AppState;

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 12;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Paginated catalog listing response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
}

/// Compute the page count for a listing.
///
/// Zero products means zero pages, matching the legacy contract.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}

/// `GET /api/products` — one page of the catalog in insertion order.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ProductListResponse>> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let offset = (page - 1) * limit;

    let repo = ProductRepository::new(state.pool());
    let (products, total) = repo.list(offset, limit).await?;

    Ok(Json(ProductListResponse {
        products,
        current_page: page,
        total_pages: total_pages(total, limit),
        total_products: total,
    }))
}

/// `GET /api/products/{id}`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Product>> {
    let repo = ProductRepository::new(state.pool());

    let product = repo
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product))
}

/// Create-product request. Fields are optional so an incomplete body yields
/// the legacy 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub rating: Option<Decimal>,
}

/// `POST /api/products` — create a product; the id comes from the database
/// sequence.
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<impl IntoResponse> {
    let (Some(title), Some(description), Some(image), Some(price), Some(quantity)) = (
        body.title,
        body.description,
        body.image,
        body.price,
        body.quantity,
    ) else {
        return Err(AppError::BadRequest("All fields are required".to_owned()));
    };

    let new = NewProduct {
        title,
        description,
        image,
        price,
        quantity,
        is_active: body.is_active.unwrap_or(true),
        rating: body.rating.unwrap_or_default(),
    };
    new.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = ProductRepository::new(state.pool());
    let product = repo.create(&new).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Product created", "product": product })),
    ))
}

/// `PUT /api/products/{id}` — partial update; absent fields are untouched.
#[instrument(skip(state, patch))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<crate::models::product::ProductPatch>,
) -> Result<Json<serde_json::Value>> {
    patch
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = ProductRepository::new(state.pool());
    let product = repo
        .update(ProductId::new(id), &patch)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(
        json!({ "message": "Product updated", "product": product }),
    ))
}

/// `DELETE /api/products/{id}` — returns the deleted product.
#[instrument(skip(state))]
pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    let repo = ProductRepository::new(state.pool());

    let product = repo
        .delete(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(
        json!({ "message": "Product deleted", "product": product }),
    ))
}

/// One line of a stock decrement batch.
#[derive(Debug, Deserialize)]
pub struct DecrementItem {
    pub id: i64,
    pub quantity: i32,
}

/// Decrement request body. `items` stays optional so a missing or non-array
/// value produces the legacy "Invalid request format" 400.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantitiesBody {
    pub items: Option<Vec<DecrementItem>>,
}

/// `POST /api/products/update-quantities` — the legacy per-line decrement.
///
/// Lines are processed strictly in order and the batch stops at the first
/// failure. Lines already processed stay decremented; there is no rollback.
/// The atomic alternative is `POST /api/checkout`.
#[instrument(skip(state, body))]
pub async fn update_quantities(
    State(state): State<AppState>,
    Json(body): Json<UpdateQuantitiesBody>,
) -> Result<Json<serde_json::Value>> {
    let Some(items) = body.items else {
        return Err(AppError::BadRequest("Invalid request format".to_owned()));
    };

    let repo = ProductRepository::new(state.pool());

    for item in &items {
        let id = ProductId::new(item.id);

        let product = repo.get(id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Product with id {} not found", item.id))
        })?;

        if product.quantity < item.quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient quantity for product {}",
                product.title
            )));
        }

        // A concurrent decrement can still win between the check and the
        // subtract; the guarded update then reports it as insufficient.
        repo.subtract_quantity(id, item.quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AppError::BadRequest(format!(
                    "Insufficient quantity for product {}",
                    product.title
                )),
                other => AppError::Database(other),
            })?;
    }

    Ok(Json(
        json!({ "message": "Product quantities updated successfully" }),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(24, 12), 2);
        assert_eq!(total_pages(1, 12), 1);
        assert_eq!(total_pages(0, 12), 0);
    }

    #[test]
    fn test_total_pages_degenerate_limit() {
        assert_eq!(total_pages(10, 0), 0);
    }

    #[test]
    fn test_create_body_tolerates_missing_fields() {
        let body: CreateProductBody = serde_json::from_str(r#"{"title": "Lamp"}"#).unwrap();
        assert_eq!(body.title.as_deref(), Some("Lamp"));
        assert!(body.price.is_none());
    }
}
