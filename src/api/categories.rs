//! Category API endpoint.

use axum::Json;

use super::ApiResult;
use crate::models::CATEGORIES;

/// GET /api/categories - The fixed category list.
pub async fn list_categories() -> ApiResult<Json<Vec<&'static str>>> {
    Ok(Json(CATEGORIES.iter().map(|c| c.as_str()).collect()))
}
