//! Concern API endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::ApiResult;
use crate::contract;
use crate::errors::AppError;
use crate::models::{
    Category, Concern, ConcernFilters, ConcernStatus, CreateConcernRequest, RespondRequest,
    UpdateConcernRequest, UpvoteResponse,
};
use crate::AppState;

/// Raw query parameters for listing concerns.
#[derive(Debug, Deserialize)]
pub struct ListConcernsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ListConcernsQuery {
    fn into_filters(self) -> Result<ConcernFilters, AppError> {
        let category = self
            .category
            .map(|c| {
                Category::from_str(&c)
                    .ok_or_else(|| AppError::invalid_field("category", format!("Unknown category: {}", c)))
            })
            .transpose()?;
        let status = self
            .status
            .map(|s| {
                ConcernStatus::from_str(&s)
                    .ok_or_else(|| AppError::invalid_field("status", format!("Unknown status: {}", s)))
            })
            .transpose()?;

        Ok(ConcernFilters {
            category,
            status,
            search: self.search,
        })
    }
}

/// GET /api/concerns - List concerns, optionally filtered.
pub async fn list_concerns(
    State(state): State<AppState>,
    Query(query): Query<ListConcernsQuery>,
) -> ApiResult<Json<Vec<Concern>>> {
    let filters = query.into_filters()?;
    let concerns = state.repo.list_concerns(&filters).await?;
    Ok(Json(concerns))
}

/// GET /api/concerns/:id - Get a single concern.
pub async fn get_concern(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Concern>> {
    match state.repo.get_concern(id).await? {
        Some(concern) => Ok(Json(concern)),
        None => Err(AppError::NotFound(format!("Concern {} not found", id))),
    }
}

/// POST /api/concerns - Create a new concern.
pub async fn create_concern(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<(StatusCode, Json<Concern>)> {
    let request: CreateConcernRequest = contract::parse_input(body)?;
    contract::validate_create_concern(&request)?;

    let concern = state.repo.create_concern(&request).await?;
    Ok((StatusCode::CREATED, Json(concern)))
}

/// PATCH /api/concerns/:id/respond - Add a staff response.
///
/// Responding resolves the concern.
pub async fn respond_concern(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> ApiResult<Json<Concern>> {
    let request: RespondRequest = contract::parse_input(body)?;
    contract::validate_respond(&request)?;

    let updates = UpdateConcernRequest {
        response: Some(request.response),
        status: Some(ConcernStatus::Resolved),
    };
    let concern = state.repo.update_concern(id, &updates).await?;
    Ok(Json(concern))
}

/// POST /api/concerns/:id/upvote - Increment the upvote counter.
pub async fn upvote_concern(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UpvoteResponse>> {
    let concern = state.repo.upvote_concern(id).await?;
    Ok(Json(UpvoteResponse {
        upvotes: concern.upvotes,
    }))
}
