//! Contact-form API endpoint.

use axum::{extract::State, Json};
use serde_json::Value;

use super::ApiResult;
use crate::contract;
use crate::notify::{ContactRequest, ContactResponse};
use crate::AppState;

/// POST /api/contact - Submit a contact-form message.
pub async fn send_contact(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<ContactResponse>> {
    let request: ContactRequest = contract::parse_input(body)?;
    contract::validate_contact(&request)?;

    let outcome = state.mailer.send(&request).await?;
    Ok(Json(outcome))
}
