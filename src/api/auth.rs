use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::{
    api::ApiError,
    server::AppState,
    types::{CallbackParams, TokenRefreshRequest, TokenResponse},
    utils,
};

/// Redirects the user to the provider's authorization page.
pub async fn login(State(state): State<AppState>) -> Response {
    found(&state.auth.authorize_url())
}

/// Completes the authorization-code flow and hands the token to the frontend.
pub async fn callback(
    State(state): State<AppState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return Err(ApiError::bad_request("No code provided"));
    };

    let token = state.auth.exchange_code(&code).await?;
    Ok(found(&utils::frontend_callback_url(
        &state.settings.frontend_url,
        &token,
    )))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRefreshRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let Some(refresh_token) = body.refresh_token.filter(|t| !t.is_empty()) else {
        return Err(ApiError::bad_request("No refresh_token provided"));
    };

    Ok(Json(state.auth.refresh(&refresh_token).await?))
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
