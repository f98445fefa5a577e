use std::{collections::HashMap, sync::Arc};

use axum::{
    Json,
    body::Bytes,
    extract::{self, Query},
    http::StatusCode,
    response::IntoResponse,
};
use profiles::ProfileRecord;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{error::AppError, state::State, utils::parse_fid};

pub async fn random_user_handler(
    extract::State(state): extract::State<Arc<State>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ProfileRecord>, AppError> {
    let fid = parse_fid(params.get("fid").map(String::as_str))?;

    let record = state.directory.lookup(fid).await.map_err(|e| {
        info!("Lookup for fid {fid} failed: {e}");
        AppError::from(e)
    })?;

    Ok(Json(record))
}

pub async fn webhook_handler(body: Bytes) -> Result<impl IntoResponse, AppError> {
    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        warn!("Webhook error: {e}");
        AppError::MalformedPayload
    })?;

    info!("Webhook received: {payload}");

    Ok((StatusCode::OK, Json(json!({ "success": true }))))
}

pub async fn webhook_status_handler() -> impl IntoResponse {
    Json(json!({ "status": "Webhook endpoint active" }))
}
