use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tokio::time::Duration;

use crate::error::FetchError;
use crate::models::{AwaitVerificationRequest, AwaitVerificationResponse};
use crate::services::kyc::{self, KycSource, KycStatus};
use crate::state::AppState;

pub async fn status(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<KycStatus>, (StatusCode, String)> {
    match state.chain.fetch_kyc_status(&address).await {
        Ok(status) => Ok(Json(status)),
        Err(FetchError::Decode(msg)) => Err((StatusCode::BAD_REQUEST, msg)),
        Err(e) => {
            tracing::error!("KYC status fetch failed for {}: {}", address, e);
            Err((StatusCode::BAD_GATEWAY, "Chain read failed".to_string()))
        }
    }
}

/// Bounded poll for verification. Exhausting the attempt budget is a normal
/// `verified: false` response, not an error.
pub async fn await_verification(
    State(state): State<AppState>,
    Json(payload): Json<AwaitVerificationRequest>,
) -> Json<AwaitVerificationResponse> {
    let tries = payload.tries.unwrap_or(state.kyc_poll_tries);
    let delay = payload
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or(state.kyc_poll_delay);

    let verified = kyc::poll_verification(&state.chain, &payload.address, tries, delay).await;
    Json(AwaitVerificationResponse { verified })
}
