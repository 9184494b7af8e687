use axum::{extract::State, http::StatusCode, Json};

use crate::models::{QuoteRequest, QuoteResponse};
use crate::services::quote;
use crate::services::rounds::{ActiveRoundSummary, VestingSummary};
use crate::state::AppState;

// A failed chain read surfaces as 502, never as a "no active round" body.

pub async fn active_round(
    State(state): State<AppState>,
) -> Result<Json<ActiveRoundSummary>, (StatusCode, String)> {
    match state.resolver.resolve_active_round().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Failed to resolve active round: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                "Chain read failed".to_string(),
            ))
        }
    }
}

pub async fn vesting(
    State(state): State<AppState>,
) -> Result<Json<VestingSummary>, (StatusCode, String)> {
    match state.resolver.resolve_active_vesting().await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            tracing::error!("Failed to resolve vesting summary: {}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                "Chain read failed".to_string(),
            ))
        }
    }
}

pub async fn quote(
    State(state): State<AppState>,
    Json(payload): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, (StatusCode, String)> {
    let summary = match state.resolver.resolve_active_round().await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!("Failed to resolve active round for quote: {}", e);
            return Err((
                StatusCode::BAD_GATEWAY,
                "Chain read failed".to_string(),
            ));
        }
    };

    let (round, price_raw, price_display) = match (
        summary.key,
        summary.token_price_raw,
        summary.token_price_display,
    ) {
        (Some(round), Some(price_raw), Some(price_display)) => (round, price_raw, price_display),
        _ => {
            return Err((
                StatusCode::CONFLICT,
                "No active round to quote against".to_string(),
            ))
        }
    };

    let quote = quote::quote_tokens(payload.usdc_amount, price_raw, summary.usdc_decimals)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(QuoteResponse {
        round,
        token_amount: quote.token_amount,
        token_amount_display: quote.token_amount_display,
        token_price_display: price_display,
    }))
}
