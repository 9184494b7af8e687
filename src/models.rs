use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::rounds::RoundKey;

#[derive(Debug, Deserialize)]
pub struct FormatDecimalRequest {
    pub raw: String,
    pub max_fraction_digits: usize,
}

#[derive(Debug, Serialize)]
pub struct FormatDecimalResponse {
    pub formatted: String,
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub usdc_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub round: RoundKey,
    pub token_amount: Decimal,
    pub token_amount_display: String,
    pub token_price_display: String,
}

#[derive(Debug, Deserialize)]
pub struct AwaitVerificationRequest {
    pub address: String,
    pub tries: Option<u32>,
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct AwaitVerificationResponse {
    pub verified: bool,
}
