use axum::Json;

use crate::models::{FormatDecimalRequest, FormatDecimalResponse};
use crate::services::formatter;

/// Total by contract: malformed input formats as "0", so this never fails.
pub async fn format_decimal(Json(request): Json<FormatDecimalRequest>) -> Json<FormatDecimalResponse> {
    Json(FormatDecimalResponse {
        formatted: formatter::format_decimal(&request.raw, request.max_fraction_digits),
    })
}
