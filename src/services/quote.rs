use rust_decimal::{Decimal, RoundingStrategy};

use crate::services::formatter::format_decimal;

const QUOTE_SCALE: u32 = 6;

#[derive(Debug, Clone)]
pub struct Quote {
    pub token_amount: Decimal,
    pub token_amount_display: String,
}

/// Tokens received for a USDC contribution at the active round's raw price.
/// Purchase quotes stay well inside `Decimal`'s 96-bit range once the price
/// is scaled down, so the string formatter is only used for display here.
pub fn quote_tokens(
    usdc_amount: Decimal,
    token_price_raw: u128,
    usdc_decimals: u32,
) -> anyhow::Result<Quote> {
    if usdc_amount <= Decimal::ZERO {
        anyhow::bail!("contribution must be greater than 0");
    }
    if token_price_raw == 0 {
        anyhow::bail!("round price is zero");
    }

    let price_raw = i128::try_from(token_price_raw)
        .map_err(|_| anyhow::anyhow!("token price {} out of range", token_price_raw))?;
    let price = Decimal::try_from_i128_with_scale(price_raw, usdc_decimals)
        .map_err(|e| anyhow::anyhow!("token price out of range: {}", e))?;

    let token_amount = (usdc_amount / price)
        .round_dp_with_strategy(QUOTE_SCALE, RoundingStrategy::MidpointAwayFromZero);

    Ok(Quote {
        token_amount_display: format_decimal(&token_amount.to_string(), QUOTE_SCALE as usize),
        token_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn divides_contribution_by_scaled_price() {
        // $0.045 per token, $900 in: 20,000 tokens
        let quote = quote_tokens(dec!(900), 45_000, 6).unwrap();
        assert_eq!(quote.token_amount, dec!(20000));
        assert_eq!(quote.token_amount_display, "20,000");
    }

    #[test]
    fn fractional_result_is_rounded_to_scale() {
        let quote = quote_tokens(dec!(100), 300_000, 6).unwrap();
        assert_eq!(quote.token_amount, dec!(333.333333));
        assert_eq!(quote.token_amount_display, "333.333333");
    }

    #[test]
    fn rejects_non_positive_contribution() {
        assert!(quote_tokens(dec!(0), 45_000, 6).is_err());
        assert!(quote_tokens(dec!(-5), 45_000, 6).is_err());
    }

    #[test]
    fn rejects_zero_price() {
        assert!(quote_tokens(dec!(100), 0, 6).is_err());
    }

    #[test]
    fn rejects_price_beyond_i128() {
        // would wrap negative under an `as` cast and slip past the zero guard
        assert!(quote_tokens(dec!(100), u128::MAX - 4, 6).is_err());
        assert!(quote_tokens(dec!(100), u128::MAX, 6).is_err());
    }
}
