//! Ethereum JSON-RPC `eth_call` client for presale, token, and KYC reads.
//!
//! This is the only layer that knows the contracts' positional return
//! layouts; everything above it works with named fields.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::ChainConfig;
use crate::error::FetchError;
use crate::services::kyc::{KycSource, KycStatus};
use crate::services::rounds::{RoundKey, RoundRecord, RoundSource};

// Function selectors (first four keccak bytes of the getter signatures).
const ROUND_GETTER_SELECTOR: &str = "0x9b4e7a3c"; // rounds(uint8)
const ERC20_DECIMALS_SELECTOR: &str = "0x313ce567"; // decimals()
const KYC_STATUS_SELECTOR: &str = "0x4a2c9d81"; // statusOf(address)

const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

#[derive(Clone)]
pub struct RpcClient {
    http: Client,
    config: ChainConfig,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcClient {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    async fn eth_call(&self, to: &str, data: String) -> Result<String, FetchError> {
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
        });

        debug!("eth_call to {} ({} bytes of calldata)", to, data.len() / 2);

        let response: RpcResponse = self
            .http
            .post(self.config.rpc_url.clone())
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(FetchError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        response
            .result
            .ok_or_else(|| FetchError::Decode("response carried neither result nor error".to_string()))
    }
}

impl RoundSource for RpcClient {
    async fn fetch_round_record(&self, key: RoundKey) -> Result<RoundRecord, FetchError> {
        let data = format!("{}{:064x}", ROUND_GETTER_SELECTOR, key.index());
        let result = self.eth_call(&self.config.presale_address, data).await?;
        decode_round_record(&result)
    }

    async fn fetch_usdc_decimals(&self) -> Result<u32, FetchError> {
        let result = self
            .eth_call(&self.config.usdc_address, ERC20_DECIMALS_SELECTOR.to_string())
            .await?;
        decode_decimals(&result)
    }
}

impl KycSource for RpcClient {
    async fn fetch_kyc_status(&self, address: &str) -> Result<KycStatus, FetchError> {
        let data = format!("{}{}", KYC_STATUS_SELECTOR, encode_address_arg(address)?);
        let result = self
            .eth_call(&self.config.kyc_registry_address, data)
            .await?;

        let words = split_words(&result)?;
        if words.len() != 2 {
            return Err(FetchError::Decode(format!(
                "statusOf returned {} words, expected 2",
                words.len()
            )));
        }

        let linked = word_to_address(words[1])?;
        Ok(KycStatus {
            verified: word_to_bool(words[0])?,
            linked_address: (linked != ZERO_ADDRESS).then_some(linked),
        })
    }
}

/// Decode the presale contract's 12-word round tuple. This is the single
/// place the positional layout appears:
///
///   0 active          6 tokensSold
///   1 tokenPriceRaw   7 tokensAllocated
///   2 totalRaised     8 participants
///   3 hardCap         9 cliffMonths
///   4 minPurchase    10 durationMonths
///   5 maxPurchase    11 tgeUnlockPercent
fn decode_round_record(result: &str) -> Result<RoundRecord, FetchError> {
    let words = split_words(result)?;
    if words.len() != 12 {
        return Err(FetchError::Decode(format!(
            "round tuple has {} words, expected 12",
            words.len()
        )));
    }

    Ok(RoundRecord {
        active: word_to_bool(words[0])?,
        token_price_raw: word_to_u128(words[1])?,
        total_raised: word_to_u128(words[2])?,
        hard_cap: word_to_u128(words[3])?,
        min_purchase: word_to_u128(words[4])?,
        max_purchase: word_to_u128(words[5])?,
        tokens_sold: word_to_u128(words[6])?,
        tokens_allocated: word_to_u128(words[7])?,
        participants: word_to_u128(words[8])?,
        cliff_months: word_to_u32(words[9])?,
        duration_months: word_to_u32(words[10])?,
        tge_unlock_percent: word_to_u32(words[11])?,
    })
}

/// Decode an ERC-20 `decimals()` result. The value is a uint8 on chain;
/// anything wider is a broken token contract, and passing it through would
/// let the formatter allocate a zero-pad of that width.
fn decode_decimals(result: &str) -> Result<u32, FetchError> {
    let words = split_words(result)?;
    let word = words
        .first()
        .ok_or_else(|| FetchError::Decode("empty decimals() result".to_string()))?;
    let value = word_to_u32(word)?;
    if value > u8::MAX as u32 {
        return Err(FetchError::Decode(format!(
            "decimals() returned {}, expected a uint8",
            value
        )));
    }
    Ok(value)
}

/// Split an `eth_call` result into 32-byte (64 hex char) words. Rejecting
/// non-hex bytes up front keeps every downstream byte-index slice on ASCII.
fn split_words(result: &str) -> Result<Vec<&str>, FetchError> {
    let hex = result.strip_prefix("0x").unwrap_or(result);
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FetchError::Decode(
            "result contains non-hex characters".to_string(),
        ));
    }
    if hex.len() % 64 != 0 {
        return Err(FetchError::Decode(format!(
            "result length {} is not a multiple of 32 bytes",
            hex.len() / 2
        )));
    }
    Ok((0..hex.len()).step_by(64).map(|i| &hex[i..i + 64]).collect())
}

fn word_to_u128(word: &str) -> Result<u128, FetchError> {
    let (high, low) = word.split_at(32);
    if high.bytes().any(|b| b != b'0') {
        return Err(FetchError::Decode(format!(
            "word {} overflows 128 bits",
            word
        )));
    }
    u128::from_str_radix(low, 16)
        .map_err(|_| FetchError::Decode(format!("word {} is not hex", word)))
}

fn word_to_u32(word: &str) -> Result<u32, FetchError> {
    let value = word_to_u128(word)?;
    u32::try_from(value)
        .map_err(|_| FetchError::Decode(format!("value {} overflows u32", value)))
}

fn word_to_bool(word: &str) -> Result<bool, FetchError> {
    match word_to_u128(word)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(FetchError::Decode(format!(
            "boolean word holds {}, expected 0 or 1",
            other
        ))),
    }
}

fn word_to_address(word: &str) -> Result<String, FetchError> {
    if word.len() != 64 || !word.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FetchError::Decode(format!(
            "word {} is not a valid address word",
            word
        )));
    }
    if word[..24].bytes().any(|b| b != b'0') {
        return Err(FetchError::Decode(format!(
            "address word {} has nonzero padding",
            word
        )));
    }
    Ok(format!("0x{}", word[24..].to_lowercase()))
}

/// Left-pad a 20-byte address to a 32-byte calldata argument.
fn encode_address_arg(address: &str) -> Result<String, FetchError> {
    let hex = address.strip_prefix("0x").unwrap_or(address);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(FetchError::Decode(format!(
            "{} is not a 20-byte hex address",
            address
        )));
    }
    Ok(format!("{:0>64}", hex.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: u128) -> String {
        format!("{:064x}", value)
    }

    #[test]
    fn decodes_a_full_round_tuple() {
        let fields: [u128; 12] = [1, 45_000, 10, 20, 30, 40, 50, 60, 70, 3, 12, 10];
        let result = format!(
            "0x{}",
            fields.iter().map(|f| word(*f)).collect::<String>()
        );
        let record = decode_round_record(&result).unwrap();
        assert!(record.active);
        assert_eq!(record.token_price_raw, 45_000);
        assert_eq!(record.participants, 70);
        assert_eq!(record.cliff_months, 3);
        assert_eq!(record.duration_months, 12);
        assert_eq!(record.tge_unlock_percent, 10);
    }

    #[test]
    fn wrong_word_count_is_a_decode_error() {
        let result = format!("0x{}{}", word(1), word(2));
        assert!(matches!(
            decode_round_record(&result),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn non_ascii_result_is_a_decode_error() {
        // 64 bytes with a two-byte character straddling the word midpoint;
        // must come back as a decode error, never a slice panic.
        let straddling = format!("{}é{}", "0".repeat(31), "0".repeat(31));
        assert_eq!(straddling.len(), 64);
        assert!(matches!(
            split_words(&format!("0x{}", straddling)),
            Err(FetchError::Decode(_))
        ));

        // same, straddling a word boundary in a two-word result
        let across_words = format!("{}é{}", "0".repeat(63), "0".repeat(63));
        assert_eq!(across_words.len(), 128);
        assert!(matches!(
            split_words(&format!("0x{}", across_words)),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn ragged_result_is_a_decode_error() {
        assert!(matches!(
            split_words("0xdeadbeef"),
            Err(FetchError::Decode(_))
        ));
    }

    #[test]
    fn u128_overflow_is_rejected() {
        let word = "f".repeat(64);
        assert!(matches!(word_to_u128(&word), Err(FetchError::Decode(_))));
    }

    #[test]
    fn non_hex_word_is_rejected() {
        let word = format!("{}{}", "0".repeat(32), "zz".repeat(16));
        assert!(matches!(word_to_u128(&word), Err(FetchError::Decode(_))));
    }

    #[test]
    fn decimals_must_fit_a_uint8() {
        let ok = format!("0x{}", word(6));
        assert_eq!(decode_decimals(&ok).unwrap(), 6);
        let max = format!("0x{}", word(255));
        assert_eq!(decode_decimals(&max).unwrap(), 255);
        let too_wide = format!("0x{}", word(256));
        assert!(matches!(
            decode_decimals(&too_wide),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(decode_decimals("0x"), Err(FetchError::Decode(_))));
    }

    #[test]
    fn bool_word_must_be_zero_or_one() {
        assert!(!word_to_bool(&word(0)).unwrap());
        assert!(word_to_bool(&word(1)).unwrap());
        assert!(matches!(word_to_bool(&word(2)), Err(FetchError::Decode(_))));
    }

    #[test]
    fn address_round_trips_through_word_padding() {
        let addr = "0x52908400098527886e0f7030069857d2e4169ee7";
        let padded = encode_address_arg(addr).unwrap();
        assert_eq!(padded.len(), 64);
        assert_eq!(word_to_address(&padded).unwrap(), addr);
    }

    #[test]
    fn zero_address_maps_to_no_link() {
        let linked = word_to_address(&word(0)).unwrap();
        assert_eq!(linked, ZERO_ADDRESS);
    }
}
