use serde::Serialize;
use tokio::time::{sleep, Duration};
use tracing::{info, warn};

use crate::error::FetchError;

pub const DEFAULT_POLL_TRIES: u32 = 12;
pub const DEFAULT_POLL_DELAY_MS: u64 = 2500;

#[derive(Debug, Clone, Serialize)]
pub struct KycStatus {
    pub verified: bool,
    pub linked_address: Option<String>,
}

/// Address-keyed KYC registry read. Production impl is the JSON-RPC client.
#[allow(async_fn_in_trait)]
pub trait KycSource: Send + Sync {
    async fn fetch_kyc_status(&self, address: &str) -> Result<KycStatus, FetchError>;
}

/// Poll the registry until the address verifies or the attempt budget runs
/// out. Transient fetch failures are logged and swallowed; they consume an
/// attempt but never abort the loop. Exhaustion is a normal `false`, not an
/// error.
pub async fn poll_verification<S: KycSource>(
    source: &S,
    address: &str,
    tries: u32,
    delay: Duration,
) -> bool {
    for attempt in 1..=tries {
        match source.fetch_kyc_status(address).await {
            Ok(status) if status.verified => {
                info!("KYC verified for {} on attempt {}", address, attempt);
                return true;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(
                    "KYC status fetch failed for {} (attempt {}/{}): {}",
                    address, attempt, tries, e
                );
            }
        }
        if attempt < tries {
            sleep(delay).await;
        }
    }
    false
}
