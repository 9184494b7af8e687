use std::env;

use url::Url;

use crate::services::kyc::{DEFAULT_POLL_DELAY_MS, DEFAULT_POLL_TRIES};

/// Chain endpoint and contract addresses, loaded once at startup and passed
/// explicitly into the RPC client. Nothing below the config layer reads the
/// process environment.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub rpc_url: Url,
    pub chain_id: u64,
    pub presale_address: String,
    pub usdc_address: String,
    pub kyc_registry_address: String,
}

pub struct Config {
    pub port: u16,
    pub chain: ChainConfig,
    pub kyc_poll_tries: u32,
    pub kyc_poll_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let rpc_url = env::var("RPC_URL")
            .map_err(|_| anyhow::anyhow!("RPC_URL environment variable not set"))?
            .parse::<Url>()
            .map_err(|e| anyhow::anyhow!("Invalid RPC_URL: {}", e))?;

        let chain_id = env::var("CHAIN_ID")
            .unwrap_or_else(|_| "1".to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("Invalid CHAIN_ID value"))?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("Invalid PORT value"))?;

        let kyc_poll_tries = env::var("KYC_POLL_TRIES")
            .unwrap_or_else(|_| DEFAULT_POLL_TRIES.to_string())
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid KYC_POLL_TRIES value"))?;

        let kyc_poll_delay_ms = env::var("KYC_POLL_DELAY_MS")
            .unwrap_or_else(|_| DEFAULT_POLL_DELAY_MS.to_string())
            .parse::<u64>()
            .map_err(|_| anyhow::anyhow!("Invalid KYC_POLL_DELAY_MS value"))?;

        Ok(Config {
            port,
            chain: ChainConfig {
                rpc_url,
                chain_id,
                presale_address: require_address("PRESALE_ADDRESS")?,
                usdc_address: require_address("USDC_ADDRESS")?,
                kyc_registry_address: require_address("KYC_REGISTRY_ADDRESS")?,
            },
            kyc_poll_tries,
            kyc_poll_delay_ms,
        })
    }
}

fn require_address(var: &str) -> anyhow::Result<String> {
    let value =
        env::var(var).map_err(|_| anyhow::anyhow!("{} environment variable not set", var))?;
    let hex = value.strip_prefix("0x").unwrap_or(&value);
    if hex.len() != 40 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        anyhow::bail!("{} is not a 20-byte hex address", var);
    }
    Ok(format!("0x{}", hex.to_lowercase()))
}
