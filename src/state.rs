use std::sync::Arc;
use tokio::time::Duration;

use crate::services::rounds::RoundResolver;
use crate::services::rpc_client::RpcClient;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<RoundResolver<RpcClient>>,
    pub chain: RpcClient,
    pub kyc_poll_tries: u32,
    pub kyc_poll_delay: Duration,
}
