pub mod formatter;
pub mod kyc;
pub mod quote;
pub mod rounds;
pub mod rpc_client;
