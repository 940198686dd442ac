//! Network constants for the raffle SDK.

/// Default JSON-RPC endpoint (GenLayer Studio network).
pub const DEFAULT_RPC_URL: &str = "https://studio.genlayer.com/api";

/// Environment variable holding the JSON-RPC endpoint.
pub const ENV_RPC_URL: &str = "RAFFLE_RPC_URL";

/// Environment variable holding the deployed contract address.
pub const ENV_CONTRACT_ADDRESS: &str = "RAFFLE_CONTRACT_ADDRESS";

/// Environment variable holding the account to bind at startup.
pub const ENV_ACCOUNT: &str = "RAFFLE_ACCOUNT";

/// JSON-RPC method for read-only contract calls.
pub const RPC_CALL: &str = "gen_call";

/// JSON-RPC method for submitting a state-changing contract call.
pub const RPC_SEND_TRANSACTION: &str = "eth_sendTransaction";

/// JSON-RPC method for fetching a transaction's current status.
pub const RPC_GET_TRANSACTION: &str = "eth_getTransactionByHash";
