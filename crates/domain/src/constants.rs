//! Application constants
//!
//! Centralized location for the fixed values of the Ponto API surface and the
//! local credential storage layout.

// Application identity
pub const APP_NAME: &str = "ponto";
pub const USER_AGENT_PRODUCT: &str = "ponto-cli";
pub const DEFAULT_PROFILE: &str = "default";

// API surface
pub const DEFAULT_BASE_URL: &str = "https://api.myponto.com";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const MAX_PAGE_SIZE: usize = 100;

// Token lifecycle
pub const TOKEN_EXPIRY_BUFFER_SECS: i64 = 60;

// Timeouts and polling
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const SYNC_POLL_INTERVAL_SECS: u64 = 2;
pub const KEYRING_OPEN_TIMEOUT_SECS: u64 = 5;
pub const IP_LOOKUP_TIMEOUT_SECS: u64 = 5;

// Retry transport
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_BASE_BACKOFF_MS: u64 = 200;

// Synchronization states and subtypes
pub const SYNC_STATUS_SUCCESS: &str = "success";
pub const SYNC_STATUS_ERROR: &str = "error";
pub const SYNC_SUBTYPE_ACCOUNT_DETAILS: &str = "accountDetails";
pub const SYNC_SUBTYPE_ACCOUNT_TRANSACTIONS: &str = "accountTransactions";

// Environment variables
pub const ENV_KEYRING_BACKEND: &str = "PONTO_KEYRING_BACKEND";
pub const ENV_KEYRING_PASSWORD: &str = "PONTO_KEYRING_PASSWORD";
pub const ENV_DBUS_SESSION_BUS: &str = "DBUS_SESSION_BUS_ADDRESS";

// Compliance header fallback when no address can be detected
pub const UNKNOWN_IP_ADDRESS: &str = "0.0.0.0";
