//! JSON request/response shapes for the mocked node endpoints

use serde::{Deserialize, Serialize};

/// GET /v2/accounts/{principal} response
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// Hex-encoded µSTX balance, as the real node reports it
    pub balance: String,
    pub nonce: u64,
}

/// POST /v2/contracts/call-read/... request
#[derive(Debug, Deserialize)]
pub struct ReadOnlyRequest {
    pub sender: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// POST /v2/contracts/call-read/... response
#[derive(Debug, Serialize)]
pub struct ReadOnlyResponse {
    pub okay: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ReadOnlyResponse {
    pub fn ok(result_hex: String) -> Self {
        Self {
            okay: true,
            result: Some(result_hex),
            cause: None,
        }
    }

    pub fn failed(cause: String) -> Self {
        Self {
            okay: false,
            result: None,
            cause: Some(cause),
        }
    }
}

/// POST /v2/transactions rejection body (HTTP 400)
#[derive(Debug, Serialize)]
pub struct RejectionResponse {
    pub error: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
}
