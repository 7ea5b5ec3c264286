//! Axum HTTP handlers for the mocked Stacks node endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use savings_pool_client::clarity::ClarityValue;
use savings_pool_client::transaction::ContractCallTransaction;
use savings_pool_client::StacksAddress;

use crate::state::PoolState;
use crate::types::*;

/// Shared application state
pub type AppState = PoolState;

/// Custom error type for handlers
pub enum ApiError {
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::BadRequest(msg) = self;
        (StatusCode::BAD_REQUEST, msg).into_response()
    }
}

/// GET /v2/accounts/{principal}
/// Returns the account's funded balance and next nonce
pub async fn get_account(
    State(state): State<AppState>,
    Path(principal): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let address = StacksAddress::from_c32(&principal)
        .map_err(|e| ApiError::BadRequest(format!("Invalid principal: {}", e)))?;

    let (balance, nonce) = state.account(address.hash160());
    Ok(Json(AccountResponse {
        balance: format!("0x{:032x}", balance),
        nonce,
    }))
}

/// POST /v2/transactions
/// Accepts a raw contract-call transaction, applies its effect, and returns
/// the txid as a JSON string — or an HTTP 400 rejection body, matching the
/// real node's mempool admission behavior
pub async fn broadcast_transaction(
    State(state): State<AppState>,
    body: Bytes,
) -> Response {
    let tx = match ContractCallTransaction::deserialize(&body) {
        Ok(tx) => tx,
        Err(e) => {
            log::warn!("Undecodable transaction: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(RejectionResponse {
                    error: "transaction rejected".to_string(),
                    reason: format!("Deserialize({})", e),
                    txid: None,
                }),
            )
                .into_response();
        }
    };

    // Decoding enforces the same name and string limits as encoding, so a
    // deserialized transaction always has a txid
    let txid = match tx.txid() {
        Ok(txid) => txid,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RejectionResponse {
                    error: "transaction rejected".to_string(),
                    reason: format!("Serialize({})", e),
                    txid: None,
                }),
            )
                .into_response();
        }
    };
    log::info!(
        "Broadcast: {} (fee {}, nonce {}, txid {})",
        tx.function_name(),
        tx.fee(),
        tx.nonce(),
        txid
    );

    match state.apply_transaction(&tx) {
        Ok(()) => (StatusCode::OK, Json(serde_json::json!(txid))).into_response(),
        Err(rejection) => {
            log::warn!("Rejected {}: {}", tx.function_name(), rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(RejectionResponse {
                    error: "transaction rejected".to_string(),
                    reason: rejection.to_string(),
                    txid: Some(txid),
                }),
            )
                .into_response()
        }
    }
}

/// POST /v2/contracts/call-read/{address}/{contract}/{function}
/// Simulates a read-only call against current pool state
pub async fn call_read_only(
    State(state): State<AppState>,
    Path((_address, _contract, function)): Path<(String, String, String)>,
    Json(request): Json<ReadOnlyRequest>,
) -> Result<Json<ReadOnlyResponse>, ApiError> {
    let mut args = Vec::with_capacity(request.arguments.len());
    for hex_arg in &request.arguments {
        match ClarityValue::deserialize_hex(hex_arg) {
            Ok(value) => args.push(value),
            Err(e) => {
                return Ok(Json(ReadOnlyResponse::failed(format!(
                    "BadFunctionArgument({})",
                    e
                ))))
            }
        }
    }

    log::debug!("Read-only call: {} from {}", function, request.sender);

    match state.read_call(&function, &args) {
        Ok(value) => match value.serialize_hex() {
            Ok(result_hex) => Ok(Json(ReadOnlyResponse::ok(result_hex))),
            Err(e) => Ok(Json(ReadOnlyResponse::failed(format!(
                "SerializationError({})",
                e
            )))),
        },
        Err(cause) => Ok(Json(ReadOnlyResponse::failed(cause))),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
