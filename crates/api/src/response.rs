//! Shared response envelope.
//!
//! API responses use a `{ "data": ... }` envelope. The callable regeneration
//! endpoint is the exception: it answers with its own
//! `{ success, avatarUrl?, error? }` contract.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
