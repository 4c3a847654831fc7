mod boards;
mod client;
mod response;

pub use boards::{Boards, BOARDS_PATH};
pub use client::Client;
pub use reqwest::StatusCode;

/// Every variant means the board service could not give a usable answer:
/// the request did not go through, the service refused it, or the body was
/// not what we expected. Callers treat all of them as "remote unavailable".
#[derive(Debug, thiserror::Error)]
pub enum BoardClientError {
    #[error("in reqwest: {}: {}", message, source)]
    ReqwestError {
        message: String,
        source: reqwest::Error,
    },

    #[error("failed status code: {}: {}", status_code, message)]
    FailedStatusCode {
        status_code: StatusCode,
        message: String,
    },

    #[error("in serde_json: {}: {}", message, source)]
    SerdeJsonError {
        message: String,
        source: serde_json::Error,
    },
}
