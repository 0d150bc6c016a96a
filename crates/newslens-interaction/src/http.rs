//! Shared error mapping for the API clients.

use newslens_core::NewslensError;
use reqwest::Response;

use crate::dto::ErrorBody;

/// Maps a transport-level failure (no response) to the domain error.
pub(crate) fn network_error(err: reqwest::Error) -> NewslensError {
    NewslensError::network(err.to_string())
}

/// Maps a malformed success body to the domain error.
pub(crate) fn decode_error(err: reqwest::Error) -> NewslensError {
    NewslensError::Serialization {
        format: "JSON".to_string(),
        message: err.to_string(),
    }
}

/// Maps a non-success response to the domain error, pulling the `detail`
/// field out of the body when the backend provided one.
pub(crate) async fn response_error(response: Response) -> NewslensError {
    let status = response.status().as_u16();
    let detail = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.detail)
        .unwrap_or_else(|| "request failed".to_string());
    NewslensError::request(status, detail)
}
