//! Response construction helpers.
//!
//! Every gateway-produced error is a small JSON object with a single key.
//! Auth failures use `message`; forwarder transport failures use `error`
//! except on the auth route, whose clients still read `message`.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Build a `{"<key>": "<message>"}` response with a JSON content type.
pub fn json_body(status: StatusCode, key: &str, message: &str) -> Response {
    let mut body = serde_json::Map::new();
    body.insert(
        key.to_string(),
        serde_json::Value::String(message.to_string()),
    );
    let mut response = (status, serde_json::Value::Object(body).to_string()).into_response();
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// `{"message": "..."}` — the shape used by auth and routing errors.
pub fn json_message(status: StatusCode, message: &str) -> Response {
    json_body(status, "message", message)
}

pub fn unauthorized(message: &str) -> Response {
    json_message(StatusCode::UNAUTHORIZED, message)
}
