/*!
What the front end needs to know about roles.
*/
use axum::{
    extract::Path,
    Json,
};
use serde_json::json;

use crate::role::Role;
use super::*;

pub async fn message() -> Response {
    (
        StatusCode::OK,
        Json(json!({ "message": "Hello from winoom." })),
    ).into_response()
}

/// The navigation entries and dashboard record lists for `role`.
pub async fn nav(Path(role): Path<String>) -> Response {
    let role: Role = match role.parse() {
        Ok(r) => r,
        Err(e) => { return respond_bad_request(e); },
    };

    (
        StatusCode::OK,
        Json(role.view()),
    ).into_response()
}
