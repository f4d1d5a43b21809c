/*!
Interoperation between the client (user) and server.

Everything lives under `/api`:

```text
GET  /api/message              liveness greeting
GET  /api/roles/{role}/nav     navigation + dashboard lists for a role
GET  /api/{entity}             the whole list of that record type
POST /api/{entity}             JSON array of new records; returns whole list
POST /api/{entity}/upload      CSV of new records; returns whole list
```

(The record lists themselves are covered by `store`.)
*/
use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{Request, StatusCode},
    http::header::{HeaderName, HeaderValue},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir};

use crate::config::Glob;
use crate::store::Entity;

pub mod records;
pub mod roles;

/// Request header echoed back on the response, if the client sends one.
pub const REQUEST_ID_HEADER: &str = "x-winoom-request-id";

trait AddHeaders: IntoResponse + Sized {
    fn add_headers(self, mut new_headers: Vec<(HeaderName, HeaderValue)>) -> Response {
        let mut r = self.into_response();
        let r_headers = r.headers_mut();
        for (name, value) in new_headers.drain(..) {
            r_headers.insert(name, value);
        }

        r
    }
}

impl<T: IntoResponse + Sized> AddHeaders for T {}

pub fn respond_bad_request(msg: String) -> Response {
    log::trace!("respond_bad_request( {:?} ) called.", &msg);

    (
        StatusCode::BAD_REQUEST,
        msg
    ).into_response()
}

pub fn respond_not_found(msg: String) -> Response {
    log::trace!("respond_not_found( {:?} ) called.", &msg);

    (
        StatusCode::NOT_FOUND,
        msg
    ).into_response()
}

/// Parse an entity path segment, or produce the 404 explaining why not.
fn entity_from_path(segment: &str) -> Result<Entity, Response> {
    segment.parse::<Entity>().map_err(respond_not_found)
}

/// Middleware function to ensure an `x-winoom-request-id` header, if the
/// client sent one, is maintained between request and response.
pub async fn request_identity<B>(
    req: Request<B>,
    next: Next<B>
) -> Response {
    log::trace!("{} {}", req.method(), req.uri());

    let id_header = req.headers().get(REQUEST_ID_HEADER).cloned();

    let response = next.run(req).await;
    match id_header {
        Some(id) => response.add_headers(vec![
            (HeaderName::from_static(REQUEST_ID_HEADER), id)
        ]),
        None => response,
    }
}

/// The whole application, with `glob` available to every handler.
pub fn router(glob: Arc<Glob>) -> Router {
    let app = Router::new()
        .route("/api/message", get(roles::message))
        .route("/api/roles/:role/nav", get(roles::nav))
        .route("/api/:entity", get(records::list).post(records::append))
        .route("/api/:entity/upload", post(records::upload));

    let app = match &glob.static_dir {
        Some(dir) => {
            log::info!("Serving front end from {}.", dir.display());
            app.fallback_service(ServeDir::new(dir))
        },
        None => app,
    };

    app.layer(middleware::from_fn(request_identity))
        .layer(CorsLayer::permissive())
        .layer(Extension(glob))
}
