/*!
Reading and writing the record lists.
*/
use std::io::Cursor;

use axum::{
    extract::Path,
    Json,
};
use serde_json::Value;

use crate::import;
use crate::store::{self, Record};
use super::*;

pub async fn list(
    Path(entity): Path<String>,
    Extension(glob): Extension<Arc<Glob>>,
) -> Response {
    let entity = match entity_from_path(&entity) {
        Ok(e) => e,
        Err(r) => { return r; },
    };

    let records = glob.store.list_all(entity).await;
    log::trace!("Serving {} {} records.", records.len(), &entity);

    (
        StatusCode::OK,
        Json(records),
    ).into_response()
}

async fn append_and_respond(glob: &Glob, entity: Entity, batch: Vec<Record>) -> Response {
    match glob.store.append_batch(entity, batch).await {
        Ok(records) => (
            StatusCode::OK,
            Json(records),
        ).into_response(),
        Err(e) => {
            log::error!("Error appending {} batch: {}", &entity, &e);
            respond_bad_request(e.to_string())
        },
    }
}

pub async fn append(
    Path(entity): Path<String>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Response {
    let entity = match entity_from_path(&entity) {
        Ok(e) => e,
        Err(r) => { return r; },
    };

    if body.trim().is_empty() {
        return respond_bad_request(
            "Request requires a JSON body.".to_owned()
        );
    }

    let value: Value = match serde_json::from_str(&body) {
        Ok(v) => v,
        Err(e) => {
            log::error!(
                "Error deserializing JSON {:?} as {} batch: {}",
                &body, &entity, &e
            );
            return respond_bad_request(format!(
                "Unable to decode {} batch as JSON: {}", &entity, &e
            ));
        },
    };

    let batch = match store::batch_from_json(entity, value) {
        Ok(batch) => batch,
        Err(e) => { return respond_bad_request(e.to_string()); },
    };

    append_and_respond(&glob, entity, batch).await
}

pub async fn upload(
    Path(entity): Path<String>,
    Extension(glob): Extension<Arc<Glob>>,
    body: String,
) -> Response {
    let entity = match entity_from_path(&entity) {
        Ok(e) => e,
        Err(r) => { return r; },
    };

    if body.trim().is_empty() {
        return respond_bad_request(
            "Request requires a CSV body.".to_owned()
        );
    }

    let batch = match import::records_from_csv_reader(entity, Cursor::new(body.as_bytes())) {
        Ok(batch) => batch,
        Err(e) => {
            log::error!(
                "Error reading {} upload via CSV: {}\n\nCSV text:\n\n{}\n",
                &entity, &e, &body
            );
            return respond_bad_request(e);
        },
    };

    append_and_respond(&glob, entity, batch).await
}
