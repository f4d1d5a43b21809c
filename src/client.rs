/*!
The views' side of the HTTP API.

Every failure is caught right here and turned into a message fit to show
the user; nothing is retried and nothing escapes as anything but a
`String`.
*/
use std::collections::BTreeMap;

use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::StatusCode;

use crate::nav::RoleContext;
use crate::store::{Entity, Record};

/// Each dashboard list, or the message explaining why it's missing.
pub type Dashboard = BTreeMap<Entity, Result<Vec<Record>, String>>;

fn load_failed(entity: Entity) -> String {
    format!("Failed to load {}. Please try again later.", entity)
}

fn save_failed(entity: Entity) -> String {
    format!("Failed to save {}. Please try again later.", entity)
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    base: String,
    http: reqwest::Client,
}

impl ApiClient {
    /// `base` is the server root, like `"http://localhost:5000"`.
    pub fn new<S: Into<String>>(base: S) -> Self {
        let mut base: String = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { base, http: reqwest::Client::new() }
    }

    fn url(&self, entity: Entity, suffix: &str) -> String {
        format!("{}/api/{}{}", &self.base, entity.path(), suffix)
    }

    pub async fn list_all(&self, entity: Entity) -> Result<Vec<Record>, String> {
        log::trace!("ApiClient::list_all( {} ) called.", &entity);

        let resp = self.http.get(self.url(entity, "")).send().await
            .map_err(|e| {
                log::error!("Error fetching {}: {}", &entity, &e);
                load_failed(entity)
            })?;

        if !resp.status().is_success() {
            log::error!("Fetching {} returned {}.", &entity, resp.status());
            return Err(load_failed(entity));
        }

        resp.json::<Vec<Record>>().await.map_err(|e| {
            log::error!("Error decoding {} list: {}", &entity, &e);
            load_failed(entity)
        })
    }

    async fn read_write_response(
        &self,
        entity: Entity,
        resp: reqwest::Response,
    ) -> Result<Vec<Record>, String> {
        match resp.status() {
            s if s.is_success() => resp.json::<Vec<Record>>().await.map_err(|e| {
                log::error!("Error decoding {} list: {}", &entity, &e);
                save_failed(entity)
            }),
            StatusCode::BAD_REQUEST => {
                // The server explains what it didn't like.
                match resp.text().await {
                    Ok(msg) if !msg.is_empty() => Err(msg),
                    _ => Err(save_failed(entity)),
                }
            },
            s => {
                log::error!("Saving {} returned {}.", &entity, s);
                Err(save_failed(entity))
            },
        }
    }

    pub async fn append_batch(
        &self,
        entity: Entity,
        records: &[Record],
    ) -> Result<Vec<Record>, String> {
        log::trace!(
            "ApiClient::append_batch( {}, [ {} records ] ) called.",
            &entity, records.len()
        );

        let resp = self.http.post(self.url(entity, ""))
            .json(records)
            .send().await
            .map_err(|e| {
                log::error!("Error posting {}: {}", &entity, &e);
                save_failed(entity)
            })?;

        self.read_write_response(entity, resp).await
    }

    /// Send a spreadsheet export (as CSV text) to be appended.
    pub async fn upload_csv(&self, entity: Entity, csv: String) -> Result<Vec<Record>, String> {
        log::trace!("ApiClient::upload_csv( {}, [ {} bytes ] ) called.", &entity, csv.len());

        let resp = self.http.post(self.url(entity, "/upload"))
            .header(reqwest::header::CONTENT_TYPE, "text/csv")
            .body(csv)
            .send().await
            .map_err(|e| {
                log::error!("Error uploading {}: {}", &entity, &e);
                save_failed(entity)
            })?;

        self.read_write_response(entity, resp).await
    }

    /// Fetch every list on `ctx`'s dashboard at once.
    pub async fn fetch_dashboard(&self, ctx: &RoleContext) -> Dashboard {
        log::trace!("ApiClient::fetch_dashboard( {} ) called.", &ctx.role);

        let mut fetches = FuturesUnordered::new();
        for entity in ctx.dashboard.iter() {
            let entity = *entity;
            fetches.push(async move { (entity, self.list_all(entity).await) });
        }

        let mut dash = Dashboard::new();
        while let Some((entity, res)) = fetches.next().await {
            dash.insert(entity, res);
        }
        dash
    }
}
