/*!
The in-memory record store.

Each entity type (students, teachers, events, ...) is held as a flat,
ordered list of JSON objects. There is no database behind this; every list
is recreated from seed data when the process starts and anything written
afterward is lost on restart.

Writes are whole-batch: a batch is checked for required attributes, then
concatenated onto the existing list, and the list is reduced to unique
entries under the store's `Identity` policy. The caller always gets the
full resulting list back.

Each list sits behind its own `RwLock`, and the write lock is held for the
entire check-concatenate-dedupe step, so overlapping writers can't lose
each other's records.
*/
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::RwLock;

pub mod seed;

/// Every kind of record the store knows how to hold.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Students,
    Teachers,
    Events,
    Homework,
    Books,
    Lessons,
    Notes,
    Reports,
}

impl Entity {
    pub const ALL: [Entity; 8] = [
        Entity::Students,
        Entity::Teachers,
        Entity::Events,
        Entity::Homework,
        Entity::Books,
        Entity::Lessons,
        Entity::Notes,
        Entity::Reports,
    ];

    /// The URL path segment (and JSON key) naming this entity.
    pub fn path(&self) -> &'static str {
        match self {
            Entity::Students => "students",
            Entity::Teachers => "teachers",
            Entity::Events   => "events",
            Entity::Homework => "homework",
            Entity::Books    => "books",
            Entity::Lessons  => "lessons",
            Entity::Notes    => "notes",
            Entity::Reports  => "reports",
        }
    }

    /// Attributes every record of this type must carry (non-`null`).
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Entity::Students => &["ID", "name", "class", "status"],
            Entity::Teachers => &["ID", "name", "classes", "status"],
            Entity::Events   => &["title", "date"],
            Entity::Homework => &["title", "class", "due"],
            Entity::Books    => &["title", "author"],
            Entity::Lessons  => &["subject", "title"],
            Entity::Notes    => &["title", "updated"],
            Entity::Reports  => &["title"],
        }
    }

    fn slot(&self) -> usize { *self as usize }
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for Entity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL.iter()
            .find(|e| e.path() == s)
            .copied()
            .ok_or_else(|| format!("{:?} is not a known record type.", s))
    }
}

/// One flat structured object: a student, an event, a homework item...
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn get(&self, field: &str) -> Option<&Value> { self.0.get(field) }

    /// The identifying `ID` field, if present and non-`null`.
    pub fn id(&self) -> Option<&Value> {
        self.0.get("ID").filter(|v| !v.is_null())
    }

    /// The first required attribute of `entity` this record lacks.
    pub fn missing_field(&self, entity: Entity) -> Option<&'static str> {
        entity.required_fields().iter()
            .find(|&&f| matches!(self.0.get(f), None | Some(Value::Null)))
            .copied()
    }

    pub fn into_map(self) -> Map<String, Value> { self.0 }
}

impl From<Map<String, Value>> for Record {
    fn from(m: Map<String, Value>) -> Record { Record(m) }
}

/// Only JSON objects make records; anything else is handed back.
impl TryFrom<Value> for Record {
    type Error = Value;

    fn try_from(v: Value) -> Result<Record, Value> {
        match v {
            Value::Object(m) => Ok(Record(m)),
            x => Err(x),
        }
    }
}

/// Turn a decoded request body into a batch of `entity` records.
///
/// Accepts either an array of objects or a single bare object (which is
/// treated as a batch of one).
pub fn batch_from_json(entity: Entity, body: Value) -> Result<Vec<Record>, StoreError> {
    let values = match body {
        Value::Array(values) => values,
        obj @ Value::Object(_) => vec![obj],
        _ => { return Err(StoreError::Malformed(format!(
            "Body of a {} write must be a JSON array of objects.", entity
        ))); },
    };

    let mut batch = Vec::with_capacity(values.len());
    for (index, v) in values.into_iter().enumerate() {
        match Record::try_from(v) {
            Ok(r) => { batch.push(r); },
            Err(_) => { return Err(StoreError::NotAnObject { entity, index }); },
        }
    }
    Ok(batch)
}

/**
What makes two records "the same" when collapsing a list.

`Record` compares every field, which is how the system has always behaved:
two records sharing an `ID` but differing anywhere else are both kept.
`Id` compares only the `ID` field, keeping whichever arrived first; records
without an `ID` still fall back to full comparison.
*/
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Identity {
    #[default]
    Record,
    Id,
}

impl Identity {
    pub fn same(&self, a: &Record, b: &Record) -> bool {
        match self {
            Identity::Record => a == b,
            Identity::Id => match (a.id(), b.id()) {
                (Some(x), Some(y)) => x == y,
                (None, None) => a == b,
                _ => false,
            },
        }
    }
}

impl FromStr for Identity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "record" => Ok(Identity::Record),
            "id" => Ok(Identity::Id),
            _ => Err(format!(
                "{:?} is not a valid identity policy (expected \"record\" or \"id\").", s
            )),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum StoreError {
    /// Record number `index` of the batch lacks required attribute `field`.
    MissingField { entity: Entity, index: usize, field: &'static str },
    NotAnObject { entity: Entity, index: usize },
    Malformed(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            StoreError::MissingField { entity, index, field } => write!(
                f, "Rejected {} batch: record {} is missing required field {:?}.",
                entity, index, field
            ),
            StoreError::NotAnObject { entity, index } => write!(
                f, "Rejected {} batch: record {} is not a JSON object.",
                entity, index
            ),
            StoreError::Malformed(s) => write!(f, "{}", s),
        }
    }
}

impl From<String> for StoreError {
    fn from(s: String) -> StoreError { StoreError::Malformed(s) }
}

/// Collapse `records` to unique entries under `identity`, keeping the
/// first of each and preserving order.
///
/// This is a pairwise scan; fine for the list sizes a school holds.
pub fn dedupe(records: Vec<Record>, identity: Identity) -> Vec<Record> {
    let mut kept: Vec<Record> = Vec::with_capacity(records.len());
    for r in records.into_iter() {
        if !kept.iter().any(|k| identity.same(k, &r)) {
            kept.push(r);
        }
    }
    kept
}

pub struct Store {
    lists: Vec<RwLock<Vec<Record>>>,
    identity: Identity,
}

impl Store {
    /// A store with every list empty.
    pub fn empty(identity: Identity) -> Self {
        log::trace!("Store::empty( {:?} ) called.", &identity);

        let lists = Entity::ALL.iter()
            .map(|_| RwLock::new(Vec::new()))
            .collect();
        Self { lists, identity }
    }

    /// A store with every list filled from the built-in seed data.
    pub fn seeded(identity: Identity) -> Self {
        Self::with_seeds(identity, seed::Seeds::builtin())
    }

    pub fn with_seeds(identity: Identity, mut seeds: seed::Seeds) -> Self {
        log::trace!("Store::with_seeds( {:?}, ... ) called.", &identity);

        let lists = Entity::ALL.iter()
            .map(|e| RwLock::new(dedupe(seeds.take(*e), identity)))
            .collect();
        Self { lists, identity }
    }

    pub fn identity(&self) -> Identity { self.identity }

    fn list(&self, entity: Entity) -> &RwLock<Vec<Record>> {
        &self.lists[entity.slot()]
    }

    /// The full current list of `entity` records.
    pub async fn list_all(&self, entity: Entity) -> Vec<Record> {
        log::trace!("Store::list_all( {} ) called.", &entity);
        self.list(entity).read().await.clone()
    }

    /**
    Merge `batch` into the `entity` list and return the whole resulting list.

    If any record in the batch is missing a required attribute, nothing is
    applied and the error says which record and which attribute.
    */
    pub async fn append_batch(
        &self,
        entity: Entity,
        batch: Vec<Record>,
    ) -> Result<Vec<Record>, StoreError> {
        log::trace!(
            "Store::append_batch( {}, [ {} records ] ) called.",
            &entity, batch.len()
        );

        for (index, r) in batch.iter().enumerate() {
            if let Some(field) = r.missing_field(entity) {
                return Err(StoreError::MissingField { entity, index, field });
            }
        }

        let mut list = self.list(entity).write().await;
        let n_before = list.len();
        let mut merged = std::mem::take(&mut *list);
        merged.extend(batch);
        *list = dedupe(merged, self.identity);

        log::info!(
            "{} list went from {} to {} records.",
            &entity, n_before, list.len()
        );
        Ok(list.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::ensure_logging;

    use std::sync::Arc;

    use serde_json::json;

    fn rec(v: Value) -> Record { Record::try_from(v).unwrap() }

    fn john() -> Record {
        rec(json!({"ID": 979, "name": "John Doe", "class": "4/B", "status": "Active"}))
    }

    fn jane() -> Record {
        rec(json!({"ID": 486, "name": "Jane Smith", "class": "2/A", "status": "Active"}))
    }

    async fn store_with_john() -> Store {
        let s = Store::empty(Identity::Record);
        s.append_batch(Entity::Students, vec![john()]).await.unwrap();
        s
    }

    #[test]
    fn entity_paths() {
        for e in Entity::ALL.iter() {
            assert_eq!(e.path().parse::<Entity>().unwrap(), *e);
            assert_eq!(&e.to_string(), e.path());
        }
        assert!("classrooms".parse::<Entity>().is_err());
        assert_eq!(serde_json::to_value(Entity::Homework).unwrap(), json!("homework"));
    }

    #[tokio::test]
    async fn append_new_student() {
        ensure_logging();
        let s = store_with_john().await;

        let list = s.append_batch(Entity::Students, vec![jane()]).await.unwrap();
        assert_eq!(list, vec![john(), jane()]);
        assert_eq!(s.list_all(Entity::Students).await, list);
    }

    #[tokio::test]
    async fn append_exact_duplicate() {
        ensure_logging();
        let s = store_with_john().await;

        let list = s.append_batch(Entity::Students, vec![john()]).await.unwrap();
        assert_eq!(list, vec![john()]);
    }

    #[tokio::test]
    async fn same_batch_twice() {
        ensure_logging();
        let s = store_with_john().await;
        let batch = vec![jane(), jane(), john()];

        let once = s.append_batch(Entity::Students, batch.clone()).await.unwrap();
        let twice = s.append_batch(Entity::Students, batch).await.unwrap();
        assert_eq!(once, vec![john(), jane()]);
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn shared_id_both_kept() {
        ensure_logging();
        let s = store_with_john().await;
        let moved = rec(json!({"ID": 979, "name": "John Doe", "class": "5/A", "status": "Active"}));

        let list = s.append_batch(Entity::Students, vec![moved.clone()]).await.unwrap();
        assert_eq!(list, vec![john(), moved]);
    }

    #[tokio::test]
    async fn shared_id_dropped_by_id_identity() {
        ensure_logging();
        let s = Store::empty(Identity::Id);
        s.append_batch(Entity::Students, vec![john()]).await.unwrap();
        let moved = rec(json!({"ID": 979, "name": "John Doe", "class": "5/A", "status": "Active"}));

        let list = s.append_batch(Entity::Students, vec![moved, jane()]).await.unwrap();
        assert_eq!(list, vec![john(), jane()]);
    }

    #[test]
    fn id_identity_without_ids() {
        let a = rec(json!({"title": "Field trip", "date": "2025-04-02"}));
        let b = rec(json!({"title": "Field trip", "date": "2025-04-09"}));
        assert!(!Identity::Id.same(&a, &b));
        assert!(Identity::Id.same(&a, &a.clone()));
        assert!(!Identity::Id.same(&a, &john()));
    }

    #[tokio::test]
    async fn seed_file_duplicates_collapsed() {
        ensure_logging();
        let text = r#"{"students": [
            {"ID": 979, "name": "John Doe", "class": "4/B", "status": "Active"},
            {"ID": 486, "name": "Jane Smith", "class": "2/A", "status": "Active"},
            {"ID": 979, "name": "John Doe", "class": "4/B", "status": "Active"}
        ]}"#;
        let s = Store::with_seeds(Identity::Record, seed::Seeds::from_json_str(text).unwrap());
        assert_eq!(s.list_all(Entity::Students).await, vec![john(), jane()]);
    }

    #[tokio::test]
    async fn missing_status_rejects_batch() {
        ensure_logging();
        let s = store_with_john().await;
        let no_status = rec(json!({"ID": 12, "name": "Ali Veli", "class": "3/C"}));

        let err = s.append_batch(Entity::Students, vec![jane(), no_status])
            .await.unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingField { entity: Entity::Students, index: 1, field: "status" }
        );
        assert!(err.to_string().contains("status"));
        assert_eq!(s.list_all(Entity::Students).await, vec![john()]);
    }

    #[tokio::test]
    async fn null_counts_as_missing() {
        let s = Store::empty(Identity::Record);
        let no_class = rec(json!({"ID": 1, "name": "A", "class": null, "status": "Active"}));
        let err = s.append_batch(Entity::Students, vec![no_class]).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingField { field: "class", .. }));
    }

    #[test]
    fn union_law() {
        let old = vec![john(), jane()];
        let extra = rec(json!({"ID": 5, "name": "Can", "class": "1/A", "status": "Inactive"}));
        let batch = vec![jane(), extra.clone(), extra.clone()];

        let mut merged = old.clone();
        merged.extend(batch.clone());
        let out = dedupe(merged, Identity::Record);

        for r in old.iter().chain(batch.iter()) {
            assert!(out.contains(r));
        }
        for (i, a) in out.iter().enumerate() {
            for b in out[i + 1..].iter() {
                assert_ne!(a, b);
            }
        }
        assert_eq!(out, vec![john(), jane(), extra]);
    }

    #[test]
    fn batch_shapes() {
        let one = batch_from_json(Entity::Books, json!({"title": "T", "author": "A"})).unwrap();
        assert_eq!(one.len(), 1);

        let err = batch_from_json(Entity::Books, json!([{"title": "T"}, 7])).unwrap_err();
        assert_eq!(err, StoreError::NotAnObject { entity: Entity::Books, index: 1 });

        assert!(matches!(
            batch_from_json(Entity::Books, json!("books")),
            Err(StoreError::Malformed(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_appends_all_survive() {
        ensure_logging();
        let s = Arc::new(Store::empty(Identity::Record));

        let mut handles = Vec::new();
        for n in 0..16 {
            let s = s.clone();
            handles.push(tokio::spawn(async move {
                let r = rec(json!({"title": format!("Event {}", n), "date": "2025-05-01"}));
                s.append_batch(Entity::Events, vec![r]).await.unwrap();
            }));
        }
        for h in handles { h.await.unwrap(); }

        assert_eq!(s.list_all(Entity::Events).await.len(), 16);
    }
}
