/*!
Fixed starting data for the record lists.

The store is rebuilt from these every time the process starts. A JSON seed
file can replace the built-in records for any entity it names:

```json
{
    "students": [
        { "ID": 979, "name": "John Doe", "class": "4/B", "status": "Active" }
    ],
    "events": []
}
```

Entities the file doesn't mention keep their built-in seeds.
*/
use std::collections::HashMap;
use std::path::Path;

use serde_json::{json, Value};

use super::{Entity, Record};

#[derive(Debug, Default)]
pub struct Seeds {
    lists: HashMap<Entity, Vec<Record>>,
}

fn records(v: Value) -> Vec<Record> {
    match v {
        Value::Array(items) => items.into_iter()
            .filter_map(|v| Record::try_from(v).ok())
            .collect(),
        _ => Vec::new(),
    }
}

fn builtin_records(entity: Entity) -> Vec<Record> {
    let v = match entity {
        Entity::Students => json!([
            { "ID": 979, "name": "John Doe", "class": "4/B", "status": "Active" },
        ]),
        Entity::Teachers => json!([
            {
                "ID": 1, "name": "Sarah Miller",
                "classes": ["4/B", "2/A"],
                "lessons": { "4/B": ["Mathematics"], "2/A": ["Mathematics", "Physics"] },
                "status": "Active",
            },
            {
                "ID": 2, "name": "David Chen",
                "classes": ["4/B"],
                "lessons": { "4/B": ["English"] },
                "status": "On Leave",
            },
        ]),
        Entity::Events => json!([
            { "title": "Parent-Teacher Meeting", "date": "2025-03-25", "class": "4/B" },
            { "title": "Science Fair", "date": "2025-04-12" },
        ]),
        Entity::Homework => json!([
            { "title": "Mathematics Assignment #3", "class": "4/B", "due": "2025-03-20", "status": "Pending" },
            { "title": "Physics Lab Report", "class": "4/B", "due": "2025-03-22", "status": "Pending" },
            { "title": "Mathematics Assignment #2", "class": "4/B", "due": "2025-03-10", "status": "Submitted" },
        ]),
        Entity::Books => json!([
            { "title": "Calculus: Early Transcendentals", "author": "James Stewart", "kind": "Textbook" },
            { "title": "University Physics", "author": "Young & Freedman", "kind": "Textbook" },
            { "title": "Mathematics Video Tutorials", "author": "Online Learning Platform", "kind": "Digital" },
        ]),
        Entity::Lessons => json!([
            { "subject": "Mathematics", "title": "Introduction to Calculus" },
            { "subject": "Mathematics", "title": "Derivatives and Integrals" },
            { "subject": "Physics", "title": "Newton's Laws of Motion" },
            { "subject": "Physics", "title": "Conservation of Energy" },
        ]),
        Entity::Notes => json!([
            { "title": "Lecture Notes: Calculus Week 3", "updated": "2025-03-15" },
            { "title": "Student Progress Notes", "updated": "2025-03-10" },
        ]),
        Entity::Reports => json!([
            { "title": "Class Performance Report", "kind": "Available" },
            { "title": "Student Progress Report", "kind": "Available" },
            { "title": "Attendance Report", "kind": "Available" },
            { "title": "March Monthly Report", "kind": "Recent" },
        ]),
    };
    records(v)
}

impl Seeds {
    pub fn builtin() -> Self {
        let lists = Entity::ALL.iter()
            .map(|e| (*e, builtin_records(*e)))
            .collect();
        Self { lists }
    }

    /// Built-in seeds, with any lists named in `text` replaced.
    pub fn from_json_str(text: &str) -> Result<Self, String> {
        let v: Value = serde_json::from_str(text)
            .map_err(|e| format!("Unable to parse seed data: {}", &e))?;
        let obj = match v {
            Value::Object(obj) => obj,
            _ => { return Err("Seed data must be a JSON object keyed by record type.".to_owned()); },
        };

        let mut seeds = Self::builtin();
        for (key, value) in obj.into_iter() {
            let entity: Entity = key.parse()?;
            let items = match value {
                Value::Array(items) => items,
                _ => { return Err(format!("Seed data for {:?} must be an array.", &key)); },
            };
            let mut list = Vec::with_capacity(items.len());
            for (n, item) in items.into_iter().enumerate() {
                match Record::try_from(item) {
                    Ok(r) => { list.push(r); },
                    Err(_) => { return Err(format!(
                        "Seed record {} for {:?} is not a JSON object.", n, &key
                    )); },
                }
            }
            log::trace!("Seed data replaces {} with {} records.", &entity, list.len());
            seeds.lists.insert(entity, list);
        }

        Ok(seeds)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Unable to read seed file {}: {}", path.display(), &e))?;
        Self::from_json_str(&text)
            .map_err(|e| format!("{}: {}", path.display(), &e))
    }

    /// Remove and return the seed list for `entity`.
    pub fn take(&mut self, entity: Entity) -> Vec<Record> {
        self.lists.remove(&entity).unwrap_or_default()
    }
}
