/*!
Reading records from spreadsheet exports.

Uploads are CSV with a header row naming the attributes:

```csv
ID,  name,       class, status
979, John Doe,   4/B,   Active
486, Jane Smith, 2/A,   Active
```

Blank cells are left out of the record entirely, so a blank required
column shows up as a missing field when the batch is appended. Lines
beginning with `#` are ignored.

For teachers, `classes` is a comma-separated list and `lessons` is a
JSON object mapping each class to its subjects.
*/
use std::io::Read;

use serde_json::{Map, Value};

use crate::store::{Entity, Record};

fn cell_value(entity: Entity, column: &str, cell: &str) -> Result<Value, String> {
    if column == "ID" {
        // Only canonical integers; "0979" or "+5" stay text.
        if let Ok(n) = cell.parse::<i64>() {
            if n.to_string() == cell {
                return Ok(Value::from(n));
            }
        }
    }
    if entity == Entity::Teachers {
        match column {
            "classes" => {
                let classes: Vec<Value> = cell.split(',')
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .map(Value::from)
                    .collect();
                return Ok(Value::Array(classes));
            },
            "lessons" => {
                return match serde_json::from_str::<Value>(cell) {
                    Ok(v @ Value::Object(_)) => Ok(v),
                    Ok(_) => Err("\"lessons\" must be a JSON object keyed by class".to_owned()),
                    Err(e) => Err(format!("unable to parse \"lessons\": {}", &e)),
                };
            },
            _ => {},
        }
    }

    Ok(Value::from(cell))
}

fn row_to_record(
    entity: Entity,
    headers: &csv::StringRecord,
    row: &csv::StringRecord
) -> Result<Record, String> {
    let mut m = Map::new();
    for (column, cell) in headers.iter().zip(row.iter()) {
        if cell.is_empty() {
            continue;
        }
        m.insert(column.to_owned(), cell_value(entity, column, cell)?);
    }
    Ok(Record::from(m))
}

fn position_error(n: usize, pos: Option<&csv::Position>, e: &dyn std::fmt::Display) -> String {
    match pos {
        Some(p) => format!("Error on line {}: {}", p.line(), e),
        None => format!("Error in CSV record {}: {}", n, e),
    }
}

pub fn records_from_csv_reader<R: Read>(entity: Entity, r: R) -> Result<Vec<Record>, String> {
    log::trace!("records_from_csv_reader( {}, ... ) called.", &entity);

    let mut csv_reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(false)
        .has_headers(true)
        .from_reader(r);

    let headers = csv_reader.headers()
        .map_err(|e| position_error(0, e.position(), &e))?
        .clone();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(format!("No header row in {} upload.", &entity));
    }

    let mut records: Vec<Record> = Vec::new();
    for (n, res) in csv_reader.records().enumerate() {
        match res {
            Ok(row) => match row_to_record(entity, &headers, &row) {
                Ok(rec) => { records.push(rec); },
                Err(e) => { return Err(position_error(n, row.position(), &e)); },
            },
            Err(e) => { return Err(position_error(n, e.position(), &e)); },
        }
    }

    log::trace!(
        "records_from_csv_reader() returns {} {} records.",
        records.len(), &entity
    );
    Ok(records)
}
