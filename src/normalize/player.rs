use serde_json::Value as Json;

use super::{assemble, flatten_category, json_kind, NormalizeError, Record, Value};
use crate::names::NameTable;
use crate::schema::{Category, ScalarColumn, ScalarSource, ALL_CATEGORIES, SCALAR_COLUMNS};

/// Turns raw player records into normalized rows for one polling run
pub struct Normalizer<'a> {
    names: &'a NameTable,
    run_date: String,
    scalars: &'a [ScalarColumn],
    categories: &'a [&'a Category],
}

impl<'a> Normalizer<'a> {
    pub fn new(names: &'a NameTable, run_date: impl Into<String>) -> Self {
        Self {
            names,
            run_date: run_date.into(),
            scalars: SCALAR_COLUMNS,
            categories: ALL_CATEGORIES,
        }
    }

    pub fn with_categories(self, categories: &'a [&'a Category]) -> Self {
        Self { categories, ..self }
    }

    pub fn run_date(&self) -> &str {
        &self.run_date
    }

    /// Normalize one player record.
    ///
    /// Returns `Ok(None)` for a null or empty record; such players are skipped.
    pub fn normalize(&self, uid: &str, raw: &Json) -> Result<Option<Record>, NormalizeError> {
        let player = match raw {
            Json::Null => return Ok(None),
            Json::Object(map) if map.is_empty() => return Ok(None),
            Json::Object(map) => map,
            other => {
                return Err(NormalizeError::NotAnObject {
                    found: json_kind(other),
                })
            }
        };

        let scalars = self
            .scalars
            .iter()
            .map(|column| {
                let value = match column.source {
                    ScalarSource::RunDate => Value::Text(self.run_date.clone()),
                    ScalarSource::Uid => Value::Text(uid.to_string()),
                    ScalarSource::Field(field) => player
                        .get(field)
                        .map(Value::from_json)
                        .unwrap_or(Value::Missing),
                };
                (column.name, value)
            })
            .collect();

        let categories = self
            .categories
            .iter()
            .map(|category| {
                flatten_category(category, player.get(category.name), self.names)
                    .map(|flat| (category.name, flat))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(assemble(scalars, categories)))
    }
}
