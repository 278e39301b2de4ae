use serde_json::{Map, Value as Json};
use tracing::debug;

use super::{json_kind, NormalizeError, Record, Value};
use crate::names::NameTable;
use crate::schema::Category;

/// Flattened entries of one category: `{category}_{key}` columns plus `{category}_total`
pub type FlattenedCategory = Record;

/// Running sum of a category. Stays integral until a real value or an overflow is seen.
#[derive(Debug, Clone, Copy)]
enum Total {
    Integer(i64),
    Real(f64),
}

impl Total {
    fn add(self, value: &Value) -> Self {
        match (self, value) {
            (Total::Integer(a), Value::Integer(b)) => match a.checked_add(*b) {
                Some(sum) => Total::Integer(sum),
                None => Total::Real(a as f64 + *b as f64),
            },
            (Total::Integer(a), Value::Real(b)) => Total::Real(a as f64 + b),
            (Total::Real(a), Value::Integer(b)) => Total::Real(a + *b as f64),
            (Total::Real(a), Value::Real(b)) => Total::Real(a + b),
            // counter values are checked numeric before they are summed
            (total, _) => total,
        }
    }

    fn into_value(self) -> Value {
        match self {
            Total::Integer(i) => Value::Integer(i),
            Total::Real(f) => Value::Real(f),
        }
    }
}

/// Flatten a counter mapping into `{prefix}_{key}` entries followed by `{prefix}_total`.
///
/// Entries keep the iteration order of `counters`. When `names` is given, keys are
/// replaced by their display names first; two codes sharing a display name collide and
/// the later value overwrites the earlier one, while the total still includes both.
pub fn flatten(
    counters: &Map<String, Json>,
    prefix: &str,
    names: Option<&NameTable>,
) -> Result<FlattenedCategory, NormalizeError> {
    let mut flattened = Record::with_capacity(counters.len() + 1);
    let mut total = Total::Integer(0);

    for (code, raw) in counters {
        let value = Value::counter_from_json(raw).ok_or_else(|| NormalizeError::InvalidCounterValue {
            category: prefix.to_string(),
            key: code.clone(),
            found: json_kind(raw),
        })?;
        total = total.add(&value);

        let key = match names {
            Some(table) => table.resolve(code),
            None => code.as_str(),
        };
        let column = format!("{}_{}", prefix, key);
        if let Some(previous) = flattened.insert(column.as_str(), value) {
            debug!(column = %column, code = %code, %previous, "counter column overwritten");
        }
    }

    flattened.insert(format!("{}_total", prefix), total.into_value());
    Ok(flattened)
}

/// Flatten one category of a player record.
///
/// An absent or null category counts as empty and still yields its total of zero, as does
/// an empty array (the API sends `[]` for some empty mappings).
pub fn flatten_category(
    category: &Category,
    raw: Option<&Json>,
    names: &NameTable,
) -> Result<FlattenedCategory, NormalizeError> {
    let names = category.resolve_names.then_some(names);

    match raw {
        None | Some(Json::Null) => flatten(&Map::new(), category.name, names),
        Some(Json::Array(items)) if items.is_empty() => flatten(&Map::new(), category.name, names),
        Some(Json::Object(counters)) => flatten(counters, category.name, names),
        Some(other) => Err(NormalizeError::InvalidCategory {
            category: category.name.to_string(),
            found: json_kind(other),
        }),
    }
}
