use tracing::debug;

use super::{FlattenedCategory, Record};

/// Merge scalar fields and flattened categories into one row.
///
/// Scalars come first, then each category in the given order. A key emitted again by a
/// later category replaces the earlier value and keeps its column position.
pub fn assemble<I, S>(scalars: Record, categories: I) -> Record
where
    I: IntoIterator<Item = (S, FlattenedCategory)>,
    S: AsRef<str>,
{
    let mut row = scalars;

    for (category, entries) in categories {
        for (column, value) in entries {
            if let Some(previous) = row.insert(column.as_str(), value) {
                debug!(
                    category = category.as_ref(),
                    column = %column,
                    %previous,
                    "column overwritten by later category"
                );
            }
        }
    }

    row
}
