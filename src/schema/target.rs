use std::collections::HashSet;

use super::categories::{Category, ALL_CATEGORIES};
use super::scalars::SCALAR_COLUMNS;
use crate::names::NameTable;

/// Ordered column list of a sink. Fixed once the sink exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSchema {
    columns: Vec<String>,
}

impl TargetSchema {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Header used when a sink is bootstrapped: scalar columns, then for each category
    /// its published counter columns followed by its total
    pub fn builtin(names: &NameTable) -> Self {
        Self::for_categories(ALL_CATEGORIES, names)
    }

    pub fn for_categories(categories: &[&Category], names: &NameTable) -> Self {
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        let mut push = |column: String| {
            if seen.insert(column.clone()) {
                columns.push(column);
            }
        };

        for scalar in SCALAR_COLUMNS {
            push(scalar.name.to_string());
        }

        for category in categories {
            for &code in category.known_codes {
                let key = if category.resolve_names {
                    names.resolve(code)
                } else {
                    code
                };
                push(format!("{}_{}", category.name, key));
            }
            push(category.total_column());
        }

        Self { columns }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(String::as_str)
    }
}

impl AsRef<[String]> for TargetSchema {
    fn as_ref(&self) -> &[String] {
        &self.columns
    }
}
