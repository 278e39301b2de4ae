use crate::schema::{column_affinity, Affinity, TargetSchema, DATE_COLUMN, UID_COLUMN};

/// Quote an SQL identifier
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Generate CREATE TABLE SQL for a target schema
pub fn generate_create_table(table: &str, schema: &TargetSchema) -> String {
    let mut sql = format!("CREATE TABLE {} (\n", quote_ident(table));

    let columns: Vec<String> = schema
        .iter()
        .map(|name| {
            let sql_type = match column_affinity(name) {
                Affinity::Text => "TEXT",
                Affinity::Numeric => "NUMERIC",
            };
            format!("    {} {}", quote_ident(name), sql_type)
        })
        .collect();

    sql.push_str(&columns.join(",\n"));
    sql.push_str("\n)");

    sql
}

/// Generate CREATE INDEX statements for player/date lookups
pub fn generate_indexes(table: &str, schema: &TargetSchema) -> Vec<String> {
    [UID_COLUMN, DATE_COLUMN]
        .iter()
        .filter(|column| schema.contains(column))
        .map(|column| {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {}({})",
                quote_ident(&format!("idx_{}_{}", table, column.to_lowercase())),
                quote_ident(table),
                quote_ident(column)
            )
        })
        .collect()
}

/// Generate the parameterized INSERT statement for a target schema
pub fn generate_insert(table: &str, schema: &TargetSchema) -> String {
    let columns: Vec<String> = schema.iter().map(quote_ident).collect();
    let placeholders: Vec<&str> = columns.iter().map(|_| "?").collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        columns.join(", "),
        placeholders.join(", ")
    )
}
