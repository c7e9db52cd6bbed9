use crate::schema::TableSchema;

/// SQLite keywords, sorted. Any of them used bare as a column name can break the DDL.
const KEYWORDS: &[&str] = &[
    "abort", "action", "add", "after", "all", "alter", "always", "analyze", "and", "as",
    "asc", "attach", "autoincrement", "before", "begin", "between", "by", "cascade", "case",
    "cast", "check", "collate", "column", "commit", "conflict", "constraint", "create",
    "cross", "current", "current_date", "current_time", "current_timestamp", "database",
    "default", "deferrable", "deferred", "delete", "desc", "detach", "distinct", "do",
    "drop", "each", "else", "end", "escape", "except", "exclude", "exclusive", "exists",
    "explain", "fail", "filter", "first", "following", "for", "foreign", "from", "full",
    "generated", "glob", "group", "groups", "having", "if", "ignore", "immediate", "in",
    "index", "indexed", "initially", "inner", "insert", "instead", "intersect", "into",
    "is", "isnull", "join", "key", "last", "left", "like", "limit", "match", "materialized",
    "natural", "no", "not", "nothing", "notnull", "null", "nulls", "of", "offset", "on",
    "or", "order", "others", "outer", "over", "partition", "plan", "pragma", "preceding",
    "primary", "query", "raise", "range", "recursive", "references", "regexp", "reindex",
    "release", "rename", "replace", "restrict", "returning", "right", "rollback", "row",
    "rows", "savepoint", "select", "set", "table", "temp", "temporary", "then", "ties",
    "to", "transaction", "trigger", "unbounded", "union", "unique", "update", "using",
    "vacuum", "values", "view", "virtual", "when", "where", "window", "with", "without",
];

/// Quote an identifier unless it is a plain lowercase-safe SQL name
pub fn quote_ident(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && KEYWORDS
            .binary_search(&name.to_ascii_lowercase().as_str())
            .is_err();

    if plain {
        name.to_string()
    } else {
        format!("\"{}\"", name.replace('"', "\"\""))
    }
}

fn ident_list(names: &[String]) -> String {
    names
        .iter()
        .map(|n| quote_ident(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Generate CREATE TABLE IF NOT EXISTS SQL for a table schema.
///
/// The table is created in the `football` schema; foreign keys name their parent
/// unqualified, which SQLite resolves within the same schema.
pub fn generate_create_table(schema: &TableSchema) -> String {
    let mut sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n",
        qualified(schema)
    );
    let mut lines = Vec::new();

    for col in &schema.columns {
        let null_constraint = if !col.nullable { " NOT NULL" } else { "" };
        lines.push(format!(
            "    {} {}{}",
            quote_ident(&col.name),
            col.col_type.sql(),
            null_constraint
        ));
    }

    if !schema.primary_key.is_empty() {
        lines.push(format!("    PRIMARY KEY ({})", ident_list(&schema.primary_key)));
    }

    for fk in &schema.foreign_keys {
        lines.push(format!(
            "    FOREIGN KEY ({}) REFERENCES {} ({})",
            ident_list(&fk.columns),
            quote_ident(&fk.references_table),
            ident_list(&fk.references_columns)
        ));
    }

    sql.push_str(&lines.join(",\n"));
    sql.push_str("\n)");

    sql
}

fn qualified(schema: &TableSchema) -> String {
    format!(
        "{}.{}",
        crate::schema::SCHEMA_NAME,
        quote_ident(&schema.name)
    )
}
