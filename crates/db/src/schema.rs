//! DDL rendering for destination relations.

use tabload_table::{Column, ColumnType};

/// PostgreSQL column type used for an inferred column type.
pub fn sql_type(ty: ColumnType) -> &'static str {
    match ty {
        ColumnType::Boolean => "BOOLEAN",
        ColumnType::Integer => "BIGINT",
        ColumnType::Float => "DOUBLE PRECISION",
        ColumnType::Text => "TEXT",
    }
}

/// Quote an identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}

/// Render `CREATE TABLE` for the given columns, in order.
pub fn create_table_sql(table: &str, columns: &[Column]) -> String {
    let defs: Vec<String> = columns
        .iter()
        .map(|c| format!("{} {}", quote_ident(&c.name), sql_type(c.ty)))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), defs.join(", "))
}

/// `INSERT INTO ... (cols) ` prefix, ready for a `VALUES` list.
pub fn insert_prefix(table: &str, columns: &[Column]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(&c.name)).collect();
    format!("INSERT INTO {} ({}) ", quote_ident(table), names.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("survived"), "\"survived\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(quote_ident("unnamed:_0"), "\"unnamed:_0\"");
    }

    #[test]
    fn test_create_table_keeps_column_order() {
        let columns = vec![
            Column::new("passengerid", ColumnType::Integer),
            Column::new("survived", ColumnType::Boolean),
            Column::new("age", ColumnType::Float),
            Column::new("name", ColumnType::Text),
        ];
        assert_eq!(
            create_table_sql("covid_cases_nyc", &columns),
            "CREATE TABLE \"covid_cases_nyc\" (\"passengerid\" BIGINT, \"survived\" BOOLEAN, \
             \"age\" DOUBLE PRECISION, \"name\" TEXT)"
        );
    }

    #[test]
    fn test_drop_and_insert() {
        assert_eq!(drop_table_sql("t"), "DROP TABLE IF EXISTS \"t\"");
        let columns = vec![Column::new("a", ColumnType::Text), Column::new("b", ColumnType::Text)];
        assert_eq!(insert_prefix("t", &columns), "INSERT INTO \"t\" (\"a\", \"b\") ");
    }
}
