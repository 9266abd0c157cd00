//! CSV payload parsing.

use std::collections::{HashMap, HashSet};

use csv::ReaderBuilder;
use tabload_table::Table;
use tracing::debug;

use crate::error::FetchError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse a CSV payload into a table.
///
/// The first record is the header. Records shorter than the header are
/// padded with missing values; longer records are rejected. Column types are
/// inferred per column.
pub fn parse_csv(payload: &[u8]) -> Result<Table, FetchError> {
    let payload = payload.strip_prefix(UTF8_BOM).unwrap_or(payload);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(payload);

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(FetchError::Empty);
    }
    let headers = header_labels(raw_headers.iter());
    let width = headers.len();

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            return Err(FetchError::ExtraFields {
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }
        let mut cells: Vec<String> = record.iter().map(str::to_string).collect();
        cells.resize(width, String::new());
        records.push(cells);
    }

    debug!("Parsed {} rows across {} columns", records.len(), width);
    Ok(Table::from_text(headers, records)?)
}

/// Fill in empty labels and de-duplicate repeated ones.
///
/// Empty labels become `Unnamed: <index>`; the second and later copies of a
/// label get `.1`, `.2`, ... suffixes.
fn header_labels<'a, I>(raw: I) -> Vec<String>
where
    I: Iterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut labels = Vec::new();

    for (idx, label) in raw.enumerate() {
        let base = if label.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            label.to_string()
        };

        let count = counts.entry(base.clone()).or_insert(0);
        let mut name = base.clone();
        while seen.contains(&name) {
            *count += 1;
            name = format!("{}.{}", base, count);
        }

        seen.insert(name.clone());
        labels.push(name);
    }

    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabload_table::{ColumnType, Value};

    const TITANIC_HEAD: &str = "\
PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked
1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S
2,1,1,\"Cumings, Mrs. John Bradley (Florence Briggs Thayer)\",female,38,1,0,PC 17599,71.2833,C85,C
6,0,3,\"Moran, Mr. James\",male,,0,0,330877,8.4583,,Q
";

    #[test]
    fn test_parse_titanic_sample() {
        let table = parse_csv(TITANIC_HEAD.as_bytes()).unwrap();

        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_count(), 12);
        assert_eq!(table.column_names()[0], "PassengerId");

        let ty = |name: &str| {
            table
                .columns()
                .iter()
                .find(|c| c.name == name)
                .map(|c| c.ty)
                .unwrap()
        };
        assert_eq!(ty("PassengerId"), ColumnType::Integer);
        assert_eq!(ty("Age"), ColumnType::Float);
        assert_eq!(ty("Name"), ColumnType::Text);
        assert_eq!(ty("Cabin"), ColumnType::Text);
        assert_eq!(table.rows()[0][3], Value::Text("Braund, Mr. Owen Harris".into()));
        assert_eq!(table.rows()[2][5], Value::Null);
    }

    #[test]
    fn test_bom_is_stripped() {
        let table = parse_csv(b"\xEF\xBB\xBFid,name\n1,a\n").unwrap();
        assert_eq!(table.column_names(), vec!["id", "name"]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse_csv(b"a,b,c\n1,2\n").unwrap();
        assert_eq!(table.rows()[0][2], Value::Null);
    }

    #[test]
    fn test_long_rows_are_rejected() {
        let err = parse_csv(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(
            err,
            FetchError::ExtraFields {
                line: 2,
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_empty_payload() {
        assert!(matches!(parse_csv(b"").unwrap_err(), FetchError::Empty));
    }

    #[test]
    fn test_header_only_payload() {
        let table = parse_csv(b"Name,Age\n").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_names(), vec!["Name", "Age"]);
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let err = parse_csv(b"a\n\xff\xfe\n").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_header_labels() {
        let labels = header_labels(["", "Fare", "Fare", "Fare.1", "Fare"].into_iter());
        assert_eq!(labels, vec!["Unnamed: 0", "Fare", "Fare.1", "Fare.1.1", "Fare.2"]);
    }
}
