//! Per-column type inference for raw CSV cells.

use crate::table::{ColumnType, Value};

/// Cell contents read as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const TRUE_TOKENS: &[&str] = &["True", "TRUE", "true"];
const FALSE_TOKENS: &[&str] = &["False", "FALSE", "false"];

/// Whether a raw cell is a missing value.
pub fn is_na(raw: &str) -> bool {
    NA_TOKENS.contains(&raw)
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if TRUE_TOKENS.contains(&raw) {
        Some(true)
    } else if FALSE_TOKENS.contains(&raw) {
        Some(false)
    } else {
        None
    }
}

fn parse_int(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.trim().parse().ok()
}

/// Infer the narrowest column type that fits every non-missing cell.
///
/// Integer columns holding missing values widen to `Float`, and a column
/// with no values at all is `Float`.
pub fn infer_column_type<'a, I>(cells: I) -> ColumnType
where
    I: IntoIterator<Item = &'a str>,
{
    let mut has_missing = false;
    let mut has_values = false;
    let mut all_bool = true;
    let mut all_int = true;
    let mut all_float = true;

    for cell in cells {
        if is_na(cell) {
            has_missing = true;
            continue;
        }
        has_values = true;

        if all_bool && parse_bool(cell).is_none() {
            all_bool = false;
        }
        if all_int && parse_int(cell).is_none() {
            all_int = false;
        }
        if all_float && parse_float(cell).is_none() {
            all_float = false;
        }
        if !all_bool && !all_float {
            return ColumnType::Text;
        }
    }

    if !has_values {
        return ColumnType::Float;
    }

    if all_bool {
        ColumnType::Boolean
    } else if all_int && !has_missing {
        ColumnType::Integer
    } else if all_float {
        ColumnType::Float
    } else {
        ColumnType::Text
    }
}

/// Convert a raw cell into a value of the given column type.
///
/// Returns `None` when the cell does not fit the type.
pub fn parse_value(raw: &str, ty: ColumnType) -> Option<Value> {
    if is_na(raw) {
        return Some(Value::Null);
    }

    match ty {
        ColumnType::Boolean => parse_bool(raw).map(Value::Boolean),
        ColumnType::Integer => parse_int(raw).map(Value::Integer),
        ColumnType::Float => parse_float(raw).map(Value::Float),
        ColumnType::Text => Some(Value::Text(raw.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_column() {
        assert_eq!(infer_column_type(["1", "2", "-3", "+4"]), ColumnType::Integer);
    }

    #[test]
    fn test_integer_with_missing_widens_to_float() {
        assert_eq!(infer_column_type(["1", "", "3"]), ColumnType::Float);
        assert_eq!(infer_column_type(["1", "NA", "3"]), ColumnType::Float);
    }

    #[test]
    fn test_float_column() {
        assert_eq!(infer_column_type(["7.25", "71.2833", "8"]), ColumnType::Float);
        assert_eq!(infer_column_type(["1e3", ".5"]), ColumnType::Float);
    }

    #[test]
    fn test_boolean_column_keeps_missing() {
        assert_eq!(infer_column_type(["True", "false", ""]), ColumnType::Boolean);
        assert_eq!(parse_value("", ColumnType::Boolean), Some(Value::Null));
    }

    #[test]
    fn test_mixed_column_is_text() {
        assert_eq!(infer_column_type(["1", "C85", "2"]), ColumnType::Text);
        assert_eq!(infer_column_type(["true", "1"]), ColumnType::Text);
    }

    #[test]
    fn test_empty_column_is_float() {
        assert_eq!(infer_column_type(Vec::<&str>::new()), ColumnType::Float);
        assert_eq!(infer_column_type(["", "NaN", "null"]), ColumnType::Float);
    }

    #[test]
    fn test_integer_overflow_falls_back_to_float() {
        assert_eq!(
            infer_column_type(["99999999999999999999"]),
            ColumnType::Float
        );
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(parse_value(" 42 ", ColumnType::Integer), Some(Value::Integer(42)));
        assert_eq!(parse_value("S", ColumnType::Text), Some(Value::Text("S".into())));
        assert_eq!(parse_value("N/A", ColumnType::Text), Some(Value::Null));
        assert_eq!(parse_value("abc", ColumnType::Float), None);
    }

    #[test]
    fn test_whitespace_is_not_missing() {
        assert!(!is_na(" "));
        assert_eq!(parse_value(" ", ColumnType::Text), Some(Value::Text(" ".into())));
    }
}
