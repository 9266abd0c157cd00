//! Column label normalization.

/// Normalize a column label into a destination column name.
///
/// Strips surrounding whitespace, replaces each space with an underscore and
/// lowercases the result. Applying it twice yields the same name.
pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().replace(' ', "_").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "PassengerId",
        " Passenger Id ",
        "Ticket Number",
        "  SibSp",
        "Parch\t",
        "Home  Dest",
        "already_clean",
        "",
        "   ",
        "Unnamed: 0",
        "Ünïcode Näme",
        "MiXeD CaSe 42",
    ];

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize_column_name("PassengerId"), "passengerid");
        assert_eq!(normalize_column_name(" Passenger Id "), "passenger_id");
        assert_eq!(normalize_column_name("Home  Dest"), "home__dest");
        assert_eq!(normalize_column_name("   "), "");
        assert_eq!(normalize_column_name("Unnamed: 0"), "unnamed:_0");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in SAMPLES {
            let once = normalize_column_name(raw);
            assert_eq!(normalize_column_name(&once), once, "label {raw:?}");
        }
    }

    #[test]
    fn test_normalized_has_no_spaces_or_uppercase() {
        for raw in SAMPLES {
            let name = normalize_column_name(raw);
            assert!(!name.contains(' '), "label {raw:?} -> {name:?}");
            assert!(!name.chars().any(char::is_uppercase), "label {raw:?} -> {name:?}");
        }
    }
}
