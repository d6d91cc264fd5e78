//! SQLite has no counterpart in the teacher's dialect set; this is authored
//! fresh from SQLite's type-affinity rules and `sqlparser`'s SQLite grammar.

use super::helpers::{emit_sized, quote_double};
use super::SqlDialect;
use crate::sql::types::ColumnType;

pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn quote_identifier(&self, name: &str) -> String {
        quote_double(name)
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_truncate(&self) -> bool {
        false
    }

    fn supports_modify_column(&self) -> bool {
        false
    }

    fn supports_locking_clause(&self) -> bool {
        false
    }

    fn supports_cascade_restrict(&self) -> bool {
        false
    }

    fn supports_add_foreign_key(&self) -> bool {
        false
    }

    fn supports_parenthesized_union(&self) -> bool {
        false
    }

    fn emit_column_type(&self, ty: &ColumnType, auto_increment: bool) -> String {
        if auto_increment {
            // AUTOINCREMENT is only legal on an INTEGER PRIMARY KEY column.
            return "integer".to_string();
        }
        match ty {
            ColumnType::Char(n) => emit_sized("char", *n),
            ColumnType::String(n) => emit_sized("varchar", *n),
            ColumnType::Text => "text".to_string(),
            ColumnType::TinyInt
            | ColumnType::SmallInt
            | ColumnType::Int
            | ColumnType::BigInt
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => "integer".to_string(),
            ColumnType::Float => "float".to_string(),
            ColumnType::Double => "double".to_string(),
            ColumnType::Decimal(_) => "real".to_string(),
            ColumnType::DateTime | ColumnType::Timestamp => "datetime_text".to_string(),
            ColumnType::TimestampTz => "timestamp_with_timezone_text".to_string(),
            ColumnType::Date => "date_text".to_string(),
            ColumnType::Time => "time_text".to_string(),
            ColumnType::Blob => "blob".to_string(),
            ColumnType::Boolean => "boolean".to_string(),
            ColumnType::Json => "json_text".to_string(),
            ColumnType::JsonB => "jsonb_text".to_string(),
            ColumnType::Uuid => "uuid_text".to_string(),
        }
    }

    fn auto_increment_suffix(&self, ty: &ColumnType) -> Option<&'static str> {
        let _ = ty;
        Some("AUTOINCREMENT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_variants_collapse_to_one_affinity() {
        assert_eq!(Sqlite.emit_column_type(&ColumnType::TinyInt, false), "integer");
        assert_eq!(Sqlite.emit_column_type(&ColumnType::BigUnsigned, false), "integer");
    }

    #[test]
    fn temporal_types_are_text_affinity() {
        assert_eq!(Sqlite.emit_column_type(&ColumnType::Date, false), "date_text");
        assert_eq!(
            Sqlite.emit_column_type(&ColumnType::TimestampTz, false),
            "timestamp_with_timezone_text"
        );
    }

    #[test]
    fn decimal_has_no_fixed_point_affinity() {
        assert_eq!(Sqlite.emit_column_type(&ColumnType::Decimal(Some((10, 2))), false), "real");
    }

    #[test]
    fn auto_increment_forces_integer_type() {
        assert_eq!(Sqlite.emit_column_type(&ColumnType::BigInt, true), "integer");
        assert_eq!(Sqlite.auto_increment_suffix(&ColumnType::BigInt), Some("AUTOINCREMENT"));
    }

    #[test]
    fn lacks_truncate_and_post_hoc_foreign_keys() {
        assert!(!Sqlite.supports_truncate());
        assert!(!Sqlite.supports_add_foreign_key());
    }

    #[test]
    fn supports_native_nulls_ordering() {
        assert!(Sqlite.supports_nulls_ordering());
    }
}
