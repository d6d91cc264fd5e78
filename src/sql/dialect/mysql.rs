use super::helpers::{emit_decimal, emit_sized, quote_backtick};
use super::SqlDialect;
use crate::sql::types::ColumnType;

pub struct Mysql;

impl SqlDialect for Mysql {
    fn quote_identifier(&self, name: &str) -> String {
        quote_backtick(name)
    }

    fn placeholder(&self, _index: usize) -> String {
        "?".to_string()
    }

    fn supports_returning(&self) -> bool {
        false
    }

    fn supports_nulls_ordering(&self) -> bool {
        false
    }

    fn emit_column_type(&self, ty: &ColumnType, _auto_increment: bool) -> String {
        match ty {
            ColumnType::Char(n) => emit_sized("char", *n),
            ColumnType::String(n) => emit_sized("varchar", n.or(Some(255))),
            ColumnType::Text => "text".to_string(),
            ColumnType::TinyInt => "tinyint".to_string(),
            ColumnType::SmallInt => "smallint".to_string(),
            ColumnType::Int => "int".to_string(),
            ColumnType::BigInt => "bigint".to_string(),
            ColumnType::TinyUnsigned => "tinyint UNSIGNED".to_string(),
            ColumnType::SmallUnsigned => "smallint UNSIGNED".to_string(),
            ColumnType::Unsigned => "int UNSIGNED".to_string(),
            ColumnType::BigUnsigned => "bigint UNSIGNED".to_string(),
            ColumnType::Float => "float".to_string(),
            ColumnType::Double => "double".to_string(),
            ColumnType::Decimal(p) => emit_decimal("decimal", *p),
            ColumnType::DateTime => "datetime".to_string(),
            ColumnType::Timestamp | ColumnType::TimestampTz => "timestamp".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::Time => "time".to_string(),
            ColumnType::Blob => "blob".to_string(),
            ColumnType::Boolean => "bool".to_string(),
            ColumnType::Json | ColumnType::JsonB => "json".to_string(),
            ColumnType::Uuid => "binary(16)".to_string(),
        }
    }

    fn auto_increment_suffix(&self, ty: &ColumnType) -> Option<&'static str> {
        if ty.is_integer() {
            Some("AUTO_INCREMENT")
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_always_question_mark() {
        assert_eq!(Mysql.placeholder(1), "?");
        assert_eq!(Mysql.placeholder(7), "?");
    }

    #[test]
    fn string_defaults_to_255() {
        assert_eq!(
            Mysql.emit_column_type(&ColumnType::String(None), false),
            "varchar(255)"
        );
    }

    #[test]
    fn uuid_has_no_native_type() {
        assert_eq!(Mysql.emit_column_type(&ColumnType::Uuid, false), "binary(16)");
    }

    #[test]
    fn auto_increment_is_a_suffix_not_a_type_change() {
        assert_eq!(Mysql.emit_column_type(&ColumnType::Int, true), "int");
        assert_eq!(
            Mysql.auto_increment_suffix(&ColumnType::Int),
            Some("AUTO_INCREMENT")
        );
    }
}
