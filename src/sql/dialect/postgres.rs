use super::helpers::{emit_decimal, emit_sized, quote_double};
use super::SqlDialect;
use crate::sql::types::ColumnType;

pub struct Postgres;

impl SqlDialect for Postgres {
    fn quote_identifier(&self, name: &str) -> String {
        quote_double(name)
    }

    fn emit_column_type(&self, ty: &ColumnType, auto_increment: bool) -> String {
        if auto_increment {
            return match ty {
                ColumnType::BigInt | ColumnType::BigUnsigned => "bigserial".to_string(),
                ColumnType::TinyInt | ColumnType::SmallInt | ColumnType::TinyUnsigned | ColumnType::SmallUnsigned => {
                    "smallserial".to_string()
                }
                _ => "serial".to_string(),
            };
        }
        match ty {
            ColumnType::Char(n) => emit_sized("char", *n),
            ColumnType::String(n) => emit_sized("varchar", *n),
            ColumnType::Text => "text".to_string(),
            ColumnType::TinyInt | ColumnType::SmallInt => "smallint".to_string(),
            ColumnType::Int => "integer".to_string(),
            ColumnType::BigInt => "bigint".to_string(),
            ColumnType::TinyUnsigned | ColumnType::SmallUnsigned => "smallint".to_string(),
            ColumnType::Unsigned => "integer".to_string(),
            ColumnType::BigUnsigned => "bigint".to_string(),
            ColumnType::Float => "real".to_string(),
            ColumnType::Double => "double precision".to_string(),
            ColumnType::Decimal(p) => emit_decimal("decimal", *p),
            ColumnType::DateTime | ColumnType::Timestamp => "timestamp without time zone".to_string(),
            ColumnType::TimestampTz => "timestamp with time zone".to_string(),
            ColumnType::Date => "date".to_string(),
            ColumnType::Time => "time".to_string(),
            ColumnType::Blob => "bytea".to_string(),
            ColumnType::Boolean => "bool".to_string(),
            ColumnType::Json => "json".to_string(),
            ColumnType::JsonB => "jsonb".to_string(),
            ColumnType::Uuid => "uuid".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_increment_picks_serial_bigserial_or_smallserial() {
        assert_eq!(Postgres.emit_column_type(&ColumnType::Int, true), "serial");
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::BigInt, true),
            "bigserial"
        );
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::SmallInt, true),
            "smallserial"
        );
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::TinyInt, true),
            "smallserial"
        );
    }

    #[test]
    fn decimal_with_and_without_precision() {
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::Decimal(Some((10, 2))), false),
            "decimal(10, 2)"
        );
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::Decimal(None), false),
            "decimal"
        );
    }

    #[test]
    fn timestamptz_differs_from_timestamp() {
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::Timestamp, false),
            "timestamp without time zone"
        );
        assert_eq!(
            Postgres.emit_column_type(&ColumnType::TimestampTz, false),
            "timestamp with time zone"
        );
    }
}
