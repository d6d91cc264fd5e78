//! Shared rendering helpers used by more than one dialect implementation.

/// Quote an identifier with doubled double-quotes (Postgres, SQLite).
pub fn quote_double(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote an identifier with doubled backticks (MySQL).
pub fn quote_backtick(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Render a fixed-width integer/decimal type name with optional precision
/// args, e.g. `emit_sized("DECIMAL", Some((10, 2)))` -> `DECIMAL(10, 2)`.
pub fn emit_sized(base: &str, size: Option<u32>) -> String {
    match size {
        Some(n) => format!("{base}({n})"),
        None => base.to_string(),
    }
}

pub fn emit_decimal(base: &str, precision: Option<(u16, u16)>) -> String {
    match precision {
        Some((p, s)) => format!("{base}({p}, {s})"),
        None => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_quote_escapes_embedded_quote() {
        assert_eq!(quote_double("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn backtick_escapes_embedded_backtick() {
        assert_eq!(quote_backtick("a`b"), "`a``b`");
    }

    #[test]
    fn emit_sized_with_and_without_arg() {
        assert_eq!(emit_sized("VARCHAR", Some(255)), "VARCHAR(255)");
        assert_eq!(emit_sized("TEXT", None), "TEXT");
    }
}
