//! Dialect dispatch: a `SqlDialect` trait with ANSI-leaning defaults,
//! implemented by one zero-sized struct per target dialect, and a `Dialect`
//! enum that delegates to `&'static dyn SqlDialect`.

mod helpers;
mod mysql;
mod postgres;
mod sqlite;

use super::types::ColumnType;

/// The three SQL dialects this builder renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    Postgres,
    Mysql,
    Sqlite,
}

impl Dialect {
    fn driver(self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Postgres => &postgres::Postgres,
            Dialect::Mysql => &mysql::Mysql,
            Dialect::Sqlite => &sqlite::Sqlite,
        }
    }

    pub fn quote_identifier(self, name: &str) -> String {
        self.driver().quote_identifier(name)
    }

    /// The positional parameter placeholder for the `index`-th bound value
    /// (1-based), per §4.3.
    pub fn placeholder(self, index: usize) -> String {
        self.driver().placeholder(index)
    }

    pub fn supports_returning(self) -> bool {
        self.driver().supports_returning()
    }

    pub fn supports_truncate(self) -> bool {
        self.driver().supports_truncate()
    }

    pub fn supports_modify_column(self) -> bool {
        self.driver().supports_modify_column()
    }

    pub fn supports_locking_clause(self) -> bool {
        self.driver().supports_locking_clause()
    }

    pub fn supports_nulls_ordering(self) -> bool {
        self.driver().supports_nulls_ordering()
    }

    pub fn supports_cascade_restrict(self) -> bool {
        self.driver().supports_cascade_restrict()
    }

    pub fn supports_add_foreign_key(self) -> bool {
        self.driver().supports_add_foreign_key()
    }

    pub fn supports_if_exists(self) -> bool {
        self.driver().supports_if_exists()
    }

    pub fn supports_parenthesized_union(self) -> bool {
        self.driver().supports_parenthesized_union()
    }

    pub fn emit_column_type(self, ty: &ColumnType, auto_increment: bool) -> String {
        self.driver().emit_column_type(ty, auto_increment)
    }

    /// Trailing column-definition fragment for auto-increment, if the
    /// dialect expresses it as a suffix rather than folding it into the
    /// type name (e.g. MySQL's `AUTO_INCREMENT`).
    pub fn auto_increment_suffix(self, ty: &ColumnType) -> Option<&'static str> {
        self.driver().auto_increment_suffix(ty)
    }
}

/// Per-dialect rendering behaviour. Default methods encode ANSI-ish
/// behaviour shared by at least two of the three target dialects; each
/// dialect struct overrides only what actually differs.
pub trait SqlDialect: Sync {
    fn quote_identifier(&self, name: &str) -> String {
        helpers::quote_double(name)
    }

    fn placeholder(&self, index: usize) -> String {
        format!("${index}")
    }

    fn supports_returning(&self) -> bool {
        true
    }

    fn supports_truncate(&self) -> bool {
        true
    }

    fn supports_modify_column(&self) -> bool {
        true
    }

    fn supports_locking_clause(&self) -> bool {
        true
    }

    fn supports_nulls_ordering(&self) -> bool {
        true
    }

    fn supports_cascade_restrict(&self) -> bool {
        true
    }

    fn supports_add_foreign_key(&self) -> bool {
        true
    }

    fn supports_if_exists(&self) -> bool {
        true
    }

    fn supports_parenthesized_union(&self) -> bool {
        true
    }

    fn emit_column_type(&self, ty: &ColumnType, auto_increment: bool) -> String;

    fn auto_increment_suffix(&self, ty: &ColumnType) -> Option<&'static str> {
        let _ = ty;
        None
    }
}
