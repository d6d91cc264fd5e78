//! Error taxonomy for SQL rendering.
//!
//! Setter methods on statement builders are total; nothing fails until
//! render time. `to_string`/`build` return `Result<_, Error>`.

use crate::sql::dialect::Dialect;

/// Errors surfaced while rendering a statement to SQL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The builder is missing a piece required to render valid SQL, e.g. an
    /// INSERT with no target table.
    #[error("invalid builder state: {0}")]
    InvalidBuilderState(String),

    /// The requested feature has no rendering in this dialect.
    #[error("{feature} is not supported for {dialect:?}")]
    UnsupportedForDialect {
        feature: &'static str,
        dialect: Dialect,
    },

    /// `IN ()` with an empty list was requested; this is not meaningful SQL.
    #[error("IN () with an empty list cannot be rendered")]
    EmptyInList,

    /// A non-scalar value was supplied where a scalar was required.
    #[error("type mismatch: expected a scalar value, found {0}")]
    TypeMismatch(String),
}

pub type Result<T> = std::result::Result<T, Error>;
