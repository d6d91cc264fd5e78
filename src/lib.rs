//! # sql-forge
//!
//! A programmatic, multi-dialect SQL statement builder for Postgres, MySQL
//! and SQLite.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │   Facades: Query / Table / Index / ForeignKey (§6)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [builder methods]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Statement model: Select / Insert / Update / Delete /   │
//! │   CreateTable / AlterTable / ...                         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Expr / Condition algebra]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Expression + condition trees (§4.4, §4.5)               │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [to_tokens, dialect-dispatched]
//! ┌─────────────────────────────────────────────────────────┐
//! │   TokenStream + RenderCtx → SQL text (+ bind params)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Every statement builder exposes `to_string(dialect)` for inline literal
//! rendering and `build(dialect)` for a parameterised statement alongside
//! its positional bind values.

pub mod sql;

pub use sql::condition;
pub use sql::ddl;
pub use sql::dialect;
pub use sql::dml;
pub use sql::error;
pub use sql::expr;
pub use sql::query;
pub use sql::token;
pub use sql::types;
pub use sql::value;

/// Re-exports for convenient `use sql_forge::prelude::*;` usage.
pub mod prelude {
    pub use crate::condition::{ConditionNode, Condition, ConjType};
    pub use crate::ddl::{
        AlterAction, AlterTable, ColumnConstraint, ColumnDef, CreateIndex, CreateTable,
        DropIndex, DropTable, ForeignKey, ForeignKeyCreate, ForeignKeyDrop, Index, IndexColumn,
        IndexMethod, ReferentialAction, RenameTable, Table, TableConstraint, Truncate,
    };
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::dml::{Delete, Insert, OnConflict, Update};
    pub use crate::error::{Error, Result};
    pub use crate::expr::{
        avg, case, coalesce, col, count, count_distinct, count_star, exists, if_null, lit,
        lit_bool, lit_date, lit_datetime, lit_float, lit_int, lit_null, lit_str, lit_time, max,
        min, sum, table_col, BinOp, Expr, ExprExt, LogicalOp,
    };
    pub use crate::query::{
        JoinType, Lock, LockStrength, LockWait, NullsOrder, Query, Select, SortDir, TableRef,
        UnionType,
    };
    pub use crate::token::{RenderCtx, Token, TokenStream};
    pub use crate::types::ColumnType;
    pub use crate::value::Value;
}

pub use dialect::Dialect;
pub use expr::{col, count_star, lit_bool, lit_int, lit_str, table_col, Expr, ExprExt};
pub use query::{Query, Select};
pub use value::Value;
