//! `Insert`/`Update`/`Delete` — the DML statement builders (§3, §4.7, §4.8).

use super::condition::Condition;
use super::dialect::Dialect;
use super::error::{Error, Result};
use super::expr::Expr;
use super::query::{Select, TableRef};
use super::token::{RenderCtx, TokenStream};
use super::value::Value;

/// `ON CONFLICT (...) DO NOTHING` / `INSERT OR IGNORE`, narrowed to the
/// single-column do-nothing form; richer upsert (`DO UPDATE SET ...`) is out
/// of scope (§4.7, Non-goals).
#[derive(Debug, Clone)]
pub struct OnConflict {
    columns: Vec<String>,
}

impl OnConflict {
    pub fn columns(columns: Vec<impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// RETURNING clause state: omitted, `RETURNING *`, or `RETURNING <cols,>`.
/// Setting `returning`/`returning_all` replaces any prior state rather than
/// accumulating (§3, §4.7).
#[derive(Debug, Clone)]
pub enum Returning {
    None,
    All,
    Columns(Vec<Expr>),
}

impl Default for Returning {
    fn default() -> Self {
        Returning::None
    }
}

impl Returning {
    fn is_empty(&self) -> bool {
        matches!(self, Returning::None)
    }

    fn validate(&self) -> Result<()> {
        if let Returning::Columns(cols) = self {
            for e in cols {
                e.validate()?;
            }
        }
        Ok(())
    }

    fn to_tokens(&self, ctx: &mut RenderCtx, ts: &mut TokenStream) {
        match self {
            Returning::None => {}
            Returning::All => {
                ts.space().raw("RETURNING").space().raw("*");
            }
            Returning::Columns(cols) => {
                ts.space().raw("RETURNING").space();
                for (i, e) in cols.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&e.to_tokens(ctx));
                }
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Insert {
    table: Option<TableRef>,
    columns: Vec<String>,
    values: Vec<Vec<Expr>>,
    select_from: Option<Box<Select>>,
    on_conflict: Option<OnConflict>,
    returning: Returning,
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_table(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn columns(mut self, columns: Vec<impl Into<String>>) -> Self {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn values(mut self, row: Vec<Expr>) -> Self {
        self.values.push(row);
        self
    }

    /// `INSERT INTO table (cols) <select>`, mutually exclusive with
    /// `values` (§3, §4.7).
    pub fn select_from(mut self, select: Select) -> Self {
        self.select_from = Some(Box::new(select));
        self
    }

    pub fn on_conflict_do_nothing(mut self, on_conflict: OnConflict) -> Self {
        self.on_conflict = Some(on_conflict);
        self
    }

    /// Sets `RETURNING <cols,>`, replacing any prior RETURNING state (§4.7).
    pub fn returning(mut self, exprs: Vec<Expr>) -> Self {
        self.returning = Returning::Columns(exprs);
        self
    }

    /// Sets `RETURNING *`, replacing any prior RETURNING state (§4.7).
    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "INSERT requires a target table".to_string(),
            ));
        }
        if self.values.is_empty() && self.select_from.is_none() {
            return Err(Error::InvalidBuilderState(
                "INSERT requires either a row of values or a source SELECT".to_string(),
            ));
        }
        for row in &self.values {
            for e in row {
                e.validate()?;
            }
        }
        if let Some(select) = &self.select_from {
            select.validate()?;
        }
        self.returning.validate()?;
        Ok(())
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("INSERT INTO").space();
        if let Some(table) = &self.table {
            ts.ident(table.table.clone());
        }
        if !self.columns.is_empty() {
            ts.space().lparen();
            for (i, c) in self.columns.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.ident(c.clone());
            }
            ts.rparen();
        }
        if let Some(select) = &self.select_from {
            ts.space().append(&select.to_tokens(ctx));
        } else {
            ts.space().raw("VALUES").space();
            for (i, row) in self.values.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.lparen();
                for (j, e) in row.iter().enumerate() {
                    if j > 0 {
                        ts.comma().space();
                    }
                    ts.append(&e.to_tokens(ctx));
                }
                ts.rparen();
            }
        }
        if let Some(on_conflict) = &self.on_conflict {
            if ctx.dialect == Dialect::Mysql {
                // Expressed as `ON DUPLICATE KEY IGNORE`, with no target
                // column list (§4.7).
                ts.space().raw("ON DUPLICATE KEY IGNORE");
            } else {
                ts.space().raw("ON CONFLICT").space().lparen();
                for (i, c) in on_conflict.columns.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.ident(c.clone());
                }
                ts.rparen().space().raw("DO NOTHING");
            }
        }
        if !self.returning.is_empty() && ctx.dialect.supports_returning() {
            self.returning.to_tokens(ctx, &mut ts);
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate()?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(&mut ctx).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate()?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(&mut ctx).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Update {
    table: Option<TableRef>,
    assignments: Vec<(String, Expr)>,
    where_: Condition,
    limit: Option<u64>,
    returning: Returning,
}

impl Update {
    pub fn new() -> Self {
        Self {
            where_: Condition::all(),
            ..Default::default()
        }
    }

    pub fn table(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn set(mut self, column: impl Into<String>, value: Expr) -> Self {
        self.assignments.push((column.into(), value));
        self
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.where_ = self.where_.add(cond);
        self
    }

    /// Replaces the entire WHERE tree rather than appending to it (§4.5).
    pub fn cond_where(mut self, cond: Condition) -> Self {
        self.where_ = cond;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets `RETURNING <cols,>`, replacing any prior RETURNING state (§4.7).
    pub fn returning(mut self, exprs: Vec<Expr>) -> Self {
        self.returning = Returning::Columns(exprs);
        self
    }

    /// Sets `RETURNING *`, replacing any prior RETURNING state (§4.7).
    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "UPDATE requires a target table".to_string(),
            ));
        }
        if self.assignments.is_empty() {
            return Err(Error::InvalidBuilderState(
                "UPDATE requires at least one SET assignment".to_string(),
            ));
        }
        for (_, e) in &self.assignments {
            e.validate()?;
        }
        self.where_.validate()?;
        self.returning.validate()?;
        Ok(())
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("UPDATE").space();
        if let Some(table) = &self.table {
            ts.ident(table.table.clone());
        }
        ts.space().raw("SET").space();
        for (i, (column, value)) in self.assignments.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.ident(column.clone()).space().raw("=").space();
            ts.append(&value.to_tokens(ctx));
        }
        if !self.where_.is_empty() {
            ts.space().raw("WHERE").space();
            ts.append(&self.where_.to_tokens(ctx));
        }
        if let Some(limit) = self.limit {
            ts.space().raw("LIMIT").space().value(Value::Int(limit as i64));
        }
        if !self.returning.is_empty() && ctx.dialect.supports_returning() {
            self.returning.to_tokens(ctx, &mut ts);
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate()?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(&mut ctx).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate()?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(&mut ctx).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct Delete {
    table: Option<TableRef>,
    where_: Condition,
    limit: Option<u64>,
    returning: Returning,
}

impl Delete {
    pub fn new() -> Self {
        Self {
            where_: Condition::all(),
            ..Default::default()
        }
    }

    pub fn from_table(mut self, table: impl Into<TableRef>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn and_where(mut self, cond: Expr) -> Self {
        self.where_ = self.where_.add(cond);
        self
    }

    /// Replaces the entire WHERE tree rather than appending to it (§4.5).
    pub fn cond_where(mut self, cond: Condition) -> Self {
        self.where_ = cond;
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets `RETURNING <cols,>`, replacing any prior RETURNING state (§4.7).
    pub fn returning(mut self, exprs: Vec<Expr>) -> Self {
        self.returning = Returning::Columns(exprs);
        self
    }

    /// Sets `RETURNING *`, replacing any prior RETURNING state (§4.7).
    pub fn returning_all(mut self) -> Self {
        self.returning = Returning::All;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "DELETE requires a target table".to_string(),
            ));
        }
        self.where_.validate()?;
        self.returning.validate()?;
        Ok(())
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("DELETE FROM").space();
        if let Some(table) = &self.table {
            ts.ident(table.table.clone());
        }
        if !self.where_.is_empty() {
            ts.space().raw("WHERE").space();
            ts.append(&self.where_.to_tokens(ctx));
        }
        if let Some(limit) = self.limit {
            ts.space().raw("LIMIT").space().value(Value::Int(limit as i64));
        }
        if !self.returning.is_empty() && ctx.dialect.supports_returning() {
            self.returning.to_tokens(ctx, &mut ts);
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate()?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(&mut ctx).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate()?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(&mut ctx).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::expr::{col, lit_int, lit_str, ExprExt};

    #[test]
    fn renders_insert_with_returning() {
        let i = Insert::new()
            .into_table("users")
            .columns(vec!["id", "name"])
            .values(vec![lit_int(1), lit_str("ada")])
            .returning(vec![col("id")]);
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "INSERT INTO \"users\" (\"id\", \"name\") VALUES (1, 'ada') RETURNING \"id\""
        );
    }

    #[test]
    fn mysql_suppresses_returning() {
        let i = Insert::new()
            .into_table("users")
            .values(vec![lit_int(1)])
            .returning(vec![col("id")]);
        assert_eq!(
            i.to_string(Dialect::Mysql).unwrap(),
            "INSERT INTO `users` VALUES (1)"
        );
    }

    #[test]
    fn sqlite_on_conflict_matches_postgres_syntax() {
        let i = Insert::new()
            .into_table("users")
            .values(vec![lit_int(1)])
            .on_conflict_do_nothing(OnConflict::columns(vec!["id"]));
        assert_eq!(
            i.to_string(Dialect::Sqlite).unwrap(),
            "INSERT INTO \"users\" VALUES (1) ON CONFLICT (\"id\") DO NOTHING"
        );
    }

    #[test]
    fn mysql_on_conflict_is_on_duplicate_key_ignore() {
        let i = Insert::new()
            .into_table("users")
            .values(vec![lit_int(1)])
            .on_conflict_do_nothing(OnConflict::columns(vec!["id"]));
        assert_eq!(
            i.to_string(Dialect::Mysql).unwrap(),
            "INSERT INTO `users` VALUES (1) ON DUPLICATE KEY IGNORE"
        );
    }

    #[test]
    fn renders_insert_select_from() {
        let i = Insert::new()
            .into_table("archived_users")
            .columns(vec!["id", "name"])
            .select_from(Select::new().from("users").column(col("id")).column(col("name")));
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "INSERT INTO \"archived_users\" (\"id\", \"name\") SELECT \"id\", \"name\" FROM \"users\""
        );
    }

    #[test]
    fn postgres_on_conflict_do_nothing() {
        let i = Insert::new()
            .into_table("users")
            .values(vec![lit_int(1)])
            .on_conflict_do_nothing(OnConflict::columns(vec!["id"]));
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "INSERT INTO \"users\" VALUES (1) ON CONFLICT (\"id\") DO NOTHING"
        );
    }

    #[test]
    fn renders_update() {
        let u = Update::new()
            .table("users")
            .set("name", lit_str("ada"))
            .and_where(col("id").eq(lit_int(1)));
        assert_eq!(
            u.to_string(Dialect::Postgres).unwrap(),
            "UPDATE \"users\" SET \"name\" = 'ada' WHERE \"id\" = 1"
        );
    }

    #[test]
    fn renders_delete() {
        let d = Delete::new().from_table("users").and_where(col("id").eq(lit_int(1)));
        assert_eq!(
            d.to_string(Dialect::Postgres).unwrap(),
            "DELETE FROM \"users\" WHERE \"id\" = 1"
        );
    }

    #[test]
    fn update_and_delete_support_limit() {
        let u = Update::new().table("users").set("name", lit_str("ada")).limit(1);
        assert_eq!(
            u.to_string(Dialect::Mysql).unwrap(),
            "UPDATE `users` SET `name` = 'ada' LIMIT 1"
        );
        let d = Delete::new().from_table("users").and_where(col("id").eq(lit_int(1))).limit(1);
        assert_eq!(
            d.to_string(Dialect::Mysql).unwrap(),
            "DELETE FROM `users` WHERE `id` = 1 LIMIT 1"
        );
    }

    #[test]
    fn missing_table_is_an_error() {
        assert!(Update::new().set("x", lit_int(1)).to_string(Dialect::Postgres).is_err());
        assert!(Delete::new().to_string(Dialect::Postgres).is_err());
    }

    #[test]
    fn returning_all_renders_star_and_is_suppressed_on_mysql() {
        let i = Insert::new().into_table("users").values(vec![lit_int(1)]).returning_all();
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "INSERT INTO \"users\" VALUES (1) RETURNING *"
        );
        assert_eq!(i.to_string(Dialect::Mysql).unwrap(), "INSERT INTO `users` VALUES (1)");

        let d = Delete::new().from_table("users").returning_all();
        assert_eq!(
            d.to_string(Dialect::Postgres).unwrap(),
            "DELETE FROM \"users\" RETURNING *"
        );

        let u = Update::new().table("users").set("name", lit_str("ada")).returning_all();
        assert_eq!(
            u.to_string(Dialect::Postgres).unwrap(),
            "UPDATE \"users\" SET \"name\" = 'ada' RETURNING *"
        );
    }

    /// A later `returning` call replaces an earlier `returning_all` (and
    /// vice versa) rather than accumulating (§4.7).
    #[test]
    fn returning_setters_replace_prior_state() {
        let i = Insert::new()
            .into_table("users")
            .values(vec![lit_int(1)])
            .returning_all()
            .returning(vec![col("id")]);
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "INSERT INTO \"users\" VALUES (1) RETURNING \"id\""
        );
    }

    #[test]
    fn cond_where_replaces_rather_than_accumulates() {
        let u = Update::new()
            .table("users")
            .set("name", lit_str("ada"))
            .and_where(col("active").eq(lit_int(1)))
            .cond_where(Condition::all().add(col("id").eq(lit_int(2))));
        assert_eq!(
            u.to_string(Dialect::Postgres).unwrap(),
            "UPDATE \"users\" SET \"name\" = 'ada' WHERE \"id\" = 2"
        );

        let d = Delete::new()
            .from_table("users")
            .and_where(col("active").eq(lit_int(1)))
            .cond_where(Condition::all().add(col("id").eq(lit_int(2))));
        assert_eq!(
            d.to_string(Dialect::Postgres).unwrap(),
            "DELETE FROM \"users\" WHERE \"id\" = 2"
        );
    }
}
