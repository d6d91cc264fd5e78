//! `Select` — the SELECT statement builder — and the `Query` facade
//! namespace (§3 SELECT, §4.6, §6).

use super::condition::Condition;
use super::dialect::Dialect;
use super::error::{Error, Result};
use super::expr::Expr;
use super::token::{RenderCtx, TokenStream};
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullsOrder {
    First,
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnionType {
    Union,
    UnionAll,
    Intersect,
    Except,
}

impl UnionType {
    fn as_sql(self) -> &'static str {
        match self {
            UnionType::Union => "UNION",
            UnionType::UnionAll => "UNION ALL",
            UnionType::Intersect => "INTERSECT",
            UnionType::Except => "EXCEPT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStrength {
    ForUpdate,
    ForNoKeyUpdate,
    ForShare,
    ForKeyShare,
}

impl LockStrength {
    fn as_sql(self) -> &'static str {
        match self {
            LockStrength::ForUpdate => "FOR UPDATE",
            LockStrength::ForNoKeyUpdate => "FOR NO KEY UPDATE",
            LockStrength::ForShare => "FOR SHARE",
            LockStrength::ForKeyShare => "FOR KEY SHARE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockWait {
    NoWait,
    SkipLocked,
}

impl LockWait {
    fn as_sql(self) -> &'static str {
        match self {
            LockWait::NoWait => "NOWAIT",
            LockWait::SkipLocked => "SKIP LOCKED",
        }
    }
}

/// `FOR UPDATE` and friends, with the optional `OF <tables>` and
/// `NOWAIT` / `SKIP LOCKED` modifiers (§4.6). Omitted entirely on SQLite.
#[derive(Debug, Clone)]
pub struct Lock {
    pub strength: LockStrength,
    pub of: Vec<String>,
    pub wait: Option<LockWait>,
}

impl Lock {
    pub fn new(strength: LockStrength) -> Self {
        Self {
            strength,
            of: Vec::new(),
            wait: None,
        }
    }

    pub fn for_update() -> Self {
        Self::new(LockStrength::ForUpdate)
    }

    pub fn for_no_key_update() -> Self {
        Self::new(LockStrength::ForNoKeyUpdate)
    }

    pub fn for_share() -> Self {
        Self::new(LockStrength::ForShare)
    }

    pub fn for_key_share() -> Self {
        Self::new(LockStrength::ForKeyShare)
    }

    pub fn of(mut self, table: impl Into<String>) -> Self {
        self.of.push(table.into());
        self
    }

    pub fn no_wait(mut self) -> Self {
        self.wait = Some(LockWait::NoWait);
        self
    }

    pub fn skip_locked(mut self) -> Self {
        self.wait = Some(LockWait::SkipLocked);
        self
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw(self.strength.as_sql());
        if !self.of.is_empty() {
            ts.space().raw("OF").space();
            for (i, t) in self.of.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.ident(t.clone());
            }
        }
        if let Some(wait) = self.wait {
            ts.space().raw(wait.as_sql());
        }
        ts
    }
}

#[derive(Debug, Clone)]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            schema: None,
            table: table.into(),
            alias: None,
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        if let Some(schema) = &self.schema {
            ts.ident(schema.clone());
            ts.push(super::token::Token::Raw(".".to_string()));
        }
        ts.ident(self.table.clone());
        if let Some(alias) = &self.alias {
            ts.space().raw("AS").space().ident(alias.clone());
        }
        let _ = ctx;
        ts
    }
}

impl<S: Into<String>> From<S> for TableRef {
    fn from(s: S) -> Self {
        TableRef::new(s)
    }
}

/// What follows `FROM`: a plain table reference or a derived table, i.e.
/// `(<select>) AS <alias>` (§4.6 "Subquery source").
#[derive(Debug, Clone)]
pub enum FromSource {
    Table(TableRef),
    Subquery(Box<Select>, String),
}

impl FromSource {
    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            FromSource::Table(t) => ts.append(&t.to_tokens(ctx)),
            FromSource::Subquery(select, alias) => {
                ts.lparen();
                ts.append(&select.to_tokens(ctx));
                ts.rparen().space().raw("AS").space().ident(alias.clone())
            }
        };
        ts
    }
}

#[derive(Debug, Clone)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub on: Option<Condition>,
}

#[derive(Debug, Clone)]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: SortDir,
    pub nulls: Option<NullsOrder>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOffset {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// A SELECT statement under construction. Renamed from the teacher's
/// `Query` so that name is free for the facade namespace (§6).
#[derive(Debug, Clone, Default)]
pub struct Select {
    distinct: bool,
    columns: Vec<SelectExpr>,
    from: Option<FromSource>,
    joins: Vec<Join>,
    where_: Condition,
    group_by: Vec<Expr>,
    having: Condition,
    order_by: Vec<OrderByExpr>,
    limit_offset: LimitOffset,
    unions: Vec<(UnionType, Select)>,
    lock: Option<Lock>,
}

impl Select {
    pub fn new() -> Self {
        Self {
            where_: Condition::all(),
            having: Condition::all(),
            ..Default::default()
        }
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn column(mut self, expr: Expr) -> Self {
        self.columns.push(SelectExpr { expr, alias: None });
        self
    }

    /// Explicit `*` projection item, distinct from leaving the projection
    /// empty (which renders as two bare spaces, not `*`, per §4.6).
    pub fn star(mut self) -> Self {
        self.columns.push(SelectExpr {
            expr: Expr::Raw("*".to_string()),
            alias: None,
        });
        self
    }

    pub fn column_as(mut self, expr: Expr, alias: impl Into<String>) -> Self {
        self.columns.push(SelectExpr {
            expr,
            alias: Some(alias.into()),
        });
        self
    }

    pub fn from(mut self, table: impl Into<TableRef>) -> Self {
        self.from = Some(FromSource::Table(table.into()));
        self
    }

    /// `FROM (<select>) AS <alias>` (§4.6 "Subquery source").
    pub fn from_subquery(mut self, select: Select, alias: impl Into<String>) -> Self {
        self.from = Some(FromSource::Subquery(Box::new(select), alias.into()));
        self
    }

    pub fn join(mut self, join_type: JoinType, table: impl Into<TableRef>, on: Condition) -> Self {
        self.joins.push(Join {
            join_type,
            table: table.into(),
            on: Some(on),
        });
        self
    }

    pub fn cross_join(mut self, table: impl Into<TableRef>) -> Self {
        self.joins.push(Join {
            join_type: JoinType::Cross,
            table: table.into(),
            on: None,
        });
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

    pub fn group_by(mut self, expr: Expr) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn and_having(mut self, cond: Expr) -> Self {
        self.having = self.having.add(cond);
        self
    }

    /// Replaces the entire HAVING tree rather than appending to it (§4.5).
    pub fn cond_having(mut self, cond: Condition) -> Self {
        self.having = cond;
        self
    }

    pub fn order_by(mut self, expr: Expr, dir: SortDir) -> Self {
        self.order_by.push(OrderByExpr {
            expr,
            dir,
            nulls: None,
        });
        self
    }

    pub fn order_by_with_nulls(mut self, expr: Expr, dir: SortDir, nulls: NullsOrder) -> Self {
        self.order_by.push(OrderByExpr {
            expr,
            dir,
            nulls: Some(nulls),
        });
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit_offset.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.limit_offset.offset = Some(offset);
        self
    }

    pub fn union(mut self, select: Select) -> Self {
        self.unions.push((UnionType::Union, select));
        self
    }

    pub fn union_all(mut self, select: Select) -> Self {
        self.unions.push((UnionType::UnionAll, select));
        self
    }

    pub fn intersect(mut self, select: Select) -> Self {
        self.unions.push((UnionType::Intersect, select));
        self
    }

    pub fn except(mut self, select: Select) -> Self {
        self.unions.push((UnionType::Except, select));
        self
    }

    pub fn lock(mut self, lock: Lock) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.from.is_none() && self.joins.is_empty() {
            return Err(Error::InvalidBuilderState(
                "SELECT requires a FROM table".to_string(),
            ));
        }
        for c in &self.columns {
            c.expr.validate()?;
        }
        self.where_.validate()?;
        self.having.validate()?;
        for join in &self.joins {
            if let Some(on) = &join.on {
                on.validate()?;
            }
        }
        if let Some(FromSource::Subquery(select, _)) = &self.from {
            select.validate()?;
        }
        for (_, select) in &self.unions {
            select.validate()?;
        }
        Ok(())
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("SELECT");
        if self.distinct {
            ts.space().raw("DISTINCT");
        }
        ts.space();
        // An empty projection renders as two bare spaces around nothing,
        // not `*` — callers wanting `SELECT *` call `.star()` explicitly
        // (§4.6).
        for (i, c) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&c.expr.to_tokens(ctx));
            if let Some(alias) = &c.alias {
                ts.space().raw("AS").space().ident(alias.clone());
            }
        }
        if let Some(from) = &self.from {
            ts.space().raw("FROM").space();
            ts.append(&from.to_tokens(ctx));
        }
        for join in &self.joins {
            ts.space().raw(join.join_type.as_sql()).space();
            ts.append(&join.table.to_tokens(ctx));
            if let Some(on) = &join.on {
                ts.space().raw("ON").space();
                ts.append(&on.to_tokens(ctx));
            }
        }
        if !self.where_.is_empty() {
            ts.space().raw("WHERE").space();
            ts.append(&self.where_.to_tokens(ctx));
        }
        if !self.group_by.is_empty() {
            ts.space().raw("GROUP BY").space();
            for (i, e) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&e.to_tokens(ctx));
            }
        }
        if !self.having.is_empty() {
            ts.space().raw("HAVING").space();
            ts.append(&self.having.to_tokens(ctx));
        }
        for (union_type, select) in &self.unions {
            ts.space().raw(union_type.as_sql()).space();
            if ctx.dialect.supports_parenthesized_union() {
                ts.lparen();
                ts.append(&select.to_tokens(ctx));
                ts.rparen();
            } else {
                ts.append(&select.to_tokens(ctx));
            }
        }
        if !self.order_by.is_empty() {
            ts.space().raw("ORDER BY").space();
            for (i, o) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                // Dialects without a native NULLS FIRST/LAST clause (MySQL)
                // emulate it with a leading `<expr> IS NULL` sort key (§8
                // scenario 8).
                if let Some(nulls) = o.nulls {
                    if !ctx.dialect.supports_nulls_ordering() {
                        ts.append(&o.expr.to_tokens(ctx));
                        ts.space().raw("IS NULL").space().raw(match nulls {
                            NullsOrder::First => "DESC",
                            NullsOrder::Last => "ASC",
                        });
                        ts.comma().space();
                    }
                }
                ts.append(&o.expr.to_tokens(ctx));
                ts.space().raw(match o.dir {
                    SortDir::Asc => "ASC",
                    SortDir::Desc => "DESC",
                });
                if let Some(nulls) = o.nulls {
                    if ctx.dialect.supports_nulls_ordering() {
                        ts.space().raw(match nulls {
                            NullsOrder::First => "NULLS FIRST",
                            NullsOrder::Last => "NULLS LAST",
                        });
                    }
                }
            }
        }
        if let Some(limit) = self.limit_offset.limit {
            ts.space().raw("LIMIT").space().value(Value::Int(limit as i64));
        }
        if let Some(offset) = self.limit_offset.offset {
            ts.space().raw("OFFSET").space().value(Value::Int(offset as i64));
        }
        if let Some(lock) = &self.lock {
            if ctx.dialect.supports_locking_clause() {
                ts.space().append(&lock.to_tokens());
            }
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

/// Zero-sized facade exposing the entry points named in §6: `Query::select`,
/// `Query::insert`, `Query::update`, `Query::delete`.
pub struct Query;

impl Query {
    pub fn select() -> Select {
        Select::new()
    }

    pub fn insert() -> super::dml::Insert {
        super::dml::Insert::new()
    }

    pub fn update() -> super::dml::Update {
        super::dml::Update::new()
    }

    pub fn delete() -> super::dml::Delete {
        super::dml::Delete::new()
    }
}
