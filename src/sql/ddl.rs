//! CREATE/ALTER/DROP/RENAME/TRUNCATE TABLE, INDEX and FOREIGN KEY statements,
//! plus the `Table`/`Index`/`ForeignKey` facade namespaces (§3, §4.9, §4.10, §6).

use super::dialect::Dialect;
use super::error::{Error, Result};
use super::expr::Expr;
use super::token::{RenderCtx, TokenStream};
use super::types::ColumnType;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    fn as_sql(self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

#[derive(Debug, Clone)]
pub enum ColumnConstraint {
    PrimaryKey,
    Unique,
    Check(Expr),
    References { table: String, column: String },
}

#[derive(Debug, Clone)]
pub struct ColumnDef {
    name: String,
    data_type: ColumnType,
    nullable: bool,
    default: Option<Expr>,
    auto_increment: bool,
    comment: Option<String>,
    constraints: Vec<ColumnConstraint>,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, data_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            auto_increment: false,
            comment: None,
            constraints: Vec::new(),
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default(mut self, value: Expr) -> Self {
        self.default = Some(value);
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.constraints.push(ColumnConstraint::PrimaryKey);
        self
    }

    pub fn unique(mut self) -> Self {
        self.constraints.push(ColumnConstraint::Unique);
        self
    }

    pub fn check(mut self, expr: Expr) -> Self {
        self.constraints.push(ColumnConstraint::Check(expr));
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.constraints.push(ColumnConstraint::References {
            table: table.into(),
            column: column.into(),
        });
        self
    }

    /// `COMMENT '<text>'`; rendered on MySQL only (§4.9).
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = Some(text.into());
        self
    }

    fn has_constraint(&self, pred: impl Fn(&ColumnConstraint) -> bool) -> bool {
        self.constraints.iter().any(pred)
    }

    /// Column modifiers render in the fixed order: `PRIMARY KEY`,
    /// `AUTO_INCREMENT`/`AUTOINCREMENT`, `UNIQUE`, `NOT NULL`/`NULL`,
    /// `DEFAULT <expr>`, `CHECK (<expr>)`, `COMMENT '<text>'` (MySQL only)
    /// (§4.9).
    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.ident(self.name.clone());
        ts.space().raw(ctx.dialect.emit_column_type(&self.data_type, self.auto_increment));
        if self.has_constraint(|c| matches!(c, ColumnConstraint::PrimaryKey)) {
            ts.space().raw("PRIMARY KEY");
        }
        if self.auto_increment {
            if let Some(suffix) = ctx.dialect.auto_increment_suffix(&self.data_type) {
                ts.space().raw(suffix);
            }
        }
        if self.has_constraint(|c| matches!(c, ColumnConstraint::Unique)) {
            ts.space().raw("UNIQUE");
        }
        if !self.nullable {
            ts.space().raw("NOT NULL");
        }
        if let Some(default) = &self.default {
            ts.space().raw("DEFAULT").space();
            ts.append(&default.to_tokens(ctx));
        }
        for constraint in &self.constraints {
            match constraint {
                ColumnConstraint::Check(expr) => {
                    ts.space().raw("CHECK").space().lparen();
                    ts.append(&expr.to_tokens(ctx));
                    ts.rparen();
                }
                ColumnConstraint::References { table, column } => {
                    ts.space().raw("REFERENCES").space().ident(table.clone());
                    ts.lparen().ident(column.clone()).rparen();
                }
                ColumnConstraint::PrimaryKey | ColumnConstraint::Unique => {}
            }
        }
        if ctx.dialect == Dialect::Mysql {
            if let Some(comment) = &self.comment {
                ts.space().raw("COMMENT").space();
                ts.value(Value::String(comment.clone()));
            }
        }
        ts
    }
}

#[derive(Debug, Clone)]
pub enum TableConstraint {
    PrimaryKey {
        name: Option<String>,
        columns: Vec<String>,
    },
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    ForeignKey {
        name: Option<String>,
        columns: Vec<String>,
        references_table: String,
        references_columns: Vec<String>,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    },
    Check {
        name: Option<String>,
        expr: Expr,
    },
    /// Inline `KEY (<cols>)`; rendered on MySQL only (§4.9).
    Index {
        name: Option<String>,
        columns: Vec<String>,
    },
}

impl TableConstraint {
    pub fn primary_key(columns: Vec<impl Into<String>>) -> Self {
        TableConstraint::PrimaryKey {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn primary_key_named(name: impl Into<String>, columns: Vec<impl Into<String>>) -> Self {
        TableConstraint::PrimaryKey {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn unique(columns: Vec<impl Into<String>>) -> Self {
        TableConstraint::Unique {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn foreign_key(
        columns: Vec<impl Into<String>>,
        references_table: impl Into<String>,
        references_columns: Vec<impl Into<String>>,
    ) -> Self {
        TableConstraint::ForeignKey {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
            references_table: references_table.into(),
            references_columns: references_columns.into_iter().map(Into::into).collect(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn check(expr: Expr) -> Self {
        TableConstraint::Check { name: None, expr }
    }

    pub fn index(columns: Vec<impl Into<String>>) -> Self {
        TableConstraint::Index {
            name: None,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn index_named(name: impl Into<String>, columns: Vec<impl Into<String>>) -> Self {
        TableConstraint::Index {
            name: Some(name.into()),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        if let TableConstraint::Index { name, columns } = self {
            ts.raw("KEY");
            if let Some(name) = name {
                ts.space().ident(name.clone());
            }
            emit_column_list(&mut ts, columns);
            return ts;
        }
        let name = match self {
            TableConstraint::PrimaryKey { name, .. }
            | TableConstraint::Unique { name, .. }
            | TableConstraint::ForeignKey { name, .. }
            | TableConstraint::Check { name, .. } => name,
            TableConstraint::Index { .. } => unreachable!(),
        };
        if let Some(name) = name {
            ts.raw("CONSTRAINT").space().ident(name.clone()).space();
        }
        match self {
            TableConstraint::PrimaryKey { columns, .. } => {
                ts.raw("PRIMARY KEY");
                emit_column_list(&mut ts, columns);
            }
            TableConstraint::Unique { columns, .. } => {
                ts.raw("UNIQUE");
                emit_column_list(&mut ts, columns);
            }
            TableConstraint::ForeignKey {
                columns,
                references_table,
                references_columns,
                on_delete,
                on_update,
                ..
            } => {
                ts.raw("FOREIGN KEY");
                emit_column_list(&mut ts, columns);
                ts.space().raw("REFERENCES").space().ident(references_table.clone());
                emit_column_list(&mut ts, references_columns);
                if let Some(action) = on_delete {
                    ts.space().raw("ON DELETE").space().raw(action.as_sql());
                }
                if let Some(action) = on_update {
                    ts.space().raw("ON UPDATE").space().raw(action.as_sql());
                }
            }
            TableConstraint::Check { expr, .. } => {
                ts.raw("CHECK").space().lparen();
                ts.append(&expr.to_tokens(ctx));
                ts.rparen();
            }
            TableConstraint::Index { .. } => unreachable!(),
        }
        ts
    }
}

fn emit_column_list(ts: &mut TokenStream, columns: &[String]) {
    ts.space().lparen();
    for (i, c) in columns.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.ident(c.clone());
    }
    ts.rparen();
}

#[derive(Debug, Clone, Default)]
pub struct CreateTable {
    if_not_exists: bool,
    name: Option<String>,
    columns: Vec<ColumnDef>,
    constraints: Vec<TableConstraint>,
}

impl CreateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn column(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn constraint(mut self, constraint: TableConstraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() {
            return Err(Error::InvalidBuilderState(
                "CREATE TABLE requires a table name".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(Error::InvalidBuilderState(
                "CREATE TABLE requires at least one column".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("CREATE TABLE").space();
        if self.if_not_exists {
            ts.raw("IF NOT EXISTS").space();
        }
        if let Some(name) = &self.name {
            ts.ident(name.clone());
        }
        ts.space().lparen().space();
        let mut first = true;
        for column in &self.columns {
            if !first {
                ts.comma().space();
            }
            first = false;
            ts.append(&column.to_tokens(ctx));
        }
        // Table constraints render in a fixed order regardless of insertion
        // order: CHECK, then PRIMARY KEY/UNIQUE, then FOREIGN KEY, then
        // inline INDEX (MySQL only) (§4.9).
        let rank = |c: &TableConstraint| match c {
            TableConstraint::Check { .. } => 0,
            TableConstraint::PrimaryKey { .. } | TableConstraint::Unique { .. } => 1,
            TableConstraint::ForeignKey { .. } => 2,
            TableConstraint::Index { .. } => 3,
        };
        let mut constraints: Vec<&TableConstraint> = self.constraints.iter().collect();
        constraints.sort_by_key(|c| rank(c));
        for constraint in constraints {
            if matches!(constraint, TableConstraint::Index { .. }) && ctx.dialect != Dialect::Mysql {
                continue;
            }
            if !first {
                ts.comma().space();
            }
            first = false;
            ts.append(&constraint.to_tokens(ctx));
        }
        ts.space().rparen();
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

#[derive(Debug, Clone)]
pub enum AlterAction {
    AddColumn(ColumnDef),
    AddColumnIfNotExists(ColumnDef),
    DropColumn(String),
    ModifyColumn(ColumnDef),
    AddConstraint(TableConstraint),
    DropConstraint(String),
    RenameColumn { from: String, to: String },
}

#[derive(Debug, Clone, Default)]
pub struct AlterTable {
    name: Option<String>,
    actions: Vec<AlterAction>,
}

impl AlterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn add_column(mut self, column: ColumnDef) -> Self {
        self.actions.push(AlterAction::AddColumn(column));
        self
    }

    /// `ADD COLUMN IF NOT EXISTS`; unsupported on MySQL, which has no such
    /// clause (§4.10).
    pub fn add_column_if_not_exists(mut self, column: ColumnDef) -> Self {
        self.actions.push(AlterAction::AddColumnIfNotExists(column));
        self
    }

    pub fn drop_column(mut self, name: impl Into<String>) -> Self {
        self.actions.push(AlterAction::DropColumn(name.into()));
        self
    }

    /// `ALTER COLUMN ... TYPE ...` on Postgres, `MODIFY COLUMN ...` on
    /// MySQL; unsupported on SQLite (§4.10).
    pub fn modify_column(mut self, column: ColumnDef) -> Self {
        self.actions.push(AlterAction::ModifyColumn(column));
        self
    }

    pub fn add_constraint(mut self, constraint: TableConstraint) -> Self {
        self.actions.push(AlterAction::AddConstraint(constraint));
        self
    }

    pub fn drop_constraint(mut self, name: impl Into<String>) -> Self {
        self.actions.push(AlterAction::DropConstraint(name.into()));
        self
    }

    pub fn rename_column(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.actions.push(AlterAction::RenameColumn {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        if self.name.is_none() {
            return Err(Error::InvalidBuilderState(
                "ALTER TABLE requires a table name".to_string(),
            ));
        }
        if self.actions.is_empty() {
            return Err(Error::InvalidBuilderState(
                "ALTER TABLE requires at least one action".to_string(),
            ));
        }
        for action in &self.actions {
            if matches!(action, AlterAction::AddColumnIfNotExists(_)) && dialect == Dialect::Mysql {
                return Err(Error::UnsupportedForDialect {
                    feature: "ALTER TABLE ADD COLUMN IF NOT EXISTS",
                    dialect,
                });
            }
            if matches!(action, AlterAction::ModifyColumn(_)) && !dialect.supports_modify_column() {
                return Err(Error::UnsupportedForDialect {
                    feature: "ALTER TABLE MODIFY COLUMN",
                    dialect,
                });
            }
        }
        Ok(())
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("ALTER TABLE").space();
        if let Some(name) = &self.name {
            ts.ident(name.clone());
        }
        for (i, action) in self.actions.iter().enumerate() {
            if i > 0 {
                ts.comma();
            }
            ts.space();
            match action {
                AlterAction::AddColumn(column) => {
                    ts.raw("ADD COLUMN").space();
                    ts.append(&column.to_tokens(ctx));
                }
                AlterAction::AddColumnIfNotExists(column) => {
                    ts.raw("ADD COLUMN IF NOT EXISTS").space();
                    ts.append(&column.to_tokens(ctx));
                }
                AlterAction::DropColumn(name) => {
                    ts.raw("DROP COLUMN").space().ident(name.clone());
                }
                AlterAction::ModifyColumn(column) => {
                    if ctx.dialect == Dialect::Mysql {
                        ts.raw("MODIFY COLUMN").space();
                        ts.append(&column.to_tokens(ctx));
                    } else {
                        ts.raw("ALTER COLUMN").space().ident(column.name.clone());
                        ts.space().raw("TYPE").space();
                        ts.raw(ctx.dialect.emit_column_type(&column.data_type, column.auto_increment));
                    }
                }
                AlterAction::AddConstraint(constraint) => {
                    ts.raw("ADD").space();
                    ts.append(&constraint.to_tokens(ctx));
                }
                AlterAction::DropConstraint(name) => {
                    ts.raw("DROP CONSTRAINT").space().ident(name.clone());
                }
                AlterAction::RenameColumn { from, to } => {
                    ts.raw("RENAME COLUMN").space().ident(from.clone());
                    ts.space().raw("TO").space().ident(to.clone());
                }
            }
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(&mut ctx).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(&mut ctx).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RenameTable {
    from: Option<String>,
    to: Option<String>,
}

impl RenameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.from.is_none() || self.to.is_none() {
            return Err(Error::InvalidBuilderState(
                "RENAME TABLE requires both a source and target name".to_string(),
            ));
        }
        Ok(())
    }

    /// `ALTER TABLE <old> RENAME TO <new>` on Postgres/SQLite;
    /// `RENAME TABLE <old> TO <new>` on MySQL (§4.10).
    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        if ctx.dialect == Dialect::Mysql {
            ts.raw("RENAME TABLE").space();
            ts.ident(self.from.clone().unwrap());
            ts.space().raw("TO").space();
            ts.ident(self.to.clone().unwrap());
        } else {
            ts.raw("ALTER TABLE").space();
            ts.ident(self.from.clone().unwrap());
            ts.space().raw("RENAME TO").space();
            ts.ident(self.to.clone().unwrap());
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
pub struct DropTable {
    if_exists: bool,
    names: Vec<String>,
    cascade: bool,
}

impl DropTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    pub fn cascade(mut self) -> Self {
        self.cascade = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.names.is_empty() {
            return Err(Error::InvalidBuilderState(
                "DROP TABLE requires at least one table name".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("DROP TABLE").space();
        if self.if_exists && ctx.dialect.supports_if_exists() {
            ts.raw("IF EXISTS").space();
        }
        for (i, name) in self.names.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.ident(name.clone());
        }
        if self.cascade && ctx.dialect.supports_cascade_restrict() {
            ts.space().raw("CASCADE");
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
pub struct Truncate {
    table: Option<String>,
}

impl Truncate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        if self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "TRUNCATE requires a table name".to_string(),
            ));
        }
        if !dialect.supports_truncate() {
            return Err(Error::UnsupportedForDialect {
                feature: "TRUNCATE TABLE",
                dialect,
            });
        }
        Ok(())
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("TRUNCATE TABLE").space();
        ts.ident(self.table.clone().unwrap());
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens().serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens().serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone)]
pub struct IndexColumn {
    name: String,
    descending: bool,
}

impl IndexColumn {
    pub fn asc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: false,
        }
    }

    pub fn desc(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descending: true,
        }
    }
}

impl<S: Into<String>> From<S> for IndexColumn {
    fn from(s: S) -> Self {
        IndexColumn::asc(s)
    }
}

/// Storage access method named after `USING` on Postgres/MySQL; SQLite has
/// only one index implementation and ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    BTree,
    Hash,
    FullText,
}

/// `USING <keyword>` access method name; `FullText` maps to Postgres's `GIN`
/// (MySQL never renders `USING` for `FullText`, see `CreateIndex::to_tokens`).
fn index_method_keyword(method: IndexMethod) -> &'static str {
    match method {
        IndexMethod::BTree => "BTREE",
        IndexMethod::Hash => "HASH",
        IndexMethod::FullText => "GIN",
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreateIndex {
    unique: bool,
    if_not_exists: bool,
    name: Option<String>,
    table: Option<String>,
    columns: Vec<IndexColumn>,
    method: Option<IndexMethod>,
    nulls_not_distinct: bool,
}

impl CreateIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn if_not_exists(mut self) -> Self {
        self.if_not_exists = true;
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn column(mut self, column: impl Into<IndexColumn>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn using(mut self, method: IndexMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Postgres-only `UNIQUE ... NULLS NOT DISTINCT`; ignored elsewhere.
    pub fn nulls_not_distinct(mut self) -> Self {
        self.nulls_not_distinct = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_none() || self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "CREATE INDEX requires an index name and a table".to_string(),
            ));
        }
        if self.columns.is_empty() {
            return Err(Error::InvalidBuilderState(
                "CREATE INDEX requires at least one column".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("CREATE").space();
        if self.unique {
            ts.raw("UNIQUE").space();
        }
        if self.method == Some(IndexMethod::FullText) && ctx.dialect == Dialect::Mysql {
            ts.raw("FULLTEXT").space();
        }
        ts.raw("INDEX").space();
        if self.if_not_exists && ctx.dialect != Dialect::Mysql {
            ts.raw("IF NOT EXISTS").space();
        }
        ts.ident(self.name.clone().unwrap());
        ts.space().raw("ON").space();
        ts.ident(self.table.clone().unwrap());
        // USING position differs by dialect: Postgres places it before the
        // column list (`FullText` maps to the `GIN` access method); MySQL
        // places it after, and has no `USING` form for `FullText` (it
        // already rendered the `FULLTEXT` keyword above) (§4.10).
        if let Some(method) = self.method {
            if ctx.dialect == Dialect::Postgres {
                ts.space().raw("USING").space().raw(index_method_keyword(method));
            }
        }
        ts.space().lparen();
        for (i, c) in self.columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.ident(c.name.clone());
            if c.descending {
                ts.space().raw("DESC");
            }
        }
        ts.rparen();
        if let Some(method) = self.method {
            if ctx.dialect == Dialect::Mysql && method != IndexMethod::FullText {
                ts.space().raw("USING").space().raw(index_method_keyword(method));
            }
        }
        if self.nulls_not_distinct && self.unique && ctx.dialect == Dialect::Postgres {
            ts.space().raw("NULLS NOT DISTINCT");
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
pub struct DropIndex {
    if_exists: bool,
    name: Option<String>,
    table: Option<String>,
}

impl DropIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn if_exists(mut self) -> Self {
        self.if_exists = true;
        self
    }

    /// Required for MySQL, which has no global index namespace.
    pub fn on_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        if self.name.is_none() {
            return Err(Error::InvalidBuilderState(
                "DROP INDEX requires an index name".to_string(),
            ));
        }
        if dialect == Dialect::Mysql && self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "DROP INDEX on MySQL requires the owning table".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        if dialect == Dialect::Mysql {
            ts.raw("DROP INDEX").space();
            ts.ident(self.name.clone().unwrap());
            ts.space().raw("ON").space();
            ts.ident(self.table.clone().unwrap());
        } else {
            ts.raw("DROP INDEX").space();
            if self.if_exists {
                ts.raw("IF EXISTS").space();
            }
            ts.ident(self.name.clone().unwrap());
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(dialect).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(dialect).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForeignKeyCreate {
    name: Option<String>,
    table: Option<String>,
    columns: Vec<String>,
    references_table: Option<String>,
    references_columns: Vec<String>,
    on_delete: Option<ReferentialAction>,
    on_update: Option<ReferentialAction>,
}

impl ForeignKeyCreate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn from_col(mut self, column: impl Into<String>) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn to_table(mut self, table: impl Into<String>) -> Self {
        self.references_table = Some(table.into());
        self
    }

    pub fn to_col(mut self, column: impl Into<String>) -> Self {
        self.references_columns.push(column.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        if !dialect.supports_add_foreign_key() {
            return Err(Error::UnsupportedForDialect {
                feature: "ALTER TABLE ADD FOREIGN KEY",
                dialect,
            });
        }
        if self.table.is_none() || self.references_table.is_none() {
            return Err(Error::InvalidBuilderState(
                "adding a foreign key requires both the owning and referenced table".to_string(),
            ));
        }
        if self.columns.is_empty() || self.references_columns.is_empty() {
            return Err(Error::InvalidBuilderState(
                "adding a foreign key requires at least one column on each side".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("ALTER TABLE").space();
        ts.ident(self.table.clone().unwrap());
        ts.space().raw("ADD").space();
        if let Some(name) = &self.name {
            ts.raw("CONSTRAINT").space().ident(name.clone()).space();
        }
        ts.raw("FOREIGN KEY");
        emit_column_list(&mut ts, &self.columns);
        ts.space().raw("REFERENCES").space();
        ts.ident(self.references_table.clone().unwrap());
        emit_column_list(&mut ts, &self.references_columns);
        if let Some(action) = self.on_delete {
            ts.space().raw("ON DELETE").space().raw(action.as_sql());
        }
        if let Some(action) = self.on_update {
            ts.space().raw("ON UPDATE").space().raw(action.as_sql());
        }
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens().serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens().serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ForeignKeyDrop {
    name: Option<String>,
    table: Option<String>,
}

impl ForeignKeyDrop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn validate(&self, dialect: Dialect) -> Result<()> {
        if !dialect.supports_add_foreign_key() {
            return Err(Error::UnsupportedForDialect {
                feature: "ALTER TABLE DROP FOREIGN KEY",
                dialect,
            });
        }
        if self.name.is_none() || self.table.is_none() {
            return Err(Error::InvalidBuilderState(
                "dropping a foreign key requires its name and owning table".to_string(),
            ));
        }
        Ok(())
    }

    fn to_tokens(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.raw("ALTER TABLE").space();
        ts.ident(self.table.clone().unwrap());
        ts.space().raw("DROP");
        ts.space().raw(if dialect == Dialect::Mysql {
            "FOREIGN KEY"
        } else {
            "CONSTRAINT"
        });
        ts.space().ident(self.name.clone().unwrap());
        ts
    }

    pub fn to_string(&self, dialect: Dialect) -> Result<String> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::inline(dialect);
        Ok(self.to_tokens(dialect).serialize(&mut ctx))
    }

    pub fn build(&self, dialect: Dialect) -> Result<(String, Vec<Value>)> {
        self.validate(dialect)?;
        let mut ctx = RenderCtx::params(dialect);
        let sql = self.to_tokens(dialect).serialize(&mut ctx);
        Ok((sql, ctx.into_params()))
    }
}

/// Facade namespace for table-level DDL (§6).
pub struct Table;

impl Table {
    pub fn create() -> CreateTable {
        CreateTable::new()
    }

    pub fn alter() -> AlterTable {
        AlterTable::new()
    }

    pub fn rename() -> RenameTable {
        RenameTable::new()
    }

    pub fn drop() -> DropTable {
        DropTable::new()
    }

    pub fn truncate() -> Truncate {
        Truncate::new()
    }
}

/// Facade namespace for index DDL (§6).
pub struct Index;

impl Index {
    pub fn create() -> CreateIndex {
        CreateIndex::new()
    }

    pub fn drop() -> DropIndex {
        DropIndex::new()
    }
}

/// Facade namespace for standalone foreign-key DDL (§6).
pub struct ForeignKey;

impl ForeignKey {
    pub fn create() -> ForeignKeyCreate {
        ForeignKeyCreate::new()
    }

    pub fn drop() -> ForeignKeyDrop {
        ForeignKeyDrop::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_create_table_with_postgres_serial() {
        let t = CreateTable::new()
            .table("users")
            .column(ColumnDef::new("id", ColumnType::Int).auto_increment().primary_key())
            .column(ColumnDef::new("name", ColumnType::String(Some(255))).not_null());
        assert_eq!(
            t.to_string(Dialect::Postgres).unwrap(),
            "CREATE TABLE \"users\" ( \"id\" serial PRIMARY KEY, \"name\" varchar(255) NOT NULL )"
        );
    }

    /// §8 scenario 5.
    #[test]
    fn scenario_create_table_auto_increment_primary_key_per_dialect() {
        let t = CreateTable::new()
            .table("users")
            .column(ColumnDef::new("id", ColumnType::BigInt).primary_key().auto_increment());
        assert_eq!(
            t.to_string(Dialect::Postgres).unwrap(),
            "CREATE TABLE \"users\" ( \"id\" bigserial PRIMARY KEY )"
        );
        assert_eq!(
            t.to_string(Dialect::Mysql).unwrap(),
            "CREATE TABLE `users` ( `id` bigint PRIMARY KEY AUTO_INCREMENT )"
        );
        assert_eq!(
            t.to_string(Dialect::Sqlite).unwrap(),
            "CREATE TABLE \"users\" ( \"id\" integer PRIMARY KEY AUTOINCREMENT )"
        );
    }

    #[test]
    fn renders_foreign_key_table_constraint() {
        let t = CreateTable::new()
            .table("orders")
            .column(ColumnDef::new("user_id", ColumnType::Int))
            .constraint(TableConstraint::foreign_key(
                vec!["user_id"],
                "users",
                vec!["id"],
            ));
        assert_eq!(
            t.to_string(Dialect::Postgres).unwrap(),
            "CREATE TABLE \"orders\" ( \"user_id\" integer, FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\") )"
        );
    }

    #[test]
    fn table_constraints_render_in_fixed_order_and_inline_key_is_mysql_only() {
        let t = CreateTable::new()
            .table("orders")
            .column(ColumnDef::new("user_id", ColumnType::Int))
            .constraint(TableConstraint::index(vec!["user_id"]))
            .constraint(TableConstraint::foreign_key(vec!["user_id"], "users", vec!["id"]))
            .constraint(TableConstraint::check({
                use crate::sql::expr::ExprExt;
                crate::sql::expr::col("user_id").gt(crate::sql::expr::lit(0))
            }))
            .constraint(TableConstraint::primary_key(vec!["user_id"]));
        assert_eq!(
            t.to_string(Dialect::Mysql).unwrap(),
            "CREATE TABLE `orders` ( `user_id` int, CHECK (`user_id` > 0), PRIMARY KEY (`user_id`), FOREIGN KEY (`user_id`) REFERENCES `users` (`id`), KEY (`user_id`) )"
        );
        assert_eq!(
            t.to_string(Dialect::Postgres).unwrap(),
            "CREATE TABLE \"orders\" ( \"user_id\" integer, CHECK (\"user_id\" > 0), PRIMARY KEY (\"user_id\"), FOREIGN KEY (\"user_id\") REFERENCES \"users\" (\"id\") )"
        );
    }

    #[test]
    fn mysql_column_comment() {
        let t = CreateTable::new()
            .table("users")
            .column(ColumnDef::new("bio", ColumnType::Text).comment("freeform bio text"));
        assert_eq!(
            t.to_string(Dialect::Mysql).unwrap(),
            "CREATE TABLE `users` ( `bio` text COMMENT 'freeform bio text' )"
        );
        assert_eq!(
            t.to_string(Dialect::Postgres).unwrap(),
            "CREATE TABLE \"users\" ( \"bio\" text )"
        );
    }

    #[test]
    fn rename_table_uses_alter_table_rename_to_except_on_mysql() {
        let r = RenameTable::new().table("old_name").to("new_name");
        assert_eq!(
            r.to_string(Dialect::Postgres).unwrap(),
            "ALTER TABLE \"old_name\" RENAME TO \"new_name\""
        );
        assert_eq!(
            r.to_string(Dialect::Sqlite).unwrap(),
            "ALTER TABLE \"old_name\" RENAME TO \"new_name\""
        );
        assert_eq!(
            r.to_string(Dialect::Mysql).unwrap(),
            "RENAME TABLE `old_name` TO `new_name`"
        );
    }

    #[test]
    fn sqlite_rejects_truncate() {
        let t = Truncate::new().table("users");
        assert!(t.to_string(Dialect::Sqlite).is_err());
        assert!(t.to_string(Dialect::Postgres).is_ok());
    }

    #[test]
    fn drop_index_on_mysql_requires_table() {
        assert!(DropIndex::new().name("idx").to_string(Dialect::Mysql).is_err());
        assert!(DropIndex::new()
            .name("idx")
            .on_table("users")
            .to_string(Dialect::Mysql)
            .is_ok());
    }

    #[test]
    fn sqlite_rejects_standalone_foreign_key_add() {
        let fk = ForeignKey::create()
            .table("orders")
            .from_col("user_id")
            .to_table("users")
            .to_col("id");
        assert!(fk.to_string(Dialect::Sqlite).is_err());
        assert!(fk.to_string(Dialect::Postgres).is_ok());
    }

    #[test]
    fn facades_construct_the_right_builders() {
        assert!(Table::create().table("t").column(ColumnDef::new("a", ColumnType::Int)).to_string(Dialect::Postgres).is_ok());
        assert!(Index::create().name("i").table("t").column("a").to_string(Dialect::Postgres).is_ok());
    }

    #[test]
    fn drop_table_accepts_a_list_of_tables() {
        let d = DropTable::new().table("a").table("b").if_exists().cascade();
        assert_eq!(
            d.to_string(Dialect::Postgres).unwrap(),
            "DROP TABLE IF EXISTS \"a\", \"b\" CASCADE"
        );
    }

    #[test]
    fn modify_column_differs_per_dialect() {
        let postgres = AlterTable::new()
            .table("users")
            .modify_column(ColumnDef::new("age", ColumnType::BigInt));
        assert_eq!(
            postgres.to_string(Dialect::Postgres).unwrap(),
            "ALTER TABLE \"users\" ALTER COLUMN \"age\" TYPE bigint"
        );
        let mysql = AlterTable::new()
            .table("users")
            .modify_column(ColumnDef::new("age", ColumnType::BigInt));
        assert_eq!(
            mysql.to_string(Dialect::Mysql).unwrap(),
            "ALTER TABLE `users` MODIFY COLUMN `age` bigint"
        );
        let sqlite = AlterTable::new()
            .table("users")
            .modify_column(ColumnDef::new("age", ColumnType::BigInt));
        assert!(sqlite.to_string(Dialect::Sqlite).is_err());
    }

    #[test]
    fn add_column_if_not_exists_is_unsupported_on_mysql() {
        let a = AlterTable::new()
            .table("users")
            .add_column_if_not_exists(ColumnDef::new("nickname", ColumnType::Text));
        assert!(a.to_string(Dialect::Mysql).is_err());
        assert_eq!(
            a.to_string(Dialect::Postgres).unwrap(),
            "ALTER TABLE \"users\" ADD COLUMN IF NOT EXISTS \"nickname\" text"
        );
    }

    #[test]
    fn create_index_supports_using_and_nulls_not_distinct() {
        let i = CreateIndex::new()
            .name("idx_email")
            .table("users")
            .column("email")
            .unique()
            .nulls_not_distinct()
            .using(IndexMethod::BTree);
        assert_eq!(
            i.to_string(Dialect::Postgres).unwrap(),
            "CREATE UNIQUE INDEX \"idx_email\" ON \"users\" USING BTREE (\"email\") NULLS NOT DISTINCT"
        );
    }

    /// `USING` comes before the column list on Postgres, after on MySQL
    /// (§4.10); `FullText` maps to `GIN` on Postgres and to the `FULLTEXT`
    /// keyword (not `USING`) on MySQL.
    #[test]
    fn create_index_using_position_and_casing_differ_per_dialect() {
        let btree = CreateIndex::new()
            .name("index_name")
            .table("table")
            .column("col1")
            .using(IndexMethod::BTree);
        assert_eq!(
            btree.to_string(Dialect::Postgres).unwrap(),
            "CREATE INDEX \"index_name\" ON \"table\" USING BTREE (\"col1\")"
        );
        assert_eq!(
            btree.to_string(Dialect::Mysql).unwrap(),
            "CREATE INDEX `index_name` ON `table` (`col1`) USING BTREE"
        );

        let hash = CreateIndex::new()
            .name("index_name")
            .table("table")
            .column("col1")
            .using(IndexMethod::Hash);
        assert_eq!(
            hash.to_string(Dialect::Mysql).unwrap(),
            "CREATE INDEX `index_name` ON `table` (`col1`) USING HASH"
        );

        let fulltext = CreateIndex::new()
            .name("index_name")
            .table("table")
            .column("col1")
            .using(IndexMethod::FullText);
        assert_eq!(
            fulltext.to_string(Dialect::Postgres).unwrap(),
            "CREATE INDEX \"index_name\" ON \"table\" USING GIN (\"col1\")"
        );
        assert_eq!(
            fulltext.to_string(Dialect::Mysql).unwrap(),
            "CREATE FULLTEXT INDEX `index_name` ON `table` (`col1`)"
        );
    }

    #[test]
    fn ddl_builders_expose_parameterised_build() {
        assert!(RenameTable::new().table("a").to("b").build(Dialect::Postgres).is_ok());
        assert!(DropTable::new().table("a").build(Dialect::Postgres).is_ok());
        assert!(Truncate::new().table("a").build(Dialect::Postgres).is_ok());
        assert!(CreateIndex::new().name("i").table("t").column("a").build(Dialect::Postgres).is_ok());
        assert!(DropIndex::new().name("i").build(Dialect::Postgres).is_ok());
        assert!(ForeignKeyCreate::new()
            .table("orders")
            .from_col("user_id")
            .to_table("users")
            .to_col("id")
            .build(Dialect::Postgres)
            .is_ok());
        assert!(ForeignKeyDrop::new().table("orders").name("fk_user").build(Dialect::Postgres).is_ok());
    }
}
