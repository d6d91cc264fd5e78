//! Token stream building blocks shared by every statement renderer.
//!
//! Mirrors the teacher's chainable `TokenStream` builder, generalised with a
//! [`RenderCtx`] so the same walk can either inline literals or collect them
//! into a positional parameter vector (§4.3).

use super::dialect::Dialect;
use super::value::Value;

/// A single lexical unit of generated SQL.
#[derive(Debug, Clone)]
pub enum Token {
    /// A bare identifier, quoted per dialect on serialization.
    Ident(String),
    /// A `table.column`-style qualified identifier.
    QualifiedIdent { table: Option<String>, name: String },
    /// The unquoted `*` wildcard.
    Star,
    /// A literal value: inlined or pushed to the parameter vector.
    Value(Value),
    /// Raw, already-dialect-correct SQL text (keywords, operators, punctuation).
    Raw(String),
    /// A single space.
    Space,
    /// `,`
    Comma,
    /// `(`
    LParen,
    /// `)`
    RParen,
}

impl Token {
    fn serialize(&self, ctx: &mut RenderCtx) -> String {
        match self {
            Token::Ident(name) => ctx.dialect.quote_identifier(name),
            Token::QualifiedIdent { table, name } => match table {
                Some(t) => format!(
                    "{}.{}",
                    ctx.dialect.quote_identifier(t),
                    ctx.dialect.quote_identifier(name)
                ),
                None => ctx.dialect.quote_identifier(name),
            },
            Token::Star => "*".to_string(),
            Token::Value(v) => ctx.emit_value(v),
            Token::Raw(s) => s.clone(),
            Token::Space => " ".to_string(),
            Token::Comma => ",".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
        }
    }
}

/// A growable sequence of [`Token`]s with chainable builder methods.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: Token) -> &mut Self {
        self.tokens.push(token);
        self
    }

    pub fn space(&mut self) -> &mut Self {
        self.push(Token::Space)
    }

    pub fn comma(&mut self) -> &mut Self {
        self.push(Token::Comma)
    }

    pub fn lparen(&mut self) -> &mut Self {
        self.push(Token::LParen)
    }

    pub fn rparen(&mut self) -> &mut Self {
        self.push(Token::RParen)
    }

    /// Push raw, already dialect-correct SQL text. Used for keywords.
    pub fn raw(&mut self, s: impl Into<String>) -> &mut Self {
        self.push(Token::Raw(s.into()))
    }

    pub fn ident(&mut self, name: impl Into<String>) -> &mut Self {
        self.push(Token::Ident(name.into()))
    }

    pub fn qualified_ident(&mut self, table: Option<String>, name: impl Into<String>) -> &mut Self {
        self.push(Token::QualifiedIdent {
            table,
            name: name.into(),
        })
    }

    pub fn star(&mut self) -> &mut Self {
        self.push(Token::Star)
    }

    pub fn value(&mut self, value: Value) -> &mut Self {
        self.push(Token::Value(value))
    }

    pub fn append(&mut self, other: &TokenStream) -> &mut Self {
        self.tokens.extend(other.tokens.iter().cloned());
        self
    }

    pub fn serialize(&self, ctx: &mut RenderCtx) -> String {
        self.tokens.iter().map(|t| t.serialize(ctx)).collect()
    }
}

/// Render strategy object threaded through every `to_tokens` call: carries
/// the dialect and, in parameterised mode, the growing output vector.
///
/// Inline mode formats every [`Value`] in place (§4.2); params mode emits a
/// dialect-specific placeholder and appends the value to the accumulator
/// (§4.3). Both modes share the same token walk.
pub struct RenderCtx {
    pub dialect: Dialect,
    params: Option<Vec<Value>>,
}

impl RenderCtx {
    pub fn inline(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: None,
        }
    }

    pub fn params(dialect: Dialect) -> Self {
        Self {
            dialect,
            params: Some(Vec::new()),
        }
    }

    fn emit_value(&mut self, value: &Value) -> String {
        match &mut self.params {
            None => value.format_inline(self.dialect),
            Some(params) => {
                params.push(value.clone());
                self.dialect.placeholder(params.len())
            }
        }
    }

    pub fn into_params(self) -> Vec<Value> {
        self.params.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_mode_formats_values_directly() {
        let mut ts = TokenStream::new();
        ts.ident("id").space().raw("=").space().value(Value::Int(1));
        let mut ctx = RenderCtx::inline(Dialect::Postgres);
        assert_eq!(ts.serialize(&mut ctx), "\"id\" = 1");
    }

    #[test]
    fn params_mode_collects_values_and_emits_placeholders() {
        let mut ts = TokenStream::new();
        ts.ident("id").space().raw("=").space().value(Value::Int(1));
        let mut ctx = RenderCtx::params(Dialect::Postgres);
        let sql = ts.serialize(&mut ctx);
        assert_eq!(sql, "\"id\" = $1");
        assert_eq!(ctx.into_params(), vec![Value::Int(1)]);
    }

    #[test]
    fn mysql_and_sqlite_placeholders_are_question_marks() {
        let mut ts = TokenStream::new();
        ts.value(Value::Int(1)).comma().space().value(Value::Int(2));
        let mut ctx = RenderCtx::params(Dialect::Mysql);
        assert_eq!(ts.serialize(&mut ctx), "?, ?");
    }
}
