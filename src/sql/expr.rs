//! `Expr` — the scalar/boolean expression algebra (§3, §4.4).

use super::condition::Condition;
use super::query::Select;
use super::token::{RenderCtx, Token, TokenStream};
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Add,
    Sub,
    Mul,
    Div,
    Is,
    IsNot,
    Like,
    NotLike,
}

impl BinOp {
    fn as_sql(self) -> &'static str {
        match self {
            BinOp::Eq => "=",
            BinOp::Ne => "<>",
            BinOp::Lt => "<",
            BinOp::Lte => "<=",
            BinOp::Gt => ">",
            BinOp::Gte => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Is => "IS",
            BinOp::IsNot => "IS NOT",
            BinOp::Like => "LIKE",
            BinOp::NotLike => "NOT LIKE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

/// A scalar or boolean expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Column {
        table: Option<String>,
        name: String,
    },
    Literal(Value),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    In {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
    },
    IsNull {
        expr: Box<Expr>,
        negated: bool,
    },
    /// A unary function call: aggregates (`COUNT`, `SUM`, ...) and scalar
    /// functions (`COALESCE`, ...) alike.
    UnaryFn {
        func: &'static str,
        args: Vec<Expr>,
    },
    Exists(Box<Select>),
    /// `COUNT(DISTINCT expr)`, the one aggregate shape that isn't a plain
    /// `func(args,...)` call (§3 `UnaryFn`).
    CountDistinct(Box<Expr>),
    Case {
        when_clauses: Vec<(Expr, Expr)>,
        else_result: Option<Box<Expr>>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Not(Box<Expr>),
    /// A `Condition` tree embedded where a boolean expression is expected,
    /// e.g. the operand of `NOT`.
    Condition(Box<Condition>),
    /// Already-rendered SQL text, escape hatch for constructs the algebra
    /// doesn't model directly.
    Raw(String),
}

pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column {
        table: None,
        name: name.into(),
    }
}

pub fn table_col(table: impl Into<String>, name: impl Into<String>) -> Expr {
    Expr::Column {
        table: Some(table.into()),
        name: name.into(),
    }
}

pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

pub fn lit_int(v: i64) -> Expr {
    Expr::Literal(Value::Int(v))
}

pub fn lit_str(v: impl Into<String>) -> Expr {
    Expr::Literal(Value::String(v.into()))
}

pub fn lit_bool(v: bool) -> Expr {
    Expr::Literal(Value::Bool(v))
}

pub fn lit_null() -> Expr {
    Expr::Literal(Value::Null)
}

pub fn lit_float(v: f64) -> Expr {
    Expr::Literal(Value::Float(v))
}

pub fn lit_date(year: i32, month: u8, day: u8) -> Expr {
    Expr::Literal(Value::Date(super::value::NaiveDateValue::new(
        year, month, day,
    )))
}

pub fn lit_time(hour: u8, minute: u8, second: u8) -> Expr {
    Expr::Literal(Value::Time(super::value::NaiveTimeValue::new(
        hour, minute, second,
    )))
}

pub fn lit_datetime(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    second: u8,
    tz_offset_minutes: Option<i32>,
) -> Expr {
    Expr::Literal(Value::DateTime {
        date: super::value::NaiveDateValue::new(year, month, day),
        time: super::value::NaiveTimeValue::new(hour, minute, second),
        tz_offset_minutes,
    })
}

pub fn count_star() -> Expr {
    Expr::UnaryFn {
        func: "COUNT",
        args: vec![Expr::Raw("*".to_string())],
    }
}

pub fn count(e: Expr) -> Expr {
    Expr::UnaryFn {
        func: "COUNT",
        args: vec![e],
    }
}

pub fn sum(e: Expr) -> Expr {
    Expr::UnaryFn {
        func: "SUM",
        args: vec![e],
    }
}

pub fn avg(e: Expr) -> Expr {
    Expr::UnaryFn {
        func: "AVG",
        args: vec![e],
    }
}

pub fn max(e: Expr) -> Expr {
    Expr::UnaryFn {
        func: "MAX",
        args: vec![e],
    }
}

pub fn min(e: Expr) -> Expr {
    Expr::UnaryFn {
        func: "MIN",
        args: vec![e],
    }
}

pub fn count_distinct(e: Expr) -> Expr {
    Expr::CountDistinct(Box::new(e))
}

pub fn coalesce(args: Vec<Expr>) -> Expr {
    Expr::UnaryFn {
        func: "COALESCE",
        args,
    }
}

/// `COALESCE(expr, default)` (§4.4: "`COALESCE(expr, default)` is the
/// rendering of `if_null`").
pub fn if_null(expr: Expr, default: Expr) -> Expr {
    coalesce(vec![expr, default])
}

pub fn exists(select: Select) -> Expr {
    Expr::Exists(Box::new(select))
}

pub fn case() -> CaseBuilder {
    CaseBuilder {
        when_clauses: Vec::new(),
        else_result: None,
    }
}

pub struct CaseBuilder {
    when_clauses: Vec<(Expr, Expr)>,
    else_result: Option<Box<Expr>>,
}

impl CaseBuilder {
    pub fn when(mut self, cond: Expr, result: Expr) -> Self {
        self.when_clauses.push((cond, result));
        self
    }

    pub fn otherwise(mut self, result: Expr) -> Self {
        self.else_result = Some(Box::new(result));
        self
    }

    pub fn build(self) -> Expr {
        Expr::Case {
            when_clauses: self.when_clauses,
            else_result: self.else_result,
        }
    }
}

/// Fluent combinators available on every `Expr`.
pub trait ExprExt {
    fn eq(self, rhs: Expr) -> Expr;
    fn ne(self, rhs: Expr) -> Expr;
    fn lt(self, rhs: Expr) -> Expr;
    fn lte(self, rhs: Expr) -> Expr;
    fn gt(self, rhs: Expr) -> Expr;
    fn gte(self, rhs: Expr) -> Expr;
    fn is_(self, rhs: Expr) -> Expr;
    fn is_not(self, rhs: Expr) -> Expr;
    fn like(self, rhs: Expr) -> Expr;
    fn not_like(self, rhs: Expr) -> Expr;
    fn and(self, rhs: Expr) -> Expr;
    fn or(self, rhs: Expr) -> Expr;
    fn is_null(self) -> Expr;
    fn is_not_null(self) -> Expr;
    fn in_list(self, list: Vec<Expr>) -> Expr;
    fn not_in_list(self, list: Vec<Expr>) -> Expr;
    fn between(self, low: Expr, high: Expr) -> Expr;
    fn not_between(self, low: Expr, high: Expr) -> Expr;
    fn if_null(self, default: Expr) -> Expr;
}

impl ExprExt for Expr {
    fn eq(self, rhs: Expr) -> Expr {
        binary(BinOp::Eq, self, rhs)
    }

    fn ne(self, rhs: Expr) -> Expr {
        binary(BinOp::Ne, self, rhs)
    }

    fn lt(self, rhs: Expr) -> Expr {
        binary(BinOp::Lt, self, rhs)
    }

    fn lte(self, rhs: Expr) -> Expr {
        binary(BinOp::Lte, self, rhs)
    }

    fn gt(self, rhs: Expr) -> Expr {
        binary(BinOp::Gt, self, rhs)
    }

    fn gte(self, rhs: Expr) -> Expr {
        binary(BinOp::Gte, self, rhs)
    }

    fn is_(self, rhs: Expr) -> Expr {
        binary(BinOp::Is, self, rhs)
    }

    fn is_not(self, rhs: Expr) -> Expr {
        binary(BinOp::IsNot, self, rhs)
    }

    fn like(self, rhs: Expr) -> Expr {
        binary(BinOp::Like, self, rhs)
    }

    fn not_like(self, rhs: Expr) -> Expr {
        binary(BinOp::NotLike, self, rhs)
    }

    fn and(self, rhs: Expr) -> Expr {
        Expr::Logical {
            op: LogicalOp::And,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }

    fn or(self, rhs: Expr) -> Expr {
        Expr::Logical {
            op: LogicalOp::Or,
            left: Box::new(self),
            right: Box::new(rhs),
        }
    }

    fn is_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    fn is_not_null(self) -> Expr {
        Expr::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    fn in_list(self, list: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    fn not_in_list(self, list: Vec<Expr>) -> Expr {
        Expr::In {
            expr: Box::new(self),
            list,
            negated: true,
        }
    }

    fn between(self, low: Expr, high: Expr) -> Expr {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: false,
        }
    }

    fn not_between(self, low: Expr, high: Expr) -> Expr {
        Expr::Between {
            expr: Box::new(self),
            low: Box::new(low),
            high: Box::new(high),
            negated: true,
        }
    }

    fn if_null(self, default: Expr) -> Expr {
        coalesce(vec![self, default])
    }
}

impl std::ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl std::ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(self))
    }
}

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

impl Expr {
    /// Recursively check invariants that cannot be caught at build time,
    /// e.g. `IN ()` with an empty list (§4.4, §7).
    pub fn validate(&self) -> super::error::Result<()> {
        match self {
            Expr::In { expr, list, .. } => {
                if list.is_empty() {
                    return Err(super::error::Error::EmptyInList);
                }
                expr.validate()?;
                for item in list {
                    item.validate()?;
                }
                Ok(())
            }
            Expr::Column { .. } | Expr::Literal(_) | Expr::Raw(_) => Ok(()),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.validate()?;
                rhs.validate()
            }
            Expr::Between {
                expr, low, high, ..
            } => {
                expr.validate()?;
                low.validate()?;
                high.validate()
            }
            Expr::IsNull { expr, .. } => expr.validate(),
            Expr::UnaryFn { args, .. } => {
                for arg in args {
                    arg.validate()?;
                }
                Ok(())
            }
            Expr::Exists(select) => select.validate(),
            Expr::CountDistinct(inner) => inner.validate(),
            Expr::Case {
                when_clauses,
                else_result,
            } => {
                for (cond, result) in when_clauses {
                    cond.validate()?;
                    result.validate()?;
                }
                if let Some(else_result) = else_result {
                    else_result.validate()?;
                }
                Ok(())
            }
            Expr::Logical { left, right, .. } => {
                left.validate()?;
                right.validate()
            }
            Expr::Not(inner) => inner.validate(),
            Expr::Condition(cond) => cond.validate(),
        }
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            Expr::Column { table, name } => {
                ts.qualified_ident(table.clone(), name.clone());
            }
            Expr::Literal(v) => {
                ts.value(v.clone());
            }
            Expr::Binary { op, lhs, rhs } => {
                ts.append(&lhs.to_tokens(ctx));
                ts.space().raw(op.as_sql()).space();
                ts.append(&rhs.to_tokens(ctx));
            }
            Expr::In {
                expr,
                list,
                negated,
            } => {
                ts.append(&expr.to_tokens(ctx));
                ts.space();
                if *negated {
                    ts.raw("NOT IN").space();
                } else {
                    ts.raw("IN").space();
                }
                ts.lparen();
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&item.to_tokens(ctx));
                }
                ts.rparen();
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                ts.append(&expr.to_tokens(ctx));
                ts.space();
                if *negated {
                    ts.raw("NOT BETWEEN").space();
                } else {
                    ts.raw("BETWEEN").space();
                }
                ts.append(&low.to_tokens(ctx));
                ts.space().raw("AND").space();
                ts.append(&high.to_tokens(ctx));
            }
            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens(ctx));
                ts.space();
                if *negated {
                    ts.raw("IS NOT NULL");
                } else {
                    ts.raw("IS NULL");
                }
            }
            Expr::UnaryFn { func, args } => {
                ts.raw(*func).lparen();
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens(ctx));
                }
                ts.rparen();
            }
            Expr::Exists(select) => {
                ts.raw("EXISTS").space().lparen();
                ts.append(&select.to_tokens(ctx));
                ts.rparen();
            }
            Expr::CountDistinct(inner) => {
                ts.raw("COUNT").lparen().raw("DISTINCT").space();
                ts.append(&inner.to_tokens(ctx));
                ts.rparen();
            }
            Expr::Case {
                when_clauses,
                else_result,
            } => {
                ts.lparen().raw("CASE");
                for (cond, result) in when_clauses {
                    ts.space().raw("WHEN").space();
                    ts.append(&cond.to_tokens(ctx));
                    ts.space().raw("THEN").space();
                    ts.append(&result.to_tokens(ctx));
                }
                if let Some(else_result) = else_result {
                    ts.space().raw("ELSE").space();
                    ts.append(&else_result.to_tokens(ctx));
                }
                ts.space().raw("END").rparen();
            }
            Expr::Logical { op, left, right } => {
                ts.append(&left.to_tokens(ctx));
                ts.space();
                ts.raw(match op {
                    LogicalOp::And => "AND",
                    LogicalOp::Or => "OR",
                });
                ts.space();
                ts.append(&right.to_tokens(ctx));
            }
            Expr::Not(inner) => {
                ts.raw("NOT").space().lparen();
                ts.append(&inner.to_tokens(ctx));
                ts.rparen();
            }
            Expr::Condition(cond) => {
                ts.append(&cond.to_tokens(ctx));
            }
            Expr::Raw(s) => {
                ts.push(Token::Raw(s.clone()));
            }
        }
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;

    fn render(e: &Expr) -> String {
        let mut ctx = RenderCtx::inline(Dialect::Postgres);
        e.to_tokens(&mut ctx).serialize(&mut ctx)
    }

    #[test]
    fn renders_simple_comparison() {
        assert_eq!(render(&col("age").gte(lit_int(18))), "\"age\" >= 18");
    }

    #[test]
    fn renders_in_list() {
        assert_eq!(
            render(&col("id").in_list(vec![lit_int(1), lit_int(2)])),
            "\"id\" IN (1, 2)"
        );
    }

    #[test]
    fn renders_between() {
        assert_eq!(
            render(&col("age").between(lit_int(18), lit_int(65))),
            "\"age\" BETWEEN 18 AND 65"
        );
    }

    #[test]
    fn renders_case_wrapped_in_parens() {
        let e = case()
            .when(col("x").eq(lit_int(1)), lit_str("one"))
            .otherwise(lit_str("other"))
            .build();
        assert_eq!(
            render(&e),
            "(CASE WHEN \"x\" = 1 THEN 'one' ELSE 'other' END)"
        );
    }

    #[test]
    fn renders_count_star() {
        assert_eq!(render(&count_star()), "COUNT(*)");
    }

    #[test]
    fn renders_logical_and_not() {
        let e = col("a").eq(lit_int(1)).and(col("b").eq(lit_int(2)));
        assert_eq!(render(&e), "\"a\" = 1 AND \"b\" = 2");
        assert_eq!(render(&Expr::Not(Box::new(col("a").is_null()))), "NOT (\"a\" IS NULL)");
    }

    #[test]
    fn renders_count_distinct() {
        assert_eq!(render(&count_distinct(col("id"))), "COUNT(DISTINCT \"id\")");
    }

    #[test]
    fn renders_if_null_as_coalesce() {
        assert_eq!(
            render(&col("nickname").if_null(lit_str("anon"))),
            "COALESCE(\"nickname\", 'anon')"
        );
    }

    #[test]
    fn bitwise_operators_compose_like_and_or_not() {
        let e = col("a").eq(lit_int(1)) & col("b").eq(lit_int(2));
        assert_eq!(render(&e), "\"a\" = 1 AND \"b\" = 2");
        assert_eq!(render(&!col("a").is_null()), "NOT (\"a\" IS NULL)");
    }

    #[test]
    fn renders_is_and_is_not() {
        assert_eq!(render(&col("done").is_(lit_bool(true))), "\"done\" IS TRUE");
        assert_eq!(
            render(&col("done").is_not(lit_bool(false))),
            "\"done\" IS NOT FALSE"
        );
    }
}
