//! `Condition` — a tree of AND/OR-joined predicates, distinct from a plain
//! `Expr` so that WHERE/HAVING/JOIN ON clauses can be built up incrementally
//! without the caller tracking parenthesization by hand (§4.5).

use super::expr::Expr;
use super::token::{RenderCtx, TokenStream};

/// Boolean combinator joining a `Condition`'s children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConjType {
    And,
    Or,
}

/// A child of a `Condition`: either a leaf predicate or a nested,
/// parenthesized sub-tree.
#[derive(Debug, Clone)]
pub enum ConditionNode {
    Expr(Expr),
    Condition(Condition),
}

/// An n-ary AND/OR tree. An empty `Condition` renders as nothing at all (the
/// caller is expected to omit the WHERE/HAVING keyword entirely rather than
/// emit `WHERE ()`); a nested `Condition` child is wrapped in parentheses,
/// a plain `Expr` child is not.
#[derive(Debug, Clone)]
pub struct Condition {
    conj: ConjType,
    children: Vec<ConditionNode>,
}

impl Condition {
    pub fn all() -> Self {
        Self {
            conj: ConjType::And,
            children: Vec::new(),
        }
    }

    pub fn any() -> Self {
        Self {
            conj: ConjType::Or,
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn add(mut self, child: impl Into<ConditionNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn validate(&self) -> super::error::Result<()> {
        for child in &self.children {
            match child {
                ConditionNode::Expr(e) => e.validate()?,
                ConditionNode::Condition(c) => c.validate()?,
            }
        }
        Ok(())
    }

    pub fn to_tokens(&self, ctx: &mut RenderCtx) -> TokenStream {
        let mut ts = TokenStream::new();
        let joiner = match self.conj {
            ConjType::And => "AND",
            ConjType::Or => "OR",
        };
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                ts.space().raw(joiner).space();
            }
            match child {
                ConditionNode::Expr(e) => ts.append(&e.to_tokens(ctx)),
                ConditionNode::Condition(c) => {
                    ts.lparen().append(&c.to_tokens(ctx)).rparen()
                }
            };
        }
        ts
    }
}

impl From<Expr> for ConditionNode {
    fn from(e: Expr) -> Self {
        ConditionNode::Expr(e)
    }
}

impl From<Condition> for ConditionNode {
    fn from(c: Condition) -> Self {
        ConditionNode::Condition(c)
    }
}

impl std::ops::BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        match self.conj {
            ConjType::And if !self.is_empty() => self.add(rhs),
            _ => Condition::all().add(self).add(rhs),
        }
    }
}

impl std::ops::BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        match self.conj {
            ConjType::Or if !self.is_empty() => self.add(rhs),
            _ => Condition::any().add(self).add(rhs),
        }
    }
}

impl std::ops::Not for Condition {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Not(Box::new(Expr::Condition(Box::new(self))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::dialect::Dialect;
    use crate::sql::expr::{col, lit_int, ExprExt};

    fn render(c: &Condition) -> String {
        let mut ctx = RenderCtx::inline(Dialect::Postgres);
        c.to_tokens(&mut ctx).serialize(&mut ctx)
    }

    #[test]
    fn empty_condition_renders_as_nothing() {
        assert_eq!(render(&Condition::all()), "");
    }

    #[test]
    fn flat_and_has_no_parens() {
        let c = Condition::all()
            .add(col("a").eq(lit_int(1)))
            .add(col("b").eq(lit_int(2)));
        assert_eq!(render(&c), "\"a\" = 1 AND \"b\" = 2");
    }

    #[test]
    fn nested_condition_is_parenthesized() {
        let inner = Condition::any()
            .add(col("b").eq(lit_int(2)))
            .add(col("c").eq(lit_int(3)));
        let outer = Condition::all().add(col("a").eq(lit_int(1))).add(inner);
        assert_eq!(render(&outer), "\"a\" = 1 AND (\"b\" = 2 OR \"c\" = 3)");
    }

    #[test]
    fn bitand_operator_combines_conditions() {
        let a = Condition::all().add(col("a").eq(lit_int(1)));
        let b = Condition::all().add(col("b").eq(lit_int(2)));
        let combined = a & b;
        assert_eq!(render(&combined), "\"a\" = 1 AND \"b\" = 2");
    }
}
