//! Predicate trees.
//!
//! Comparisons are started from a column expression and completed with an
//! operator method on [`Comparison`]. Where the finished [`Condition`] goes
//! depends on the [`ConditionSink`] the comparison was started from: a query's
//! WHERE chain, a join's ON clause, or nowhere ([`test`]), in which case the
//! condition itself is returned for later composition.

use core::marker::PhantomData;

use crate::expr::{Expr, ExprNode};
use crate::sql::{SQL, Token};
use crate::value::{SqlType, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Lt,
    Gt,
    Le,
    Ge,
    Like,
}

impl CompareOp {
    pub const fn token(self) -> Token {
        match self {
            CompareOp::Eq => Token::EQ,
            CompareOp::Lt => Token::LT,
            CompareOp::Gt => Token::GT,
            CompareOp::Le => Token::LE,
            CompareOp::Ge => Token::GE,
            CompareOp::Like => Token::LIKE,
        }
    }
}

/// Right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound as a parameter.
    Value(Value),
    /// Another column or function of a column, as in join predicates.
    Expr(ExprNode),
}

impl Operand {
    fn to_sql(&self) -> SQL {
        match self {
            Operand::Value(value) => SQL::param(value.clone()),
            Operand::Expr(node) => node.to_sql(),
        }
    }
}

/// Immutable predicate tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Compare {
        left: ExprNode,
        op: CompareOp,
        right: Operand,
    },
    IsNull(ExprNode),
    Not(Box<Condition>),
    And(Box<Condition>, Box<Condition>),
    Or(Box<Condition>, Box<Condition>),
}

impl Condition {
    pub fn and(self, other: Condition) -> Condition {
        Condition::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Condition) -> Condition {
        Condition::Or(Box::new(self), Box::new(other))
    }

    /// Depth-first, left to right. Parameters land in the fragment in the
    /// same order as their placeholders.
    pub(crate) fn to_sql(&self) -> SQL {
        match self {
            Condition::Compare { left, op, right } => left
                .to_sql()
                .push(op.token())
                .append(right.to_sql())
                .parens(),
            Condition::IsNull(node) => node.to_sql().push(Token::IS).push(Token::NULL),
            Condition::Not(inner) => SQL::token(Token::NOT).append(inner.to_sql()),
            Condition::And(left, right) => {
                SQL::join([left.to_sql(), right.to_sql()], Token::AND).parens()
            }
            Condition::Or(left, right) => {
                SQL::join([left.to_sql(), right.to_sql()], Token::OR).parens()
            }
        }
    }
}

/// `NOT condition`
pub fn not(condition: Condition) -> Condition {
    Condition::Not(Box::new(condition))
}

/// `(a AND b)`
pub fn and(a: Condition, b: Condition) -> Condition {
    a.and(b)
}

/// `(a OR b)`
pub fn or(a: Condition, b: Condition) -> Condition {
    a.or(b)
}

/// `expr IS NULL`
pub fn is_null<F>(expr: Expr<F>) -> Condition {
    Condition::IsNull(expr.into_node())
}

/// Starts a free-standing comparison; the operator method returns the
/// [`Condition`].
pub fn test<F>(expr: Expr<F>) -> Comparison<Standalone, F> {
    Comparison::new(Standalone, expr)
}

/// Receives the condition a [`Comparison`] completes.
pub trait ConditionSink {
    type Output;

    fn accept(self, condition: Condition) -> Self::Output;
}

/// Sink that hands the condition back.
#[derive(Debug, Clone, Copy, Default)]
pub struct Standalone;

impl ConditionSink for Standalone {
    type Output = Condition;

    fn accept(self, condition: Condition) -> Condition {
        condition
    }
}

/// A comparison waiting for its operator and right operand.
#[must_use = "a comparison does nothing until an operator method completes it"]
pub struct Comparison<S, F> {
    sink: S,
    left: ExprNode,
    _type: PhantomData<fn() -> F>,
}

impl<S: ConditionSink, F> Comparison<S, F> {
    pub fn new(sink: S, left: Expr<F>) -> Self {
        Self {
            sink,
            left: left.into_node(),
            _type: PhantomData,
        }
    }

    fn compare(self, op: CompareOp, right: Operand) -> S::Output {
        self.sink.accept(Condition::Compare {
            left: self.left,
            op,
            right,
        })
    }

    /// `left = right`
    pub fn is(self, right: impl IntoOperand<F>) -> S::Output {
        self.compare(CompareOp::Eq, right.into_operand())
    }

    /// `left > right`
    pub fn bigger(self, right: impl IntoOperand<F>) -> S::Output {
        self.compare(CompareOp::Gt, right.into_operand())
    }

    /// `left >= right`
    pub fn bigger_equal(self, right: impl IntoOperand<F>) -> S::Output {
        self.compare(CompareOp::Ge, right.into_operand())
    }

    /// `left < right`
    pub fn smaller(self, right: impl IntoOperand<F>) -> S::Output {
        self.compare(CompareOp::Lt, right.into_operand())
    }

    /// `left <= right`
    pub fn smaller_equal(self, right: impl IntoOperand<F>) -> S::Output {
        self.compare(CompareOp::Le, right.into_operand())
    }

    /// `left LIKE pattern`
    pub fn like(self, pattern: impl Into<String>) -> S::Output {
        self.compare(CompareOp::Like, Operand::Value(Value::Text(pattern.into())))
    }

    /// `left IS NULL`
    pub fn is_null(self) -> S::Output {
        self.sink.accept(Condition::IsNull(self.left))
    }
}

/// A value or expression that may be compared with an `Expr<F>`.
pub trait IntoOperand<F> {
    fn into_operand(self) -> Operand;
}

impl<F> IntoOperand<F> for Expr<F> {
    fn into_operand(self) -> Operand {
        Operand::Expr(self.into_node())
    }
}

macro_rules! impl_into_operand {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl IntoOperand<$ty> for $ty {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.to_value())
                }
            }

            impl IntoOperand<Option<$ty>> for $ty {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.to_value())
                }
            }

            impl IntoOperand<Option<$ty>> for Option<$ty> {
                fn into_operand(self) -> Operand {
                    Operand::Value(self.to_value())
                }
            }
        )+
    };
}

impl_into_operand!(i16, i32, i64, f64, bool, String, Vec<u8>);

#[cfg(feature = "chrono")]
impl_into_operand!(chrono::NaiveDate, chrono::NaiveTime, chrono::NaiveDateTime);

impl IntoOperand<String> for &str {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Text(self.to_owned()))
    }
}

impl IntoOperand<Option<String>> for &str {
    fn into_operand(self) -> Operand {
        Operand::Value(Value::Text(self.to_owned()))
    }
}
