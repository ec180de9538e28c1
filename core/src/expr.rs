//! Column expressions.
//!
//! An [`Expr<F>`] is a column handle, or a function applied to one, that
//! produces values of type `F`. The type parameter is what lets comparisons
//! and projections check their operands at compile time.

use core::marker::PhantomData;

use crate::alias::ColumnToken;
use crate::sql::{SQL, Token};

/// SQL functions that wrap a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlFunction {
    Length,
    Sum,
    Min,
    Max,
    Count,
}

impl SqlFunction {
    pub const fn name(self) -> &'static str {
        match self {
            SqlFunction::Length => "LENGTH",
            SqlFunction::Sum => "SUM",
            SqlFunction::Min => "MIN",
            SqlFunction::Max => "MAX",
            SqlFunction::Count => "COUNT",
        }
    }
}

/// Untyped expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    Column(ColumnToken),
    Function(SqlFunction, Box<ExprNode>),
    /// `COUNT(*)`
    CountAll,
}

impl ExprNode {
    pub(crate) fn to_sql(&self) -> SQL {
        match self {
            ExprNode::Column(token) => SQL::column(*token),
            ExprNode::Function(function, inner) => SQL::func(function.name(), inner.to_sql()),
            ExprNode::CountAll => SQL::func(SqlFunction::Count.name(), SQL::token(Token::STAR)),
        }
    }

    /// The column at the bottom of this expression, if any.
    pub fn token(&self) -> Option<&ColumnToken> {
        match self {
            ExprNode::Column(token) => Some(token),
            ExprNode::Function(_, inner) => inner.token(),
            ExprNode::CountAll => None,
        }
    }
}

/// Typed expression yielding values of `F`.
pub struct Expr<F> {
    node: ExprNode,
    _type: PhantomData<fn() -> F>,
}

impl<F> Expr<F> {
    pub(crate) fn column(token: ColumnToken) -> Self {
        Self::from_node(ExprNode::Column(token))
    }

    fn from_node(node: ExprNode) -> Self {
        Self {
            node,
            _type: PhantomData,
        }
    }

    pub fn node(&self) -> &ExprNode {
        &self.node
    }

    pub fn into_node(self) -> ExprNode {
        self.node
    }

    /// The wrapped column handle, if this is a plain column.
    pub fn token(&self) -> Option<&ColumnToken> {
        match &self.node {
            ExprNode::Column(token) => Some(token),
            _ => None,
        }
    }

    /// Reads this expression as nullable, for columns on the outer side of
    /// a LEFT JOIN.
    pub fn nullable(self) -> Expr<Option<F>> {
        Expr::from_node(self.node)
    }

    fn wrap<T>(self, function: SqlFunction) -> Expr<T> {
        Expr::from_node(ExprNode::Function(function, Box::new(self.node)))
    }
}

impl<F> Clone for Expr<F> {
    fn clone(&self) -> Self {
        Self::from_node(self.node.clone())
    }
}

impl<F> core::fmt::Debug for Expr<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("Expr").field(&self.node).finish()
    }
}

/// `LENGTH(expr)`
pub fn length<F>(expr: Expr<F>) -> Expr<i64> {
    expr.wrap(SqlFunction::Length)
}

/// `SUM(expr)`; `None` when no row matched.
pub fn sum<F>(expr: Expr<F>) -> Expr<Option<F>> {
    expr.wrap(SqlFunction::Sum)
}

/// `MIN(expr)`; `None` when no row matched.
pub fn min<F>(expr: Expr<F>) -> Expr<Option<F>> {
    expr.wrap(SqlFunction::Min)
}

/// `MAX(expr)`; `None` when no row matched.
pub fn max<F>(expr: Expr<F>) -> Expr<Option<F>> {
    expr.wrap(SqlFunction::Max)
}

/// `COUNT(*)`
pub fn count() -> Expr<i64> {
    Expr::from_node(ExprNode::CountAll)
}

/// `COUNT(expr)`: rows where `expr` is not null.
pub fn count_of<F>(expr: Expr<F>) -> Expr<i64> {
    expr.wrap(SqlFunction::Count)
}
