//! Query contexts: the immutable description of one SELECT, UPDATE or DELETE.
//!
//! A [`QueryContext`] records the sources, filters, grouping, ordering and
//! assignments of one statement. Every builder method consumes the context and
//! returns the extended one; nothing is shared between queries. Column
//! handles are only checked when the context is rendered, against a resolver
//! built from the context's own sources.

mod render;

pub use render::Selection;

use std::sync::Arc;

use crate::alias::{Alias, AliasId};
use crate::conditions::Condition;
use crate::error::Result;
use crate::expr::{Expr, ExprNode};
use crate::resolver::TokenResolver;
use crate::schema::{Entity, TableDefinition};
use crate::sql::Token;
use crate::value::{SqlType, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn token(self) -> Token {
        match self {
            JoinKind::Inner => Token::INNER,
            JoinKind::Left => Token::LEFT,
        }
    }
}

#[derive(Debug, Clone)]
struct Source {
    alias: AliasId,
    table: Arc<TableDefinition>,
    join: Option<(JoinKind, Condition)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

#[derive(Debug, Clone)]
struct Filter {
    connective: Connective,
    condition: Condition,
    grouped: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrderTerm {
    Asc(ExprNode),
    Desc(ExprNode),
    /// 1-based position in the select list.
    Ordinal(usize),
}

#[derive(Debug, Clone)]
pub struct QueryContext {
    sources: Vec<Source>,
    filters: Vec<Filter>,
    group_by: Vec<ExprNode>,
    order_by: Vec<OrderTerm>,
    limit: Option<usize>,
    offset: Option<usize>,
    assignments: Vec<(ExprNode, Value)>,
}

impl QueryContext {
    /// Starts a query over `alias`.
    pub fn from<E: Entity>(alias: &Alias<E>) -> Self {
        Self {
            sources: vec![Source {
                alias: alias.id(),
                table: Arc::clone(alias.table()),
                join: None,
            }],
            filters: Vec::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            assignments: Vec::new(),
        }
    }

    pub fn join<E: Entity>(mut self, kind: JoinKind, alias: &Alias<E>, on: Condition) -> Self {
        self.sources.push(Source {
            alias: alias.id(),
            table: Arc::clone(alias.table()),
            join: Some((kind, on)),
        });
        self
    }

    /// Adds `condition` to the WHERE chain with AND.
    pub fn and_where(self, condition: Condition) -> Self {
        self.push_filter(Connective::And, condition, false)
    }

    /// Adds `condition` to the WHERE chain with OR.
    pub fn or_where(self, condition: Condition) -> Self {
        self.push_filter(Connective::Or, condition, false)
    }

    /// Adds `condition`, wrapped in parentheses, to the WHERE chain with AND.
    pub fn where_true(self, condition: Condition) -> Self {
        self.push_filter(Connective::And, condition, true)
    }

    fn push_filter(mut self, connective: Connective, condition: Condition, grouped: bool) -> Self {
        self.filters.push(Filter {
            connective,
            condition,
            grouped,
        });
        self
    }

    pub fn group_by(mut self, expr: ExprNode) -> Self {
        self.group_by.push(expr);
        self
    }

    pub fn order_by(mut self, term: OrderTerm) -> Self {
        self.order_by.push(term);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Records `column = value` for a query-level UPDATE.
    pub fn set<F: SqlType>(mut self, column: Expr<F>, value: F) -> Self {
        self.assignments.push((column.into_node(), value.to_value()));
        self
    }

    /// The table the query starts from.
    pub fn primary_table(&self) -> &Arc<TableDefinition> {
        &self.sources[0].table
    }

    /// Tables of every source, in FROM/JOIN order.
    pub fn tables(&self) -> impl Iterator<Item = &Arc<TableDefinition>> {
        self.sources.iter().map(|source| &source.table)
    }

    pub fn is_joined(&self) -> bool {
        self.sources.len() > 1
    }

    /// A fresh resolver over this query's sources.
    pub fn resolver(&self) -> Result<TokenResolver> {
        let mut resolver = TokenResolver::default();
        for source in &self.sources {
            resolver.register(source.alias, Arc::clone(&source.table))?;
        }
        Ok(resolver)
    }
}
