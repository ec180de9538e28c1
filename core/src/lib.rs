//! Store-neutral core of quarry: entity mapping, column handles, predicate
//! trees and statement rendering. Execution lives in the `quarry` crate.

pub mod alias;
pub mod conditions;
pub mod error;
pub mod expr;
pub mod field;
pub mod mutation;
pub mod prepared;
pub mod projection;
pub mod query;
pub mod resolver;
pub mod schema;
pub mod sql;
mod trace;
pub mod value;

// Re-export key types and traits
pub use alias::{Alias, AliasId, ColumnToken};
pub use conditions::{
    CompareOp, Comparison, Condition, ConditionSink, IntoOperand, Operand, Standalone, and,
    is_null, not, or, test,
};
pub use error::{QuarryError, Result};
pub use expr::{Expr, ExprNode, SqlFunction, count, count_of, length, max, min, sum};
pub use field::{AnyField, Field};
pub use prepared::PreparedStatementPlan;
pub use projection::{Projection, Shape};
pub use query::{JoinKind, OrderTerm, QueryContext, Selection};
pub use resolver::{ResolvedColumn, TokenResolver};
pub use schema::{
    ColumnBuilder, ColumnDefinition, Define, Entity, IndexDefinition, MappingRegistry,
    SchemaDefinition, TableDefinition, define,
};
pub use value::{DataType, SqlType, Value};
