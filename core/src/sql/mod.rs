mod chunk;
mod tokens;

pub use chunk::*;
pub use tokens::*;

use core::fmt::Write;
use std::borrow::Cow;

use smallvec::SmallVec;

use crate::alias::ColumnToken;
use crate::error::Result;
use crate::prepared::PreparedStatementPlan;
use crate::resolver::TokenResolver;
use crate::value::Value;

/// SQL fragment builder with flat chunk storage.
///
/// Uses `SmallVec<[SQLChunk; 8]>` for inline storage of typical SQL fragments
/// without heap allocation.
#[derive(Debug, Clone, Default)]
pub struct SQL {
    pub chunks: SmallVec<[SQLChunk; 8]>,
}

impl SQL {
    // ==================== constructors ====================

    /// Creates an empty SQL fragment
    #[inline]
    pub const fn empty() -> Self {
        Self {
            chunks: SmallVec::new_const(),
        }
    }

    /// Creates SQL with a single token
    #[inline]
    pub fn token(t: Token) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Token(t)],
        }
    }

    /// Creates SQL with a table or column name
    #[inline]
    pub fn ident(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Ident(name.into())],
        }
    }

    /// Creates SQL with raw text
    #[inline]
    pub fn raw(text: impl Into<Cow<'static, str>>) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Raw(text.into())],
        }
    }

    /// Creates SQL with a single unsigned integer literal.
    #[inline]
    pub fn number(value: usize) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Number(value)],
        }
    }

    /// Creates SQL with a single parameter value
    #[inline]
    pub fn param(value: Value) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Param(value)],
        }
    }

    /// Creates SQL referencing a column handle
    #[inline]
    pub fn column(token: ColumnToken) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Column(token)],
        }
    }

    /// Creates SQL for a function call: NAME(args)
    #[inline]
    pub fn func(name: &'static str, args: SQL) -> Self {
        Self {
            chunks: smallvec::smallvec![SQLChunk::Function(name), SQLChunk::Token(Token::LPAREN)],
        }
        .append(args)
        .push(Token::RPAREN)
    }

    // ==================== builder methods ====================

    /// Append another SQL fragment (flat extend)
    #[inline]
    pub fn append(mut self, other: impl Into<SQL>) -> Self {
        let other = other.into();
        if self.chunks.is_empty() {
            return other;
        }
        self.chunks.extend(other.chunks);
        self
    }

    /// Push a single chunk
    #[inline]
    pub fn push(mut self, chunk: impl Into<SQLChunk>) -> Self {
        self.chunks.push(chunk.into());
        self
    }

    /// Joins multiple SQL fragments with a separator
    pub fn join<I>(sqls: I, separator: Token) -> SQL
    where
        I: IntoIterator<Item = SQL>,
    {
        let mut result = SQL::empty();
        for (i, sql) in sqls.into_iter().enumerate() {
            if i > 0 {
                result.chunks.push(SQLChunk::Token(separator));
            }
            result.chunks.extend(sql.chunks);
        }
        result
    }

    /// Wrap in parentheses: (self)
    #[inline]
    pub fn parens(self) -> Self {
        SQL::token(Token::LPAREN).append(self).push(Token::RPAREN)
    }

    /// Creates a comma-separated list of parameters.
    pub fn param_list<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        SQL::join(values.into_iter().map(SQL::param), Token::COMMA)
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    // ==================== output methods ====================

    /// Renders the SQL text and collects the parameters in a single pass.
    ///
    /// Placeholders and values come from the same walk over the chunk list,
    /// so the n-th `?` always binds the n-th parameter. Column chunks are
    /// resolved through `resolver`; an unknown handle fails the whole render.
    pub fn build(&self, resolver: &TokenResolver) -> Result<PreparedStatementPlan> {
        let mut buf = String::with_capacity(self.chunks.len().saturating_mul(8).max(64));
        let mut params: SmallVec<[Value; 8]> = SmallVec::new();

        for (i, chunk) in self.chunks.iter().enumerate() {
            match chunk {
                SQLChunk::Token(token) => buf.push_str(token.as_str()),
                SQLChunk::Ident(name) | SQLChunk::Raw(name) => buf.push_str(name),
                SQLChunk::Number(n) => {
                    let _ = write!(buf, "{n}");
                }
                SQLChunk::Param(value) => {
                    buf.push('?');
                    params.push(value.clone());
                }
                SQLChunk::Column(token) => resolver.resolve(*token)?.write_to(&mut buf),
                SQLChunk::Function(name) => buf.push_str(name),
            }

            if self.needs_space(i) {
                buf.push(' ');
            }
        }

        Ok(PreparedStatementPlan::new(buf, params))
    }

    /// Simplified spacing logic
    fn needs_space(&self, index: usize) -> bool {
        let Some(next) = self.chunks.get(index + 1) else {
            return false;
        };
        chunk_needs_space(&self.chunks[index], next)
    }

    /// Returns an iterator over the parameter values in placeholder order
    pub fn params(&self) -> impl Iterator<Item = &Value> {
        self.chunks.iter().filter_map(|chunk| match chunk {
            SQLChunk::Param(value) => Some(value),
            _ => None,
        })
    }
}

/// Spacing rules between two adjacent chunks.
pub(crate) fn chunk_needs_space(current: &SQLChunk, next: &SQLChunk) -> bool {
    match (current, next) {
        // No space before closing/separator punctuation
        (_, SQLChunk::Token(Token::RPAREN | Token::COMMA)) => false,
        // No space after opening punctuation
        (SQLChunk::Token(Token::LPAREN), _) => false,
        // Function names hug their argument list
        (SQLChunk::Function(_), SQLChunk::Token(Token::LPAREN)) => false,
        // Space after comma
        (SQLChunk::Token(Token::COMMA), _) => true,
        // Space around comparison operators
        (SQLChunk::Token(t), _) if t.is_operator() => true,
        (_, SQLChunk::Token(t)) if t.is_operator() => true,
        // Space after closing paren if next is word-like (e.g., ") AND")
        (SQLChunk::Token(Token::RPAREN), next) => next.is_word_like(),
        // Space before opening paren if preceded by word-like (e.g., "WHERE (")
        (current, SQLChunk::Token(Token::LPAREN)) => current.is_word_like(),
        // Space between all word-like chunks
        _ => current.is_word_like() && next.is_word_like(),
    }
}

// ==================== trait implementations ====================

impl From<Token> for SQL {
    fn from(value: Token) -> Self {
        SQL::token(value)
    }
}

impl From<SQLChunk> for SQL {
    fn from(value: SQLChunk) -> Self {
        Self {
            chunks: smallvec::smallvec![value],
        }
    }
}

impl FromIterator<SQLChunk> for SQL {
    fn from_iter<I: IntoIterator<Item = SQLChunk>>(iter: I) -> Self {
        Self {
            chunks: SmallVec::from_iter(iter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(sql: &SQL) -> String {
        sql.build(&TokenResolver::default()).unwrap().sql().to_owned()
    }

    #[test]
    fn spacing_follows_punctuation() {
        let sql = SQL::token(Token::SELECT)
            .append(SQL::func("COUNT", SQL::token(Token::STAR)))
            .push(Token::FROM)
            .append(SQL::ident("Product"))
            .push(Token::WHERE)
            .append(
                SQL::ident("unit_price")
                    .push(Token::GT)
                    .append(SQL::param(Value::Real(30.0)))
                    .parens(),
            );
        assert_eq!(
            render(&sql),
            "SELECT COUNT(*) FROM Product WHERE (unit_price > ?)"
        );
    }

    #[test]
    fn build_collects_params_in_placeholder_order() {
        let sql = SQL::token(Token::VALUES).append(
            SQL::param_list([Value::Integer(1), Value::Text("Chai".into()), Value::Null]).parens(),
        );
        let plan = sql.build(&TokenResolver::default()).unwrap();
        assert_eq!(plan.sql(), "VALUES (?, ?, ?)");
        assert_eq!(
            plan.params(),
            &[Value::Integer(1), Value::Text("Chai".into()), Value::Null]
        );
        assert_eq!(sql.params().count(), 3);
    }

    #[test]
    fn join_skips_leading_separator() {
        let sql = SQL::join(
            [SQL::ident("a"), SQL::ident("b"), SQL::ident("c")],
            Token::COMMA,
        );
        assert_eq!(render(&sql), "a, b, c");
        assert!(SQL::join(Vec::new(), Token::COMMA).is_empty());
    }
}
