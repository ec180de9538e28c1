use std::borrow::Cow;

use crate::alias::ColumnToken;
use crate::sql::tokens::Token;
use crate::value::Value;

/// A SQL chunk represents a part of an SQL statement.
///
/// - `Token` - SQL keywords and operators (SELECT, FROM, =, etc.)
/// - `Ident` - table and column names, written as declared
/// - `Raw` - unquoted raw SQL text (alias names, `T1.*`)
/// - `Number` - inline unsigned literal (ordinals, LIMIT/OFFSET)
/// - `Param` - a bound value, rendered as `?`
/// - `Column` - a column handle, resolved against the query's aliases at render
/// - `Function` - a function name, directly followed by its argument list
#[derive(Debug, Clone)]
pub enum SQLChunk {
    Token(Token),
    Ident(Cow<'static, str>),
    Raw(Cow<'static, str>),
    Number(usize),
    Param(Value),
    Column(ColumnToken),
    Function(&'static str),
}

impl SQLChunk {
    /// Whether this chunk reads as a word and needs separating spaces.
    pub(crate) fn is_word_like(&self) -> bool {
        match self {
            SQLChunk::Token(token) => !token.is_punctuation() && !token.is_operator(),
            SQLChunk::Ident(_)
            | SQLChunk::Raw(_)
            | SQLChunk::Number(_)
            | SQLChunk::Param(_)
            | SQLChunk::Column(_)
            | SQLChunk::Function(_) => true,
        }
    }
}

impl From<Token> for SQLChunk {
    fn from(value: Token) -> Self {
        SQLChunk::Token(value)
    }
}

impl From<ColumnToken> for SQLChunk {
    fn from(value: ColumnToken) -> Self {
        SQLChunk::Column(value)
    }
}
