//! Store-neutral values and the Rust types that map onto them.

mod drivers;
mod types;

pub use types::*;

use std::borrow::Cow;

/// A value bound to a placeholder or read back from a result row.
#[derive(Debug, Clone, PartialEq, PartialOrd, Default)]
pub enum Value {
    /// NULL value
    #[default]
    Null,
    /// Integer value (i64)
    Integer(i64),
    /// Real value (f64)
    Real(f64),
    /// Text value (owned string)
    Text(String),
    /// Blob value (owned binary data)
    Blob(Box<[u8]>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Storage class name, used in conversion errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Integer(_) => "INTEGER",
            Value::Real(_) => "REAL",
            Value::Text(_) => "TEXT",
            Value::Blob(_) => "BLOB",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Text(s) => write!(f, "'{s}'"),
            Value::Blob(b) => write!(f, "X'{}'", b.iter().map(|byte| format!("{byte:02X}")).collect::<String>()),
        }
    }
}

/// Declared SQL type of a mapped column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Integer,
    BigInt,
    Double,
    Boolean,
    Varchar,
    Blob,
    Date,
    Time,
    Timestamp,
}

impl DataType {
    /// Type name used in `CREATE TABLE`.
    pub fn sql_name(self, max_length: Option<u32>) -> Cow<'static, str> {
        match self {
            DataType::Integer => Cow::Borrowed("INT"),
            DataType::BigInt => Cow::Borrowed("BIGINT"),
            DataType::Double => Cow::Borrowed("DOUBLE"),
            DataType::Boolean => Cow::Borrowed("BOOLEAN"),
            DataType::Varchar => match max_length {
                Some(length) => Cow::Owned(format!("VARCHAR({length})")),
                None => Cow::Borrowed("VARCHAR"),
            },
            DataType::Blob => Cow::Borrowed("BLOB"),
            DataType::Date => Cow::Borrowed("DATE"),
            DataType::Time => Cow::Borrowed("TIME"),
            DataType::Timestamp => Cow::Borrowed("TIMESTAMP"),
        }
    }

    pub fn is_integer(self) -> bool {
        matches!(self, DataType::Integer | DataType::BigInt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varchar_carries_max_length() {
        assert_eq!(DataType::Varchar.sql_name(Some(40)), "VARCHAR(40)");
        assert_eq!(DataType::Varchar.sql_name(None), "VARCHAR");
        assert_eq!(DataType::Integer.sql_name(Some(40)), "INT");
    }

    #[test]
    fn display_quotes_text() {
        assert_eq!(Value::Text("Chai".into()).to_string(), "'Chai'");
        assert_eq!(Value::Integer(3).to_string(), "3");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
