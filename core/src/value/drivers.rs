//! Database driver implementations for Value

#[cfg(feature = "rusqlite")]
use super::Value;
#[cfg(feature = "rusqlite")]
use crate::error::QuarryError;

//------------------------------------------------------------------------------
// rusqlite implementations
//------------------------------------------------------------------------------

#[cfg(feature = "rusqlite")]
impl rusqlite::ToSql for Value {
    fn to_sql(&self) -> ::rusqlite::Result<::rusqlite::types::ToSqlOutput<'_>> {
        match self {
            Value::Null => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Null,
            )),
            Value::Integer(i) => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Integer(*i),
            )),
            Value::Real(f) => Ok(rusqlite::types::ToSqlOutput::Owned(
                rusqlite::types::Value::Real(*f),
            )),
            Value::Text(s) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                rusqlite::types::ValueRef::Text(s.as_bytes()),
            )),
            Value::Blob(b) => Ok(rusqlite::types::ToSqlOutput::Borrowed(
                rusqlite::types::ValueRef::Blob(b.as_ref()),
            )),
        }
    }
}

#[cfg(feature = "rusqlite")]
impl rusqlite::types::FromSql for Value {
    fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
        Value::try_from(value).map_err(|e| rusqlite::types::FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(feature = "rusqlite")]
impl TryFrom<rusqlite::types::ValueRef<'_>> for Value {
    type Error = QuarryError;

    /// Fails with [`QuarryError::Mapping`] on TEXT that is not UTF-8.
    fn try_from(value: rusqlite::types::ValueRef<'_>) -> Result<Self, Self::Error> {
        Ok(match value {
            rusqlite::types::ValueRef::Null => Value::Null,
            rusqlite::types::ValueRef::Integer(i) => Value::Integer(i),
            rusqlite::types::ValueRef::Real(r) => Value::Real(r),
            rusqlite::types::ValueRef::Text(items) => {
                let text = std::str::from_utf8(items)
                    .map_err(|e| QuarryError::Mapping(format!("TEXT value is not UTF-8: {e}")))?;
                Value::Text(text.to_owned())
            }
            rusqlite::types::ValueRef::Blob(items) => Value::Blob(items.to_vec().into_boxed_slice()),
        })
    }
}

#[cfg(all(test, feature = "rusqlite"))]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn values_bind_and_read_back() {
        let conn = Connection::open_in_memory().unwrap();
        let values = [
            Value::Integer(7),
            Value::Real(2.5),
            Value::Text("Ikura".into()),
            Value::Null,
        ];
        let read: Vec<Value> = conn
            .query_row(
                "SELECT ?, ?, ?, ?",
                rusqlite::params_from_iter(values.iter()),
                |row| (0..4).map(|i| row.get::<_, Value>(i)).collect(),
            )
            .unwrap();
        assert_eq!(read, values);
    }

    #[test]
    fn invalid_utf8_text_is_a_mapping_error() {
        let conn = Connection::open_in_memory().unwrap();
        let read = conn
            .query_row("SELECT CAST(x'c328' AS TEXT)", [], |row| {
                Ok(Value::try_from(row.get_ref(0)?))
            })
            .unwrap();
        assert!(matches!(read, Err(QuarryError::Mapping(_))));

        let via_from_sql = conn.query_row("SELECT CAST(x'c328' AS TEXT)", [], |row| {
            row.get::<_, Value>(0)
        });
        assert!(via_from_sql.is_err());
    }
}
