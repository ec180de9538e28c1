//! Conversions between field types and [`Value`].
//!
//! Every field mapped to a column implements [`SqlType`]. Reading is lenient
//! in the same places SQLite is (an integral REAL reads as an integer, a
//! numeric TEXT parses), and strict everywhere else.

use super::{DataType, Value};
use crate::error::{QuarryError, Result};

/// A Rust type that can be stored in a mapped column.
pub trait SqlType: Sized + 'static {
    const DATA_TYPE: DataType;
    const NULLABLE: bool = false;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(value: &Value, type_name: &str) -> Result<T> {
    Err(QuarryError::Mapping(format!(
        "cannot convert {} value {} to {}",
        value.kind(),
        value,
        type_name
    )))
}

fn checked_real_to_int(value: f64, type_name: &str) -> Result<i64> {
    if !value.is_finite() || value % 1.0 != 0.0 {
        return Err(QuarryError::Mapping(format!(
            "cannot convert non-integer REAL {value} to {type_name}"
        )));
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(QuarryError::Mapping(format!(
            "REAL {value} out of range for {type_name}"
        )));
    }
    Ok(value as i64)
}

fn integer_of(value: Value, type_name: &str) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(i),
        Value::Real(r) => checked_real_to_int(r, type_name),
        Value::Text(ref s) => s.trim().parse().or_else(|_| mismatch(&value, type_name)),
        other => mismatch(&other, type_name),
    }
}

macro_rules! impl_sql_type_int {
    ($($ty:ty => $data_type:expr),+ $(,)?) => {
        $(
            impl SqlType for $ty {
                const DATA_TYPE: DataType = $data_type;

                fn to_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self> {
                    let wide = integer_of(value, stringify!($ty))?;
                    <$ty>::try_from(wide).map_err(|e| {
                        QuarryError::Mapping(format!(
                            "{} out of range for {}: {}",
                            wide,
                            stringify!($ty),
                            e
                        ))
                    })
                }
            }
        )+
    };
}

impl_sql_type_int!(
    i16 => DataType::Integer,
    i32 => DataType::Integer,
    i64 => DataType::BigInt,
);

impl SqlType for f64 {
    const DATA_TYPE: DataType = DataType::Double;

    fn to_value(&self) -> Value {
        Value::Real(*self)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Real(r) => Ok(r),
            Value::Integer(i) => Ok(i as f64),
            Value::Text(ref s) => s.trim().parse().or_else(|_| mismatch(&value, "f64")),
            other => mismatch(&other, "f64"),
        }
    }
}

impl SqlType for bool {
    const DATA_TYPE: DataType = DataType::Boolean;

    fn to_value(&self) -> Value {
        Value::Integer(i64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Integer(i) => Ok(i != 0),
            Value::Text(ref s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::Text(ref s) if s.eq_ignore_ascii_case("false") => Ok(false),
            other => mismatch(&other, "bool"),
        }
    }
}

impl SqlType for String {
    const DATA_TYPE: DataType = DataType::Varchar;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(s) => Ok(s),
            Value::Integer(i) => Ok(i.to_string()),
            Value::Real(r) => Ok(r.to_string()),
            other => mismatch(&other, "String"),
        }
    }
}

impl SqlType for Vec<u8> {
    const DATA_TYPE: DataType = DataType::Blob;

    fn to_value(&self) -> Value {
        Value::Blob(self.clone().into_boxed_slice())
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Blob(b) => Ok(b.into_vec()),
            Value::Text(s) => Ok(s.into_bytes()),
            other => mismatch(&other, "Vec<u8>"),
        }
    }
}

impl<T: SqlType> SqlType for Option<T> {
    const DATA_TYPE: DataType = T::DATA_TYPE;
    const NULLABLE: bool = true;

    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(feature = "chrono")]
mod chrono_types {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    const DATE_FORMAT: &str = "%Y-%m-%d";
    const TIME_FORMAT: &str = "%H:%M:%S%.f";
    const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

    fn text_of(value: Value, type_name: &str) -> Result<String> {
        match value {
            Value::Text(s) => Ok(s),
            other => mismatch(&other, type_name),
        }
    }

    fn parse_error(text: &str, type_name: &str, e: chrono::ParseError) -> QuarryError {
        QuarryError::Mapping(format!("cannot parse '{text}' as {type_name}: {e}"))
    }

    impl SqlType for NaiveDate {
        const DATA_TYPE: DataType = DataType::Date;

        fn to_value(&self) -> Value {
            Value::Text(self.format(DATE_FORMAT).to_string())
        }

        fn from_value(value: Value) -> Result<Self> {
            let text = text_of(value, "NaiveDate")?;
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map_err(|e| parse_error(&text, "NaiveDate", e))
        }
    }

    impl SqlType for NaiveTime {
        const DATA_TYPE: DataType = DataType::Time;

        fn to_value(&self) -> Value {
            Value::Text(self.format(TIME_FORMAT).to_string())
        }

        fn from_value(value: Value) -> Result<Self> {
            let text = text_of(value, "NaiveTime")?;
            NaiveTime::parse_from_str(&text, TIME_FORMAT)
                .map_err(|e| parse_error(&text, "NaiveTime", e))
        }
    }

    impl SqlType for NaiveDateTime {
        const DATA_TYPE: DataType = DataType::Timestamp;

        fn to_value(&self) -> Value {
            Value::Text(self.format(TIMESTAMP_FORMAT).to_string())
        }

        fn from_value(value: Value) -> Result<Self> {
            let text = text_of(value, "NaiveDateTime")?;
            NaiveDateTime::parse_from_str(&text, TIMESTAMP_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S%.f"))
                .map_err(|e| parse_error(&text, "NaiveDateTime", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_narrow_with_range_check() {
        assert_eq!(i32::from_value(Value::Integer(17)).unwrap(), 17);
        assert_eq!(i32::from_value(Value::Real(6.0)).unwrap(), 6);
        assert!(i32::from_value(Value::Integer(i64::MAX)).is_err());
        assert!(i32::from_value(Value::Real(6.5)).is_err());
    }

    #[test]
    fn real_at_two_to_the_63_is_out_of_range() {
        assert!(matches!(
            i64::from_value(Value::Real(9_223_372_036_854_775_808.0)),
            Err(QuarryError::Mapping(_))
        ));
        assert_eq!(
            i64::from_value(Value::Real(9.0e18)).unwrap(),
            9_000_000_000_000_000_000
        );
        assert_eq!(
            i64::from_value(Value::Real(-9_223_372_036_854_775_808.0)).unwrap(),
            i64::MIN
        );
    }

    #[test]
    fn null_only_reads_into_option() {
        assert!(String::from_value(Value::Null).is_err());
        assert_eq!(Option::<String>::from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<f64>::from_value(Value::Real(19.5)).unwrap(),
            Some(19.5)
        );
    }

    #[test]
    fn option_keeps_inner_data_type() {
        assert_eq!(<Option<i64> as SqlType>::DATA_TYPE, DataType::BigInt);
        assert!(<Option<i64> as SqlType>::NULLABLE);
        assert!(!<i64 as SqlType>::NULLABLE);
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn dates_round_trip_through_text() {
        use chrono::{NaiveDate, NaiveDateTime};

        let date = NaiveDate::from_ymd_opt(2007, 1, 2).unwrap();
        assert_eq!(date.to_value(), Value::Text("2007-01-02".into()));

        let stamp = NaiveDateTime::from_value(Value::Text("2005-05-05 05:05:05".into())).unwrap();
        assert_eq!(stamp.to_value(), Value::Text("2005-05-05 05:05:05".into()));
    }
}
