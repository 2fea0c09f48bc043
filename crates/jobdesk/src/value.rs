//! Dynamic scalar values carried by field maps.
//!
//! Field maps hold values of mixed type (strings, numbers, booleans, null)
//! whose concrete SQL type is only known once the statement is prepared, so
//! [`FieldValue`] encodes itself against whatever type the server inferred
//! for its placeholder.

use bytes::BytesMut;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};

/// A single field value: string, number, boolean, or null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl FieldValue {
    /// Truthiness as the original request semantics define it: `false`, zero,
    /// NaN, the empty string, and null are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Int(n) => *n != 0,
            FieldValue::Float(f) => *f != 0.0 && !f.is_nan(),
            FieldValue::Bool(b) => *b,
            FieldValue::Null => false,
        }
    }

    /// Whether this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => FieldValue::Null,
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            FieldValue::Text(s) => s.as_str().to_sql(ty, out),
            // Integers narrow to the width the statement inferred for the
            // placeholder; out-of-range values fail here instead of sending
            // a mis-sized binary payload.
            FieldValue::Int(n) => {
                if *ty == Type::INT2 {
                    i16::try_from(*n)?.to_sql(ty, out)
                } else if *ty == Type::INT4 {
                    i32::try_from(*n)?.to_sql(ty, out)
                } else {
                    n.to_sql(ty, out)
                }
            }
            FieldValue::Float(f) => {
                if *ty == Type::FLOAT4 {
                    (*f as f32).to_sql(ty, out)
                } else {
                    f.to_sql(ty, out)
                }
            }
            FieldValue::Bool(b) => b.to_sql(ty, out),
            FieldValue::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        // The inferred placeholder type drives encoding; a null must also be
        // bindable at any type.
        true
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_matches_request_semantics() {
        assert!(FieldValue::Text("x".into()).is_truthy());
        assert!(!FieldValue::Text(String::new()).is_truthy());
        assert!(FieldValue::Int(-3).is_truthy());
        assert!(!FieldValue::Int(0).is_truthy());
        assert!(FieldValue::Float(0.5).is_truthy());
        assert!(!FieldValue::Float(0.0).is_truthy());
        assert!(!FieldValue::Float(f64::NAN).is_truthy());
        assert!(FieldValue::Bool(true).is_truthy());
        assert!(!FieldValue::Bool(false).is_truthy());
        assert!(!FieldValue::Null.is_truthy());
    }

    #[test]
    fn conversions_preserve_value() {
        assert_eq!(FieldValue::from("a"), FieldValue::Text("a".into()));
        assert_eq!(FieldValue::from(7i32), FieldValue::Int(7));
        assert_eq!(FieldValue::from(false), FieldValue::Bool(false));
        assert_eq!(FieldValue::from(None::<i32>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some(2i64)), FieldValue::Int(2));
    }

    #[test]
    fn null_encodes_as_is_null() {
        let mut buf = BytesMut::new();
        let res = FieldValue::Null.to_sql(&Type::TEXT, &mut buf).unwrap();
        assert!(matches!(res, IsNull::Yes));
        assert!(buf.is_empty());
    }

    #[test]
    fn int_narrows_to_inferred_width() {
        let mut buf = BytesMut::new();
        FieldValue::Int(42).to_sql(&Type::INT4, &mut buf).unwrap();
        assert_eq!(buf.len(), 4);

        let mut buf = BytesMut::new();
        FieldValue::Int(42).to_sql(&Type::INT8, &mut buf).unwrap();
        assert_eq!(buf.len(), 8);
    }

    #[test]
    fn int_out_of_range_for_width_errors() {
        let mut buf = BytesMut::new();
        assert!(FieldValue::Int(i64::MAX).to_sql(&Type::INT4, &mut buf).is_err());
    }
}
