use serde::{Deserialize, Serialize};
use std::fmt;

/// A single value read back from the warehouse, or expected by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Scalar {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(v) => Some(*v as f64),
            Scalar::Real(v) => Some(*v),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Null => None,
        }
    }

    /// Compares two scalars the way a data-quality check expects.
    ///
    /// Numbers compare by value regardless of representation, and text that
    /// parses as a number compares numerically. Drivers that only return text
    /// (for example `NUMERIC` columns) still match integer expectations.
    pub fn matches(&self, expected: &Scalar) -> bool {
        match (self, expected) {
            (Scalar::Null, Scalar::Null) => true,
            (Scalar::Null, _) | (_, Scalar::Null) => false,
            (Scalar::Text(a), Scalar::Text(b)) => a == b,
            _ => match (self.as_f64(), expected.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "NULL"),
            Scalar::Integer(v) => write!(f, "{}", v),
            Scalar::Real(v) => write!(f, "{}", v),
            Scalar::Text(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Integer(value)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Integer(value as i64)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Real(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_matches_real_and_numeric_text() {
        assert!(Scalar::Integer(5).matches(&Scalar::Real(5.0)));
        assert!(Scalar::Text("5".to_string()).matches(&Scalar::Integer(5)));
        assert!(Scalar::Text(" 12.50 ".to_string()).matches(&Scalar::Real(12.5)));
        assert!(!Scalar::Integer(4).matches(&Scalar::Integer(5)));
    }

    #[test]
    fn test_null_only_matches_null() {
        assert!(Scalar::Null.matches(&Scalar::Null));
        assert!(!Scalar::Null.matches(&Scalar::Integer(0)));
        assert!(!Scalar::Integer(0).matches(&Scalar::Null));
    }

    #[test]
    fn test_text_compares_exactly_when_not_numeric() {
        assert!(Scalar::from("paid").matches(&Scalar::from("paid")));
        assert!(!Scalar::from("paid").matches(&Scalar::from("free")));
        assert!(!Scalar::from("paid").matches(&Scalar::Integer(1)));
    }

    #[test]
    fn test_deserializes_untagged_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            value: Scalar,
        }
        let int: Wrapper = toml::from_str("value = 3").unwrap();
        assert_eq!(int.value, Scalar::Integer(3));
        let real: Wrapper = toml::from_str("value = 1.5").unwrap();
        assert_eq!(real.value, Scalar::Real(1.5));
        let text: Wrapper = toml::from_str("value = \"free\"").unwrap();
        assert_eq!(text.value, Scalar::Text("free".to_string()));
    }
}
