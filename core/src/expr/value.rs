use super::{context::Context, position::Span};
use std::{cmp, fmt, rc::Rc};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    /// Value as a float.
    /// Converts `Int` to `f64`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(value) => *value as f64,
            Self::Float(value) => *value,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Self::Int(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
        }
    }

    /// Truth value, zero is false.
    pub fn truth(&self) -> bool {
        !self.is_zero()
    }

    pub fn from_bool(value: bool) -> Self {
        Self::Int(value.into())
    }

    /// Compare two numbers for equality.
    /// `Int` and `Float` are compared as values.
    pub fn num_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => left == right,
            (left, right) => left.as_f64() == right.as_f64(),
        }
    }

    /// Compare two numbers for ordering.
    /// `Int` and `Float` are compared as values.
    /// `None` if either is `NaN`.
    pub fn num_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        match (self, other) {
            (Self::Int(left), Self::Int(right)) => Some(left.cmp(right)),
            (left, right) => left.as_f64().partial_cmp(&right.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 => {
                write!(f, "{value:.1}")
            }
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

/// Result of evaluating an expression.
#[derive(Debug, Clone)]
pub struct Value {
    pub number: Number,

    /// Span of the expression that produced the value.
    pub span: Span,
    pub context: Rc<Context>,
}

impl Value {
    pub fn new(number: Number, span: Span, context: Rc<Context>) -> Self {
        Self {
            number,
            span,
            context,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn number_display() {
        assert_eq!(Number::Int(0).to_string(), "0");
        assert_eq!(Number::Int(-14).to_string(), "-14");
        assert_eq!(Number::Float(3.0).to_string(), "3.0");
        assert_eq!(Number::Float(0.5).to_string(), "0.5");
        assert_eq!(Number::Float(f64::INFINITY).to_string(), "inf");
    }

    #[test]
    fn number_compare() {
        assert!(Number::Int(2).num_eq(&Number::Float(2.0)));
        assert!(!Number::Float(f64::NAN).num_eq(&Number::Float(f64::NAN)));
        assert_eq!(
            Number::Int(1).num_cmp(&Number::Float(1.5)),
            Some(cmp::Ordering::Less)
        );
        assert_eq!(Number::Int(1).num_cmp(&Number::Float(f64::NAN)), None);
    }

    #[test]
    fn number_zero_is_falsy() {
        assert!(Number::Int(0).is_zero());
        assert!(Number::Float(-0.0).is_zero());
        assert!(Number::Float(0.1).truth());
        assert!(Number::Int(-1).truth());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn number_serde() {
        let json = serde_json::to_string(&Number::Int(3)).unwrap();
        assert_eq!(json, r#"{"Int":3}"#);
        let number: Number = serde_json::from_str(r#"{"Float":0.5}"#).unwrap();
        assert_eq!(number, Number::Float(0.5));
    }
}
