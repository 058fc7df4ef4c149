//! Value comparison and rendering contracts
//!
//! Snapshot comparison never looks at value representations itself. Every
//! equality decision goes through a [`ValueComparator`] and every diagnostic
//! string through a [`Stringifier`], both injected by the caller.

use crate::{Value, ValueMap};

/// Default tolerance used by [`ApproxComparator`]
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Semantic equality between two values
///
/// Implementations must be reflexive and deterministic.
pub trait ValueComparator {
    fn compare(&self, a: &Value, b: &Value) -> bool;
}

impl<F> ValueComparator for F
where
    F: Fn(&Value, &Value) -> bool,
{
    fn compare(&self, a: &Value, b: &Value) -> bool {
        self(a, b)
    }
}

/// Best-effort rendering of a value for diagnostics
pub trait Stringifier {
    fn render(&self, value: &Value) -> String;
}

impl<F> Stringifier for F
where
    F: Fn(&Value) -> String,
{
    fn render(&self, value: &Value) -> String {
        self(value)
    }
}

/// Renders values through their `Display` implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct DisplayStringifier;

impl Stringifier for DisplayStringifier {
    fn render(&self, value: &Value) -> String {
        value.to_string()
    }
}

/// Structural equality with a tolerance on floats
///
/// Lists and maps are compared element by element. Values of different
/// types never match, so `Int(1)` and `Float(1.0)` differ.
///
/// # Example
///
/// ```
/// use resync_core::{ApproxComparator, Value, ValueComparator};
///
/// let cmp = ApproxComparator::new(1e-3);
/// assert!(cmp.compare(&Value::Float(1.0), &Value::Float(1.0005)));
/// assert!(!cmp.compare(&Value::Float(1.0), &Value::Float(1.01)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproxComparator {
    epsilon: f64,
}

impl ApproxComparator {
    /// Create a comparator with the given float tolerance
    pub fn new(epsilon: f64) -> Self {
        Self {
            epsilon: epsilon.abs(),
        }
    }

    fn floats_equal(&self, a: f64, b: f64) -> bool {
        if a.is_nan() || b.is_nan() {
            return a.is_nan() && b.is_nan();
        }
        // Covers matching infinities, whose difference is NaN.
        a == b || (a - b).abs() <= self.epsilon
    }

    fn maps_equal(&self, a: &ValueMap, b: &ValueMap) -> bool {
        a.len() == b.len()
            && a.iter().all(|(key, value_a)| match b.get(key) {
                Some(value_b) => self.compare(value_a, value_b),
                None => false,
            })
    }
}

impl Default for ApproxComparator {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl ValueComparator for ApproxComparator {
    fn compare(&self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Float(f1), Value::Float(f2)) => self.floats_equal(*f1, *f2),
            (Value::List(l1), Value::List(l2)) => {
                l1.len() == l2.len() && l1.iter().zip(l2).all(|(x, y)| self.compare(x, y))
            }
            (Value::Map(m1), Value::Map(m2)) => self.maps_equal(m1, m2),
            _ => a == b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_tolerance() {
        let cmp = ApproxComparator::default();
        assert!(cmp.compare(&Value::Float(0.1 + 0.2), &Value::Float(0.3)));
        assert!(!cmp.compare(&Value::Float(0.3), &Value::Float(0.31)));
    }

    #[test]
    fn test_reflexive_on_special_floats() {
        let cmp = ApproxComparator::default();
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY, 0.0] {
            assert!(cmp.compare(&Value::Float(f), &Value::Float(f)));
        }
        assert!(!cmp.compare(&Value::Float(f64::INFINITY), &Value::Float(f64::NEG_INFINITY)));
    }

    #[test]
    fn test_types_must_match() {
        let cmp = ApproxComparator::default();
        assert!(!cmp.compare(&Value::Int(1), &Value::Float(1.0)));
        assert!(!cmp.compare(&Value::Null, &Value::Bool(false)));
    }

    #[test]
    fn test_composites() {
        let cmp = ApproxComparator::new(0.01);
        let a = Value::from(vec![1.0f64, 2.0]);
        let b = Value::from(vec![1.001f64, 2.0]);
        assert!(cmp.compare(&a, &b));
        assert!(!cmp.compare(&a, &Value::from(vec![1.0f64])));

        let mut m1 = ValueMap::new();
        m1.insert("x".into(), Value::Float(1.0));
        let mut m2 = ValueMap::new();
        m2.insert("x".into(), Value::Float(1.005));
        assert!(cmp.compare(&Value::Map(m1.clone()), &Value::Map(m2)));

        let mut m3 = ValueMap::new();
        m3.insert("y".into(), Value::Float(1.0));
        assert!(!cmp.compare(&Value::Map(m1), &Value::Map(m3)));
    }

    #[test]
    fn test_closures_are_injectable() {
        let exact = |a: &Value, b: &Value| a == b;
        assert!(exact.compare(&Value::Int(2), &Value::Int(2)));

        let render = |v: &Value| format!("<{}>", v.type_name());
        assert_eq!(render.render(&Value::Int(2)), "<int>");
        assert_eq!(DisplayStringifier.render(&Value::Int(2)), "2");
    }
}
