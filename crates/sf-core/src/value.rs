//! Signal values and the known-value map.
//!
//! Every signal carries a column vector of `f64`. Scalars are vectors of length
//! one and broadcast against longer operands in elementwise operations.

use std::collections::BTreeMap;

use nalgebra::DVector;

use crate::error::{CoreError, CoreResult};

/// Mapping from fully qualified signal name to its value at one time instant.
pub type SignalMap = BTreeMap<String, Value>;

/// One sample of a (possibly vector-valued) signal.
#[derive(Clone, Debug, PartialEq)]
pub struct Value(DVector<f64>);

impl Value {
    pub fn scalar(v: f64) -> Self {
        Self(DVector::from_element(1, v))
    }

    pub fn filled(len: usize, v: f64) -> Self {
        Self(DVector::from_element(len, v))
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self(DVector::from_column_slice(values))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_scalar(&self) -> bool {
        self.0.len() == 1
    }

    /// The value if this is a length-one signal.
    pub fn as_scalar(&self) -> Option<f64> {
        if self.is_scalar() { Some(self.0[0]) } else { None }
    }

    pub fn first(&self) -> Option<f64> {
        self.0.iter().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn as_vector(&self) -> &DVector<f64> {
        &self.0
    }

    pub fn into_vector(self) -> DVector<f64> {
        self.0
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        Self(self.0.map(f))
    }

    pub fn scale(&self, k: f64) -> Value {
        Self(&self.0 * k)
    }

    /// Elementwise binary operation with scalar broadcasting.
    pub fn zip_with(
        &self,
        other: &Value,
        what: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> CoreResult<Value> {
        if self.len() == other.len() {
            return Ok(Self(self.0.zip_map(&other.0, f)));
        }
        if let Some(a) = self.as_scalar() {
            return Ok(other.map(|b| f(a, b)));
        }
        if let Some(b) = other.as_scalar() {
            return Ok(self.map(|a| f(a, b)));
        }
        Err(CoreError::ShapeMismatch {
            what,
            left: self.len(),
            right: other.len(),
        })
    }

    /// `a + alpha * (b - a)`, elementwise.
    pub fn lerp(a: &Value, b: &Value, alpha: f64) -> CoreResult<Value> {
        a.zip_with(b, "interpolation", |x, y| x + alpha * (y - x))
    }

    /// Stack several values into one vector, in order.
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a Value>) -> Value {
        let data: Vec<f64> = parts.into_iter().flat_map(|v| v.iter()).collect();
        Self(DVector::from_vec(data))
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::scalar(0.0)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::scalar(v)
    }
}

impl From<Vec<f64>> for Value {
    fn from(values: Vec<f64>) -> Self {
        Self(DVector::from_vec(values))
    }
}

impl From<DVector<f64>> for Value {
    fn from(values: DVector<f64>) -> Self {
        Self(values)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = <Vec<f64> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(Value::from(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_accessors() {
        let v = Value::scalar(2.5);
        assert!(v.is_scalar());
        assert_eq!(v.as_scalar(), Some(2.5));
        assert_eq!(Value::from(vec![1.0, 2.0]).as_scalar(), None);
    }

    #[test]
    fn zip_broadcasts_scalars() {
        let v = Value::from(vec![1.0, 2.0, 3.0]);
        let k = Value::scalar(10.0);
        let sum = v.zip_with(&k, "test", |a, b| a + b).unwrap();
        assert_eq!(sum.as_slice(), &[11.0, 12.0, 13.0]);
        let diff = k.zip_with(&v, "test", |a, b| a - b).unwrap();
        assert_eq!(diff.as_slice(), &[9.0, 8.0, 7.0]);
    }

    #[test]
    fn zip_rejects_mismatched_vectors() {
        let a = Value::from(vec![1.0, 2.0]);
        let b = Value::from(vec![1.0, 2.0, 3.0]);
        let err = a.zip_with(&b, "test", |x, y| x + y).unwrap_err();
        assert!(matches!(
            err,
            CoreError::ShapeMismatch {
                left: 2,
                right: 3,
                ..
            }
        ));
    }

    #[test]
    fn concat_stacks_in_order() {
        let bus = Value::concat([&Value::scalar(1.0), &Value::from(vec![2.0, 3.0])]);
        assert_eq!(bus.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn lerp_midpoint() {
        let mid = Value::lerp(&Value::scalar(2.0), &Value::scalar(4.0), 0.5).unwrap();
        assert_eq!(mid.as_scalar(), Some(3.0));
    }
}
