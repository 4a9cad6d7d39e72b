//! Image shapes with optionally-unknown dimensions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An ordered tuple of dimension sizes, where `None` marks a dimension that
/// is only known per record (typically height and width).
///
/// Static images are `(height, width, channels)`; frame sequences are
/// `(frames, height, width, channels)`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Shape(Vec<Option<usize>>);

impl Shape {
    pub fn new(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }

    /// A fully-known shape.
    pub fn fixed(dims: &[usize]) -> Self {
        Self(dims.iter().map(|&d| Some(d)).collect())
    }

    /// The scalar shape `()`.
    pub fn scalar() -> Self {
        Self(Vec::new())
    }

    pub fn dims(&self) -> &[Option<usize>] {
        &self.0
    }

    pub fn rank(&self) -> usize {
        self.0.len()
    }

    /// The channel count, i.e. the last dimension. `None` if the shape is
    /// scalar or the last dimension is unknown.
    pub fn channels(&self) -> Option<usize> {
        self.0.last().copied().flatten()
    }

    /// Checks a concrete shape against this one, treating unknown dimensions
    /// as wildcards. Ranks must agree.
    pub fn is_compatible_with(&self, concrete: &[usize]) -> bool {
        self.0.len() == concrete.len()
            && self
                .0
                .iter()
                .zip(concrete)
                .all(|(expected, actual)| expected.map_or(true, |e| e == *actual))
    }

    /// The same shape with a channel count of 0 ("keep the native count")
    /// turned into an unknown last dimension.
    pub fn with_native_channels(&self) -> Shape {
        let mut dims = self.0.clone();
        if let Some(last) = dims.last_mut() {
            if *last == Some(0) {
                *last = None;
            }
        }
        Shape(dims)
    }
}

impl Default for Shape {
    /// `(None, None, 3)`: an RGB image of any size.
    fn default() -> Self {
        Self(vec![None, None, Some(3)])
    }
}

impl From<Vec<Option<usize>>> for Shape {
    fn from(dims: Vec<Option<usize>>) -> Self {
        Self(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, dim) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match dim {
                Some(d) => write!(f, "{}", d)?,
                None => f.write_str("None")?,
            }
        }
        if self.0.len() == 1 {
            f.write_str(",")?;
        }
        f.write_str(")")
    }
}

/// Formats a concrete shape the same way `Shape` does.
pub(crate) fn format_dims(dims: &[usize]) -> String {
    Shape::fixed(dims).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards_match_any_size() {
        let shape = Shape::new(vec![None, None, Some(3)]);
        assert!(shape.is_compatible_with(&[4, 4, 3]));
        assert!(shape.is_compatible_with(&[1024, 7, 3]));
        assert!(!shape.is_compatible_with(&[4, 4, 1]));
    }

    #[test]
    fn test_zero_channels_accept_any_native_count() {
        let native = Shape::new(vec![None, None, Some(0)]).with_native_channels();
        assert_eq!(native, Shape::new(vec![None, None, None]));
        assert!(native.is_compatible_with(&[5, 7, 3]));
        assert!(native.is_compatible_with(&[5, 7, 1]));
        // Other channel counts are left alone.
        assert_eq!(Shape::default().with_native_channels(), Shape::default());
    }

    #[test]
    fn test_rank_must_agree() {
        let shape = Shape::default();
        assert!(!shape.is_compatible_with(&[4, 4]));
        assert!(!shape.is_compatible_with(&[1, 4, 4, 3]));
    }

    #[test]
    fn test_channels_and_display() {
        assert_eq!(Shape::default().channels(), Some(3));
        assert_eq!(Shape::new(vec![Some(2), None]).channels(), None);
        assert_eq!(Shape::default().to_string(), "(None, None, 3)");
        assert_eq!(Shape::scalar().to_string(), "()");
    }

    #[test]
    fn test_serde_uses_plain_list_with_nulls() {
        let json = serde_json::to_string(&Shape::default()).unwrap();
        assert_eq!(json, "[null,null,3]");
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Shape::default());
    }
}
