use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ContourError, Result};

/// A contour sample in voxel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ContourPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ContourPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// The value stored under one key of an export: either a single point or
/// the list of points sampled along one spline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PointEntry {
    Single(ContourPoint),
    Sequence(Vec<ContourPoint>),
}

impl PointEntry {
    #[must_use]
    pub fn points(&self) -> &[ContourPoint] {
        match self {
            Self::Single(point) => std::slice::from_ref(point),
            Self::Sequence(points) => points,
        }
    }
}

/// All boundary samples of one structure, across every slice.
///
/// Keys are held in sorted order so iteration is deterministic. The
/// rasterized result never depends on key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContourPointSet {
    entries: BTreeMap<String, PointEntry>,
}

impl ContourPointSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a single point under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, point: ContourPoint) {
        self.entries.insert(key.into(), PointEntry::Single(point));
    }

    /// Stores a list of points under `key`, replacing any previous entry.
    pub fn insert_sequence(&mut self, key: impl Into<String>, points: Vec<ContourPoint>) {
        self.entries.insert(key.into(), PointEntry::Sequence(points));
    }

    /// Number of keys.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of points over all keys.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.entries.values().map(|e| e.points().len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Iterates `(key, index within key, point)` over every stored point.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize, &ContourPoint)> {
        self.entries.iter().flat_map(|(key, entry)| {
            entry
                .points()
                .iter()
                .enumerate()
                .map(move |(index, point)| (key.as_str(), index, point))
        })
    }

    /// Builds a point set from the JSON object mapping keys to points.
    ///
    /// # Errors
    ///
    /// Returns `ContourError::Malformed` if `value` is not an object or an
    /// entry is neither a point record nor a list of point records. The
    /// message names the offending key.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(ContourError::Malformed {
                context: "contour point mapping".into(),
                message: format!("expected an object, found {}", json_kind(&value)),
            }
            .into());
        };

        let mut entries = BTreeMap::new();
        for (key, raw) in map {
            let entry = PointEntry::deserialize(&raw).map_err(|_| ContourError::Malformed {
                context: format!("point `{key}`"),
                message: format!(
                    "expected {{x, y, z}} numbers or a list of them, found {}",
                    json_kind(&raw)
                ),
            })?;
            entries.insert(key, entry);
        }
        Ok(Self { entries })
    }
}

impl FromIterator<(String, ContourPoint)> for ContourPointSet {
    fn from_iter<T: IntoIterator<Item = (String, ContourPoint)>>(iter: T) -> Self {
        let mut set = Self::new();
        for (key, point) in iter {
            set.insert(key, point);
        }
        set
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::MaskError;
    use serde_json::json;

    #[test]
    fn parses_single_records() {
        let set = ContourPointSet::from_json(json!({
            "0": {"x": 1.0, "y": 2.0, "z": 3.0},
            "1": {"x": 4, "y": 5, "z": 6},
        }))
        .unwrap();
        assert_eq!(set.key_count(), 2);
        assert_eq!(set.point_count(), 2);
        let (key, index, point) = set.iter().nth(1).unwrap();
        assert_eq!((key, index), ("1", 0));
        assert_eq!(*point, ContourPoint::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn parses_point_lists() {
        let set = ContourPointSet::from_json(json!({
            "spline_a": [
                {"x": 1.0, "y": 1.0, "z": 0.0},
                {"x": 2.0, "y": 1.0, "z": 0.0},
            ],
            "spline_b": {"x": 0.0, "y": 0.0, "z": 0.0},
        }))
        .unwrap();
        assert_eq!(set.key_count(), 2);
        assert_eq!(set.point_count(), 3);
        let indices: Vec<_> = set.iter().map(|(k, i, _)| (k.to_owned(), i)).collect();
        assert_eq!(
            indices,
            vec![
                ("spline_a".to_owned(), 0),
                ("spline_a".to_owned(), 1),
                ("spline_b".to_owned(), 0),
            ]
        );
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let err = ContourPointSet::from_json(json!({
            "7": {"x": "1.0", "y": 2.0, "z": 3.0},
        }))
        .unwrap_err();
        match err {
            MaskError::Contour(ContourError::Malformed { context, .. }) => {
                assert_eq!(context, "point `7`");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_object() {
        let err = ContourPointSet::from_json(json!([1, 2, 3])).unwrap_err();
        assert!(err.to_string().contains("expected an object, found an array"));
    }

    #[test]
    fn empty_mapping_is_empty() {
        let set = ContourPointSet::from_json(json!({})).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.iter().count(), 0);
    }
}
