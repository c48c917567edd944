use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::{ContourError, FileError, Result};
use crate::model::ContourPointSet;

/// Key holding the point mapping in segmentation-tool exports.
pub const DEFAULT_CONTOUR_KEY: &str = "voxel_coordinates";

/// Loads the contour point mapping stored under `key` in a JSON file.
///
/// # Errors
///
/// Returns `FileError::Open` if the file cannot be opened,
/// `ContourError::Malformed` if it is not valid JSON or holds malformed
/// points, and `ContourError::MissingKey` if `key` is absent.
pub fn load_contour_file(path: impl AsRef<Path>, key: &str) -> Result<ContourPointSet> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| FileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let document: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ContourError::Malformed {
            context: path.display().to_string(),
            message: e.to_string(),
        })?;
    parse_contour_document(document, key)
}

/// Extracts the point mapping stored under `key` from a parsed document.
///
/// # Errors
///
/// Same as [`load_contour_file`], minus file access.
pub fn parse_contour_document(document: Value, key: &str) -> Result<ContourPointSet> {
    let Value::Object(mut entries) = document else {
        return Err(ContourError::Malformed {
            context: "contour file".into(),
            message: "top level is not a JSON object".into(),
        }
        .into());
    };
    debug!(keys = ?entries.keys().collect::<Vec<_>>(), "contour file entries");

    let mapping = entries.remove(key).ok_or_else(|| ContourError::MissingKey {
        key: key.to_owned(),
    })?;
    let points = ContourPointSet::from_json(mapping)?;
    debug!(
        keys = points.key_count(),
        points = points.point_count(),
        "loaded contour points"
    );
    Ok(points)
}
