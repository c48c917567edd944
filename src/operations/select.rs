use super::trace::SliceContour;

/// Picks the contour with the largest enclosed area.
///
/// Ties keep the earliest contour in detection order. Returns `None` when
/// there are no contours or none of them encloses any area, since a lone
/// point or a line cannot be filled.
#[must_use]
pub fn largest_contour(contours: &[SliceContour]) -> Option<&SliceContour> {
    let mut best: Option<&SliceContour> = None;
    for contour in contours {
        if contour.area > best.map_or(0.0, |b| b.area) {
            best = Some(contour);
        }
    }
    best
}
