use super::Pixel;

/// Computes the signed area of a closed pixel polygon (shoelace formula).
///
/// Positive for counter-clockwise in a y-up frame, negative for clockwise.
/// The sum is accumulated in `i64`, so the result is exact.
#[must_use]
pub fn signed_area_2d(points: &[Pixel]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum: i64 = 0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += i64::from(points[i].x) * i64::from(points[j].y)
            - i64::from(points[j].x) * i64::from(points[i].y);
    }
    #[allow(clippy::cast_precision_loss)]
    let twice = sum as f64;
    twice * 0.5
}

/// Unsigned enclosed area of a closed pixel polygon.
#[must_use]
pub fn polygon_area_2d(points: &[Pixel]) -> f64 {
    signed_area_2d(points).abs()
}

/// Compresses a closed border chain to its corner points.
///
/// Interior points of straight horizontal, vertical and diagonal runs are
/// dropped, so a traced axis-aligned rectangle reduces to its four corners.
/// A trailing point equal to the first is removed. The enclosed area is
/// unchanged.
#[must_use]
pub fn simplify_chain(points: &[Pixel]) -> Vec<Pixel> {
    let mut chain: Vec<Pixel> = Vec::with_capacity(points.len());
    for &pt in points {
        if chain.last() != Some(&pt) {
            chain.push(pt);
        }
    }
    while chain.len() > 1 && chain.first() == chain.last() {
        chain.pop();
    }
    let n = chain.len();
    if n < 3 {
        return chain;
    }

    let step = |a: Pixel, b: Pixel| ((b.x - a.x).signum(), (b.y - a.y).signum());
    let mut simplified = Vec::with_capacity(n);
    for i in 0..n {
        let prev = chain[(i + n - 1) % n];
        let cur = chain[i];
        let next = chain[(i + 1) % n];
        if step(prev, cur) != step(cur, next) {
            simplified.push(cur);
        }
    }
    simplified
}
