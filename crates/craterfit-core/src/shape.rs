/// Isoperimetric circularity `4π·area / perimeter²`.
///
/// A perfect disk scores `1.0`, elongated or ragged shapes score lower. A
/// non-positive (or NaN) perimeter marks a degenerate contour and yields exactly
/// `0.0` instead of an error.
#[inline]
pub fn circularity(area: f64, perimeter: f64) -> f64 {
    if perimeter.is_nan() || perimeter <= 0.0 {
        return 0.0;
    }
    4.0 * std::f64::consts::PI * area / (perimeter * perimeter)
}
