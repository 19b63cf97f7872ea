//! Nearest-point lookup for pointer inspection.

use crate::mapper::CoordinateMapper;

/// Nearest visible tick to a pointer at price-pane local `(x, y)`.
///
/// The pointer must be inside the plot horizontally and inside the price pane vertically.
/// Ties resolve to the leftmost index.
pub fn hit_test(mapper: &CoordinateMapper<'_>, x: f64, y: f64) -> Option<usize> {
    let geometry = mapper.geometry();
    if !(0.0..=geometry.height).contains(&y) {
        return None;
    }
    nearest_on_axis(mapper, x)
}

/// Nearest visible tick to `x` with no vertical gate (time axis clicks).
pub fn nearest_on_axis(mapper: &CoordinateMapper<'_>, x: f64) -> Option<usize> {
    let geometry = mapper.geometry();
    if !(geometry.padding.left..=geometry.plot_right()).contains(&x) {
        return None;
    }

    let visible = mapper.viewport().visible_range()?;

    let mut nearest = visible.first;
    let mut min_distance = f64::INFINITY;
    for index in visible.indices() {
        let distance = (mapper.index_to_screen_x(index) - x).abs();
        if distance < min_distance {
            min_distance = distance;
            nearest = index;
        }
    }

    Some(nearest)
}
