// Math utilities and helper functions

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Divide `numerator` by `denominator`, mapping an undefined quotient (`0 / 0`) to zero.
///
/// Infinite quotients are returned unchanged so callers can filter them out.
pub fn safe_ratio(numerator: f32, denominator: f32) -> f32 {
    let ratio = numerator / denominator;
    if ratio.is_nan() {
        0.0
    } else {
        ratio
    }
}
