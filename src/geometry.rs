//! Coordinate engine
//!
//! Pure conversions between the polar and Cartesian descriptions of a cockpit.
//!
//! Angle convention used everywhere in this crate:
//! - angles are in degrees, measured from the positive x-axis;
//! - with `is_clockwise = true` the angle grows toward -y;
//! - [`cartesian_to_polar`] returns theta in `[0, 360)`, and `0` at the origin.
//!
//! Fit charts are measured clockwise, so the record pipeline always passes
//! [`CLOCKWISE`].

/// Direction used by [`to_cartesian`] and [`to_polar`].
pub const CLOCKWISE: bool = true;

/// Full turn in degrees. Normalized angles lie in `[0, FULL_TURN)`.
pub const FULL_TURN: f64 = 360.0;

/// Map any finite angle into `[0, 360)`. NaN stays NaN.
#[inline]
pub fn normalize_degrees(theta: f64) -> f64 {
    let t = theta.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negatives up to exactly 360.0 and keeps -0.0
    if t >= FULL_TURN {
        0.0
    } else {
        t + 0.0
    }
}

/// Smallest absolute distance between two angles, in degrees (`0..=180`).
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let d = normalize_degrees(a - b);
    d.min(FULL_TURN - d)
}

/// Convert a polar coordinate (degrees) to Cartesian `(x, y)`.
#[inline]
pub fn polar_to_cartesian(r: f64, theta: f64, is_clockwise: bool) -> (f64, f64) {
    let (sin, cos) = theta.to_radians().sin_cos();
    let y = r * sin;
    (r * cos, if is_clockwise { -y } else { y })
}

/// Convert a Cartesian point to polar `(r, theta)`, theta in `[0, 360)`.
///
/// Inverse of [`polar_to_cartesian`] for the same `is_clockwise` flag.
#[inline]
pub fn cartesian_to_polar(x: f64, y: f64, is_clockwise: bool) -> (f64, f64) {
    let r = x.hypot(y);
    if x == 0.0 && y == 0.0 {
        return (r, 0.0);
    }
    let y = if is_clockwise { -y } else { y };
    (r, normalize_degrees(y.atan2(x).to_degrees()))
}

/// Express `(x, y)` in a frame whose origin sits at `(origin_x, origin_y)`.
#[inline]
pub fn shift_coordinates(x: f64, y: f64, origin_x: f64, origin_y: f64) -> (f64, f64) {
    (x - origin_x, y - origin_y)
}

/// Saddle-frame polar measurements to bottom-bracket-frame Cartesian.
///
/// Returns `(handlebar_x, handlebar_y, saddle_x, saddle_y)`; the saddle pair is
/// the position of the old origin after moving the bottom bracket to `(0, 0)`.
pub fn to_cartesian(
    r_to_handlebar: f64,
    theta_to_handlebar: f64,
    r_to_bottom_bracket: f64,
    theta_to_bottom_bracket: f64,
) -> (f64, f64, f64, f64) {
    let (hx, hy) = polar_to_cartesian(r_to_handlebar, theta_to_handlebar, CLOCKWISE);
    let (bx, by) = polar_to_cartesian(r_to_bottom_bracket, theta_to_bottom_bracket, CLOCKWISE);

    let (handlebar_x, handlebar_y) = shift_coordinates(hx, hy, bx, by);
    let (saddle_x, saddle_y) = shift_coordinates(0.0, 0.0, bx, by);

    (handlebar_x, handlebar_y, saddle_x, saddle_y)
}

/// Bottom-bracket-frame Cartesian to saddle-frame polar measurements.
///
/// Returns `(r_to_handlebar, theta_to_handlebar, r_to_bottom_bracket,
/// theta_to_bottom_bracket)`.
pub fn to_polar(
    handlebar_x: f64,
    handlebar_y: f64,
    saddle_x: f64,
    saddle_y: f64,
) -> (f64, f64, f64, f64) {
    let (hx, hy) = shift_coordinates(handlebar_x, handlebar_y, saddle_x, saddle_y);
    let (bx, by) = shift_coordinates(0.0, 0.0, saddle_x, saddle_y);

    let (r_to_handlebar, theta_to_handlebar) = cartesian_to_polar(hx, hy, CLOCKWISE);
    let (r_to_bottom_bracket, theta_to_bottom_bracket) = cartesian_to_polar(bx, by, CLOCKWISE);

    (
        r_to_handlebar,
        theta_to_handlebar,
        r_to_bottom_bracket,
        theta_to_bottom_bracket,
    )
}
