//! Joint angle geometry
//!
//! Two flavours of the angle at a vertex `b` between rays `b→a` and `b→c`:
//! - [`angle`]: signed bearing difference, normalized into [0°, 360°)
//! - [`vector_angle`]: unsigned dot-product angle in [0°, 180°]

/// Returned by [`vector_angle`] when either ray has zero length.
pub const DEGENERATE_ANGLE: f32 = 90.0;

/// Rays shorter than this are treated as zero length
const MIN_RAY_LENGTH: f32 = 1e-6;

/// Bearing of the vector `from → to` in degrees, in (-180°, 180°]
pub fn bearing(from: (f32, f32), to: (f32, f32)) -> f32 {
    (to.1 - from.1).atan2(to.0 - from.0).to_degrees()
}

/// Euclidean distance between two points
pub fn distance(a: (f32, f32), b: (f32, f32)) -> f32 {
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    (dx * dx + dy * dy).sqrt()
}

/// Signed angle at `b` from ray `b→a` to ray `b→c`, in degrees
///
/// Computed as `bearing(b, c) - bearing(b, a)`; negative results wrap by
/// +360°. Swapping `a` and `c` mirrors the result (θ becomes 360° − θ), so
/// callers must pass points in a consistent anatomical order.
///
/// Always returns a value in [0, 360).
pub fn angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    let mut ang = bearing(b, c) - bearing(b, a);
    if ang < 0.0 {
        ang += 360.0;
    }
    // -ε + 360 rounds to exactly 360 in f32
    if ang >= 360.0 {
        ang -= 360.0;
    }
    ang
}

/// Unsigned angle at `b` between `b→a` and `b→c`, in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|),
/// with cos(θ) clamped to [-1, 1] before `acos`.
///
/// Returns `None` when either ray has zero length.
pub fn try_vector_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if mag1 < MIN_RAY_LENGTH || mag2 < MIN_RAY_LENGTH {
        return None;
    }

    let dot = v1.0 * v2.0 + v1.1 * v2.1;
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);

    Some(cos_angle.acos().to_degrees())
}

/// Unsigned angle at `b`, in [0°, 180°]
///
/// Degenerate geometry (a zero-length ray) yields [`DEGENERATE_ANGLE`].
/// Use [`try_vector_angle`] to detect that case explicitly.
pub fn vector_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> f32 {
    try_vector_angle(a, b, c).unwrap_or(DEGENERATE_ANGLE)
}
