//! Core units, constants, and shared primitives for the mortar fire calculator workspace.

/// Fire-control constants. Distances are metres unless stated otherwise.
pub mod constants {
    /// Angular mils in a full circle (NATO convention).
    pub const MILS_PER_CIRCLE: f64 = 6_400.0;
    /// Default width of the mortar-FO lane used by the on-axis check (m).
    pub const DEFAULT_LANE_WIDTH_M: f64 = 100.0;
    /// Default distance added to a charge's dispersion for the danger-close check (m).
    pub const DEFAULT_DANGER_CLOSE_MARGIN_M: f64 = 100.0;
    /// Target-elevation delta the ballistic sensitivity column is expressed against (m).
    pub const ELEVATION_SENSITIVITY_STEP_M: f64 = 100.0;
    /// Fewest guns that can walk a creeping barrage.
    pub const CREEPING_BARRAGE_MIN_GUNS: usize = 3;
}

/// Angle conversions between degrees, radians, and mils.
pub mod units {
    use super::constants::MILS_PER_CIRCLE;

    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to mils.
    #[inline]
    pub fn rad_to_mils(v: f64) -> f64 {
        v / std::f64::consts::PI * (MILS_PER_CIRCLE / 2.0)
    }

    /// Convert degrees to mils.
    #[inline]
    pub fn deg_to_mils(v: f64) -> f64 {
        v / 360.0 * MILS_PER_CIRCLE
    }

    /// Convert mils to degrees.
    #[inline]
    pub fn mils_to_deg(v: f64) -> f64 {
        v / MILS_PER_CIRCLE * 360.0
    }

    /// Wrap an angle in mils into `[0, 6400)`.
    #[inline]
    pub fn normalize_mils(v: f64) -> f64 {
        let wrapped = v.rem_euclid(MILS_PER_CIRCLE);
        // rem_euclid can round up to the modulus itself for tiny negative inputs
        if wrapped >= MILS_PER_CIRCLE { 0.0 } else { wrapped }
    }
}

/// Planar vector helpers over `[easting, northing]` pairs.
pub mod vector {
    /// Alias for a 2D vector in metres, `[easting, northing]`.
    pub type Vector2 = [f64; 2];

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[0] + a[1] * b[1]
    }

    /// Z component of the 3D cross product of two planar vectors.
    #[inline]
    pub fn cross(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[1] - a[1] * b[0]
    }

    /// Squared Euclidean norm.
    #[inline]
    pub fn norm_sq(v: &Vector2) -> f64 {
        dot(v, v)
    }

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        norm_sq(v).sqrt()
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] + b[0], a[1] + b[1]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }

    /// Unit vector along a compass bearing in radians, clockwise from north.
    ///
    /// Sine drives easting and cosine drives northing, so `0` points north and
    /// `π/2` points east.
    #[inline]
    pub fn from_bearing(bearing_rad: f64) -> Vector2 {
        [bearing_rad.sin(), bearing_rad.cos()]
    }
}

/// Linear interpolation over tabulated samples.
pub mod interpolation {
    /// Interpolate the value at `x` on the line through `(x1, y1)` and `(x2, y2)`.
    ///
    /// A degenerate bracket (`x1 == x2`) yields `y1` instead of dividing by zero.
    #[inline]
    pub fn lerp(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
        if x2 == x1 {
            return y1;
        }
        y1 + (x - x1) * (y2 - y1) / (x2 - x1)
    }
}
