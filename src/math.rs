//! Mathematical utilities shared by the solar engines and the refraction model.
//!
//! Every transcendental function goes through this module so the `libm` feature can swap the
//! platform implementation for a pure Rust one with identical results everywhere.

#![allow(clippy::many_single_char_names)]

/// Mathematical constants
pub const PI: f64 = core::f64::consts::PI;

/// Converts degrees to radians.
#[inline]
pub const fn degrees_to_radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Converts radians to degrees.
#[inline]
pub const fn radians_to_degrees(radians: f64) -> f64 {
    radians.to_degrees()
}

/// Normalizes an angle in degrees to the range [0, 360).
pub fn normalize_degrees_0_to_360(degrees: f64) -> f64 {
    let normalized = degrees % 360.0;
    if normalized < 0.0 {
        normalized + 360.0
    } else {
        normalized
    }
}

/// Normalizes an angle in degrees to the range [-180, 180).
pub fn normalize_degrees_signed(degrees: f64) -> f64 {
    let normalized = normalize_degrees_0_to_360(degrees);
    if normalized >= 180.0 {
        normalized - 360.0
    } else {
        normalized
    }
}

/// Computes a polynomial using Horner's method for numerical stability.
///
/// Coefficients are ordered [a₀, a₁, a₂, ...] for a₀ + a₁x + a₂x² + ...
pub fn polynomial(coeffs: &[f64], x: f64) -> f64 {
    let Some(&last) = coeffs.last() else {
        return 0.0;
    };

    let mut result = last;
    for &coeff in coeffs.iter().rev().skip(1) {
        result = mul_add(result, x, coeff);
    }
    result
}

/// Computes sin(x) using the configured math backend.
#[inline]
pub fn sin(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.sin();

    #[cfg(feature = "libm")]
    return libm::sin(x);
}

/// Computes cos(x) using the configured math backend.
#[inline]
pub fn cos(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.cos();

    #[cfg(feature = "libm")]
    return libm::cos(x);
}

/// Computes tan(x) using the configured math backend.
#[inline]
pub fn tan(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.tan();

    #[cfg(feature = "libm")]
    return libm::tan(x);
}

/// Computes asin(x) using the configured math backend.
#[inline]
pub fn asin(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.asin();

    #[cfg(feature = "libm")]
    return libm::asin(x);
}

/// Computes acos(x) using the configured math backend.
#[inline]
pub fn acos(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.acos();

    #[cfg(feature = "libm")]
    return libm::acos(x);
}

/// Computes atan(x) using the configured math backend.
#[inline]
pub fn atan(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.atan();

    #[cfg(feature = "libm")]
    return libm::atan(x);
}

/// Computes atan2(y, x) using the configured math backend.
#[inline]
pub fn atan2(y: f64, x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return y.atan2(x);

    #[cfg(feature = "libm")]
    return libm::atan2(y, x);
}

/// Computes sqrt(x) using the configured math backend.
#[inline]
pub fn sqrt(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.sqrt();

    #[cfg(feature = "libm")]
    return libm::sqrt(x);
}

/// Computes e^x using the configured math backend.
#[inline]
pub fn exp(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.exp();

    #[cfg(feature = "libm")]
    return libm::exp(x);
}

/// Computes floor(x) using the configured math backend.
#[inline]
pub fn floor(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.floor();

    #[cfg(feature = "libm")]
    return libm::floor(x);
}

/// Rounds half away from zero using the configured math backend.
#[inline]
pub fn round(x: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.round();

    #[cfg(feature = "libm")]
    return libm::round(x);
}

/// Computes (x * a) + b with only one rounding error (fused multiply-add).
#[inline]
pub fn mul_add(x: f64, a: f64, b: f64) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.mul_add(a, b);

    #[cfg(feature = "libm")]
    return libm::fma(x, a, b);
}

/// Computes x^n for integer n.
#[inline]
pub fn powi(x: f64, n: i32) -> f64 {
    #[cfg(not(feature = "libm"))]
    return x.powi(n);

    #[cfg(feature = "libm")]
    return libm::pow(x, f64::from(n));
}
