//! Validated distribution parameters.

use crate::error::{GammaError, Result};
use serde::Serialize;

/// Shape and scale of a Gamma distribution.
///
/// Uses **scale parameterization**: `Gamma(a, b)` where:
/// - `a` = shape (alpha, k), `a > 0`
/// - `b` = scale (theta = 1/beta), `b > 0`
///
/// The density is: `f(x) = x^(a-1) e^(-x/b) / (Γ(a) b^a)`
///
/// Both values are guaranteed finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GammaParams {
    shape: f64,
    scale: f64,
}

impl GammaParams {
    /// Validate a `(shape, scale)` pair.
    ///
    /// # Errors
    /// `InvalidParameter` if either value is NaN, infinite, or not > 0.
    pub fn new(shape: f64, scale: f64) -> Result<Self> {
        check_positive("shape", shape)?;
        check_positive("scale", scale)?;
        Ok(Self { shape, scale })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// E[X] = a·b
    pub fn mean(&self) -> f64 {
        self.shape * self.scale
    }

    /// Var[X] = a·b²
    pub fn variance(&self) -> f64 {
        self.shape * self.scale * self.scale
    }

    /// 2/√a, independent of scale.
    pub fn skewness(&self) -> f64 {
        2.0 / self.shape.sqrt()
    }

    /// 6/a
    pub fn excess_kurtosis(&self) -> f64 {
        6.0 / self.shape
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_nan() {
        return Err(GammaError::invalid(name, value, "must not be NaN"));
    }
    if value.is_infinite() {
        return Err(GammaError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(GammaError::invalid(name, value, "must be > 0"));
    }
    Ok(())
}

/// Reject a NaN evaluation point. Every other real `x` is in the domain.
pub(crate) fn check_point(x: f64) -> Result<()> {
    if x.is_nan() {
        return Err(GammaError::invalid("x", x, "must not be NaN"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_finite_values() {
        let params = GammaParams::new(2.5, 0.5).unwrap();
        assert_eq!(params.shape(), 2.5);
        assert_eq!(params.scale(), 0.5);
    }

    #[test]
    fn moments() {
        let params = GammaParams::new(3.0, 2.0).unwrap();
        assert_eq!(params.mean(), 6.0);
        assert_eq!(params.variance(), 12.0);
        assert_eq!(GammaParams::new(4.0, 9.0).unwrap().skewness(), 1.0);
        assert_eq!(params.excess_kurtosis(), 2.0);
    }

    #[test]
    fn rejects_non_positive_shape() {
        for shape in [0.0, -0.0, -1.0] {
            let err = GammaParams::new(shape, 1.0).unwrap_err();
            assert!(
                matches!(err, GammaError::InvalidParameter { name: "shape", .. }),
                "shape={} should be rejected, got {:?}",
                shape,
                err
            );
        }
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = GammaParams::new(1.0, 0.0).unwrap_err();
        assert!(matches!(err, GammaError::InvalidParameter { name: "scale", .. }));
    }

    #[test]
    fn rejects_non_finite() {
        assert!(GammaParams::new(f64::NAN, 1.0).is_err());
        assert!(GammaParams::new(1.0, f64::NAN).is_err());
        assert!(GammaParams::new(f64::INFINITY, 1.0).is_err());
        assert!(GammaParams::new(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn nan_point_rejected_infinite_point_allowed() {
        assert!(check_point(f64::NAN).is_err());
        assert!(check_point(f64::INFINITY).is_ok());
        assert!(check_point(-3.0).is_ok());
    }
}
