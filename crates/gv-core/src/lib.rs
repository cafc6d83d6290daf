//! Gamma Variate Core - sampling and evaluation of the Gamma distribution.
//!
//! The distribution is parameterized by shape `a` (alpha, k) and scale `b`
//! (theta = 1/beta). [`GammaVariate`] draws variates with the Marsaglia–Tsang
//! rejection sampler and evaluates the density and cumulative distribution.
//!
//! Random draws and special functions come from injected collaborators (see
//! [`source`]), so the engine holds no global state and can be driven by
//! deterministic sources in tests.

pub mod config;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod params;
pub mod source;
pub mod variate;

pub use error::{GammaError, Result};
pub use params::GammaParams;
pub use source::{
    GammaFunctions, NumericalGamma, RngSource, SequenceSource, StandardNormalSource,
    ThreadRngSource, UniformSource,
};
pub use variate::{GammaVariate, DEFAULT_MAX_ITERATIONS};
