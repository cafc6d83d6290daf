//! Collaborators consumed by the sampler and the distribution functions.
//!
//! The engine never touches a global generator. Random draws come from a
//! [`StandardNormalSource`] and a [`UniformSource`], special functions from a
//! [`GammaFunctions`] provider. All three take `&self`; implementations that
//! carry state are responsible for their own synchronization.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Produces independent standard-normal draws.
pub trait StandardNormalSource {
    fn next_normal(&self) -> f64;
}

/// Produces independent uniform draws in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&self) -> f64;
}

/// Log-Gamma and the regularized incomplete gamma functions.
///
/// Implementations must satisfy `lower_regularized(a, y) +
/// upper_regularized(a, y) == 1` for every `a > 0, y >= 0`.
pub trait GammaFunctions {
    /// `ln Γ(a)` for `a > 0`.
    fn log_gamma(&self, a: f64) -> f64;

    /// `P(a, y)`, in `[0, 1]`.
    fn lower_regularized(&self, a: f64, y: f64) -> f64;

    /// `Q(a, y) = 1 - P(a, y)`, in `[0, 1]`.
    fn upper_regularized(&self, a: f64, y: f64) -> f64;
}

impl<T: StandardNormalSource + ?Sized> StandardNormalSource for &T {
    fn next_normal(&self) -> f64 {
        (**self).next_normal()
    }
}

impl<T: StandardNormalSource + ?Sized> StandardNormalSource for Arc<T> {
    fn next_normal(&self) -> f64 {
        (**self).next_normal()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for &T {
    fn next_uniform(&self) -> f64 {
        (**self).next_uniform()
    }
}

impl<T: UniformSource + ?Sized> UniformSource for Arc<T> {
    fn next_uniform(&self) -> f64 {
        (**self).next_uniform()
    }
}

impl<T: GammaFunctions + ?Sized> GammaFunctions for &T {
    fn log_gamma(&self, a: f64) -> f64 {
        (**self).log_gamma(a)
    }

    fn lower_regularized(&self, a: f64, y: f64) -> f64 {
        (**self).lower_regularized(a, y)
    }

    fn upper_regularized(&self, a: f64, y: f64) -> f64 {
        (**self).upper_regularized(a, y)
    }
}

impl<T: GammaFunctions + ?Sized> GammaFunctions for Arc<T> {
    fn log_gamma(&self, a: f64) -> f64 {
        (**self).log_gamma(a)
    }

    fn lower_regularized(&self, a: f64, y: f64) -> f64 {
        (**self).lower_regularized(a, y)
    }

    fn upper_regularized(&self, a: f64, y: f64) -> f64 {
        (**self).upper_regularized(a, y)
    }
}

// ============================================================================
// rand-backed sources
// ============================================================================

/// A `rand` generator behind a mutex, usable as both normal and uniform source.
///
/// One `RngSource` shared by reference between the two roles gives a single
/// reproducible stream for a given seed.
#[derive(Debug)]
pub struct RngSource<R = StdRng> {
    rng: Mutex<R>,
}

impl RngSource<StdRng> {
    /// Deterministic source for a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Source seeded from the operating system's entropy.
    pub fn from_os() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut R) -> T) -> T {
        // A panic mid-draw cannot leave the generator in an invalid state.
        let mut guard = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<R: Rng> StandardNormalSource for RngSource<R> {
    fn next_normal(&self) -> f64 {
        self.with_rng(|rng| rng.sample(StandardNormal))
    }
}

impl<R: Rng> UniformSource for RngSource<R> {
    fn next_uniform(&self) -> f64 {
        self.with_rng(|rng| rng.random::<f64>())
    }
}

/// Draws from the calling thread's `rand::rng()` generator.
///
/// Stateless handle: each thread gets its own generator, so no locking.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl ThreadRngSource {
    fn rng() -> ThreadRng {
        rand::rng()
    }
}

impl StandardNormalSource for ThreadRngSource {
    fn next_normal(&self) -> f64 {
        Self::rng().sample(StandardNormal)
    }
}

impl UniformSource for ThreadRngSource {
    fn next_uniform(&self) -> f64 {
        Self::rng().random::<f64>()
    }
}

// ============================================================================
// Deterministic source
// ============================================================================

/// Replays a fixed sequence of values, cycling when exhausted.
///
/// Serves as either a normal or a uniform source. Intended for tests and for
/// reproducing a specific rejection-loop path.
#[derive(Debug)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceSource {
    /// # Panics
    /// If `values` is empty.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        let values = values.into();
        assert!(!values.is_empty(), "SequenceSource needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of values handed out so far.
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    fn next_value(&self) -> f64 {
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.values[idx % self.values.len()]
    }
}

impl StandardNormalSource for SequenceSource {
    fn next_normal(&self) -> f64 {
        self.next_value()
    }
}

impl UniformSource for SequenceSource {
    fn next_uniform(&self) -> f64 {
        self.next_value()
    }
}

// ============================================================================
// Special functions
// ============================================================================

/// Lanczos log-Gamma and series/continued-fraction incomplete gamma from
/// `gv-math`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericalGamma;

impl GammaFunctions for NumericalGamma {
    fn log_gamma(&self, a: f64) -> f64 {
        gv_math::log_gamma(a)
    }

    fn lower_regularized(&self, a: f64, y: f64) -> f64 {
        gv_math::gamma_p(a, y)
    }

    fn upper_regularized(&self, a: f64, y: f64) -> f64 {
        gv_math::gamma_q(a, y)
    }
}
