//! Numeric traits shared by the pricer crates.
//!
//! Model code is generic over [`Float`] so that pseudo-root matrices and
//! their bumps work for both `f64` and `f32`.

/// Generic floating-point trait for model parameters.
///
/// # Examples
/// ```
/// use pricer_core::traits::Float;
///
/// fn step_loading<T: Float>(vol: T, dt: T) -> T {
///     vol * dt.sqrt()
/// }
///
/// let loading: f64 = step_loading(0.2, 0.25);
/// assert!((loading - 0.1).abs() < 1e-12);
/// ```
pub use num_traits::Float;
