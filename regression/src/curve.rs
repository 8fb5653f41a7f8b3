use ndarray::{Array1, ArrayView1};

/// A parametric curve with a fixed number of trainable coefficients.
///
/// A `Curve` only defines how to evaluate itself and how loss derivatives
/// map back onto its coefficients. It does not:
/// - own coefficients,
/// - access sample sets,
/// - implement the update rule.
pub trait Curve: Send + Sync {
    /// Number of scalar coefficients expected in `coeffs` and `grad`.
    fn num_coeffs(&self) -> usize;

    /// Evaluates the curve elementwise over `xs`.
    ///
    /// Works for any length, down to a single sample.
    fn predict(&self, coeffs: &[f32], xs: ArrayView1<f32>) -> Array1<f32>;

    /// Accumulates `dL/dcoef` into `grad`, given the per-sample loss
    /// derivative `dL/dy` in `error`.
    ///
    /// Implementations must add to `grad` rather than overwrite it; the
    /// caller zeroes the buffer between steps.
    fn gradient(
        &self,
        coeffs: &[f32],
        xs: ArrayView1<f32>,
        error: ArrayView1<f32>,
        grad: &mut [f32],
    );
}

impl<C: Curve + ?Sized> Curve for Box<C> {
    fn num_coeffs(&self) -> usize {
        (**self).num_coeffs()
    }

    fn predict(&self, coeffs: &[f32], xs: ArrayView1<f32>) -> Array1<f32> {
        (**self).predict(coeffs, xs)
    }

    fn gradient(
        &self,
        coeffs: &[f32],
        xs: ArrayView1<f32>,
        error: ArrayView1<f32>,
        grad: &mut [f32],
    ) {
        (**self).gradient(coeffs, xs, error, grad)
    }
}

/// `y = a*x + b`, coefficients `[a, b]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Line;

impl Curve for Line {
    fn num_coeffs(&self) -> usize {
        2
    }

    fn predict(&self, coeffs: &[f32], xs: ArrayView1<f32>) -> Array1<f32> {
        let (a, b) = (coeffs[0], coeffs[1]);
        xs.mapv(|x| a * x + b)
    }

    fn gradient(
        &self,
        _coeffs: &[f32],
        xs: ArrayView1<f32>,
        error: ArrayView1<f32>,
        grad: &mut [f32],
    ) {
        for (&x, &e) in xs.iter().zip(error.iter()) {
            grad[0] += e * x;
            grad[1] += e;
        }
    }
}

/// `y = a*x^2 + b*x + c`, coefficients `[a, b, c]`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Parabola;

impl Curve for Parabola {
    fn num_coeffs(&self) -> usize {
        3
    }

    fn predict(&self, coeffs: &[f32], xs: ArrayView1<f32>) -> Array1<f32> {
        let (a, b, c) = (coeffs[0], coeffs[1], coeffs[2]);
        xs.mapv(|x| a * x * x + b * x + c)
    }

    fn gradient(
        &self,
        _coeffs: &[f32],
        xs: ArrayView1<f32>,
        error: ArrayView1<f32>,
        grad: &mut [f32],
    ) {
        for (&x, &e) in xs.iter().zip(error.iter()) {
            grad[0] += e * x * x;
            grad[1] += e * x;
            grad[2] += e;
        }
    }
}
