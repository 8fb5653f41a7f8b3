use log::debug;
use ndarray::{Array1, ArrayView1};

use crate::{
    coeffs::CoeffStore,
    curve::Curve,
    error::{RegressionErr, Result},
    loss::LossFn,
    samples::SampleSet,
};

/// Online curve-fitting engine.
///
/// Owns the coefficients, the sample set, and the training switch. Each
/// `train_step` performs exactly one full-batch gradient-descent update;
/// coefficients are long-lived running values, never recomputed from
/// scratch, so `(coefficients, samples, learning_rate)` fully determine a
/// step.
pub struct Trainer<C: Curve, L: LossFn> {
    curve: C,
    loss: L,
    coeffs: CoeffStore,
    grad: Vec<f32>,
    samples: SampleSet,
    learning_rate: f32,
    training: bool,
    last_loss: f32,
}

impl<C: Curve, L: LossFn> Trainer<C, L> {
    /// Creates a trainer with zeroed coefficients and an empty sample set.
    /// Training starts switched off.
    ///
    /// # Args
    /// * `curve` - The parametric curve being fitted.
    /// * `loss` - The full-batch loss function.
    /// * `learning_rate` - The length of each descent step.
    ///
    /// # Errors
    /// Fails when `learning_rate` is outside `[0, 1]`.
    pub fn new(curve: C, loss: L, learning_rate: f32) -> Result<Self> {
        check_learning_rate(learning_rate)?;

        let n = curve.num_coeffs();
        Ok(Self {
            coeffs: CoeffStore::new(n),
            grad: vec![0.0; n],
            samples: SampleSet::new(),
            curve,
            loss,
            learning_rate,
            training: false,
            last_loss: 0.0,
        })
    }

    /// Replaces the sample set wholesale, e.g. with one of the demo sets.
    pub fn with_samples(mut self, samples: SampleSet) -> Self {
        self.samples = samples;
        self
    }

    /// Appends one observation. Coefficients are left exactly as they are.
    pub fn add_point(&mut self, x: f32, y: f32) {
        self.samples.push(x, y);
    }

    /// Flips the cooperative pause switch read by each tick.
    ///
    /// Switching training off never interrupts a step in progress; it makes
    /// the following ticks no-ops.
    pub fn toggle_training(&mut self) -> bool {
        self.training = !self.training;
        self.training
    }

    pub fn is_training(&self) -> bool {
        self.training
    }

    /// Evaluates the curve at `xs` with the current coefficients.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn predict(&self, xs: ArrayView1<f32>) -> Result<Array1<f32>> {
        Ok(self.curve.predict(self.coeffs.values()?, xs))
    }

    /// Performs one full-batch gradient-descent update.
    ///
    /// A no-op returning `false` when the training switch is off or the
    /// sample set is empty. On a performed step, `last_loss` holds the loss
    /// measured before the coefficients moved.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn train_step(&mut self) -> Result<bool> {
        if !self.training || self.samples.is_empty() {
            return Ok(false);
        }

        let y_pred = self.curve.predict(self.coeffs.values()?, self.samples.xs());
        self.last_loss = self.loss.loss(y_pred.view(), self.samples.ys());

        let error = self.loss.loss_prime(y_pred.view(), self.samples.ys());
        self.grad.fill(0.0);
        self.curve.gradient(
            self.coeffs.values()?,
            self.samples.xs(),
            error.view(),
            &mut self.grad,
        );

        let lr = self.learning_rate;
        for (w, g) in self.coeffs.values_mut()?.iter_mut().zip(&self.grad) {
            *w -= lr * g;
        }

        debug!(loss = self.last_loss; "train step applied");
        Ok(true)
    }

    /// Current coefficients, `[a, b]` or `[a, b, c]`.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn coefficients(&self) -> Result<&[f32]> {
        self.coeffs.values()
    }

    /// Loss measured at the start of the latest performed step.
    pub fn last_loss(&self) -> f32 {
        self.last_loss
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Updates the learning rate, validating the new value first.
    ///
    /// # Errors
    /// Fails when `learning_rate` is outside `[0, 1]`; the old rate stays.
    pub fn set_learning_rate(&mut self, learning_rate: f32) -> Result<()> {
        check_learning_rate(learning_rate)?;
        self.learning_rate = learning_rate;
        Ok(())
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// Drops every observation. Coefficients keep their trained values;
    /// model reset is the separate `reset` operation.
    pub fn clear_samples(&mut self) {
        self.samples.clear();
    }

    /// Zeroes the coefficients and `last_loss`. The sample set is untouched.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn reset(&mut self) -> Result<()> {
        self.coeffs.reset()?;
        self.last_loss = 0.0;
        Ok(())
    }

    /// Releases the coefficient buffer. The trainer is unusable afterwards;
    /// hosts call this when the engine instance is discarded.
    pub fn release(&mut self) {
        self.coeffs.release();
    }
}

fn check_learning_rate(learning_rate: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&learning_rate) {
        return Err(RegressionErr::LearningRateOutOfRange { got: learning_rate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;
    use crate::{
        curve::{Line, Parabola},
        loss::Mse,
    };

    fn line_trainer(learning_rate: f32) -> Trainer<Line, Mse> {
        Trainer::new(Line, Mse::new(), learning_rate).unwrap()
    }

    #[test]
    fn learning_rate_is_validated() {
        assert!(Trainer::new(Line, Mse::new(), 0.0).is_ok());
        assert!(Trainer::new(Line, Mse::new(), 1.0).is_ok());
        assert!(matches!(
            Trainer::new(Line, Mse::new(), 1.5),
            Err(RegressionErr::LearningRateOutOfRange { .. })
        ));
        assert!(matches!(
            Trainer::new(Line, Mse::new(), -0.1),
            Err(RegressionErr::LearningRateOutOfRange { .. })
        ));
    }

    #[test]
    fn predict_uses_the_running_coefficients() {
        let mut trainer = line_trainer(0.1);
        trainer.coeffs.values_mut().unwrap().copy_from_slice(&[1.0, 0.0]);

        let ys = trainer.predict(array![2.0].view()).unwrap();
        assert_eq!(ys, array![2.0]);
    }

    #[test]
    fn one_step_on_a_convex_objective_decreases_the_loss() {
        let mut trainer = line_trainer(0.1);
        trainer.add_point(-1.0, -1.0);
        trainer.add_point(1.0, 1.0);
        trainer.toggle_training();

        assert!(trainer.train_step().unwrap());
        let pre_loss = trainer.last_loss();
        assert_eq!(pre_loss, 1.0);

        let y_pred = trainer.predict(trainer.samples().xs()).unwrap();
        let post_loss = Mse.loss(y_pred.view(), trainer.samples().ys());
        assert!(post_loss < pre_loss, "{post_loss} should be below {pre_loss}");
    }

    #[test]
    fn steps_without_samples_or_with_training_off_are_no_ops() {
        let mut trainer = line_trainer(0.1);

        // Training off, samples present.
        trainer.add_point(1.0, 1.0);
        assert!(!trainer.train_step().unwrap());
        assert_eq!(trainer.coefficients().unwrap(), [0.0, 0.0]);
        assert_eq!(trainer.last_loss(), 0.0);

        // Training on, no samples.
        let mut empty = line_trainer(0.1);
        empty.toggle_training();
        assert!(!empty.train_step().unwrap());
        assert_eq!(empty.coefficients().unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn adding_points_never_resets_coefficients() {
        let mut trainer = line_trainer(0.5);
        trainer.add_point(-1.0, -1.0);
        trainer.add_point(1.0, 1.0);
        trainer.toggle_training();
        trainer.train_step().unwrap();

        let trained = trainer.coefficients().unwrap().to_vec();
        assert_ne!(trained, vec![0.0, 0.0]);

        trainer.add_point(0.5, 0.5);
        assert_eq!(trainer.coefficients().unwrap(), trained.as_slice());
    }

    #[test]
    fn quadratic_training_fits_the_demo_shape() {
        let mut trainer = Trainer::new(Parabola, Mse::new(), 0.3)
            .unwrap()
            .with_samples(SampleSet::quadratic_demo());
        trainer.toggle_training();

        trainer.train_step().unwrap();
        let first_loss = trainer.last_loss();
        for _ in 0..200 {
            trainer.train_step().unwrap();
        }

        assert!(trainer.last_loss() < first_loss);
        // The demo data is roughly y = x^2, so `a` must have turned positive.
        assert!(trainer.coefficients().unwrap()[0] > 0.0);
    }

    #[test]
    fn reset_zeroes_model_state_but_keeps_samples() {
        let mut trainer = line_trainer(0.1);
        trainer.add_point(-1.0, -1.0);
        trainer.add_point(1.0, 1.0);
        trainer.toggle_training();
        trainer.train_step().unwrap();

        trainer.reset().unwrap();
        assert_eq!(trainer.coefficients().unwrap(), [0.0, 0.0]);
        assert_eq!(trainer.last_loss(), 0.0);
        assert_eq!(trainer.samples().len(), 2);

        trainer.reset().unwrap();
        assert_eq!(trainer.coefficients().unwrap(), [0.0, 0.0]);
    }

    #[test]
    fn released_trainers_refuse_to_step() {
        let mut trainer = line_trainer(0.1);
        trainer.add_point(1.0, 1.0);
        trainer.toggle_training();
        trainer.release();

        assert_eq!(trainer.train_step().unwrap_err(), RegressionErr::Released);
        assert_eq!(
            trainer.predict(array![0.0].view()).unwrap_err(),
            RegressionErr::Released
        );
    }
}
