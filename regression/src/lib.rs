mod coeffs;
mod curve;
mod error;
mod loss;
mod samples;
mod trainer;

pub use coeffs::CoeffStore;
pub use curve::{Curve, Line, Parabola};
pub use error::{RegressionErr, Result};
pub use loss::{LossFn, Mse};
pub use samples::SampleSet;
pub use trainer::Trainer;
