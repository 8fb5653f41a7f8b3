use std::{error::Error, fmt};

/// The regression module's result type.
pub type Result<T> = std::result::Result<T, RegressionErr>;

/// Trainer misuse and parameter violations.
#[derive(Debug, PartialEq)]
pub enum RegressionErr {
    /// The learning rate must stay within `[0, 1]`.
    LearningRateOutOfRange { got: f32 },

    /// The coefficient store was released and can no longer be used.
    Released,
}

impl fmt::Display for RegressionErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegressionErr::LearningRateOutOfRange { got } => {
                write!(f, "learning rate must be between 0 and 1, got {got}")
            }
            RegressionErr::Released => {
                write!(f, "the coefficient store has already been released")
            }
        }
    }
}

impl Error for RegressionErr {}
