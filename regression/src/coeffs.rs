use crate::error::{RegressionErr, Result};

/// Owned coefficient storage with an explicit end of life.
///
/// The buffer is acquired zeroed at construction and must be released by
/// the owner when the trainer is discarded. Any access after `release` is
/// an error; the store never reallocates behind the caller's back, so
/// there is no silent leak path across instance replacements.
#[derive(Debug, PartialEq)]
pub struct CoeffStore {
    values: Option<Vec<f32>>,
}

impl CoeffStore {
    /// Allocates `n` coefficients, all zero.
    pub fn new(n: usize) -> Self {
        Self {
            values: Some(vec![0.0; n]),
        }
    }

    /// Read access to the live buffer.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn values(&self) -> Result<&[f32]> {
        self.values.as_deref().ok_or(RegressionErr::Released)
    }

    /// Write access to the live buffer.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn values_mut(&mut self) -> Result<&mut [f32]> {
        self.values.as_deref_mut().ok_or(RegressionErr::Released)
    }

    /// Zeroes every coefficient, keeping the buffer alive.
    ///
    /// # Errors
    /// Returns `RegressionErr::Released` after `release`.
    pub fn reset(&mut self) -> Result<()> {
        self.values_mut().map(|values| values.fill(0.0))
    }

    /// Frees the buffer. Idempotent; any further access fails.
    pub fn release(&mut self) {
        self.values = None;
    }

    pub fn is_released(&self) -> bool {
        self.values.is_none()
    }
}
