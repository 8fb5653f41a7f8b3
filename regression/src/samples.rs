use ndarray::ArrayView1;

/// Paired observations consumed by the trainer.
///
/// The two sequences stay parallel and append-only: points are never
/// reordered or dropped, so sample indices are stable for the lifetime of
/// the set.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SampleSet {
    xs: Vec<f32>,
    ys: Vec<f32>,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The 15-point linear demo set the playground ships with.
    pub fn linear_demo() -> Self {
        Self {
            xs: vec![
                -0.98, -0.79, -0.59, -0.33, 0.03, -0.28, 0.17, 0.31, 0.39, 0.47, 0.61, 0.67,
                0.81, 0.91, 0.98,
            ],
            ys: vec![
                -0.99, -0.81, -0.69, -0.34, 0.02, -0.21, 0.21, 0.28, 0.36, 0.51, 0.61, 0.7,
                0.79, 0.95, 0.96,
            ],
        }
    }

    /// The 15-point quadratic demo set the playground ships with.
    pub fn quadratic_demo() -> Self {
        Self {
            xs: vec![
                -0.98, -0.79, -0.59, -0.33, -0.03, -0.28, 0.17, 0.31, 0.39, 0.47, 0.61, 0.67,
                0.81, 0.91, 0.98,
            ],
            ys: vec![
                0.99, 0.81, 0.69, 0.34, 0.02, 0.21, 0.21, 0.28, 0.36, 0.51, 0.61, 0.7, 0.79,
                0.95, 0.96,
            ],
        }
    }

    /// Appends one observation.
    pub fn push(&mut self, x: f32, y: f32) {
        self.xs.push(x);
        self.ys.push(y);
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.xs)
    }

    pub fn ys(&self) -> ArrayView1<'_, f32> {
        ArrayView1::from(&self.ys)
    }

    /// Drops every observation.
    pub fn clear(&mut self) {
        self.xs.clear();
        self.ys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_the_sequences_parallel_and_ordered() {
        let mut samples = SampleSet::new();
        samples.push(1.0, 2.0);
        samples.push(-0.5, 0.25);

        assert_eq!(samples.len(), 2);
        assert_eq!(samples.xs().to_vec(), vec![1.0, -0.5]);
        assert_eq!(samples.ys().to_vec(), vec![2.0, 0.25]);
    }

    #[test]
    fn demo_sets_are_paired() {
        let linear = SampleSet::linear_demo();
        assert_eq!(linear.len(), 15);

        let quadratic = SampleSet::quadratic_demo();
        assert_eq!(quadratic.len(), 15);
        assert_eq!(quadratic.xs().len(), quadratic.ys().len());
    }
}
