/*
 * Response Curve Module
 *
 * A coarse, designer-editable scalar function sampled over [0, 1).
 * Every interaction regime scales its force by a lookup into the same curve,
 * after remapping its own distance ratio into a slice of the domain.
 *
 * Lookup is bucketed and never interpolates: ratios that land in the same
 * bucket return the exact same sample.
 */

use crate::error::SimulationError;

#[derive(Clone, Debug, PartialEq)]
pub struct ResponseCurve {
    samples: Vec<f32>,
}

impl ResponseCurve {
    pub const DEFAULT_BUCKETS: usize = 90;

    pub fn new(samples: Vec<f32>) -> Result<Self, SimulationError> {
        if samples.is_empty() {
            return Err(SimulationError::EmptyCurve);
        }
        Ok(Self { samples })
    }

    pub fn constant(bucket_count: usize, value: f32) -> Result<Self, SimulationError> {
        Self::new(vec![value; bucket_count])
    }

    pub fn smoothstep(bucket_count: usize) -> Result<Self, SimulationError> {
        let last = bucket_count.saturating_sub(1).max(1) as f32;
        let samples = (0..bucket_count)
            .map(|i| {
                let x = i as f32 / last;
                x * x * (3.0 - 2.0 * x)
            })
            .collect();
        Self::new(samples)
    }

    pub fn bucket_count(&self) -> usize {
        self.samples.len()
    }

    // floor(ratio * n) clamped into [0, n - 1]; NaN lands in bucket 0
    pub fn bucket_index(&self, ratio: f32) -> usize {
        let last = self.samples.len() - 1;
        let scaled = (ratio * self.samples.len() as f32).floor();
        if scaled.is_nan() || scaled <= 0.0 {
            0
        } else if scaled >= last as f32 {
            last
        } else {
            scaled as usize
        }
    }

    pub fn evaluate(&self, ratio: f32) -> f32 {
        self.samples[self.bucket_index(ratio)]
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    // Bucket count is fixed while editing in place
    pub fn samples_mut(&mut self) -> &mut [f32] {
        &mut self.samples
    }
}

impl Default for ResponseCurve {
    fn default() -> Self {
        Self {
            samples: vec![1.0; Self::DEFAULT_BUCKETS],
        }
    }
}
