//! Discrete candidate link rates.

/// Fixed, ascending table of candidate service rates (datagrams per second).
///
/// Bucket `i` holds `i * max_rate / buckets`, so bucket 0 is the zero rate and
/// the spacing is uniform. The belief is indexed by bucket, never by rate value.
#[derive(Debug, Clone)]
pub struct RateSupport {
    values: Vec<f64>,
    step: f64,
}

impl RateSupport {
    pub fn new(buckets: usize, max_rate_pps: f64) -> Self {
        let step = max_rate_pps / buckets as f64;
        let values = (0..buckets).map(|i| i as f64 * step).collect();
        Self { values, step }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rate of bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Spacing between adjacent rates.
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Bucket whose rate is closest to `rate_pps`, clamped to the table.
    pub fn nearest_index(&self, rate_pps: f64) -> usize {
        if !(rate_pps.is_finite() && rate_pps > 0.0) || self.step <= 0.0 {
            return 0;
        }
        let index = (rate_pps / self.step).round() as usize;
        index.min(self.values.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let support = RateSupport::new(200, 800.0);
        assert_eq!(support.len(), 200);
        assert_eq!(support.value(0), 0.0);
        assert_eq!(support.value(1), 4.0);
        assert_eq!(support.value(199), 796.0);
        assert_eq!(support.step(), 4.0);
    }

    #[test]
    fn test_values_ascending() {
        let support = RateSupport::new(64, 1000.0);
        assert!(support.values().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_nearest_index() {
        let support = RateSupport::new(200, 800.0);
        assert_eq!(support.nearest_index(200.0), 50);
        assert_eq!(support.nearest_index(201.9), 50);
        assert_eq!(support.nearest_index(202.1), 51);
        assert_eq!(support.nearest_index(-3.0), 0);
        assert_eq!(support.nearest_index(f64::NAN), 0);
        assert_eq!(support.nearest_index(10_000.0), 199);
    }
}
