//! Engine limits and run configuration.

/// Hard cap on the number of choices a single generated value may record.
///
/// A generator that tries to push past this cap is rejected with
/// [`RejectReason::CapacityExceeded`](crate::error::RejectReason::CapacityExceeded)
/// rather than allowed to grow without bound.
pub const MAX_SEQUENCE_LEN: usize = 64 * 1024;

/// Number of values a property is checked against before it passes.
pub const MAX_VALUES: usize = 100;

/// Attempts at generating a single acceptable value before giving up.
pub const MAX_ATTEMPTS_PER_VALUE: usize = 15;

/// Largest chunk of choices a single shrink edit operates on.
pub const MAX_SHRINK_CHUNK: u8 = 8;

/// Configuration for a property run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of values to generate and check.
    pub max_values: usize,

    /// Generation attempts allowed per value before the run is declared
    /// exhausted.
    pub max_attempts_per_value: usize,

    /// Seed for the run's random number generator. `None` seeds from
    /// entropy; setting it makes the whole run reproducible.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_values: MAX_VALUES,
            max_attempts_per_value: MAX_ATTEMPTS_PER_VALUE,
            seed: None,
        }
    }
}

impl Config {
    /// Create a new config with the given number of values to check.
    pub fn with_values(mut self, values: usize) -> Self {
        self.max_values = values;
        self
    }

    /// Create a new config with the given per-value attempt budget.
    pub fn with_attempts_per_value(mut self, attempts: usize) -> Self {
        self.max_attempts_per_value = attempts;
        self
    }

    /// Create a new config with a fixed RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_engine_limits() {
        let config = Config::default();
        assert_eq!(config.max_values, MAX_VALUES);
        assert_eq!(config.max_attempts_per_value, MAX_ATTEMPTS_PER_VALUE);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_builder_methods_chain() {
        let config = Config::default()
            .with_values(10)
            .with_attempts_per_value(3)
            .with_seed(42);
        assert_eq!(config.max_values, 10);
        assert_eq!(config.max_attempts_per_value, 3);
        assert_eq!(config.seed, Some(42));
    }
}
