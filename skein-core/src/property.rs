//! Properties and the runner that checks them.

use std::collections::BTreeMap;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::Config;
use crate::error::{Failure, RejectReason, TestResult};
use crate::gen::{Gen, GenResult};
use crate::shrink;
use crate::source::ChoiceSource;

/// A property: a generator paired with a check over the generated values.
pub struct Property<T> {
    generator: Gen<T>,
    check: Box<dyn Fn(&T) -> Result<(), Failure>>,
}

impl<T> Property<T> {
    /// Create a property from a generator and a checking function.
    ///
    /// The check returns `Ok(())` for values that satisfy the property
    /// and a [`Failure`] with a message for values that falsify it.
    pub fn new<F>(generator: Gen<T>, check: F) -> Self
    where
        F: Fn(&T) -> Result<(), Failure> + 'static,
    {
        Property {
            generator,
            check: Box::new(check),
        }
    }

    /// Create a property from a boolean condition.
    pub fn for_all<F>(generator: Gen<T>, condition: F) -> Self
    where
        F: Fn(&T) -> bool + 'static,
    {
        Property::new(generator, move |value| {
            if condition(value) {
                Ok(())
            } else {
                Err(Failure::new("property does not hold"))
            }
        })
    }

    /// Check the property against generated values.
    ///
    /// Up to [`Config::max_values`] values are generated and checked in
    /// sequence. The first failing value is shrunk to a minimal
    /// counterexample and returned as [`TestResult::Fail`]; no further
    /// values are drawn after a failure. If a single value cannot be
    /// generated within [`Config::max_attempts_per_value`] attempts, the
    /// run stops with [`TestResult::ExhaustedGeneration`] and the tally
    /// of rejection reasons.
    pub fn run(&self, config: &Config) -> TestResult<T> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        for value_index in 0..config.max_values {
            let mut rejections: BTreeMap<RejectReason, usize> = BTreeMap::new();
            let mut accepted = false;

            for _attempt in 0..config.max_attempts_per_value {
                let mut source = ChoiceSource::live(&mut rng);
                match self.generator.generate(&mut source) {
                    GenResult::Produced { sequence, value } => {
                        trace!("value {} generated from {}", value_index, sequence);
                        if let Err(failure) = (self.check)(&value) {
                            debug!("value {} failed: {}", value_index, failure.message);
                            let state = shrink::shrink(
                                sequence,
                                value,
                                failure.message,
                                &self.generator,
                                &*self.check,
                            );
                            return TestResult::Fail {
                                value: state.value,
                                message: state.message,
                            };
                        }
                        accepted = true;
                        break;
                    }
                    GenResult::Rejected(reason) => {
                        *rejections.entry(reason).or_insert(0) += 1;
                    }
                }
            }

            if !accepted {
                return TestResult::ExhaustedGeneration { rejections };
            }
        }

        TestResult::Pass
    }
}

/// Create a property from a boolean condition.
pub fn for_all<T, F>(generator: Gen<T>, condition: F) -> Property<T>
where
    F: Fn(&T) -> bool + 'static,
{
    Property::for_all(generator, condition)
}

/// Check a property under the default [`Config`].
pub fn run<T, F>(generator: Gen<T>, check: F) -> TestResult<T>
where
    F: Fn(&T) -> Result<(), Failure> + 'static,
{
    Property::new(generator, check).run(&Config::default())
}

/// Check a property under the given [`Config`].
pub fn run_with<T, F>(config: &Config, generator: Gen<T>, check: F) -> TestResult<T>
where
    F: Fn(&T) -> Result<(), Failure> + 'static,
{
    Property::new(generator, check).run(config)
}
