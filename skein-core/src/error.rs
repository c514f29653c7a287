//! Failure signals and test outcomes.

use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// How many rejection reasons an exhausted run reports.
const MAX_REPORTED_REASONS: usize = 5;

/// Why a generator declined to produce a value.
///
/// Rejections are ordinary values, not errors to abort on: the runner
/// tolerates them up to its attempt budget and the shrinker treats a
/// rejected replay as "candidate does not improve".
#[derive(Error, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RejectReason {
    /// A [`filter`](crate::gen::Gen::filter) predicate turned the value away.
    #[error("value filtered out")]
    FilteredOut,

    /// The choice sequence hit [`MAX_SEQUENCE_LEN`](crate::data::MAX_SEQUENCE_LEN).
    #[error("choice sequence capacity exceeded")]
    CapacityExceeded,

    /// A replayed generator asked for more choices than the sequence holds.
    #[error("replay exhausted")]
    ReplayExhausted,

    /// A caller-supplied reason, from [`Gen::reject`](crate::gen::Gen::reject).
    #[error("{0}")]
    Custom(String),
}

/// A property's failure signal, carrying the message that ends up in
/// [`TestResult::Fail`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    /// What the property had to say about the offending value.
    pub message: String,
}

impl Failure {
    /// Create a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Failure {
            message: message.into(),
        }
    }
}

/// Outcome of checking a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult<T> {
    /// Every generated value satisfied the property.
    Pass,

    /// A value falsified the property. The value is the shrunk
    /// counterexample, not necessarily the one found first.
    Fail {
        value: T,
        message: String,
    },

    /// Not a single value could be generated within the attempt budget.
    ExhaustedGeneration {
        /// How often each rejection reason was seen for the value that
        /// could not be generated.
        rejections: BTreeMap<RejectReason, usize>,
    },
}

impl<T> TestResult<T> {
    /// Whether this is [`TestResult::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    /// Whether this is [`TestResult::Fail`].
    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

impl<T: fmt::Debug> fmt::Display for TestResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestResult::Pass => write!(f, "Passes"),
            TestResult::Fail { value, message } => {
                write!(f, "Fails:\n - value: {:?}\n - error: \"{}\"", value, message)
            }
            TestResult::ExhaustedGeneration { rejections } => {
                write!(f, "Cannot generate values. Most common reasons:")?;
                // BTreeMap iteration gives a stable reason order; a stable
                // sort on the count then keeps ties deterministic.
                let mut reasons: Vec<(&RejectReason, &usize)> = rejections.iter().collect();
                reasons.sort_by(|a, b| b.1.cmp(a.1));
                for (reason, count) in reasons.into_iter().take(MAX_REPORTED_REASONS) {
                    write!(f, "\n - {}", reason)?;
                    if *count > 1 {
                        write!(f, " ({}x)", count)?;
                    }
                }
                Ok(())
            }
        }
    }
}
