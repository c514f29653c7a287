//! Generators and their combinators.

use rand::Rng;

use crate::error::RejectReason;
use crate::sequence::ChoiceSequence;
use crate::source::ChoiceSource;

/// What a generator produced from a choice source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenResult<T> {
    /// A value, together with the sequence state the generator observed
    /// when it returned: the recorded trace in live mode, the consumed
    /// prefix in replay mode.
    Produced {
        sequence: ChoiceSequence,
        value: T,
    },
    /// No value from this source. The runner tallies the reason and
    /// retries; the shrinker discards the candidate.
    Rejected(RejectReason),
}

/// A generator for test data of type `T`.
///
/// A generator is a pure function from a [`ChoiceSource`] to a
/// [`GenResult`]. Running one against a live source samples fresh
/// choices; running it against a replay source reconstructs a value from
/// a recorded sequence, which is how shrunk candidates are re-interpreted.
///
/// Generators are explicit, first-class values composed with combinators
/// like [`map`](Gen::map) and [`filter`](Gen::filter).
pub struct Gen<T> {
    generator: Box<dyn Fn(&mut ChoiceSource<'_>) -> GenResult<T>>,
}

impl<T> Gen<T> {
    /// Create a generator from a function over a choice source.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut ChoiceSource<'_>) -> GenResult<T> + 'static,
    {
        Gen {
            generator: Box::new(f),
        }
    }

    /// Run the generator against a source.
    pub fn generate(&self, source: &mut ChoiceSource<'_>) -> GenResult<T> {
        (self.generator)(source)
    }

    /// A generator that always produces the same value.
    ///
    /// `Gen::constant(100)` yields `100` with the sequence `[]` on every draw.
    /// Its choice footprint is empty, so shrinking never changes the value.
    pub fn constant(value: T) -> Self
    where
        T: Clone + 'static,
    {
        Gen::new(move |_source| GenResult::Produced {
            sequence: ChoiceSequence::new(),
            value: value.clone(),
        })
    }

    /// A generator that always fails to produce a value.
    ///
    /// The reason is tallied by the runner and reported if no value can
    /// be generated at all.
    pub fn reject(reason: impl Into<String>) -> Self {
        let reason = RejectReason::Custom(reason.into());
        Gen::new(move |_source| GenResult::Rejected(reason.clone()))
    }
}

impl<T> Gen<T>
where
    T: 'static,
{
    /// Run a function over each generated value.
    ///
    /// `Gen::bounded(10).map(|n| n * 100)` yields `0, 100, ..., 1000`.
    ///
    /// Mapping adds no choice footprint, and shrunk values still honor
    /// the mapping: shrinking a mapped generator is shrinking the
    /// underlying one and re-applying the function.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        U: 'static,
        F: Fn(T) -> U + 'static,
    {
        Gen::new(move |source| match self.generate(source) {
            GenResult::Produced { sequence, value } => GenResult::Produced {
                sequence,
                value: f(value),
            },
            GenResult::Rejected(reason) => GenResult::Rejected(reason),
        })
    }

    /// Keep only values the predicate accepts; the rest become
    /// [`RejectReason::FilteredOut`] rejections.
    ///
    /// `Gen::bounded(10).filter(|n| n % 2 == 1)` yields `1, 3, 5, 7, 9`.
    ///
    /// Filtering adds no choice footprint, and shrunk values still honor
    /// the filter: a shrink candidate whose replayed value fails the
    /// predicate is discarded.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + 'static,
    {
        Gen::new(move |source| match self.generate(source) {
            GenResult::Produced { sequence, value } => {
                if predicate(&value) {
                    GenResult::Produced { sequence, value }
                } else {
                    GenResult::Rejected(RejectReason::FilteredOut)
                }
            }
            GenResult::Rejected(reason) => GenResult::Rejected(reason),
        })
    }
}

impl Gen<u32> {
    /// A uniform integer in `[0, max]` inclusive.
    ///
    /// This is the foundational generator, the only one that touches
    /// the choice source directly. Everything else is built from it with
    /// [`map`](Gen::map), [`filter`](Gen::filter) and value-level logic.
    ///
    /// In replay mode the recorded choice is returned *verbatim*, even
    /// when it exceeds `max`: shrinking edits raw sequences and relies on
    /// the generator re-interpreting whatever it finds there.
    ///
    /// Shrinks towards 0.
    pub fn bounded(max: u32) -> Self {
        Gen::new(move |source| match source {
            ChoiceSource::Live { sequence, rng } => {
                if sequence.is_full() {
                    return GenResult::Rejected(RejectReason::CapacityExceeded);
                }
                let value = rng.gen_range(0..=max);
                sequence.push(value);
                GenResult::Produced {
                    sequence: sequence.clone(),
                    value,
                }
            }
            ChoiceSource::Replay { sequence, cursor } => match sequence.get(*cursor) {
                Some(value) => {
                    *cursor += 1;
                    GenResult::Produced {
                        sequence: sequence.prefix(*cursor),
                        value,
                    }
                }
                None => GenResult::Rejected(RejectReason::ReplayExhausted),
            },
        })
    }

    /// A uniform integer between the smaller and the larger of the two
    /// bounds, inclusive.
    ///
    /// With equal bounds this is [`Gen::constant`] and records no choice
    /// at all.
    ///
    /// Shrinks towards the smaller bound.
    pub fn bounded_range(lo: u32, hi: u32) -> Self {
        if lo > hi {
            return Gen::bounded_range(hi, lo);
        }
        if lo == hi {
            return Gen::constant(lo);
        }
        Gen::bounded(hi - lo).map(move |x| x + lo)
    }
}

impl Gen<bool> {
    /// A fair coin. Shrinks towards `false`.
    pub fn bool() -> Self {
        Gen::bounded(1).map(|n| n == 1)
    }
}

impl<T> Gen<T>
where
    T: Clone + 'static,
{
    /// One of the given items, uniformly. Rejects when `items` is empty.
    ///
    /// Shrinks towards the first item.
    pub fn element_of(items: Vec<T>) -> Self {
        if items.is_empty() {
            return Gen::reject("no items to pick from");
        }
        let len = items.len();
        // The filter guards replayed indices: an edited sequence can hold
        // a choice past the end of `items`.
        Gen::bounded(len as u32 - 1)
            .filter(move |&index| (index as usize) < len)
            .map(move |index| items[index as usize].clone())
    }
}

impl<A, B> Gen<(A, B)>
where
    A: 'static,
    B: 'static,
{
    /// A pair drawn from the two generators in order.
    ///
    /// Both components share one choice source, so shrinking can work on
    /// either side of the pair independently.
    pub fn tuple_of(first: Gen<A>, second: Gen<B>) -> Self {
        Gen::new(move |source| {
            let a = match first.generate(source) {
                GenResult::Produced { value, .. } => value,
                GenResult::Rejected(reason) => return GenResult::Rejected(reason),
            };
            let b = match second.generate(source) {
                GenResult::Produced { value, .. } => value,
                GenResult::Rejected(reason) => return GenResult::Rejected(reason),
            };
            GenResult::Produced {
                sequence: source.observed(),
                value: (a, b),
            }
        })
    }
}

impl<T> Gen<Option<T>>
where
    T: 'static,
{
    /// `Some` three times out of four, `None` otherwise.
    ///
    /// The presence flag is recorded ahead of the inner value, so
    /// shrinking a `Some` tries `None` first by zeroing the flag.
    pub fn option_of(inner: Gen<T>) -> Self {
        let present = Gen::bounded(3).map(|n| n > 0);
        Gen::new(move |source| match present.generate(source) {
            GenResult::Produced { value: false, .. } => GenResult::Produced {
                sequence: source.observed(),
                value: None,
            },
            GenResult::Produced { value: true, .. } => match inner.generate(source) {
                GenResult::Produced { value, .. } => GenResult::Produced {
                    sequence: source.observed(),
                    value: Some(value),
                },
                GenResult::Rejected(reason) => GenResult::Rejected(reason),
            },
            GenResult::Rejected(reason) => GenResult::Rejected(reason),
        })
    }
}

impl<T> Gen<Vec<T>>
where
    T: 'static,
{
    /// A vector of items with geometrically distributed length.
    ///
    /// Each element is preceded by a continue flag: nonzero means one
    /// more item follows, zero stops the vector. Deleting a flag-item
    /// pair from the recorded sequence is exactly one chunk edit, which
    /// is what makes vectors shrink element by element.
    pub fn vec_of(item: Gen<T>) -> Self {
        let flag = Gen::bounded(3).map(|n| n > 0);
        Gen::new(move |source| {
            let mut items = Vec::new();
            loop {
                match flag.generate(source) {
                    GenResult::Produced { value: false, .. } => break,
                    GenResult::Produced { value: true, .. } => match item.generate(source) {
                        GenResult::Produced { value, .. } => items.push(value),
                        GenResult::Rejected(reason) => return GenResult::Rejected(reason),
                    },
                    GenResult::Rejected(reason) => return GenResult::Rejected(reason),
                }
            }
            GenResult::Produced {
                sequence: source.observed(),
                value: items,
            }
        })
    }
}
