//! Where a generator's choices come from.

use rand::RngCore;

use crate::sequence::ChoiceSequence;

/// The source a generator draws its choices from.
///
/// A fresh [`Live`](ChoiceSource::Live) source is created per generation
/// attempt and records every sampled choice. A
/// [`Replay`](ChoiceSource::Replay) source is created per shrink
/// candidate and feeds a prerecorded sequence back to the generator,
/// cursor-advancing; reading past its end is a rejection, not an error.
pub enum ChoiceSource<'a> {
    /// Sampling fresh choices and appending them to a growing sequence.
    Live {
        sequence: ChoiceSequence,
        rng: &'a mut dyn RngCore,
    },
    /// Consuming a prerecorded sequence.
    Replay {
        sequence: ChoiceSequence,
        cursor: usize,
    },
}

impl<'a> ChoiceSource<'a> {
    /// A live source recording into an empty sequence, sampling from `rng`.
    pub fn live(rng: &'a mut dyn RngCore) -> Self {
        ChoiceSource::Live {
            sequence: ChoiceSequence::new(),
            rng,
        }
    }

    /// A replay source positioned at the start of `sequence`.
    pub fn replay(sequence: ChoiceSequence) -> Self {
        ChoiceSource::Replay {
            sequence,
            cursor: 0,
        }
    }

    /// The sequence state a generator observes at return time: the
    /// appended trace of a live source, or the prefix a replay source
    /// has consumed so far.
    pub fn observed(&self) -> ChoiceSequence {
        match self {
            ChoiceSource::Live { sequence, .. } => sequence.clone(),
            ChoiceSource::Replay { sequence, cursor } => sequence.prefix(*cursor),
        }
    }
}
