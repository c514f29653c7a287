//! Shrinking failing choice sequences to a minimal form.
//!
//! Shrinking never touches values directly. It proposes structural edits
//! to the recorded choice sequence of a failing value, replays the
//! generator against each edited sequence, and keeps an edit when the
//! replayed value still fails the property while the sequence got
//! strictly smaller under the shortlex order. The loop runs to a fixed
//! point; termination is structural, since the sequence cannot decrease
//! below empty.

use std::fmt;
use std::ops::Range;

use log::debug;

use crate::data::MAX_SHRINK_CHUNK;
use crate::error::Failure;
use crate::gen::{Gen, GenResult};
use crate::sequence::ChoiceSequence;
use crate::source::ChoiceSource;

/// A contiguous group of choices a shrink edit operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// Number of choices in the chunk, at most [`MAX_SHRINK_CHUNK`].
    pub size: u8,
    /// Index of the chunk's first choice.
    pub offset: usize,
}

impl Chunk {
    /// The index range the chunk covers.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.size as usize
    }
}

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chunk<size={}, offset={}>", self.size, self.offset)
    }
}

/// One candidate edit to a failing choice sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShrinkCmd {
    /// Set every choice in the chunk to 0.
    ZeroChunk(Chunk),
    /// Reorder the chunk so its choices are non-decreasing.
    SortChunk(Chunk),
    /// Remove the chunk, first trying a variant that also decrements the
    /// choice just before it.
    DeleteChunk(Chunk),
    /// Binary-search the choice at an index down towards 0.
    MinimizeIndex(usize),
}

impl ShrinkCmd {
    /// Cheap pre-check that the cmd's indices are in bounds for the
    /// given sequence.
    ///
    /// Cmd lists are planned once per pass from the sequence length at
    /// the start of the pass; an accepted deletion mid-pass can leave
    /// later cmds pointing past the end. Those are skipped here rather
    /// than replanned.
    pub fn has_chance(&self, sequence: &ChoiceSequence) -> bool {
        match self {
            ShrinkCmd::ZeroChunk(chunk)
            | ShrinkCmd::SortChunk(chunk)
            | ShrinkCmd::DeleteChunk(chunk) => chunk.range().end <= sequence.len(),
            ShrinkCmd::MinimizeIndex(index) => *index < sequence.len(),
        }
    }
}

impl fmt::Display for ShrinkCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShrinkCmd::ZeroChunk(chunk) => write!(f, "ZeroChunk({})", chunk),
            ShrinkCmd::SortChunk(chunk) => write!(f, "SortChunk({})", chunk),
            ShrinkCmd::DeleteChunk(chunk) => write!(f, "DeleteChunk({})", chunk),
            ShrinkCmd::MinimizeIndex(index) => write!(f, "MinimizeIndex(index={})", index),
        }
    }
}

/// The best failing candidate found so far.
#[derive(Debug, Clone)]
pub(crate) struct ShrinkState<T> {
    pub(crate) sequence: ChoiceSequence,
    pub(crate) value: T,
    pub(crate) message: String,
}

/// Cmds for every chunk of the ladder sizes that fits in `length`,
/// largest chunks first, offsets descending within a size.
///
/// For `length = 10` the size-4 portion reads:
///
/// ```text
/// [......XXXX]
/// [.....XXXX.]
///     ...
/// [XXXX......]
/// ```
///
/// Large edits go first because they make the most progress per replay.
fn chunk_cmds(length: usize, allow_size_one: bool, to_cmd: fn(Chunk) -> ShrinkCmd) -> Vec<ShrinkCmd> {
    let mut cmds = Vec::new();
    let min_size = if allow_size_one { 1 } else { 2 };
    let mut size = MAX_SHRINK_CHUNK;
    while size >= min_size {
        if size as usize <= length {
            for offset in (0..=length - size as usize).rev() {
                cmds.push(to_cmd(Chunk { size, offset }));
            }
        }
        // Chunks of 3 are common enough to be worth a stop between 4 and 2.
        size = match size {
            4 => 3,
            3 => 2,
            _ => size / 2,
        };
    }
    cmds
}

/// The full candidate list for a sequence of the given length:
/// deletions, then zeroings, then sorts, then per-index minimizations.
///
/// Deletions allow single-choice chunks. Zeroing does not, since the
/// minimize phase already binary-searches each choice towards 0, and
/// sorting a single choice is meaningless.
pub fn shrink_cmds(length: usize) -> Vec<ShrinkCmd> {
    let mut cmds = chunk_cmds(length, true, ShrinkCmd::DeleteChunk);
    cmds.extend(chunk_cmds(length, false, ShrinkCmd::ZeroChunk));
    cmds.extend(chunk_cmds(length, false, ShrinkCmd::SortChunk));
    cmds.extend((0..length).map(ShrinkCmd::MinimizeIndex));
    cmds
}

type Check<'a, T> = &'a dyn Fn(&T) -> Result<(), Failure>;

/// Replay the generator over `trial` and keep it when it is a strict
/// shortlex improvement that still fails the property.
///
/// The comparand is the prospective edited sequence itself, not the
/// prefix the generator happens to consume during replay; progress is
/// measured on what was submitted. A rejected replay and a passing
/// property both mean "no improvement".
fn keep_if_better<T>(
    trial: ChoiceSequence,
    state: &ShrinkState<T>,
    generator: &Gen<T>,
    check: Check<'_, T>,
) -> Option<ShrinkState<T>> {
    if trial >= state.sequence {
        return None;
    }
    let mut source = ChoiceSource::replay(trial.clone());
    match generator.generate(&mut source) {
        GenResult::Produced { value, .. } => match check(&value) {
            Ok(()) => None,
            Err(failure) => Some(ShrinkState {
                sequence: trial,
                value,
                message: failure.message,
            }),
        },
        GenResult::Rejected(_) => None,
    }
}

/// Binary-search the choice at `index` for the smallest replacement that
/// still fails the property.
fn minimize_index<T>(
    index: usize,
    state: ShrinkState<T>,
    generator: &Gen<T>,
    check: Check<'_, T>,
) -> ShrinkState<T> {
    let current = state.sequence[index];
    if current == 0 {
        return state;
    }

    let with_choice = |sequence: &ChoiceSequence, choice: u32| {
        let mut trial = sequence.clone();
        trial.set(index, choice);
        trial
    };

    // The lowest feasible replacement first. Succeeding here both saves
    // the whole search and is required when the property only depends on
    // the presence of choices, not their size.
    if let Some(better) = keep_if_better(with_choice(&state.sequence, 0), &state, generator, check)
    {
        return better;
    }

    // Invariant: lo does not improve, hi does (hi starts at the current
    // choice, which fails by assumption).
    let mut state = state;
    let mut lo = 0;
    let mut hi = current;
    while lo + 1 < hi {
        let mid = lo + (hi - lo) / 2;
        match keep_if_better(with_choice(&state.sequence, mid), &state, generator, check) {
            Some(better) => {
                state = better;
                hi = mid;
            }
            None => lo = mid,
        }
    }
    state
}

/// Apply one cmd to the current state, returning the improved state or
/// the input state unchanged.
fn apply_cmd<T>(
    cmd: ShrinkCmd,
    state: ShrinkState<T>,
    generator: &Gen<T>,
    check: Check<'_, T>,
) -> ShrinkState<T> {
    match cmd {
        ShrinkCmd::ZeroChunk(chunk) => {
            let mut trial = state.sequence.clone();
            for index in chunk.range() {
                trial.set(index, 0);
            }
            keep_if_better(trial, &state, generator, check).unwrap_or(state)
        }
        ShrinkCmd::SortChunk(chunk) => {
            let mut trial = state.sequence.clone();
            trial.sort_range(chunk.range());
            keep_if_better(trial, &state, generator, check).unwrap_or(state)
        }
        ShrinkCmd::DeleteChunk(chunk) => {
            let deleted = state.sequence.with_range_deleted(chunk.range());
            // A deleted chunk often held a loop iteration; decrementing
            // the choice before it retires the iteration count to match.
            if chunk.offset >= 1 && deleted[chunk.offset - 1] > 0 {
                let mut decremented = deleted.clone();
                decremented.set(chunk.offset - 1, deleted[chunk.offset - 1] - 1);
                if let Some(better) = keep_if_better(decremented, &state, generator, check) {
                    return better;
                }
            }
            keep_if_better(deleted, &state, generator, check).unwrap_or(state)
        }
        ShrinkCmd::MinimizeIndex(index) => minimize_index(index, state, generator, check),
    }
}

/// One pass over the planned cmd list.
///
/// The list is planned once from the sequence length at the start of the
/// pass and not regenerated mid-pass; cmds whose chunk falls out of
/// bounds after an accepted deletion are skipped by
/// [`ShrinkCmd::has_chance`]. The next pass plans a fresh list.
fn shrink_pass<T>(
    mut state: ShrinkState<T>,
    generator: &Gen<T>,
    check: Check<'_, T>,
) -> ShrinkState<T> {
    for cmd in shrink_cmds(state.sequence.len()) {
        if !cmd.has_chance(&state.sequence) {
            continue;
        }
        let previous = state.sequence.clone();
        state = apply_cmd(cmd, state, generator, check);
        if state.sequence != previous {
            debug!("shrunk with {}: {} -> {}", cmd, previous, state.sequence);
        }
    }
    state
}

/// Shrink a failing `(sequence, value, message)` to a fixed point.
///
/// Every accepted candidate strictly decreases the sequence under
/// shortlex, so the loop terminates; the returned state is the smallest
/// failure found, with the message the property attached to it.
pub(crate) fn shrink<T>(
    sequence: ChoiceSequence,
    value: T,
    message: String,
    generator: &Gen<T>,
    check: Check<'_, T>,
) -> ShrinkState<T> {
    let mut state = ShrinkState {
        sequence,
        value,
        message,
    };
    if state.sequence.is_empty() {
        // No choices were recorded, so there is nothing to minimize.
        return state;
    }
    debug!("shrinking from {}", state.sequence);
    loop {
        let previous = state.sequence.clone();
        state = shrink_pass(state, generator, check);
        if state.sequence == previous {
            return state;
        }
    }
}
