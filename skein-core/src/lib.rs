//! Core engine for skein property-based testing.
//!
//! Every random decision a generator makes is recorded as a sequence of
//! choices. Failing inputs are minimized not by shrinking values but by
//! editing that recorded sequence and replaying the generator against
//! the edit, so every generator gets shrinking for free.

pub mod data;
pub mod error;
pub mod gen;
pub mod property;
pub mod sequence;
pub mod shrink;
pub mod source;

// Re-export the main types
pub use data::*;
pub use error::*;
pub use gen::*;
pub use property::*;
pub use sequence::*;
pub use shrink::*;
pub use source::*;
