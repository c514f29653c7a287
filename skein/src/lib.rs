//! Skein property-based testing library.
//!
//! This is the main entry point for the skein library. Generators record
//! the random choices behind every value they produce; when a property
//! fails, the engine shrinks the recorded choice sequence and replays
//! the generator to find a minimal counterexample.
//!
//! ```
//! use skein::{for_all, Config, Gen, TestResult};
//!
//! let property = for_all(Gen::bounded(100), |&n| n <= 100);
//! assert_eq!(property.run(&Config::default()), TestResult::Pass);
//! ```

pub use skein_core::*;
