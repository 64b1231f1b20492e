//! Hooks that sit beside the stacking core.
//!
//! Keep extensions free of accumulation logic; they only observe committed state.

pub mod observers;

pub use observers::{GroupEvent, GroupObserver, ObserverContext};
