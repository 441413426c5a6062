//! # intent-watcher
//!
//! Watches a project directory tree and feeds well-formed file events into
//! the correlation engine, suppressing noise along the way:
//!
//! - **[`filter`]**: hardcoded exclusion sets (VCS/build/cache directories,
//!   dotfiles, binary artifact extensions) applied cheapest-first
//! - **[`ignores`]**: scoped ignore rules — a root `.intentignore` plus a
//!   `.gitignore` per directory, each applying only to paths under the
//!   directory it was loaded from
//! - **[`debounce`]**: collapses editor save patterns (truncate+write,
//!   repeated writes) into one logical change per path
//! - **[`watcher`]**: per-directory `notify` watches driven by one tokio
//!   background task with cooperative cancellation

#![deny(unsafe_code)]

pub mod debounce;
pub mod errors;
pub mod filter;
pub mod ignores;
pub mod watcher;

pub use debounce::Debouncer;
pub use errors::{Result, WatcherError};
pub use ignores::IgnoreSet;
pub use watcher::{FsWatcher, WatcherConfig};
