//! # Formwork Engine
//!
//! State-transition layer for the boundary-form puzzle.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ level: raw trees → live Forms (validated)   │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ session: owning coordinator                 │
//! │  - current forest + goal + allow-lists      │
//! │  - selection state                          │
//! │  - commit to history, win detection         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ operations: dispatcher                      │
//! │  - allow-list + selection guards            │
//! │  - fallback targeting                       │
//! │  - structural no-change detection           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ locate + rewrite: id lookup, path-copy      │
//! │ axioms: pure rewrite rules                  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Forest in, forest out**: every rewrite takes an input forest and
//!    returns a new one; nothing mutates its input.
//! 2. **Rejections are values**: validation failures resolve to "no
//!    operation performed" with a reason string, never a panic.
//! 3. **Structural no-op test**: an operation that produces a forest
//!    equivalent to its input is not committed. Equivalence is by canonical
//!    signature, not by reference or id.
//! 4. **Single owner**: the [`Session`] owns the mutable state; axiom and
//!    rewrite functions are pure and safe for speculative previews.

mod history;
mod level;
mod locate;
mod operations;
mod rewrite;
mod session;

pub use history::History;
pub use level::{AxiomTag, Level, LoadError, OperationKey, RawForm, Rules};
pub use locate::{locate, locate_one, Located};
pub use operations::{apply_operation, Applied, Operation, OperationError};
pub use rewrite::{insert_under, rewrite_sibling_group, rewrite_single_target};
pub use session::Session;

// Re-export the crates a host needs alongside the engine.
pub use formwork_axioms as axioms;
pub use formwork_model as model;
