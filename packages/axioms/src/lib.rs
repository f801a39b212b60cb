//! # Formwork Axioms
//!
//! The three paired rewrite axioms over boundary forms:
//!
//! - **Inversion** (`clarify` / `enfold`): strip or wrap a
//!   round-square/square-round boundary pair.
//! - **Arrangement** (`disperse` / `collect`): split a frame into one frame
//!   per content, or merge frames with matching context back together.
//! - **Reflection** (`cancel` / `create`): annihilate or produce a form
//!   together with its angle-wrapped reflection.
//!
//! ## Contract
//!
//! Every function here is pure and total. There is no error channel:
//! "could not apply" is reported by returning fresh clones of the unmodified
//! input (a one-element list for single-form functions, the whole input list
//! for multi-form ones). Outputs never alias inputs: every returned form is
//! freshly produced with ids the caller has never seen, so id inequality is
//! a reliable proxy for "this value was just made".

pub mod arrangement;
pub mod inversion;
pub mod reflection;

pub use arrangement::{collect, disperse, is_frame, DisperseOptions};
pub use inversion::{clarify, enfold, is_clarify_applicable, EnfoldVariant};
pub use reflection::{cancel, create};
