//! Text rewriting over the original program.
//!
//! The wrapper first decides *what* to edit (a pure function of the tree),
//! producing a list of [`Edit`]s; this module then performs those edits in a
//! single deterministic pass. The core component is [`StableRewriter`].

mod rewriter;

pub use rewriter::{Edit, EditKind, PlannedSplice, RewriteError, StableRewriter};
