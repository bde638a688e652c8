//! Read-side queries over annotation graphs.
//!
//! - token spans and document text of annotation nodes
//! - lazily memoized character offsets
//! - pointing (anaphora/coreference) chains
//! - token index mapping, keyword-in-context windows, spanstrings

mod chains;
mod offsets;
mod span;
mod tokens;

pub use chains::get_pointing_chains;
pub use offsets::{add_offsets, get_offsets, get_span_offsets, is_continuous, token_offsets};
pub use span::{get_span, get_text, is_acyclic, tokens_to_text};
pub use tokens::{Kwic, TokenMapper, get_kwic, get_segment_token_offsets, spanstring_to_tokens};
