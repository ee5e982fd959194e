//! Text matching primitives shared by the provider adapters.
//!
//! | Item | Description |
//! |------|-------------|
//! | [`normalize`] | Canonical comparison form of free text |
//! | [`title_case`] | Display casing for provider names |
//! | [`similarity`] | Ratcliff/Obershelp ratio in `[0, 1]` |
//! | [`BestCandidate`] | Strict-greater-than best candidate tracker |

mod normalize;
mod selection;
mod similarity;

pub use normalize::{normalize, title_case};
pub use selection::BestCandidate;
pub use similarity::similarity;
