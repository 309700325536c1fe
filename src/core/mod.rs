// Core algorithm exports
pub mod matcher;
pub mod scoring;
pub mod weights;

pub use matcher::{MatchError, MatchMaterializer, DEFAULT_MIN_SCORE, DEFAULT_SEED_MIN_SCORE};
pub use scoring::{compute_compatibility, score_breakdown};
pub use weights::resolve_weights;
