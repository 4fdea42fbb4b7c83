//! The recommendation engine: classify intent, gather evidence from three
//! independent sources, merge community reports into hotspots, score,
//! dedupe, select, and (best-effort) rerank meetup spot candidates.

pub mod cache;
pub mod dedupe;
pub mod engine;
pub mod hotspot;
pub mod intent;
pub mod rerank;
pub mod scorer;
pub mod select;
pub mod traits;
pub mod tuning;

pub use cache::{InMemoryCache, ResponseCache};
pub use engine::{EngineDeps, RecommendEngine};
pub use intent::{classify, IntentConfig};
pub use rerank::{Reranker, RerankOutcome};
pub use traits::{CameraSource, PlaceSource, ReportCellSource};
pub use tuning::ScoringTuning;
