// Core pipeline exports
pub mod adapter;
pub mod confidence;
pub mod factors;
pub mod normalize;
pub mod profiler;
pub mod recommendations;
pub mod scoring;

pub use adapter::{adapt, parse_key_value_text, parse_structured, Adapted, RawInput};
pub use confidence::{evaluate, Evaluation};
pub use factors::extract_factors;
pub use normalize::{normalize_field, FieldValue};
pub use profiler::{FactorReport, ParseOutcome, ParsedSurvey, PipelineError, Profiler, RecommendationReport};
pub use recommendations::{build_recommendations, filter_recommendations};
pub use scoring::score_risk;
