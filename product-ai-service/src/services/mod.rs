pub mod dispatcher;
pub mod error_mapper;
pub mod metrics;
pub mod prompts;
pub mod providers;

pub use dispatcher::{PromptDispatcher, RecommendationQuery};
