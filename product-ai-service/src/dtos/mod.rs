pub mod product_details;
pub mod recommendations;

pub use product_details::GenerateProductDetailsRequest;
pub use recommendations::{RecommendationRequest, RecommendationResponse, DEFAULT_MAX_SUGGESTIONS};
