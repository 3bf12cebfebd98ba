pub mod rate_limit;
pub mod request_id;
pub mod security_headers;

pub use rate_limit::{
    IpRateLimiter, RateLimitState, create_ip_rate_limiter, ip_rate_limit_middleware,
    spawn_rate_limit_pruner,
};
pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
