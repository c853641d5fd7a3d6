//! Tower Service implementations

pub mod core;
pub mod request;
pub mod response;

pub use self::core::EventfulService;
pub use request::{ApiRequest, RequestContext};
pub use response::ApiResponse;
