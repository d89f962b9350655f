//! Route-shaped JSON handlers over `memberbase_core`.

pub mod api;
mod response;

pub use api::{MemberbaseApi, SubscribeBody};
pub use response::ApiResponse;
