mod auth;
mod rate_limit;
pub mod session;

pub use auth::REFRESH_ERROR;
pub use auth::TokenManager;
pub use rate_limit::{ClientLimiter, quota};
pub use session::SessionCodec;
