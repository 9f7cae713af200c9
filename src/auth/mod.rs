pub mod claims;
pub mod jwt;
pub mod middleware;

pub use claims::Claims;
pub use jwt::JwtService;
pub use middleware::{session_token, AuthMiddleware, AuthenticatedUser};

/// Name of the cookie holding the signed session token.
pub const SESSION_COOKIE: &str = "spoton_session";
