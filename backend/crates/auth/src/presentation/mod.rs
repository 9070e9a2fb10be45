//! Presentation Layer
//!
//! HTTP surface: request/response DTOs, handlers, router wiring and the
//! bearer-token middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use middleware::{AuthMiddlewareState, AuthenticatedUser, require_auth};
pub use router::{auth_router, auth_router_dev, auth_router_generic};
