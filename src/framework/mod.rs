//! Framework value types produced by the default service factories.

mod environment;
mod handlers;
mod message;
mod resolver;
mod router;
mod strategy;

pub use environment::Environment;
pub use handlers::{ErrorHandler, NotAllowedHandler, NotFoundHandler};
pub use message::{
    default_response, parse_version, request_from_environment, Request, Response,
    DEFAULT_CONTENT_TYPE,
};
pub use resolver::{CallableResolver, ResolvedCallable};
pub use router::Router;
pub use strategy::{InvocationStrategy, RequestResponse, RouteArguments, RouteCallable};
