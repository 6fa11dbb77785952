use std::collections::BTreeMap;

use super::message::{Request, Response};

/// Placeholder values captured from the matched route.
pub type RouteArguments = BTreeMap<String, String>;

/// Route callable as the framework stores it.
pub type RouteCallable = dyn Fn(&Request, Response, &RouteArguments) -> Response + Send + Sync;

/// How a matched route's callable is invoked.
pub trait InvocationStrategy: Send + Sync {
    fn invoke(
        &self,
        callable: &RouteCallable,
        request: Request,
        response: Response,
        arguments: &RouteArguments,
    ) -> Response;
}

/// Default strategy: passes request, response and the argument map, and
/// also exposes the arguments as a request extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestResponse;

impl InvocationStrategy for RequestResponse {
    fn invoke(
        &self,
        callable: &RouteCallable,
        mut request: Request,
        response: Response,
        arguments: &RouteArguments,
    ) -> Response {
        request.extensions_mut().insert(arguments.clone());
        callable(&request, response, arguments)
    }
}
