//! Default framework services.
//!
//! Every entry is a lazy singleton: the factory runs on first `get` and
//! the instance is memoized by the engine.

use crate::container::Container;
use crate::engine::Definition;
use crate::framework::{
    default_response, request_from_environment, CallableResolver, Environment, ErrorHandler,
    NotAllowedHandler, NotFoundHandler, RequestResponse, Router,
};
use crate::settings::Settings;

pub const SETTINGS: &str = "settings";
pub const ENVIRONMENT: &str = "environment";
pub const REQUEST: &str = "request";
pub const RESPONSE: &str = "response";
pub const ROUTER: &str = "router";
pub const FOUND_HANDLER: &str = "foundHandler";
pub const ERROR_HANDLER: &str = "errorHandler";
pub const NOT_FOUND_HANDLER: &str = "notFoundHandler";
pub const NOT_ALLOWED_HANDLER: &str = "notAllowedHandler";
pub const CALLABLE_RESOLVER: &str = "callableResolver";

/// Keys registered by [`register`], in registration order.
pub const SERVICE_KEYS: [&str; 10] = [
    SETTINGS,
    ENVIRONMENT,
    REQUEST,
    RESPONSE,
    ROUTER,
    FOUND_HANDLER,
    ERROR_HANDLER,
    NOT_FOUND_HANDLER,
    NOT_ALLOWED_HANDLER,
    CALLABLE_RESOLVER,
];

/// Registers the default service factories on `container`.
pub fn register(container: &Container, settings: Settings) {
    container.set(SETTINGS, Definition::value(settings));

    container.set(ENVIRONMENT, Definition::lazy(Environment::from_process));

    container.set(
        REQUEST,
        Definition::factory(|c| {
            let environment = c.get::<Environment>(ENVIRONMENT)?;
            Ok(request_from_environment(&environment)?)
        }),
    );

    container.set(
        RESPONSE,
        Definition::factory(|c| {
            let settings = c.get::<Settings>(SETTINGS)?;
            Ok(default_response(&settings)?)
        }),
    );

    container.set(
        ROUTER,
        Definition::factory(|c| {
            let settings = c.get::<Settings>(SETTINGS)?;
            Ok(Router::new().with_cache_file(settings.router_cache_file()))
        }),
    );

    container.set(FOUND_HANDLER, Definition::lazy(|| RequestResponse));

    container.set(
        ERROR_HANDLER,
        Definition::factory(|c| {
            let settings = c.get::<Settings>(SETTINGS)?;
            Ok(ErrorHandler::new(settings.display_error_details()))
        }),
    );

    container.set(NOT_FOUND_HANDLER, Definition::lazy(|| NotFoundHandler));

    container.set(NOT_ALLOWED_HANDLER, Definition::lazy(|| NotAllowedHandler));

    container.set(
        CALLABLE_RESOLVER,
        Definition::factory(|c| Ok(CallableResolver::new(c))),
    );
}
