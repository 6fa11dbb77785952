//! End-to-end tests for building containers through the public API.

use std::fs;
use std::sync::Arc;

use serde_json::{json, Map, Value};
use tether::defaults::{self, SERVICE_KEYS};
use tether::engine::{DefinitionCache, MemoryCache};
use tether::framework::{
    CallableResolver, Environment, ErrorHandler, NotAllowedHandler, NotFoundHandler, Request,
    RequestResponse, Response, Router,
};
use tether::{
    Autowire, Builder, CacheBackend, ConfigError, Configuration, ContainerClass, ContainerError,
    Definition, DefinitionSource, Definitions, Error, Settings,
};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected an object"),
    }
}

/// Resolves `key` twice as `T` and checks both lookups share one instance.
fn assert_singleton<T: Send + Sync + 'static>(container: &tether::Container, key: &str) {
    let first = container
        .get::<T>(key)
        .unwrap_or_else(|e| panic!("{key}: {e}"));
    let second = container.get::<T>(key).unwrap();
    assert!(Arc::ptr_eq(&first, &second), "{key} resolved twice");
}

#[test]
fn test_default_services_resolve_to_framework_types() {
    let container = Builder::build(Map::new(), Definitions::new()).unwrap();

    assert_singleton::<Settings>(&container, defaults::SETTINGS);
    assert_singleton::<Environment>(&container, defaults::ENVIRONMENT);
    assert_singleton::<Request>(&container, defaults::REQUEST);
    assert_singleton::<Response>(&container, defaults::RESPONSE);
    assert_singleton::<Router>(&container, defaults::ROUTER);
    assert_singleton::<RequestResponse>(&container, defaults::FOUND_HANDLER);
    assert_singleton::<ErrorHandler>(&container, defaults::ERROR_HANDLER);
    assert_singleton::<NotFoundHandler>(&container, defaults::NOT_FOUND_HANDLER);
    assert_singleton::<NotAllowedHandler>(&container, defaults::NOT_ALLOWED_HANDLER);
    assert_singleton::<CallableResolver>(&container, defaults::CALLABLE_RESOLVER);

    for key in SERVICE_KEYS {
        assert!(container.is_resolved(key), "{key} not memoized");
    }
}

#[test]
fn test_user_settings_flow_into_services() {
    let settings = object(json!({
        "settings": {
            "displayErrorDetails": true,
            "httpVersion": "2",
            "responseChunkSize": 8192,
        }
    }));
    let container = Builder::build(settings, Definitions::new()).unwrap();

    let merged = container.get::<Settings>("settings").unwrap();
    assert_eq!(merged.http_version(), "2");
    assert_eq!(merged.response_chunk_size(), 8192);
    assert_eq!(merged.output_buffering(), Some("append"));
    assert!(merged.add_content_length_header());

    assert!(container
        .get::<ErrorHandler>("errorHandler")
        .unwrap()
        .display_error_details());
    assert_eq!(
        container.get::<Response>("response").unwrap().version(),
        http::Version::HTTP_2
    );
}

#[test]
fn test_explicit_settings_definition_wins() {
    let settings = object(json!({"settings": {"displayErrorDetails": true}}));
    let definitions = Definitions::new().value("settings", Settings::defaults());

    let container = Builder::build(settings, definitions).unwrap();

    let resolved = container.get::<Settings>("settings").unwrap();
    assert!(!resolved.display_error_details());
    assert_eq!(*resolved, Settings::defaults());
}

#[test]
fn test_invalid_setting_type_is_rejected() {
    let settings = object(json!({"settings": {"responseChunkSize": "large"}}));

    let err = Builder::build(settings, Definitions::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidSetting { ref key, .. }) if key == "responseChunkSize"
    ));
}

#[test]
fn test_plain_values_and_not_found() {
    let container = Builder::build(Map::new(), Definitions::new().value("foo", "bar")).unwrap();

    assert_eq!(*container.get::<&str>("foo").unwrap(), "bar");

    let err = container.get_service("missing").unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, ContainerError::NotFound { ref name, .. } if name == "missing"));
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_remove_leaves_entries_in_place() {
    let container = Builder::build(Map::new(), Definitions::new().value("foo", "bar")).unwrap();

    container.remove("foo");
    container.remove("router");
    container.remove("never-defined");

    assert!(container.has("foo"));
    assert!(container.has("router"));
    assert!(!container.has("never-defined"));
}

#[test]
fn test_set_after_build_replaces_default() {
    let container = Builder::build(Map::new(), Definitions::new()).unwrap();
    let default_router = container.get::<Router>("router").unwrap();

    container.set("router", Definition::value(Router::new().with_base_path("/api")));

    let router = container.get::<Router>("router").unwrap();
    assert!(!Arc::ptr_eq(&default_router, &router));
    assert_eq!(router.url_for("users"), "/api/users");
}

#[test]
fn test_callable_resolver_uses_container() {
    let definitions = Definitions::new().value("home", String::from("controller"));
    let container = Builder::build(Map::new(), definitions).unwrap();

    let resolver = container
        .get::<CallableResolver>("callableResolver")
        .unwrap();
    let callable = resolver.resolve("home:index").unwrap();

    assert_eq!(callable.method.as_deref(), Some("index"));
    let service = callable.service.downcast::<String>().unwrap();
    assert_eq!(service.as_str(), "controller");

    assert!(resolver.resolve("nope:index").unwrap_err().is_not_found());
}

#[derive(Debug)]
struct Mailer {
    sender: String,
}

#[derive(Debug, Autowire)]
struct SignupService {
    mailer: Arc<Mailer>,
    #[inject("settings")]
    config: Arc<Settings>,
}

#[test]
fn test_derive_autowire_resolves_fields() {
    let definitions = Definitions::new()
        .factory("mailer", |_| {
            Ok(Mailer {
                sender: "noreply@example.com".to_string(),
            })
        })
        .autowire::<SignupService>("signup");
    let container = Builder::build(Map::new(), definitions).unwrap();

    let signup = container.get::<SignupService>("signup").unwrap();
    assert_eq!(signup.mailer.sender, "noreply@example.com");
    assert_eq!(signup.config.http_version(), "1.1");

    let again = container.autowired::<SignupService>().unwrap();
    assert!(Arc::ptr_eq(&again, &container.autowired::<SignupService>().unwrap()));
}

#[test]
fn test_autowiring_can_be_disabled() {
    let settings = object(json!({"di": {"autowiring": false}}));
    let container = Builder::build(
        settings,
        Definitions::new().autowire::<SignupService>("signup"),
    )
    .unwrap();

    assert!(container.get_service("signup").is_err());
    assert!(container.autowired::<SignupService>().unwrap_err().is_not_found());
}

#[test]
fn test_engine_options_from_di_key() {
    let proxies = tempfile::tempdir().unwrap();
    let settings = object(json!({
        "di": {
            "container_class": "TracedContainer",
            "proxy_directory": proxies.path().to_str().unwrap(),
        }
    }));

    let container = Builder::build(settings, Definitions::new()).unwrap();

    assert_eq!(
        container.engine().options().proxy_directory.as_deref(),
        Some(proxies.path())
    );
    assert!(container.get::<Router>("router").is_ok());
}

#[test]
fn test_unknown_container_class_is_rejected() {
    let settings = object(json!({"di": {"container_class": "Nope"}}));

    let err = Builder::build(settings, Definitions::new()).unwrap_err();

    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidContainerClass { ref name, .. }) if name == "Nope"
    ));
}

#[test]
fn test_missing_proxy_directory_is_rejected() {
    let root = tempfile::tempdir().unwrap();
    let missing = root.path().join("absent");

    let mut configuration = Configuration::new();
    let err = configuration.set_proxy_directory(&missing).unwrap_err();

    assert!(matches!(err, ConfigError::DirectoryNotFound(ref path) if *path == missing));
    assert!(configuration.proxy_directory().is_none());
}

#[test]
fn test_compilation_path_must_be_a_directory() {
    let root = tempfile::tempdir().unwrap();
    let file = root.path().join("cache.bin");
    fs::write(&file, b"").unwrap();

    let mut configuration = Configuration::new();

    assert!(matches!(
        configuration.set_compilation_path(&file),
        Err(ConfigError::NotADirectory(_))
    ));
    configuration.set_compilation_path(root.path()).unwrap();
    assert_eq!(configuration.compilation_path(), Some(root.path()));
}

#[test]
fn test_definition_files_below_user_settings() {
    let dir = tempfile::tempdir().unwrap();
    let json_file = dir.path().join("services.json");
    let toml_file = dir.path().join("services.toml");
    fs::write(&json_file, r#"{"mailer.host": "smtp.local", "greeting": "from file"}"#).unwrap();
    fs::write(&toml_file, "port = 2525\n").unwrap();

    let mut configuration = Configuration::new();
    configuration
        .add_definitions(DefinitionSource::File(json_file))
        .unwrap();
    configuration
        .add_definitions(DefinitionSource::File(toml_file))
        .unwrap();

    let settings = object(json!({"greeting": "from settings"}));
    let container = Builder::new(configuration)
        .build_with(settings, Definitions::new())
        .unwrap();

    assert_eq!(
        *container.get::<Value>("mailer.host").unwrap(),
        json!("smtp.local")
    );
    assert_eq!(*container.get::<Value>("port").unwrap(), json!(2525));
    assert_eq!(
        *container.get::<Value>("greeting").unwrap(),
        json!("from settings")
    );
}

#[test]
fn test_memory_cache_serves_definition_files() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("services.json");
    fs::write(&file, r#"{"greeting": "first"}"#).unwrap();

    let cache = Arc::new(MemoryCache::new());
    let configuration = || {
        let mut configuration = Configuration::new();
        configuration.set_definition_cache(CacheBackend::Memory);
        configuration
            .add_definitions(DefinitionSource::File(file.clone()))
            .unwrap();
        configuration
    };

    let first = Builder::new(configuration())
        .with_definition_cache(cache.clone())
        .build_with(Map::new(), Definitions::new())
        .unwrap();
    assert_eq!(*first.get::<Value>("greeting").unwrap(), json!("first"));

    // Cached entries are never invalidated.
    fs::write(&file, r#"{"greeting": "second"}"#).unwrap();
    let second = Builder::new(configuration())
        .with_definition_cache(cache.clone())
        .build_with(Map::new(), Definitions::new())
        .unwrap();
    assert_eq!(*second.get::<Value>("greeting").unwrap(), json!("first"));

    let key = format!("definitions:{}", file.display());
    assert!(cache.fetch(&key).unwrap().is_some());
}

#[test]
fn test_file_cache_requires_compilation_path() {
    let settings = object(json!({"di": {"definition_cache": "file"}}));

    let err = Builder::build(settings, Definitions::new()).unwrap_err();

    assert!(matches!(err, Error::Config(ConfigError::MissingCompilationPath)));
}

#[test]
fn test_file_cache_writes_under_compilation_path() {
    let sources = tempfile::tempdir().unwrap();
    let compiled = tempfile::tempdir().unwrap();
    let file = sources.path().join("services.json");
    fs::write(&file, r#"{"greeting": "cached"}"#).unwrap();

    let settings = object(json!({
        "di": {
            "definition_cache": "file",
            "compilation_path": compiled.path().to_str().unwrap(),
            "definitions": [file.to_str().unwrap()],
        }
    }));
    let container = Builder::build(settings, Definitions::new()).unwrap();

    assert_eq!(*container.get::<Value>("greeting").unwrap(), json!("cached"));
    let entries = fs::read_dir(compiled.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_file_cache_keeps_similar_paths_apart() {
    let sources = tempfile::tempdir().unwrap();
    let compiled = tempfile::tempdir().unwrap();
    let dash = sources.path().join("app-x.json");
    let underscore = sources.path().join("app_x.json");
    fs::write(&dash, r#"{"greeting": "from dash"}"#).unwrap();
    fs::write(&underscore, r#"{"greeting": "from underscore"}"#).unwrap();

    let build = |file: &std::path::Path| {
        let settings = object(json!({
            "di": {
                "definition_cache": "file",
                "compilation_path": compiled.path().to_str().unwrap(),
                "definitions": [file.to_str().unwrap()],
            }
        }));
        Builder::build(settings, Definitions::new()).unwrap()
    };

    let first = build(&dash);
    let second = build(&underscore);

    assert_eq!(*first.get::<Value>("greeting").unwrap(), json!("from dash"));
    assert_eq!(*second.get::<Value>("greeting").unwrap(), json!("from underscore"));
}

#[test]
fn test_container_classes_are_named() {
    let names: Vec<&str> = ContainerClass::ALL.iter().map(ContainerClass::name).collect();
    assert_eq!(names, ["Container", "TracedContainer"]);
    assert_eq!(
        "TracedContainer".parse::<ContainerClass>().unwrap(),
        ContainerClass::Traced
    );
}
