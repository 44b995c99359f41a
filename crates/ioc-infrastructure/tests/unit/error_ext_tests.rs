//! Error Extension Tests

use ioc_container::{
    Component, ComponentContainer, ComponentDefinition, ComponentRepository, SingletonRegistry,
    component_interface,
};
use ioc_domain::BoxError;
use ioc_domain::error::{Error, Result};
use ioc_infrastructure::error_ext::ErrorContext;
use std::io;
use std::sync::Arc;

fn missing() -> std::result::Result<(), io::Error> {
    Err(io::Error::new(io::ErrorKind::NotFound, "file not found"))
}

#[test]
fn test_io_context() {
    let result: Result<()> = missing().io_context("failed to read file");

    if let Err(Error::Io { source, message }) = result {
        assert_eq!(message, "failed to read file: file not found");
        assert!(source.is_some());
    } else {
        panic!("Expected Io error");
    }
}

#[test]
fn test_config_context() {
    let result: Result<()> = missing().config_context("failed to load ioc.toml");

    assert!(matches!(result, Err(Error::Configuration { source: Some(_), .. })));
}

#[test]
fn test_context_wraps_as_infrastructure() {
    let result: Result<()> = missing().context("bootstrap");

    match result {
        Err(Error::Infrastructure { message, source }) => {
            assert!(message.starts_with("bootstrap: "));
            assert!(source.is_some());
        }
        other => panic!("Expected Infrastructure error, got {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let mut evaluated = false;
    let ok: std::result::Result<u8, io::Error> = Ok(7);

    let value = ok
        .with_context(|| {
            evaluated = true;
            "never rendered"
        })
        .unwrap();

    assert_eq!(value, 7);
    assert!(!evaluated);
}

#[test]
fn test_component_context_wraps_as_construction() {
    let result: Result<()> = missing().component_context("volume");

    match result {
        Err(Error::Construction { component, source }) => {
            assert_eq!(component, "volume");
            assert!(source.downcast_ref::<io::Error>().is_some());
        }
        other => panic!("Expected Construction error, got {other:?}"),
    }
}

#[test]
fn test_component_context_keeps_container_errors() {
    let failed: std::result::Result<(), Error> = Err(Error::not_found("dyn Volume"));

    let result = failed.component_context("volume");

    assert!(matches!(result, Err(Error::NotFound { .. })));
}

trait Volume: Send + Sync {}

component_interface!(dyn Volume);

struct Mount;

impl Component for Mount {}

impl Volume for Mount {}

#[test]
fn test_component_context_in_fallible_constructor() {
    let repository = ComponentRepository::with_singletons(SingletonRegistry::new());
    repository
        .add_component(
            ComponentDefinition::<Mount>::new()
                .named("mount")
                .provides::<dyn Volume>(|c| c as Arc<dyn Volume>)
                .try_constructor(|| -> std::result::Result<Mount, BoxError> {
                    missing().component_context("mount")?;
                    Ok(Mount)
                }),
        )
        .unwrap();
    let container = ComponentContainer::new(repository);

    let Err(error) = container.resolve_instance::<dyn Volume>() else {
        panic!("mount constructor should fail");
    };

    match error {
        Error::Construction { component, source } => {
            assert_eq!(component, "mount");
            assert_eq!(source.to_string(), "file not found");
        }
        other => panic!("Expected Construction error, got {other:?}"),
    }
    assert!(container.instances().is_empty());
}
