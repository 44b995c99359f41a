//! Instance identity per lifetime scope

use crate::fixtures::{ALL_SCOPES, Recorder, Service, isolated_repository, service};
use ioc_container::{ComponentContainer, ComponentRepository, InstanceScope, SingletonRegistry};
use std::sync::Arc;

#[test]
fn test_same_container_returns_same_instance_for_every_scope() {
    for scope in ALL_SCOPES {
        let recorder = Recorder::default();
        let repository = isolated_repository();
        repository.add_component(service("svc", scope, &recorder)).unwrap();
        let container = ComponentContainer::new(repository);

        let first = container.resolve_instance::<dyn Service>().unwrap();
        let second = container.resolve_instance::<dyn Service>().unwrap();

        assert!(Arc::ptr_eq(&first, &second), "scope {scope}");
        assert_eq!(recorder.constructed("svc"), 1, "scope {scope}");
    }
}

#[test]
fn test_container_scope_is_per_container() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();

    let a = ComponentContainer::new(repository.clone());
    let b = ComponentContainer::new(repository);

    let from_a = a.resolve_instance::<dyn Service>().unwrap();
    let from_b = b.resolve_instance::<dyn Service>().unwrap();

    assert!(!Arc::ptr_eq(&from_a, &from_b));
    assert_eq!(recorder.constructed("svc"), 2);
}

#[test]
fn test_repository_scope_is_shared_within_repository() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Repository, &recorder))
        .unwrap();

    let a = ComponentContainer::new(repository.clone());
    let b = ComponentContainer::new(repository.clone());

    let from_a = a.resolve_instance::<dyn Service>().unwrap();
    let from_b = b.resolve_instance::<dyn Service>().unwrap();

    assert!(Arc::ptr_eq(&from_a, &from_b));
    assert_eq!(recorder.constructed("svc"), 1);
    assert_eq!(repository.shared_instance_count(), 1);
}

#[test]
fn test_repository_scope_differs_across_repositories() {
    let recorder = Recorder::default();
    let first = isolated_repository();
    let second = isolated_repository();
    first
        .add_component(service("svc", InstanceScope::Repository, &recorder))
        .unwrap();
    second
        .add_component(service("svc", InstanceScope::Repository, &recorder))
        .unwrap();

    let a = ComponentContainer::new(first).resolve_instance::<dyn Service>().unwrap();
    let b = ComponentContainer::new(second).resolve_instance::<dyn Service>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(recorder.constructed("svc"), 2);
}

#[test]
fn test_global_scope_is_shared_across_repositories() {
    let recorder = Recorder::default();
    let singletons = SingletonRegistry::new();
    let first = ComponentRepository::with_singletons(singletons.clone());
    let second = ComponentRepository::with_singletons(singletons.clone());
    first
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();
    second
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();

    let container_a = ComponentContainer::new(first);
    let container_b = ComponentContainer::new(second);
    let a = container_a.resolve_instance::<dyn Service>().unwrap();
    let b = container_b.resolve_instance::<dyn Service>().unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(recorder.constructed("svc"), 1);
    assert!(singletons.contains::<crate::fixtures::Tracked>());
}

#[test]
fn test_global_scope_respects_isolated_registries() {
    let recorder = Recorder::default();
    let first = isolated_repository();
    let second = isolated_repository();
    first
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();
    second
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();

    let a = ComponentContainer::new(first).resolve_instance::<dyn Service>().unwrap();
    let b = ComponentContainer::new(second).resolve_instance::<dyn Service>().unwrap();

    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_one_object_serves_every_provided_interface() {
    use crate::fixtures::Plugin;

    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();
    let container = ComponentContainer::new(repository);

    let as_service = container.resolve_instance::<dyn Service>().unwrap();
    let as_plugin = container.resolve_instance::<dyn Plugin>().unwrap();

    assert_eq!(as_service.label(), as_plugin.label());
    assert_eq!(recorder.constructed("svc"), 1);
}
