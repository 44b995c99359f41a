//! Reference-counted disposal

use crate::fixtures::{
    Gateway, Recorder, Service, Storage, cache, frontend, init_test_logging, isolated_repository,
    service,
};
use ioc_container::{
    BoxError, Component, ComponentContainer, ComponentDefinition, ComponentRepository, Error,
    InstanceScope, InstanceStatus, SingletonRegistry,
};
use std::sync::Arc;

#[test]
fn test_dispose_releases_container_scoped_instances_immediately() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();
    let container = ComponentContainer::new(repository);
    container.resolve_instance::<dyn Service>().unwrap();

    container.dispose().unwrap();

    assert_eq!(recorder.disposed("svc"), 1);
    assert!(container.is_disposed());
}

#[test]
fn test_shared_instance_disposed_with_last_container() {
    for scope in [InstanceScope::Repository, InstanceScope::Global] {
        let recorder = Recorder::default();
        let repository = isolated_repository();
        repository.add_component(service("svc", scope, &recorder)).unwrap();
        let a = ComponentContainer::new(repository.clone());
        let b = ComponentContainer::new(repository);
        a.resolve_instance::<dyn Service>().unwrap();
        b.resolve_instance::<dyn Service>().unwrap();

        let instance = Arc::clone(&a.instances()[0]);
        assert_eq!(instance.reference_count(), 2);

        b.dispose().unwrap();
        assert_eq!(recorder.disposed("svc"), 0, "scope {scope}");
        assert_eq!(instance.status(), InstanceStatus::Instantiated);

        a.dispose().unwrap();
        assert_eq!(recorder.disposed("svc"), 1, "scope {scope}");
        assert_eq!(instance.status(), InstanceStatus::Disposed);
    }
}

#[test]
fn test_singleton_disposed_with_last_container_of_any_repository() {
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
    let a = ComponentContainer::new(first);
    let b = ComponentContainer::new(second);
    a.resolve_instance::<dyn Service>().unwrap();
    b.resolve_instance::<dyn Service>().unwrap();

    a.dispose().unwrap();
    assert_eq!(recorder.disposed("svc"), 0);
    assert_eq!(singletons.len(), 1);

    b.dispose().unwrap();
    assert_eq!(recorder.disposed("svc"), 1);
    assert!(singletons.is_empty());
}

#[test]
fn test_disposed_shared_instance_is_not_revived() {
    for scope in [InstanceScope::Repository, InstanceScope::Global] {
        let recorder = Recorder::default();
        let repository = isolated_repository();
        repository.add_component(service("svc", scope, &recorder)).unwrap();

        let first = ComponentContainer::new(repository.clone());
        first.resolve_instance::<dyn Service>().unwrap();
        let old_wrapper = Arc::clone(&first.instances()[0]);
        first.dispose().unwrap();
        assert_eq!(repository.shared_instance_count(), 0, "scope {scope}");
        assert!(repository.singletons().is_empty(), "scope {scope}");

        let second = ComponentContainer::new(repository.clone());
        match second.resolve_instance::<dyn Service>() {
            Err(Error::Disposed { subject }) => assert_eq!(subject, "svc", "scope {scope}"),
            other => panic!(
                "Expected Disposed error for scope {scope}, got {:?}",
                other.err()
            ),
        }
        assert!(second.try_resolve_instance::<dyn Service>().is_err());

        assert_eq!(recorder.constructed("svc"), 1, "scope {scope}");
        assert_eq!(old_wrapper.status(), InstanceStatus::Disposed);
        assert!(second.instances().is_empty());
    }
}

#[test]
fn test_reregistered_singleton_gets_fresh_instance() {
    let recorder = Recorder::default();
    let singletons = SingletonRegistry::new();
    let original = ComponentRepository::with_singletons(singletons.clone());
    original
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();
    let first = ComponentContainer::new(original.clone());
    let old = first.resolve_instance::<dyn Service>().unwrap();
    first.dispose().unwrap();

    let replacement = ComponentRepository::with_singletons(singletons.clone());
    replacement
        .add_component(service("svc", InstanceScope::Global, &recorder))
        .unwrap();
    let second = ComponentContainer::new(replacement);
    let fresh = second.resolve_instance::<dyn Service>().unwrap();

    assert!(!Arc::ptr_eq(&old, &fresh));
    assert_eq!(recorder.constructed("svc"), 2);
    assert!(singletons.contains::<crate::fixtures::Tracked>());

    // The fresh singleton is shared with the original registration again
    let third = ComponentContainer::new(original);
    let shared = third.resolve_instance::<dyn Service>().unwrap();
    assert!(Arc::ptr_eq(&shared, &fresh));
    assert_eq!(recorder.constructed("svc"), 2);
}

#[test]
fn test_repository_registered_after_teardown_builds_its_own_instance() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Repository, &recorder))
        .unwrap();
    ComponentContainer::new(repository.clone())
        .resolve_instance::<dyn Service>()
        .unwrap();
    assert_eq!(recorder.disposed("svc"), 1);

    let child = ComponentRepository::with_parent(&repository);
    child
        .add_component(service("svc", InstanceScope::Repository, &recorder))
        .unwrap();
    let container = ComponentContainer::new(child);

    assert_eq!(container.resolve_instance::<dyn Service>().unwrap().label(), "svc");
    assert_eq!(recorder.constructed("svc"), 2);
}

#[test]
fn test_double_dispose_fails() {
    let container = ComponentContainer::new(isolated_repository());
    container.dispose().unwrap();

    let error = container.dispose().unwrap_err();
    assert!(error.is_disposed());
}

#[test]
fn test_resolve_after_dispose_fails() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();
    let container = ComponentContainer::new(repository);
    container.dispose().unwrap();

    assert!(matches!(
        container.resolve_instance::<dyn Service>(),
        Err(Error::Disposed { .. })
    ));
    let Err(error) = container.try_resolve_instance::<dyn Service>() else {
        panic!("try_resolve_instance should fail after dispose");
    };
    assert!(error.is_disposed());
    let Err(error) = container.resolve_instances::<dyn Service>() else {
        panic!("resolve_instances should fail after dispose");
    };
    assert!(error.is_disposed());
    assert_eq!(recorder.constructed("svc"), 0);
}

struct Faulty;

impl Component for Faulty {
    fn dispose(&self) -> Result<(), BoxError> {
        Err("socket already closed".into())
    }
}

impl Storage for Faulty {
    fn label(&self) -> &str {
        "faulty"
    }
}

#[test]
fn test_disposal_failures_do_not_block_other_components() {
    init_test_logging();
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();
    repository
        .add_component(
            ComponentDefinition::<Faulty>::new()
                .provides::<dyn Storage>(|c| c as Arc<dyn Storage>)
                .constructor(|| Faulty),
        )
        .unwrap();
    let container = ComponentContainer::new(repository);
    container.resolve_instance::<dyn Service>().unwrap();
    container.resolve_instance::<dyn Storage>().unwrap();

    container.dispose().unwrap();

    assert_eq!(recorder.disposed("svc"), 1);
}

#[test]
fn test_dependents_disposed_before_dependencies() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("leaf", InstanceScope::Container, &recorder))
        .unwrap();
    repository
        .add_component(cache(InstanceScope::Container, &recorder))
        .unwrap();
    repository
        .add_component(frontend(InstanceScope::Container, &recorder))
        .unwrap();
    let container = ComponentContainer::new(repository);
    container.resolve_instance::<dyn Gateway>().unwrap();

    container.dispose().unwrap();

    assert_eq!(recorder.disposals(), vec!["frontend", "cache", "leaf"]);
}

#[test]
fn test_shared_dependency_outlives_dependent_regardless_of_creating_container() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("leaf", InstanceScope::Repository, &recorder))
        .unwrap();
    repository
        .add_component(cache(InstanceScope::Repository, &recorder))
        .unwrap();

    // `a` creates both; `b` only ever asks for the dependent
    let a = ComponentContainer::new(repository.clone());
    let b = ComponentContainer::new(repository);
    a.resolve_instance::<dyn Storage>().unwrap();
    b.resolve_instance::<dyn Storage>().unwrap();
    assert_eq!(b.instances().len(), 2);

    a.dispose().unwrap();
    assert!(recorder.disposals().is_empty());

    b.dispose().unwrap();
    assert_eq!(recorder.disposals(), vec!["cache", "leaf"]);
}

#[test]
fn test_dependency_held_elsewhere_survives_dependent_teardown() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("leaf", InstanceScope::Repository, &recorder))
        .unwrap();
    repository
        .add_component(cache(InstanceScope::Repository, &recorder))
        .unwrap();

    let a = ComponentContainer::new(repository.clone());
    let b = ComponentContainer::new(repository);
    a.resolve_instance::<dyn Storage>().unwrap();
    b.resolve_instance::<dyn Service>().unwrap();

    a.dispose().unwrap();
    assert_eq!(recorder.disposals(), vec!["cache"]);

    b.dispose().unwrap();
    assert_eq!(recorder.disposals(), vec!["cache", "leaf"]);
}

#[test]
fn test_dropping_undisposed_container_releases_references() {
    let recorder = Recorder::default();
    let repository = isolated_repository();
    repository
        .add_component(service("svc", InstanceScope::Container, &recorder))
        .unwrap();
    {
        let container = ComponentContainer::new(repository);
        container.resolve_instance::<dyn Service>().unwrap();
    }

    assert_eq!(recorder.disposed("svc"), 1);
}

#[test]
fn test_external_instances_are_never_disposed() {
    let recorder = Recorder::default();
    let external: Arc<dyn Service> = Arc::new(crate::fixtures::Tracked::new("external", &recorder));
    let container = ComponentContainer::builder(isolated_repository())
        .with_instance::<dyn Service>(Arc::clone(&external))
        .build();

    let resolved = container.resolve_instance::<dyn Service>().unwrap();
    container.dispose().unwrap();

    assert!(Arc::ptr_eq(&resolved, &external));
    assert_eq!(recorder.disposed("external"), 0);
}
