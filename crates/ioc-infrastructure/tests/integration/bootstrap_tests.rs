//! Container factory tests

use ioc_container::{
    Component, ComponentDefinition, ComponentRepository, InstanceScope, SingletonRegistry,
    component_interface,
};
use ioc_domain::{ContainerSettings, Error};
use ioc_infrastructure::{ConfigBuilder, ContainerFactory};
use std::sync::Arc;

trait Source: Send + Sync {
    fn depth(&self) -> usize;
}

component_interface!(dyn Source);

struct Root;
impl Component for Root {}
impl Source for Root {
    fn depth(&self) -> usize {
        0
    }
}

struct Layer {
    inner: Arc<dyn Source>,
}
impl Component for Layer {}

trait Stack: Send + Sync {
    fn depth(&self) -> usize;
}

component_interface!(dyn Stack);

impl Stack for Layer {
    fn depth(&self) -> usize {
        self.inner.depth() + 1
    }
}

fn repository() -> ComponentRepository {
    let repository = ComponentRepository::with_singletons(SingletonRegistry::new());
    repository
        .add_component(
            ComponentDefinition::<Root>::new()
                .provides::<dyn Source>(|c| c as Arc<dyn Source>)
                .scope(InstanceScope::Repository)
                .constructor(|| Root),
        )
        .unwrap();
    repository
        .add_component(
            ComponentDefinition::<Layer>::new()
                .provides::<dyn Stack>(|c| c as Arc<dyn Stack>)
                .constructor(|inner: Arc<dyn Source>| Layer { inner }),
        )
        .unwrap();
    repository
}

#[test]
fn test_factory_applies_configured_settings() {
    let config = ConfigBuilder::new()
        .with_container(ContainerSettings {
            max_resolve_depth: 5,
            log_progress: true,
        })
        .build();
    let factory = ContainerFactory::from_config(repository(), &config);

    let container = factory.create();

    assert_eq!(container.settings(), &config.container);
    assert!(container.repository().ptr_eq(factory.repository()));
    assert_eq!(container.resolve_instance::<dyn Stack>().unwrap().depth(), 1);
}

#[test]
fn test_factory_containers_share_repository_instances() {
    let factory = ContainerFactory::new(repository(), ContainerSettings::default());
    let first = factory.create();
    let second = factory.create();

    let a = first.resolve_instance::<dyn Source>().unwrap();
    let b = second.resolve_instance::<dyn Source>().unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_ne!(first.id(), second.id());
    assert_eq!(factory.repository().shared_instance_count(), 1);

    first.dispose().unwrap();
    second.dispose().unwrap();
    assert_eq!(factory.repository().shared_instance_count(), 0);

    let Err(error) = factory.create().resolve_instance::<dyn Source>() else {
        panic!("a disposed shared instance must not be rebuilt");
    };
    assert!(error.is_disposed());
}

#[test]
fn test_configured_depth_limit_is_enforced() {
    let factory = ContainerFactory::new(
        repository(),
        ContainerSettings {
            max_resolve_depth: 1,
            log_progress: false,
        },
    );

    let error = factory.create()
        .resolve_instance::<dyn Stack>()
        .err()
        .expect("resolution should fail");

    match error {
        Error::Recursion { chain } => assert_eq!(chain, vec!["Layer", "Root"]),
        other => panic!("Expected Recursion error, got {other:?}"),
    }
}

#[test]
fn test_factory_builder_accepts_external_instances() {
    let factory = ContainerFactory::new(repository(), ContainerSettings::default());
    let external: Arc<dyn Source> = Arc::new(Root);

    let container = factory.builder().with_instance(Arc::clone(&external)).build();

    assert!(matches!(
        container.resolve_instance::<dyn Source>(),
        Err(Error::Ambiguous { .. })
    ));
}
