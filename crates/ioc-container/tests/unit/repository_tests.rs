//! Unit tests for component repositories

use ioc_container::{
    Component, ComponentDefinition, ComponentRepository, SingletonRegistry, TypeKey,
    component_interface,
};
use std::sync::Arc;

trait Codec: Send + Sync {}
trait Transport: Send + Sync {}

component_interface!(dyn Codec, dyn Transport);

struct Json;
impl Component for Json {}
impl Codec for Json {}

struct Yaml;
impl Component for Yaml {}
impl Codec for Yaml {}

struct Tcp;
impl Component for Tcp {}
impl Transport for Tcp {}

fn json() -> ComponentDefinition<Json> {
    ComponentDefinition::<Json>::new()
        .provides::<dyn Codec>(|c| c as Arc<dyn Codec>)
        .constructor(|| Json)
}

fn yaml() -> ComponentDefinition<Yaml> {
    ComponentDefinition::<Yaml>::new()
        .provides::<dyn Codec>(|c| c as Arc<dyn Codec>)
        .constructor(|| Yaml)
}

fn tcp() -> ComponentDefinition<Tcp> {
    ComponentDefinition::<Tcp>::new()
        .provides::<dyn Transport>(|c| c as Arc<dyn Transport>)
        .constructor(|| Tcp)
}

fn names(descriptors: &[Arc<ioc_container::ComponentDescriptor>]) -> Vec<&str> {
    descriptors.iter().map(|d| d.name()).collect()
}

#[test]
fn test_descriptors_keep_registration_order() {
    let repository = ComponentRepository::with_singletons(SingletonRegistry::new());
    repository.add_component(yaml()).unwrap();
    repository.add_component(tcp()).unwrap();
    repository.add_component(json()).unwrap();

    assert_eq!(repository.len(), 3);
    assert_eq!(names(&repository.descriptors()), vec!["Yaml", "Tcp", "Json"]);
    assert_eq!(
        names(&repository.component_descriptors::<dyn Codec>()),
        vec!["Yaml", "Json"]
    );
}

#[test]
fn test_lookup_falls_back_to_parent_only_without_local_match() {
    let parent = ComponentRepository::with_singletons(SingletonRegistry::new());
    parent.add_component(json()).unwrap();
    parent.add_component(tcp()).unwrap();
    let child = ComponentRepository::with_parent(&parent);
    child.add_component(yaml()).unwrap();

    assert_eq!(names(&child.component_descriptors::<dyn Codec>()), vec!["Yaml"]);
    assert_eq!(names(&child.component_descriptors::<dyn Transport>()), vec!["Tcp"]);
    assert_eq!(child.len(), 1);
}

#[test]
fn test_lookup_walks_the_whole_chain() {
    let root = ComponentRepository::with_singletons(SingletonRegistry::new());
    root.add_component(tcp()).unwrap();
    let middle = ComponentRepository::with_parent(&root);
    let leaf = ComponentRepository::with_parent(&middle);

    assert_eq!(
        names(&leaf.descriptors_for(&TypeKey::of::<dyn Transport>())),
        vec!["Tcp"]
    );
    assert!(leaf.component_descriptors::<dyn Codec>().is_empty());
    assert!(leaf.parent().unwrap().ptr_eq(&middle));
    assert!(root.parent().is_none());
}

#[test]
fn test_child_inherits_singleton_registry() {
    let singletons = SingletonRegistry::new();
    let parent = ComponentRepository::with_singletons(singletons.clone());
    let child = ComponentRepository::with_parent(&parent);

    assert!(child.singletons().ptr_eq(&singletons));
    assert!(!child.singletons().ptr_eq(&SingletonRegistry::global()));
}

#[test]
fn test_default_repository_uses_global_singletons() {
    let repository = ComponentRepository::default();

    assert!(repository.singletons().ptr_eq(&SingletonRegistry::global()));
    assert!(repository.is_empty());
    assert_eq!(repository.shared_instance_count(), 0);
}

#[test]
fn test_descriptor_owner_is_weak() {
    let repository = ComponentRepository::with_singletons(SingletonRegistry::new());
    let descriptor = repository.add_component(json()).unwrap();
    assert!(descriptor.owner().is_some());

    drop(repository);

    assert!(descriptor.owner().is_none());
}
