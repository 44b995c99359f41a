//! Component container
//!
//! The container resolves interfaces against its repository and a set of
//! external instances, constructs dependencies recursively and keeps a
//! dependency-first list of every wrapper it references. Disposing the
//! container releases those references in reverse order.
//!
//! A container handle injected into a component (`ComponentContainer`
//! parameter) is a strong reference; such a container is only cleaned up
//! by an explicit [`ComponentContainer::dispose`]. Prefer `Deferred<I>` for
//! late lookups.

mod reporting;
mod resolution;
pub(crate) mod stack;

use crate::component::{ComponentInterface, ComponentObject};
use crate::descriptor::{ComponentDescriptor, DescriptorId};
use crate::injection::ConstructionContext;
use crate::instance::{
    ComponentInstance, Constructed, InstanceRegistry, SharedInstance, SimpleInstance,
    SingletonInstance,
};
use crate::repository::ComponentRepository;
use ioc_domain::constants::CONTAINER_SUBJECT;
use ioc_domain::{ContainerSettings, Error, InstanceScope, Result, TypeKey};
use parking_lot::Mutex;
use stack::{ResolveGuard, ScopeKey};
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, trace, warn};

static NEXT_CONTAINER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    fn next() -> Self {
        Self(NEXT_CONTAINER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "container-{}", self.0)
    }
}

type Progress<'a> = Option<&'a dyn Fn(&str)>;

/// A resolved value and the wrapper backing it (`None` for external instances)
pub(crate) type Resolved<I> = (Arc<I>, Option<Arc<dyn ComponentInstance>>);

/// Pre-built instance supplied when the container was created
struct ExternalInstance {
    interface: TypeKey,
    // Holds an `Arc<I>` for `interface`
    value: Arc<dyn Any + Send + Sync>,
}

impl ExternalInstance {
    fn get<I: ComponentInterface + ?Sized>(&self) -> Result<Arc<I>> {
        self.value.downcast_ref::<Arc<I>>().cloned().ok_or_else(|| {
            Error::internal(format!(
                "external instance registered for {} has a different type",
                self.interface
            ))
        })
    }

    fn name(&self) -> String {
        format!("external {}", self.interface.name())
    }
}

struct ContainerInner {
    id: ContainerId,
    repository: ComponentRepository,
    externals: Vec<ExternalInstance>,
    simple: InstanceRegistry<DescriptorId, SimpleInstance>,
    referenced: Mutex<Vec<Arc<dyn ComponentInstance>>>,
    disposed: AtomicBool,
    settings: ContainerSettings,
}

impl ContainerInner {
    /// Release every referenced wrapper, dependents before dependencies
    fn release_all(&self) {
        let referenced = std::mem::take(&mut *self.referenced.lock());
        for instance in referenced.iter().rev() {
            release(self.id, instance);
        }
        self.simple.clear();
    }
}

fn release(container: ContainerId, instance: &Arc<dyn ComponentInstance>) {
    let component = instance.descriptor().name();
    match instance.release(container) {
        Ok(true) => {}
        Ok(false) => trace!(component, %container, "Released component reference"),
        Err(error) => warn!(component, %container, error = %error, "Component disposal failed"),
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        if !*self.disposed.get_mut() {
            debug!(container = %self.id, "Releasing references of undisposed container");
            self.release_all();
        }
    }
}

/// Resolution engine and owner of per-container instances.
///
/// Cloning yields another handle to the same container.
#[derive(Clone)]
pub struct ComponentContainer {
    inner: Arc<ContainerInner>,
}

impl ComponentContainer {
    /// Container over `repository` with default settings and no external instances
    pub fn new(repository: ComponentRepository) -> Self {
        Self::builder(repository).build()
    }

    /// Start building a container over `repository`
    pub fn builder(repository: ComponentRepository) -> ComponentContainerBuilder {
        ComponentContainerBuilder {
            repository,
            externals: Vec::new(),
            settings: ContainerSettings::default(),
        }
    }

    /// Process-unique container id
    pub fn id(&self) -> ContainerId {
        self.inner.id
    }

    /// Repository this container resolves against
    pub fn repository(&self) -> &ComponentRepository {
        &self.inner.repository
    }

    /// Settings applied to this container
    pub fn settings(&self) -> &ContainerSettings {
        &self.inner.settings
    }

    /// Whether `dispose` has been called
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }

    /// Wrappers this container references, dependencies before dependents
    pub fn instances(&self) -> Vec<Arc<dyn ComponentInstance>> {
        self.inner.referenced.lock().clone()
    }

    /// Non-owning handle
    pub fn downgrade(&self) -> WeakComponentContainer {
        WeakComponentContainer {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Resolve exactly one provider of `I`.
    ///
    /// Fails with `Error::NotFound` when nothing provides `I` and with
    /// `Error::Ambiguous` when more than one provider exists at the winning
    /// repository level.
    pub fn resolve_instance<I: ComponentInterface + ?Sized>(&self) -> Result<Arc<I>> {
        self.resolve_required::<I>(None)
    }

    /// [`resolve_instance`](Self::resolve_instance), reporting the name of
    /// every component constructed by this call, dependencies first.
    ///
    /// Components built by lookups a constructor makes itself, such as
    /// `Deferred::get`, are reported before that constructor's component.
    pub fn resolve_instance_with_progress<I: ComponentInterface + ?Sized>(
        &self,
        progress: &dyn Fn(&str),
    ) -> Result<Arc<I>> {
        self.resolve_required::<I>(Some(progress))
    }

    /// Like [`resolve_instance`](Self::resolve_instance) but returns `None`
    /// when nothing provides `I`. Still fails on ambiguity.
    pub fn try_resolve_instance<I: ComponentInterface + ?Sized>(&self) -> Result<Option<Arc<I>>> {
        Ok(self.resolve_single::<I>(None)?.map(|(value, _)| value))
    }

    /// [`try_resolve_instance`](Self::try_resolve_instance) with a progress callback
    pub fn try_resolve_instance_with_progress<I: ComponentInterface + ?Sized>(
        &self,
        progress: &dyn Fn(&str),
    ) -> Result<Option<Arc<I>>> {
        Ok(self.resolve_single::<I>(Some(progress))?.map(|(value, _)| value))
    }

    /// Resolve every provider of `I`: external instances first, then the
    /// descriptors of the winning repository level in registration order.
    /// Returns an empty vector when nothing provides `I`.
    pub fn resolve_instances<I: ComponentInterface + ?Sized>(&self) -> Result<Vec<Arc<I>>> {
        self.resolve_many::<I>(None)
            .map(|resolved| resolved.into_iter().map(|(value, _)| value).collect())
    }

    /// [`resolve_instances`](Self::resolve_instances) with a progress callback
    pub fn resolve_instances_with_progress<I: ComponentInterface + ?Sized>(
        &self,
        progress: &dyn Fn(&str),
    ) -> Result<Vec<Arc<I>>> {
        self.resolve_many::<I>(Some(progress))
            .map(|resolved| resolved.into_iter().map(|(value, _)| value).collect())
    }

    /// Release every instance this container references and mark it disposed.
    ///
    /// Failures of individual dispose hooks are logged and discarded.
    /// Disposing twice fails with `Error::Disposed`.
    pub fn dispose(&self) -> Result<()> {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return Err(Error::disposed(CONTAINER_SUBJECT));
        }
        debug!(container = %self.id(), "Disposing container");
        self.inner.release_all();
        Ok(())
    }

    pub(crate) fn resolve_dependency<I: ComponentInterface + ?Sized>(
        &self,
        progress: Progress<'_>,
    ) -> Result<Resolved<I>> {
        self.resolve_single::<I>(progress)?
            .ok_or_else(|| Error::not_found(TypeKey::of::<I>().name()))
    }

    pub(crate) fn resolve_dependencies<I: ComponentInterface + ?Sized>(
        &self,
        progress: Progress<'_>,
    ) -> Result<Vec<Resolved<I>>> {
        self.resolve_many::<I>(progress)
    }

    /// Number of providers of `interface`: external instances plus the
    /// descriptors of the winning repository level
    pub(crate) fn candidate_count(&self, interface: &TypeKey) -> usize {
        self.externals_for(interface).count()
            + self.inner.repository.descriptors_for(interface).len()
    }

    fn resolve_required<I: ComponentInterface + ?Sized>(
        &self,
        progress: Progress<'_>,
    ) -> Result<Arc<I>> {
        self.resolve_dependency::<I>(progress).map(|(value, _)| value)
    }

    fn ensure_live(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(Error::disposed(CONTAINER_SUBJECT));
        }
        Ok(())
    }

    fn externals_for<'a>(
        &'a self,
        interface: &'a TypeKey,
    ) -> impl Iterator<Item = &'a ExternalInstance> + 'a {
        self.inner
            .externals
            .iter()
            .filter(move |external| external.interface == *interface)
    }

    fn resolve_single<I: ComponentInterface + ?Sized>(
        &self,
        progress: Progress<'_>,
    ) -> Result<Option<Resolved<I>>> {
        self.ensure_live()?;
        let interface = TypeKey::of::<I>();
        trace!(interface = interface.name(), container = %self.id(), "Resolving instance");

        let externals: Vec<_> = self.externals_for(&interface).collect();
        let descriptors = self.inner.repository.descriptors_for(&interface);
        match (externals.as_slice(), descriptors.as_slice()) {
            ([], []) => Ok(None),
            ([external], []) => Ok(Some((external.get::<I>()?, None))),
            ([], [descriptor]) => self.resolve_descriptor::<I>(descriptor, progress).map(Some),
            _ => {
                let implementations = externals
                    .iter()
                    .map(|external| external.name())
                    .chain(
                        descriptors
                            .iter()
                            .map(|descriptor| descriptor.implementation().name().to_string()),
                    )
                    .collect();
                Err(Error::ambiguous(interface.name(), implementations))
            }
        }
    }

    fn resolve_many<I: ComponentInterface + ?Sized>(
        &self,
        progress: Progress<'_>,
    ) -> Result<Vec<Resolved<I>>> {
        self.ensure_live()?;
        let interface = TypeKey::of::<I>();
        trace!(interface = interface.name(), container = %self.id(), "Resolving all instances");

        let mut resolved = Vec::new();
        for external in self.externals_for(&interface) {
            resolved.push((external.get::<I>()?, None));
        }
        for descriptor in self.inner.repository.descriptors_for(&interface) {
            resolved.push(self.resolve_descriptor::<I>(&descriptor, progress)?);
        }
        Ok(resolved)
    }

    fn resolve_descriptor<I: ComponentInterface + ?Sized>(
        &self,
        descriptor: &Arc<ComponentDescriptor>,
        progress: Progress<'_>,
    ) -> Result<Resolved<I>> {
        let (object, instance) = self.instantiate(descriptor, progress)?;
        let value = descriptor
            .cast(&TypeKey::of::<I>(), &object)
            .and_then(|view| view.downcast::<Arc<I>>().ok())
            .ok_or_else(|| {
                Error::internal(format!(
                    "{} cannot be viewed as {}",
                    descriptor.name(),
                    std::any::type_name::<I>()
                ))
            })?;
        Ok((*value, Some(instance)))
    }

    /// Obtain the object for `descriptor`, constructing it within its scope if needed
    fn instantiate(
        &self,
        descriptor: &Arc<ComponentDescriptor>,
        progress: Progress<'_>,
    ) -> Result<(ComponentObject, Arc<dyn ComponentInstance>)> {
        let _guard = ResolveGuard::enter(
            ScopeKey::of(self.id(), descriptor),
            descriptor.name(),
            self.inner.settings.max_resolve_depth,
        )?;

        let instance = self.instance_for(descriptor)?;
        let mut build = || self.construct(descriptor, progress);
        let Some(acquired) = instance.create_instance(self.id(), &mut build)? else {
            debug!(component = descriptor.name(), "Refusing to revive disposed instance");
            return Err(Error::disposed(descriptor.name()));
        };
        if acquired.newly_referenced {
            self.retain_dependencies(acquired.dependencies);
            self.track(Arc::clone(&instance));
        }
        Ok((acquired.object, instance))
    }

    /// The wrapper for `descriptor` in its scope's registry, created if absent.
    ///
    /// A disposed singleton is replaced only for a descriptor registered
    /// after its teardown.
    fn instance_for(
        &self,
        descriptor: &Arc<ComponentDescriptor>,
    ) -> Result<Arc<dyn ComponentInstance>> {
        let instance: Arc<dyn ComponentInstance> = match descriptor.scope() {
            InstanceScope::Container => {
                self.inner.simple.get_or_insert_with(descriptor.id(), || {
                    SimpleInstance::new(Arc::clone(descriptor))
                })
            }
            InstanceScope::Repository => {
                let owner = self.owner_of(descriptor)?;
                owner.shared_registry().get_or_insert_with(descriptor.id(), || {
                    SharedInstance::new(Arc::clone(descriptor))
                })
            }
            InstanceScope::Global => {
                let owner = self.owner_of(descriptor)?;
                owner.singletons().inner.get_or_replace_with(
                    descriptor.implementation(),
                    |current| current.is_superseded_by(descriptor),
                    || SingletonInstance::new(Arc::clone(descriptor)),
                )
            }
        };
        Ok(instance)
    }

    fn owner_of(&self, descriptor: &ComponentDescriptor) -> Result<ComponentRepository> {
        descriptor.owner().ok_or_else(|| {
            Error::internal(format!(
                "repository owning {} is no longer alive",
                descriptor.name()
            ))
        })
    }

    /// Select a constructor and invoke it, resolving its parameters through this container
    fn construct(
        &self,
        descriptor: &Arc<ComponentDescriptor>,
        progress: Progress<'_>,
    ) -> Result<Constructed> {
        let constructor = resolution::select_constructor(self, descriptor)?;
        let collector = progress.map(|_| reporting::Collector::open());
        let mut context = ConstructionContext::new(self, descriptor, progress);
        let invoked = constructor.invoke(&mut context);
        if let (Some(progress), Some(collector)) = (progress, collector) {
            for component in collector.drain() {
                progress(&component);
            }
        }
        let object = invoked?;
        let dependencies = context.into_dependencies();

        if self.inner.settings.log_progress {
            info!(
                component = descriptor.name(),
                scope = %descriptor.scope(),
                depth = stack::depth(),
                "Component constructed"
            );
        } else {
            debug!(
                component = descriptor.name(),
                scope = %descriptor.scope(),
                signature = %constructor.signature(),
                "Component constructed"
            );
        }
        match progress {
            Some(progress) => progress(descriptor.name()),
            None => reporting::record(descriptor.name()),
        }
        Ok(Constructed {
            object,
            dependencies,
        })
    }

    /// Reference the dependencies of a cached instance this container just acquired
    fn retain_dependencies(&self, dependencies: Vec<Arc<dyn ComponentInstance>>) {
        for dependency in dependencies {
            match dependency.retain(self.id()) {
                Some(acquired) if acquired.newly_referenced => {
                    self.retain_dependencies(acquired.dependencies);
                    self.track(dependency);
                }
                Some(_) => {}
                None => warn!(
                    component = dependency.descriptor().name(),
                    "Dependency of a cached component is no longer alive"
                ),
            }
        }
    }

    fn track(&self, instance: Arc<dyn ComponentInstance>) {
        let mut referenced = self.inner.referenced.lock();
        if !self.is_disposed() {
            referenced.push(instance);
            return;
        }
        // Disposed while this resolve was running
        drop(referenced);
        release(self.id(), &instance);
    }
}

impl fmt::Debug for ComponentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentContainer")
            .field("id", &self.inner.id)
            .field("externals", &self.inner.externals.len())
            .field("instances", &self.inner.referenced.lock().len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Builder for [`ComponentContainer`]
pub struct ComponentContainerBuilder {
    repository: ComponentRepository,
    externals: Vec<ExternalInstance>,
    settings: ContainerSettings,
}

impl ComponentContainerBuilder {
    /// Supply a pre-built instance of `I`.
    ///
    /// External instances take part in resolution like registered components
    /// but are never constructed or disposed by the container.
    pub fn with_instance<I: ComponentInterface + ?Sized>(mut self, instance: Arc<I>) -> Self {
        self.externals.push(ExternalInstance {
            interface: TypeKey::of::<I>(),
            value: Arc::new(instance),
        });
        self
    }

    /// Apply container settings
    pub fn settings(mut self, settings: ContainerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Create the container
    pub fn build(self) -> ComponentContainer {
        let id = ContainerId::next();
        debug!(
            container = %id,
            externals = self.externals.len(),
            max_resolve_depth = self.settings.max_resolve_depth,
            "Created container"
        );
        ComponentContainer {
            inner: Arc::new(ContainerInner {
                id,
                repository: self.repository,
                externals: self.externals,
                simple: InstanceRegistry::new(),
                referenced: Mutex::new(Vec::new()),
                disposed: AtomicBool::new(false),
                settings: self.settings,
            }),
        }
    }
}

/// Non-owning container handle, as held by [`Deferred`](crate::Deferred)
#[derive(Clone)]
pub struct WeakComponentContainer {
    inner: Weak<ContainerInner>,
}

impl WeakComponentContainer {
    /// The container, while any strong handle exists
    pub fn upgrade(&self) -> Option<ComponentContainer> {
        self.inner.upgrade().map(|inner| ComponentContainer { inner })
    }
}

impl fmt::Debug for WeakComponentContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakComponentContainer")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
