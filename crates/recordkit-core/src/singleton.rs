//! Process-wide single instances.
//!
//! Two shapes of the same idea:
//!
//! - [`SingletonCell`] is a `static`-friendly slot that builds its value on
//!   first access and hands out the same reference forever after.
//! - [`Singleton`] gives a type an [`instance`](Singleton::instance) accessor
//!   backed by the global [`SINGLETONS`] registry, which keeps exactly one
//!   instance per concrete type.
//!
//! Slots are keyed by concrete type. A type that wraps or extends another never
//! shares the wrapped type's instance: each type owns one slot of its own.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::{Arc, LazyLock, OnceLock, RwLock};

/// A lazily-initialized slot that creates its value on first access.
///
/// The factory runs at most once, even when several threads race for the
/// first access.
///
/// # Examples
///
/// ```
/// use recordkit_core::singleton::SingletonCell;
///
/// static ANSWER: SingletonCell<u32> = SingletonCell::new(|| 42);
///
/// assert!(std::ptr::eq(ANSWER.get(), ANSWER.get()));
/// assert_eq!(*ANSWER, 42);
/// ```
pub struct SingletonCell<T> {
    init: OnceLock<T>,
    factory: fn() -> T,
}

impl<T: std::fmt::Debug> std::fmt::Debug for SingletonCell<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.init.get() {
            Some(value) => f.debug_tuple("SingletonCell").field(value).finish(),
            None => f
                .debug_tuple("SingletonCell")
                .field(&"<uninitialized>")
                .finish(),
        }
    }
}

impl<T> SingletonCell<T> {
    /// Creates an empty slot. The factory is not called until first access.
    pub const fn new(factory: fn() -> T) -> Self {
        Self {
            init: OnceLock::new(),
            factory,
        }
    }

    /// Returns the single value, creating it if necessary.
    pub fn get(&self) -> &T {
        self.init.get_or_init(self.factory)
    }

    /// Returns `true` if the value has been created.
    pub fn is_initialized(&self) -> bool {
        self.init.get().is_some()
    }
}

impl<T> Deref for SingletonCell<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        self.get()
    }
}

type Slot = Arc<OnceLock<Arc<dyn Any + Send + Sync>>>;

/// A registry holding at most one instance per concrete type.
///
/// The map lock is only held while looking up a type's slot; the instance is
/// built outside it, so a factory may itself ask the registry for another
/// type's instance.
#[derive(Default)]
pub struct SingletonRegistry {
    slots: RwLock<HashMap<TypeId, Slot>>,
}

impl SingletonRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the instance for `T`, calling `factory` if there is none yet.
    pub fn get_or_init<T, F>(&self, factory: F) -> Arc<T>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let slot = self.slot(TypeId::of::<T>());
        let instance = slot.get_or_init(|| {
            tracing::debug!(type_name = std::any::type_name::<T>(), "creating singleton instance");
            Arc::new(factory()) as Arc<dyn Any + Send + Sync>
        });
        Arc::clone(instance)
            .downcast::<T>()
            .expect("singleton slot keyed by TypeId holds a value of that type")
    }

    /// Returns the instance for `T` if one has been created.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        let slots = self.slots.read().expect("singleton registry lock poisoned");
        let instance = slots.get(&TypeId::of::<T>())?.get()?;
        Arc::clone(instance).downcast::<T>().ok()
    }

    /// Returns `true` if an instance of `T` has been created.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Returns the number of types with a live instance.
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .expect("singleton registry lock poisoned")
            .values()
            .filter(|slot| slot.get().is_some())
            .count()
    }

    /// Returns `true` if no instance has been created yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, id: TypeId) -> Slot {
        {
            let slots = self.slots.read().expect("singleton registry lock poisoned");
            if let Some(slot) = slots.get(&id) {
                return Arc::clone(slot);
            }
        }

        let mut slots = self.slots.write().expect("singleton registry lock poisoned");
        Arc::clone(slots.entry(id).or_default())
    }
}

/// The global singleton registry used by [`Singleton::instance`].
pub static SINGLETONS: LazyLock<SingletonRegistry> = LazyLock::new(SingletonRegistry::new);

/// A type with exactly one process-wide instance.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use recordkit_core::singleton::Singleton;
///
/// struct Registry;
///
/// impl Singleton for Registry {
///     fn create() -> Self {
///         Registry
///     }
/// }
///
/// assert!(Arc::ptr_eq(&Registry::instance(), &Registry::instance()));
/// ```
pub trait Singleton: Any + Send + Sync + Sized {
    /// Builds the instance. Called at most once per process.
    fn create() -> Self;

    /// Returns the shared instance, creating it on first call.
    fn instance() -> Arc<Self> {
        SINGLETONS.get_or_init(Self::create)
    }
}
