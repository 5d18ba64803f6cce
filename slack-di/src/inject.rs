//! Utilities to construct types from named dependencies and to pre-bind parameters

use crate::{
    error::Error,
    invoke::invoke,
    params::{Args, Instance, Param, Params},
    provider::Callable,
};
use std::{
    fmt,
    marker::PhantomData,
    sync::Arc,
};

/// A type that can be constructed from named dependencies
///
/// The declared [`PARAMS`](Component::PARAMS) are what constructor introspection
/// would report: one entry per constructor argument, matched by name.
/// Usually derived with `#[derive(Component)]`, where every field is a parameter
/// named after the field.
///
/// # Example
/// ```ignore
/// use std::sync::Arc;
/// use slack_di::{Component, Container};
///
/// #[derive(Component)]
/// struct Mailer;
///
/// #[derive(Component)]
/// struct Signup {
///     mailer: Arc<Mailer>,
///     #[component(default)]
///     retries: u32,
/// }
///
/// let container = Container::new();
/// container.register_component::<Mailer>("mailer");
/// container.register_component::<Signup>("signup");
///
/// let signup = container.provide::<Signup>("signup")?;
/// assert!(Arc::ptr_eq(&signup.mailer, &container.provide::<Mailer>("mailer")?));
/// ```
///
/// It can also be implemented manually
/// ```ignore
/// use std::sync::Arc;
/// use slack_di::{Args, Component, Param, error::Error};
///
/// struct Signup {
///     mailer: Arc<Mailer>,
/// }
///
/// impl Component for Signup {
///     const PARAMS: &'static [Param] = &[Param::required("mailer")];
///
///     fn construct(args: Args) -> Result<Self, Error> {
///         Ok(Self { mailer: args.get("mailer")? })
///     }
/// }
/// ```
pub trait Component: Sized + Send + Sync + 'static {
    /// Declared constructor parameters, in order
    const PARAMS: &'static [Param];

    /// Builds `Self` from the assembled arguments
    fn construct(args: Args) -> Result<Self, Error>;
}

/// A `component!` macro that implements [`Component`] for one or more types
/// constructed with [`Default`] and no parameters.
///
/// # Example
/// ```
/// use slack_di::{component, Container};
///
/// #[derive(Default)]
/// struct Clock;
///
/// #[derive(Default)]
/// struct Metrics;
///
/// component! {
///     Clock
///     Metrics
/// }
///
/// let container = Container::new();
/// container.register_component::<Clock>("clock");
///
/// assert!(container.provide::<Clock>("clock").is_ok());
/// ```
#[macro_export]
macro_rules! component {
    ($($name:ident)*) => {
        $(impl $crate::Component for $name {
            const PARAMS: &'static [$crate::Param] = &[];

            #[inline]
            fn construct(_: $crate::Args) -> Result<Self, $crate::error::Error> {
                Ok(<$name as ::core::default::Default>::default())
            }
        })*
    };
}

/// Adapts a [`Component`] type to a [`Callable`]
pub struct Class<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Class<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Class<T> {}

impl<T> fmt::Debug for Class<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Class").field(&std::any::type_name::<T>()).finish()
    }
}

impl<T: Component> Default for Class<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> Class<T> {
    /// Creates the adapter
    #[inline]
    pub const fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

/// Shorthand for [`Class::new`]
#[inline]
pub const fn class<T: Component>() -> Class<T> {
    Class::new()
}

impl<T: Component> Callable for Class<T> {
    #[inline]
    fn name(&self) -> &str {
        std::any::type_name::<T>()
    }

    #[inline]
    fn params(&self) -> &[Param] {
        T::PARAMS
    }

    #[inline]
    fn call(&self, args: Args) -> Result<Instance, Error> {
        T::construct(args).map(|value| Arc::new(value) as Instance)
    }
}

/// A callable with some of its parameters already bound
///
/// Produced by [`Container::inject`](crate::Container::inject). Bound parameters
/// stay declared as optional: a value passed by the caller replaces the bound one.
/// Every other parameter must come from the caller.
#[derive(Clone)]
pub struct Partial {
    inner: Arc<dyn Callable>,
    bound: Params,
    params: Vec<Param>,
}

impl fmt::Debug for Partial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Partial")
            .field("callable", &self.inner.name())
            .field("bound", &self.bound)
            .field("params", &self.params)
            .finish()
    }
}

impl Partial {
    /// Binds `bound` to `callable`
    pub fn new(callable: impl Callable, bound: Params) -> Self {
        Self::from_shared(Arc::new(callable), bound)
    }

    /// Binds `bound` to an already shared callable
    pub fn from_shared(callable: Arc<dyn Callable>, bound: Params) -> Self {
        let params = callable
            .params()
            .iter()
            .map(|param| if bound.contains(param.name()) { param.defaulted() } else { *param })
            .collect();
        Self { inner: callable, bound, params }
    }

    /// Values bound so far
    #[inline]
    pub fn bound(&self) -> &Params {
        &self.bound
    }

    /// Calls with the caller-supplied `params`, falling back to the bound values
    #[inline]
    pub fn call_with(&self, params: Params) -> Result<Instance, Error> {
        invoke(self, &[&params])
    }
}

impl Callable for Partial {
    #[inline]
    fn name(&self) -> &str {
        self.inner.name()
    }

    #[inline]
    fn params(&self) -> &[Param] {
        &self.params
    }

    fn call(&self, mut args: Args) -> Result<Instance, Error> {
        for (name, instance) in self.bound.iter() {
            args.insert_missing(name, instance);
        }
        self.inner.call(args)
    }
}
