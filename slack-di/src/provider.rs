//! Callables and the providers registered under component names

use crate::{
    error::Error,
    params::{Args, Instance, Param, Params},
};
use std::{
    any::Any,
    fmt,
    marker::PhantomData,
    sync::Arc,
};

/// Something the container can invoke with named arguments
///
/// `params` lists the declared parameters in declaration order; [`invoke`](crate::invoke)
/// resolves them in exactly that order before calling `call`.
pub trait Callable: Send + Sync + 'static {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Declared parameters, in order
    fn params(&self) -> &[Param];

    /// Calls with the assembled keyword arguments
    fn call(&self, args: Args) -> Result<Instance, Error>;
}

/// A [`Callable`] backed by a closure with an explicit parameter list
///
/// # Example
/// ```
/// use slack_di::{Container, Func, Param, Params};
///
/// let container = Container::new();
/// container.register("port", slack_di::Provider::value(8080_u16));
///
/// let addr = Func::new("addr", [Param::required("host"), Param::required("port")], |args| {
///     let host: String = args.get_cloned("host")?;
///     let port: u16 = args.get_cloned("port")?;
///     Ok(format!("{host}:{port}"))
/// });
///
/// let addr = container
///     .apply(&addr, Params::new().with("host", String::from("localhost")))
///     .unwrap()
///     .downcast::<String>()
///     .unwrap();
///
/// assert_eq!(*addr, "localhost:8080");
/// ```
pub struct Func<F, T> {
    name: String,
    params: Vec<Param>,
    func: F,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> Func<F, T>
where
    F: Fn(Args) -> Result<T, Error> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    /// Creates a function callable from its name, declared parameters and body
    pub fn new(name: impl Into<String>, params: impl IntoIterator<Item = Param>, func: F) -> Self {
        Self {
            name: name.into(),
            params: params.into_iter().collect(),
            func,
            _output: PhantomData,
        }
    }
}

impl<F: Clone, T> Clone for Func<F, T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            params: self.params.clone(),
            func: self.func.clone(),
            _output: PhantomData,
        }
    }
}

impl<F, T> fmt::Debug for Func<F, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Func")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}

impl<F, T> Callable for Func<F, T>
where
    F: Fn(Args) -> Result<T, Error> + Send + Sync + 'static,
    T: Any + Send + Sync,
{
    #[inline]
    fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    fn params(&self) -> &[Param] {
        &self.params
    }

    #[inline]
    fn call(&self, args: Args) -> Result<Instance, Error> {
        (self.func)(args).map(|value| Arc::new(value) as Instance)
    }
}

/// What backs a component name
#[derive(Clone)]
pub enum Provider {
    /// Invoked with parameters resolved from per-parameter settings and the container
    Callable(Arc<dyn Callable>),

    /// Invoked with the explicit parameter map taking priority over the container
    Bound(Arc<dyn Callable>, Params),

    /// A ready value returned as is
    Instance(Instance),
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Callable(c) => f.debug_tuple("Callable").field(&c.name()).finish(),
            Provider::Bound(c, params) => f.debug_tuple("Bound").field(&c.name()).field(params).finish(),
            Provider::Instance(_) => f.write_str("Instance(..)"),
        }
    }
}

impl Provider {
    /// A provider that always yields `value`
    #[inline]
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Instance(Arc::new(value))
    }

    /// A callable paired with an explicit parameter map
    #[inline]
    pub fn bound(callable: impl Callable, params: Params) -> Self {
        Self::Bound(Arc::new(callable), params)
    }
}

impl<C: Callable> From<C> for Provider {
    #[inline]
    fn from(callable: C) -> Self {
        Self::Callable(Arc::new(callable))
    }
}

impl<C: Callable> From<(C, Params)> for Provider {
    #[inline]
    fn from((callable, params): (C, Params)) -> Self {
        Self::bound(callable, params)
    }
}

impl From<Arc<dyn Callable>> for Provider {
    #[inline]
    fn from(callable: Arc<dyn Callable>) -> Self {
        Self::Callable(callable)
    }
}
