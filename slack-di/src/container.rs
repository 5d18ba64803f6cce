//! Dependency Injection container and tools

use self::resolving::Resolving;
use crate::{
    error::Error,
    inject::{Class, Component, Partial},
    invoke::{ParamSource, invoke},
    params::{Instance, Param, Params},
    provider::{Callable, Provider},
    settings::{Document, Setting, SymbolPath},
    symbols::{Importer, Modules},
};
use std::{
    any::Any,
    cell::RefCell,
    collections::HashMap,
    fmt,
    sync::Arc,
};

mod resolving;

/// Group every registration belongs to unless another one is given
pub const DEFAULT_GROUP: &str = "default";

/// A configuration entry and whether a bare-name entry was already installed as a provider
struct Configured {
    setting: Setting,
    installed: bool,
}

/// Represents a DI container that lazily constructs and caches named components
///
/// Every component is a singleton per name: the first [`provide`](Container::provide)
/// constructs it, resolving each declared parameter by name against the
/// configuration and the container itself, and later calls return the same
/// instance until its group is [`reset`](Container::reset).
///
/// The container is not thread-safe: it is `Send` but not `Sync`.
/// Resolved instances are `Send + Sync` and may be shared freely.
///
/// # Example
/// ```
/// use slack_di::{Container, Func, Param};
///
/// struct Pool;
/// struct Repo(std::sync::Arc<Pool>);
///
/// let container = Container::new();
/// container.register("pool", Func::new("pool", [], |_| Ok(Pool)));
/// container.register("repo", Func::new("repo", [Param::required("pool")], |args| {
///     Ok(Repo(args.get("pool")?))
/// }));
///
/// let repo = container.provide::<Repo>("repo").unwrap();
/// let pool = container.provide::<Pool>("pool").unwrap();
///
/// assert!(std::sync::Arc::ptr_eq(&repo.0, &pool));
/// ```
pub struct Container {
    providers: RefCell<HashMap<String, Provider>>,
    groups: RefCell<HashMap<String, Vec<String>>>,
    settings: RefCell<HashMap<String, Configured>>,
    instances: RefCell<HashMap<String, Instance>>,
    resolving: RefCell<Vec<String>>,
    importer: Box<dyn Importer>,
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("providers", &self.providers.borrow().keys().collect::<Vec<_>>())
            .field("groups", &self.groups.borrow())
            .field("instances", &self.instances.borrow().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Container {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Creates an empty container with an empty [`Modules`] importer
    pub fn new() -> Self {
        Self {
            providers: RefCell::default(),
            groups: RefCell::default(),
            settings: RefCell::default(),
            instances: RefCell::default(),
            resolving: RefCell::default(),
            importer: Box::new(Modules::new()),
        }
    }

    /// Creates a container with `providers` registered in the [`DEFAULT_GROUP`]
    pub fn with_providers<I, K, P>(providers: I) -> Self
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<Provider>,
    {
        let container = Self::new();
        for (name, provider) in providers {
            container.register(name, provider);
        }
        container
    }

    /// Uses `importer` to resolve deferred `module:symbol` settings
    pub fn with_importer(mut self, importer: impl Importer + 'static) -> Self {
        self.importer = Box::new(importer);
        self
    }

    /// Registers a provider under `name` in the [`DEFAULT_GROUP`]
    ///
    /// Nothing is constructed until the name is first provided.
    #[inline]
    pub fn register(&self, name: impl Into<String>, provider: impl Into<Provider>) {
        self.register_in(name, provider, DEFAULT_GROUP);
    }

    /// Registers a provider under `name` in `group`
    ///
    /// Registering the same name again replaces the provider but keeps any
    /// cached instance until the group is reset.
    pub fn register_in(&self, name: impl Into<String>, provider: impl Into<Provider>, group: impl Into<String>) {
        let name = name.into();
        self.groups
            .borrow_mut()
            .entry(group.into())
            .or_default()
            .push(name.clone());
        self.providers
            .borrow_mut()
            .insert(name, provider.into());
    }

    /// Registers the [`Component`] type `T` under `name` in the [`DEFAULT_GROUP`]
    #[inline]
    pub fn register_component<T: Component>(&self, name: impl Into<String>) {
        self.register(name, Class::<T>::new());
    }

    /// Returns a deferred registration for `name`
    ///
    /// # Example
    /// ```
    /// use slack_di::{Container, Func};
    ///
    /// let container = Container::new();
    ///
    /// let provide_flag = container
    ///     .registrant("flag")
    ///     .in_group("flags")
    ///     .register(Func::new("provide_flag", [], |_| Ok(true)));
    ///
    /// assert!(*container.provide::<bool>("flag").unwrap());
    /// # let _ = provide_flag;
    /// ```
    #[inline]
    pub fn registrant(&self, name: impl Into<String>) -> Registrant<'_> {
        Registrant {
            container: self,
            name: name.into(),
            group: DEFAULT_GROUP.to_owned(),
        }
    }

    /// Returns `true` if `name` currently has a cached instance
    #[inline]
    pub fn accessed(&self, name: &str) -> bool {
        self.instances.borrow().contains_key(name)
    }

    /// Returns `true` if `name` is registered or configured
    #[inline]
    pub fn knows(&self, name: &str) -> bool {
        self.providers.borrow().contains_key(name) || self.settings.borrow().contains_key(name)
    }

    /// Resolves `name` and returns its shared instance
    #[inline]
    pub fn provide<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.provide_instance(name)?
            .downcast::<T>()
            .map_err(|_| Error::mismatch::<T>(name))
    }

    /// Resolves `name` and returns its untyped instance
    ///
    /// # Errors
    /// - [`Error::CircularDependency`] if `name` is already being resolved
    /// - [`Error::ComponentNotRegistered`] if there is neither a provider nor a setting for `name`
    /// - anything the provider, its dependencies or the importer fail with
    pub fn provide_instance(&self, name: &str) -> Result<Instance, Error> {
        let _resolving = Resolving::enter(&self.resolving, name)?;

        if let Some(instance) = self.instances.borrow().get(name) {
            #[cfg(feature = "tracing")]
            tracing::trace!(component = name, "returning cached instance");
            return Ok(instance.clone());
        }

        self.install_setting(name)?;

        let provider = self.providers
            .borrow()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::ComponentNotRegistered(name.to_owned()))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(component = name, ?provider, "constructing component");

        let instance = self.produce(name, &provider)?;
        self.instances
            .borrow_mut()
            .insert(name.to_owned(), instance.clone());
        Ok(instance)
    }

    /// Resolves `name` like [`provide`](Container::provide), for names known to the container only
    ///
    /// Fails with [`Error::AttributeNotRegistered`] if `name` is neither registered nor configured.
    #[inline]
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.get_instance(name)?
            .downcast::<T>()
            .map_err(|_| Error::mismatch::<T>(name))
    }

    /// Untyped variant of [`get`](Container::get)
    #[inline]
    pub fn get_instance(&self, name: &str) -> Result<Instance, Error> {
        if !self.knows(name) {
            return Err(Error::AttributeNotRegistered(name.to_owned()));
        }
        self.provide_instance(name)
    }

    /// Drops the cached instances of every name registered in `group`
    ///
    /// Providers and group membership stay, so the next `provide` constructs anew.
    /// Names without a cached instance are skipped.
    pub fn reset(&self, group: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(group, "resetting group");

        let removed: Vec<Instance> = {
            let groups = self.groups.borrow();
            let Some(names) = groups.get(group) else {
                return;
            };
            let mut instances = self.instances.borrow_mut();
            names.iter().filter_map(|name| instances.remove(name)).collect()
        };
        // instances may hold the last reference to components with their own `Drop`
        drop(removed);
    }

    /// Resolves `names` now and binds them to `callable`
    ///
    /// The returned [`Partial`] requires the remaining parameters of `callable`
    /// from its caller, who may also override any of the injected ones.
    pub fn inject<C: Callable>(&self, callable: C, names: &[&str]) -> Result<Partial, Error> {
        let mut bound = Params::new();
        for name in names {
            bound.insert_instance(*name, self.provide_instance(name)?);
        }
        Ok(Partial::new(callable, bound))
    }

    /// Invokes `callable` now, taking parameters from `params` first and the container second
    pub fn apply<C: Callable + ?Sized>(&self, callable: &C, params: Params) -> Result<Instance, Error> {
        invoke(callable, &[&params, self])
    }

    /// Merges `settings` into the configuration
    ///
    /// Bare-name keys back a component with a deferred symbol or a literal value.
    /// `"{component}_{param}"` keys supply that parameter of that component.
    pub fn config<I, K>(&self, settings: I)
    where
        I: IntoIterator<Item = (K, Setting)>,
        K: Into<String>,
    {
        let mut table = self.settings.borrow_mut();
        for (key, setting) in settings {
            table.insert(key.into(), Configured { setting, installed: false });
        }
    }

    /// Merges a JSON configuration document
    ///
    /// # Example
    /// ```
    /// use slack_di::Container;
    ///
    /// let container = Container::new();
    /// container.config_json(r#"{
    ///     "components": { "mailer": "app.mail:SmtpMailer" },
    ///     "params": { "mailer_port": 25 }
    /// }"#).unwrap();
    ///
    /// assert!(container.knows("mailer"));
    /// ```
    pub fn config_json(&self, json: &str) -> Result<(), Error> {
        let settings = Document::parse(json)?.into_settings()?;
        self.config(settings);
        Ok(())
    }

    /// Merges an already parsed JSON configuration document
    pub fn config_value(&self, value: serde_json::Value) -> Result<(), Error> {
        let settings = Document::from_value(value)?.into_settings()?;
        self.config(settings);
        Ok(())
    }

    /// Installs a pending bare-name setting as the provider of `name`
    fn install_setting(&self, name: &str) -> Result<(), Error> {
        let pending = match self.settings.borrow().get(name) {
            Some(configured) if !configured.installed => configured.setting.clone(),
            _ => return Ok(()),
        };

        let provider = match pending {
            Setting::Value(instance) => Provider::Instance(instance),
            Setting::Symbol(path) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(component = name, module = path.module(), symbol = path.symbol(), "importing deferred symbol");
                self.import(&path)?
            }
        };

        self.providers
            .borrow_mut()
            .insert(name.to_owned(), provider);
        {
            let mut groups = self.groups.borrow_mut();
            if !groups.values().any(|names| names.iter().any(|n| n == name)) {
                groups.entry(DEFAULT_GROUP.to_owned()).or_default().push(name.to_owned());
            }
        }
        if let Some(configured) = self.settings.borrow_mut().get_mut(name) {
            configured.installed = true;
        }
        Ok(())
    }

    #[inline]
    fn import(&self, path: &SymbolPath) -> Result<Provider, Error> {
        self.importer
            .import(path.module())?
            .lookup(path)
    }

    /// Runs `provider` for the component `name`
    fn produce(&self, name: &str, provider: &Provider) -> Result<Instance, Error> {
        match provider {
            Provider::Instance(instance) => Ok(instance.clone()),
            Provider::Bound(callable, params) => invoke(&**callable, &[params, self]),
            Provider::Callable(callable) => {
                let overrides = self.param_overrides(name, callable.params())?;
                invoke(&**callable, &[&overrides, self])
            }
        }
    }

    /// Collects `"{name}_{param}"` settings for the declared `params` of `name`
    fn param_overrides(&self, name: &str, params: &[Param]) -> Result<Params, Error> {
        let mut overrides = Params::new();
        if params.is_empty() || self.settings.borrow().is_empty() {
            return Ok(overrides);
        }
        for param in params {
            let key = format!("{name}_{}", param.name());
            let setting = self.settings
                .borrow()
                .get(&key)
                .map(|configured| configured.setting.clone());
            match setting {
                Some(Setting::Value(instance)) => overrides.insert_instance(param.name(), instance),
                Some(Setting::Symbol(path)) => {
                    let provider = self.import(&path)?;
                    overrides.insert_instance(param.name(), self.produce(&key, &provider)?);
                }
                None => {}
            }
        }
        Ok(overrides)
    }
}

impl ParamSource for Container {
    /// Provides `name` if the container knows it
    fn lookup(&self, name: &str) -> Result<Option<Instance>, Error> {
        if !self.knows(name) {
            return Ok(None);
        }
        self.provide_instance(name).map(Some)
    }
}

/// A registration waiting for its provider
///
/// Created by [`Container::registrant`].
#[derive(Debug)]
pub struct Registrant<'a> {
    container: &'a Container,
    name: String,
    group: String,
}

impl Registrant<'_> {
    /// Registers into `group` instead of the [`DEFAULT_GROUP`]
    #[inline]
    pub fn in_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Completes the registration and hands `value` back unchanged
    pub fn register<P>(self, value: P) -> P
    where
        P: Into<Provider> + Clone,
    {
        self.container.register_in(self.name, value.clone(), self.group);
        value
    }
}
