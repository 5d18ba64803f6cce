//! In-process modules that deferred `module:symbol` references resolve against

use crate::{
    error::Error,
    provider::Provider,
    settings::SymbolPath,
};
use std::{
    collections::HashMap,
    fmt,
    sync::Arc,
};

/// A named table of symbols, each backed by a [`Provider`]
#[derive(Clone)]
pub struct Module {
    name: String,
    symbols: HashMap<String, Provider>,
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("symbols", &self.symbols.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Module {
    /// Creates an empty module
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), symbols: HashMap::new() }
    }

    /// Adds a symbol
    #[inline]
    pub fn symbol(mut self, name: impl Into<String>, provider: impl Into<Provider>) -> Self {
        self.symbols.insert(name.into(), provider.into());
        self
    }

    /// Module identifier
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the provider behind `symbol`
    #[inline]
    pub fn get(&self, symbol: &str) -> Option<&Provider> {
        self.symbols.get(symbol)
    }

    /// Looks up the symbol part of `path`
    pub fn lookup(&self, path: &SymbolPath) -> Result<Provider, Error> {
        self.get(path.symbol())
            .cloned()
            .ok_or_else(|| Error::SymbolNotFound {
                module: self.name.clone(),
                symbol: path.symbol().to_owned(),
            })
    }
}

/// Resolves a module identifier to a [`Module`]
///
/// The container calls it at most once per configured deferred reference.
pub trait Importer: Send {
    /// Imports the module named `module`
    fn import(&self, module: &str) -> Result<Arc<Module>, Error>;
}

impl<F> Importer for F
where
    F: Fn(&str) -> Result<Arc<Module>, Error> + Send,
{
    #[inline]
    fn import(&self, module: &str) -> Result<Arc<Module>, Error> {
        self(module)
    }
}

/// Registry of modules populated by the host application at startup
#[derive(Debug, Clone, Default)]
pub struct Modules {
    modules: HashMap<String, Arc<Module>>,
}

impl Modules {
    /// Creates an empty registry
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module, replacing one with the same name
    #[inline]
    pub fn module(mut self, module: Module) -> Self {
        self.insert(module);
        self
    }

    /// Adds a module, replacing one with the same name
    #[inline]
    pub fn insert(&mut self, module: Module) {
        self.modules.insert(module.name.clone(), Arc::new(module));
    }

    /// Returns `true` if a module with that name was added
    #[inline]
    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }
}

impl Importer for Modules {
    #[inline]
    fn import(&self, module: &str) -> Result<Arc<Module>, Error> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| Error::ModuleNotFound(module.to_owned()))
    }
}
