//! Describes dependency injection errors

use std::error::Error as StdError;

pub(crate) type BoxError = Box<
    dyn StdError
    + Send
    + Sync
>;

/// Errors produced while registering, configuring or resolving components
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A component was requested while it was already being resolved
    #[error("{name} is required while providing {name} ({})", .chain.join(" -> "))]
    CircularDependency {
        /// The component that closed the cycle
        name: String,
        /// Components forming the cycle, starting and ending with `name`
        chain: Vec<String>,
    },

    /// Neither a provider nor a configuration entry exists for the name
    #[error("{0} not registered")]
    ComponentNotRegistered(String),

    /// [`Container::get`](crate::Container::get) was called with an unknown name
    #[error("attribute {0} not registered")]
    AttributeNotRegistered(String),

    /// A declared parameter without a default could not be sourced
    #[error("{param} is required when calling {callable}")]
    ParameterMissing {
        /// Parameter name
        param: String,
        /// Name of the callable being invoked
        callable: String,
    },

    /// An instance does not hold a value of the requested type
    #[error("{name} is not a {expected}")]
    TypeMismatch {
        /// Component or parameter name
        name: String,
        /// Requested type
        expected: &'static str,
    },

    /// A deferred symbol reference is not of the `module:symbol` form
    #[error("invalid symbol path: {0:?}, expected \"module:symbol\"")]
    InvalidSymbolPath(String),

    /// The importer does not know the module of a deferred symbol
    #[error("module {0} not found")]
    ModuleNotFound(String),

    /// The module exists but does not expose the symbol
    #[error("module {module} has no symbol {symbol}")]
    SymbolNotFound {
        /// Module identifier
        module: String,
        /// Symbol name
        symbol: String,
    },

    /// A JSON configuration document could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A provider failed on its own
    #[error(transparent)]
    Provider(BoxError),
}

impl Error {
    /// Wraps a provider-specific failure
    #[inline]
    pub fn provider(err: impl Into<BoxError>) -> Self {
        Self::Provider(err.into())
    }

    #[inline]
    pub(crate) fn missing(param: impl Into<String>, callable: impl Into<String>) -> Self {
        Self::ParameterMissing { param: param.into(), callable: callable.into() }
    }

    #[inline]
    pub(crate) fn mismatch<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::TypeMismatch { name: name.into(), expected: std::any::type_name::<T>() }
    }
}
