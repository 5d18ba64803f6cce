//! Configuration settings and deferred symbol references

use crate::{error::Error, params::Instance};
use serde::Deserialize;
use serde_json::Value;
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    str::FromStr,
    sync::Arc,
};

/// A parsed `module:symbol` reference
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SymbolPath {
    module: String,
    symbol: String,
}

impl SymbolPath {
    /// Creates a reference from its parts
    #[inline]
    pub fn new(module: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self { module: module.into(), symbol: symbol.into() }
    }

    /// Parses a `module:symbol` string
    ///
    /// Exactly one `:` is accepted and neither side may be empty.
    pub fn parse(path: &str) -> Result<Self, Error> {
        let mut parts = path.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(module), Some(symbol), None) if !module.is_empty() && !symbol.is_empty() => {
                Ok(Self::new(module, symbol))
            }
            _ => Err(Error::InvalidSymbolPath(path.to_owned())),
        }
    }

    /// Module identifier
    #[inline]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Symbol name within the module
    #[inline]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl FromStr for SymbolPath {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SymbolPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.symbol)
    }
}

/// A value stored in the container configuration
///
/// Keys are either a bare component name or a `"{component}_{param}"` compound key.
#[derive(Clone)]
pub enum Setting {
    /// Deferred reference to a provider, resolved on first use
    Symbol(SymbolPath),

    /// A literal value
    Value(Instance),
}

impl fmt::Debug for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Setting::Symbol(path) => write!(f, "Symbol({path})"),
            Setting::Value(_) => f.write_str("Value(..)"),
        }
    }
}

impl Setting {
    /// Parses a deferred `module:symbol` reference
    #[inline]
    pub fn symbol(path: &str) -> Result<Self, Error> {
        SymbolPath::parse(path).map(Self::Symbol)
    }

    /// Wraps a literal value
    #[inline]
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Arc::new(value))
    }

    /// Converts a JSON literal into a native value
    ///
    /// Strings become `String`, integers `i64` (`u64` when too large),
    /// other numbers `f64`, booleans `bool`. Everything else is kept as [`Value`].
    pub fn from_json(value: Value) -> Self {
        let instance: Instance = match value {
            Value::String(s) => Arc::new(s),
            Value::Bool(b) => Arc::new(b),
            Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
                (Some(i), _, _) => Arc::new(i),
                (_, Some(u), _) => Arc::new(u),
                (_, _, Some(f)) => Arc::new(f),
                _ => Arc::new(Value::Number(n)),
            },
            other => Arc::new(other),
        };
        Self::Value(instance)
    }
}

impl From<SymbolPath> for Setting {
    #[inline]
    fn from(path: SymbolPath) -> Self {
        Self::Symbol(path)
    }
}

/// JSON configuration document
///
/// ```json
/// {
///     "components": { "mailer": "app.mail:SmtpMailer" },
///     "params": { "mailer_host": "smtp.local", "mailer_port": 25 }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Document {
    #[serde(default)]
    components: HashMap<String, String>,
    #[serde(default)]
    params: serde_json::Map<String, Value>,
}

impl Document {
    #[inline]
    pub(crate) fn parse(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    #[inline]
    pub(crate) fn from_value(value: Value) -> Result<Self, Error> {
        Ok(serde_json::from_value(value)?)
    }

    pub(crate) fn into_settings(self) -> Result<Vec<(String, Setting)>, Error> {
        let mut settings = Vec::with_capacity(self.components.len() + self.params.len());
        for (name, path) in self.components {
            settings.push((name, Setting::symbol(&path)?));
        }
        for (key, value) in self.params {
            settings.push((key, Setting::from_json(value)));
        }
        Ok(settings)
    }
}
