//! Named parameter descriptors, explicit parameter maps and call arguments

use crate::error::Error;
use std::{
    any::Any,
    collections::HashMap,
    fmt,
    sync::Arc,
};

/// A resolved component value shared between the container cache and its dependents
pub type Instance = Arc<
    dyn Any
    + Send
    + Sync
>;

/// Describes a single named parameter of a [`Callable`](crate::Callable)
///
/// Parameters are matched by `name` only. A parameter with a default is
/// simply left out of the [`Args`] when no source supplies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Param {
    name: &'static str,
    has_default: bool,
    type_name: Option<&'static str>,
}

impl Param {
    /// A parameter that must be supplied by one of the parameter sources
    #[inline]
    pub const fn required(name: &'static str) -> Self {
        Self { name, has_default: false, type_name: None }
    }

    /// A parameter that falls back to a default declared by the callable
    #[inline]
    pub const fn optional(name: &'static str) -> Self {
        Self { name, has_default: true, type_name: None }
    }

    /// Attaches a label describing the expected value type
    ///
    /// The derive macro attaches the field type. The label is informational and
    /// plays no part in matching.
    #[inline]
    pub const fn of_type(self, type_name: &'static str) -> Self {
        Self { type_name: Some(type_name), ..self }
    }

    /// Same parameter, no longer required
    #[inline]
    pub(crate) const fn defaulted(self) -> Self {
        Self { has_default: true, ..self }
    }

    /// Parameter name
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the callable declares a default for this parameter
    #[inline]
    pub const fn has_default(&self) -> bool {
        self.has_default
    }

    /// Type label, if one was attached
    #[inline]
    pub const fn type_name(&self) -> Option<&'static str> {
        self.type_name
    }
}

/// An explicit name to instance mapping
///
/// Used as a parameter source for [`invoke`](crate::invoke), as the parameter
/// half of a [`Provider::Bound`](crate::Provider::Bound) and for the values
/// pre-bound by [`Container::inject`](crate::Container::inject).
#[derive(Clone, Default)]
pub struct Params {
    values: HashMap<String, Instance>,
}

impl fmt::Debug for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.values.keys()).finish()
    }
}

impl Params {
    /// Creates an empty parameter map
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value under `name`
    #[inline]
    pub fn with<T: Any + Send + Sync>(mut self, name: impl Into<String>, value: T) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds an already shared value under `name`, keeping its identity
    #[inline]
    pub fn with_shared<T: Any + Send + Sync>(self, name: impl Into<String>, value: Arc<T>) -> Self {
        self.with_instance(name, value)
    }

    /// Adds an instance under `name`
    #[inline]
    pub fn with_instance(mut self, name: impl Into<String>, instance: Instance) -> Self {
        self.insert_instance(name, instance);
        self
    }

    /// Inserts a value, replacing any previous one with the same name
    #[inline]
    pub fn insert<T: Any + Send + Sync>(&mut self, name: impl Into<String>, value: T) {
        self.insert_instance(name, Arc::new(value));
    }

    /// Inserts an instance, replacing any previous one with the same name
    #[inline]
    pub fn insert_instance(&mut self, name: impl Into<String>, instance: Instance) {
        self.values.insert(name.into(), instance);
    }

    /// Returns the instance stored under `name`
    #[inline]
    pub fn get(&self, name: &str) -> Option<&Instance> {
        self.values.get(name)
    }

    /// Returns `true` if a value is stored under `name`
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of stored values
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no values are stored
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over names and instances in arbitrary order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Instance)> {
        self.values.iter().map(|(name, instance)| (name.as_str(), instance))
    }
}

impl<K: Into<String>> FromIterator<(K, Instance)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Instance)>>(iter: I) -> Self {
        let mut params = Self::new();
        params.extend(iter);
        params
    }
}

impl<K: Into<String>> Extend<(K, Instance)> for Params {
    fn extend<I: IntoIterator<Item = (K, Instance)>>(&mut self, iter: I) {
        for (name, instance) in iter {
            self.insert_instance(name, instance);
        }
    }
}

/// Keyword arguments assembled by [`invoke`](crate::invoke) for a single call
///
/// Holds exactly the declared parameters that some source could supply;
/// parameters with defaults that nobody supplied are absent.
pub struct Args {
    callable: String,
    values: HashMap<String, Instance>,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("callable", &self.callable)
            .field("names", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Args {
    #[inline]
    pub(crate) fn new(callable: impl Into<String>, values: HashMap<String, Instance>) -> Self {
        Self { callable: callable.into(), values }
    }

    #[inline]
    pub(crate) fn empty(callable: impl Into<String>) -> Self {
        Self::new(callable, HashMap::new())
    }

    /// Inserts `instance` unless a value for `name` is already present
    #[inline]
    pub(crate) fn insert_missing(&mut self, name: &str, instance: &Instance) {
        if !self.values.contains_key(name) {
            self.values.insert(name.to_owned(), instance.clone());
        }
    }

    /// Name of the callable these arguments were assembled for
    #[inline]
    pub fn callable(&self) -> &str {
        &self.callable
    }

    /// Returns `true` if a value was supplied for `name`
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of supplied values
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was supplied
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the raw instance supplied for `name`
    pub fn instance(&self, name: &str) -> Result<Instance, Error> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| Error::missing(name, &self.callable))
    }

    /// Returns the shared value supplied for `name`
    pub fn get<T: Any + Send + Sync>(&self, name: &str) -> Result<Arc<T>, Error> {
        self.instance(name)?
            .downcast::<T>()
            .map_err(|_| Error::mismatch::<T>(name))
    }

    /// Returns a clone of the value supplied for `name`
    pub fn get_cloned<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<T, Error> {
        self.opt_cloned(name)?
            .ok_or_else(|| Error::missing(name, &self.callable))
    }

    /// Returns the shared value supplied for `name`, or `None` if it was not supplied
    pub fn opt<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>, Error> {
        if !self.contains(name) {
            return Ok(None);
        }
        self.get(name).map(Some)
    }

    /// Returns a clone of the value supplied for `name`, or `None` if it was not supplied
    ///
    /// An explicitly supplied `Option<T>` is accepted as well and flattened.
    pub fn opt_cloned<T: Any + Send + Sync + Clone>(&self, name: &str) -> Result<Option<T>, Error> {
        let Some(instance) = self.values.get(name) else {
            return Ok(None);
        };
        if let Some(value) = (**instance).downcast_ref::<T>() {
            return Ok(Some(value.clone()));
        }
        (**instance)
            .downcast_ref::<Option<T>>()
            .cloned()
            .ok_or_else(|| Error::mismatch::<T>(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(params: Params) -> Args {
        Args::new("test", params.values)
    }

    #[test]
    fn it_builds_param_descriptors() {
        const PORT: Param = Param::optional("port").of_type("u16");

        assert_eq!(PORT.name(), "port");
        assert!(PORT.has_default());
        assert_eq!(PORT.type_name(), Some("u16"));
        assert!(!Param::required("host").has_default());
    }

    #[test]
    fn it_keeps_identity_of_shared_values() {
        let shared = Arc::new(String::from("db"));
        let args = args(Params::new().with_shared("db", shared.clone()));

        let resolved = args.get::<String>("db").unwrap();

        assert!(Arc::ptr_eq(&shared, &resolved));
    }

    #[test]
    fn it_reports_missing_value_with_callable_name() {
        let args = args(Params::new());

        let err = args.get::<String>("db").unwrap_err();

        assert_eq!(err.to_string(), "db is required when calling test");
    }

    #[test]
    fn it_reports_type_mismatch() {
        let args = args(Params::new().with("port", 8080_i64));

        let err = args.get::<u16>("port").unwrap_err();

        assert!(matches!(err, Error::TypeMismatch { expected: "u16", .. }));
    }

    #[test]
    fn it_returns_none_for_absent_optional() {
        let args = args(Params::new());

        assert!(args.opt::<String>("label").unwrap().is_none());
        assert!(args.opt_cloned::<String>("label").unwrap().is_none());
    }

    #[test]
    fn it_flattens_explicit_none() {
        let args = args(Params::new().with("label", Option::<String>::None));

        assert!(args.contains("label"));
        assert_eq!(args.opt_cloned::<String>("label").unwrap(), None);
    }

    #[test]
    fn it_does_not_overwrite_supplied_values() {
        let mut args = args(Params::new().with("retries", 3_u32));
        let fallback: Instance = Arc::new(5_u32);

        args.insert_missing("retries", &fallback);
        args.insert_missing("timeout", &fallback);

        assert_eq!(args.get_cloned::<u32>("retries").unwrap(), 3);
        assert_eq!(args.get_cloned::<u32>("timeout").unwrap(), 5);
    }

    #[test]
    fn it_collects_params_from_iterator() {
        let params: Params = [("a", Arc::new(1_i32) as Instance), ("b", Arc::new(2_i32) as Instance)]
            .into_iter()
            .collect();

        assert_eq!(params.len(), 2);
        assert!(params.contains("a"));
        assert!(!params.is_empty());
    }
}
