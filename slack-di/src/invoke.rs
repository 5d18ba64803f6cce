//! Invocation of callables from prioritized parameter sources

use crate::{
    error::Error,
    params::{Args, Instance, Params},
    provider::Callable,
};
use std::collections::HashMap;

/// Something that may supply a value for a parameter name
pub trait ParamSource {
    /// Returns the value for `name`, or `None` if this source does not have one
    fn lookup(&self, name: &str) -> Result<Option<Instance>, Error>;
}

impl ParamSource for Params {
    #[inline]
    fn lookup(&self, name: &str) -> Result<Option<Instance>, Error> {
        Ok(self.get(name).cloned())
    }
}

impl ParamSource for HashMap<String, Instance> {
    #[inline]
    fn lookup(&self, name: &str) -> Result<Option<Instance>, Error> {
        Ok(self.get(name).cloned())
    }
}

/// Calls `callable`, taking each declared parameter from the first source that has it
///
/// Sources are consulted in the given order. A parameter no source supplies is
/// left out when it has a default, otherwise the call fails with
/// [`Error::ParameterMissing`]. Errors raised by a source are returned as is.
pub fn invoke<C>(callable: &C, sources: &[&dyn ParamSource]) -> Result<Instance, Error>
where
    C: Callable + ?Sized,
{
    let params = callable.params();
    if params.is_empty() {
        return callable.call(Args::empty(callable.name()));
    }

    let mut values = HashMap::with_capacity(params.len());
    'params: for param in params {
        for source in sources {
            if let Some(value) = source.lookup(param.name())? {
                values.insert(param.name().to_owned(), value);
                continue 'params;
            }
        }
        if !param.has_default() {
            return Err(Error::missing(param.name(), callable.name()));
        }
    }
    callable.call(Args::new(callable.name(), values))
}
