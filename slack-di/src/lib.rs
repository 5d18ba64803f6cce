//! Name-based dependency injection
//!
//! A [`Container`] maps component names to providers, constructs each
//! component on first request by resolving its declared parameters by name,
//! and caches the result until the component's group is reset.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use slack_di::{Container, Component, Args, Param, Params, error::Error};
//!
//! struct Config;
//!
//! struct Service {
//!     config: Arc<Config>,
//!     name: String,
//! }
//!
//! impl Component for Config {
//!     const PARAMS: &'static [Param] = &[];
//!
//!     fn construct(_: Args) -> Result<Self, Error> {
//!         Ok(Config)
//!     }
//! }
//!
//! impl Component for Service {
//!     const PARAMS: &'static [Param] = &[Param::required("config"), Param::required("name")];
//!
//!     fn construct(args: Args) -> Result<Self, Error> {
//!         Ok(Self { config: args.get("config")?, name: args.get_cloned("name")? })
//!     }
//! }
//!
//! let container = Container::new();
//! container.register_component::<Config>("config");
//!
//! let factory = container.inject(slack_di::class::<Service>(), &["config"]).unwrap();
//! let service = factory
//!     .call_with(Params::new().with("name", String::from("api")))
//!     .unwrap()
//!     .downcast::<Service>()
//!     .unwrap();
//!
//! assert_eq!(service.name, "api");
//! assert!(Arc::ptr_eq(&service.config, &container.provide::<Config>("config").unwrap()));
//! ```

extern crate self as slack_di;

pub use crate::{
    container::{Container, Registrant, DEFAULT_GROUP},
    error::Error,
    inject::{Class, Component, Partial, class},
    invoke::{ParamSource, invoke},
    params::{Args, Instance, Param, Params},
    provider::{Callable, Func, Provider},
    settings::{Setting, SymbolPath},
    symbols::{Importer, Module, Modules},
};

#[cfg(feature = "macros")]
pub use slack_di_macros::Component;

pub mod error;
pub mod container;
pub mod inject;
pub mod invoke;
pub mod params;
pub mod provider;
pub mod settings;
pub mod symbols;
