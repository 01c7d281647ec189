//! Helpers for embedding a Jsonnet evaluator in an application.
//!
//! Jsonnet is a data templating language that extends JSON with expressions
//! and imports. This crate provides the pieces an embedding application
//! needs around an evaluation engine, without depending on any particular
//! engine:
//!
//! - [`Importer`] resolves import statements from the local filesystem or
//!   over HTTPS. Paths starting with a double slash (`//host/path`) are
//!   *netpaths*: HTTPS URLs with no written scheme, which keeps them usable
//!   inside colon-separated PATH-style environment variables. Resolved
//!   outcomes are cached for the lifetime of the importer.
//! - [`Config`] gathers the configurable properties of an evaluator - the
//!   import search path, external variables, top-level arguments, and stack
//!   limits - from whatever source the application uses, and applies them
//!   through the narrow [`Vm`] trait.
//! - [`cli::ConfigArgs`] (behind the default `cli` feature) declares clap
//!   flags for [`Config`] matching the standard jsonnet CLI, ready to be
//!   flattened into an application's own parser.

pub mod config;
pub mod error;
pub mod importer;
pub mod netpath;

#[cfg(feature = "cli")]
pub mod cli;

pub use config::{Config, Vm, VmVar, VmVarMap, DEFAULT_MAX_STACK, DEFAULT_MAX_TRACE};
pub use error::{ConfigError, ImportError};
pub use importer::{Contents, HttpFetcher, Importer, Response, UrlFetcher};
