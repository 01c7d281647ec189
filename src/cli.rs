//! clap flag declarations for [`Config`].
//!
//! [`ConfigArgs`] is a `#[derive(Args)]` struct so an embedding application
//! can `#[command(flatten)]` it into its own parser and keep its binary's
//! flags alongside these. The flag names follow the standard jsonnet CLI:
//! `-J/--jpath`, `-V/--ext-str`, `-A/--tla-str` and the long-only
//! `--ext-*`/`--tla-*` variants.

use clap::Args;

use crate::config::{Config, VmVar, DEFAULT_MAX_STACK, DEFAULT_MAX_TRACE};
use crate::error::ConfigError;

/// Command line flags for configuring a Jsonnet evaluator and importer.
///
/// Every variable flag may be repeated; each occurrence adds an entry. The
/// `var[=value]` flags take the value from the environment variable named by
/// `var` when `=value` is omitted.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Add a library search dir
    #[arg(short = 'J', long = "jpath", value_name = "dir")]
    pub jpath: Vec<String>,

    /// Set extVar string (from environment if <str> is omitted)
    #[arg(short = 'V', long = "ext-str", value_name = "var[=str]")]
    pub ext_str: Vec<String>,

    /// Set extVar code (from environment if <code> is omitted)
    #[arg(long = "ext-code", value_name = "var[=code]")]
    pub ext_code: Vec<String>,

    /// Set extVar string from a file
    #[arg(long = "ext-str-file", value_name = "var=file")]
    pub ext_str_file: Vec<String>,

    /// Set extVar code from a file
    #[arg(long = "ext-code-file", value_name = "var=file")]
    pub ext_code_file: Vec<String>,

    /// Set top-level arg string (from environment if <str> is omitted)
    #[arg(short = 'A', long = "tla-str", value_name = "var[=str]")]
    pub tla_str: Vec<String>,

    /// Set top-level arg code (from environment if <code> is omitted)
    #[arg(long = "tla-code", value_name = "var[=code]")]
    pub tla_code: Vec<String>,

    /// Set top-level arg string from a file
    #[arg(long = "tla-str-file", value_name = "var=file")]
    pub tla_str_file: Vec<String>,

    /// Set top-level arg code from a file
    #[arg(long = "tla-code-file", value_name = "var=file")]
    pub tla_code_file: Vec<String>,

    /// Number of allowed stack frames of the evaluator
    #[arg(long, default_value_t = DEFAULT_MAX_STACK, value_name = "n")]
    pub max_stack: usize,

    /// Maximum number of stack frames output on error
    #[arg(long, default_value_t = DEFAULT_MAX_TRACE, value_name = "n")]
    pub max_trace: usize,
}

impl ConfigArgs {
    /// Parses the collected flag values into a [`Config`]. Fails if a
    /// variable definition has no key, or omits its value and the named
    /// environment variable is not set.
    pub fn to_config(&self) -> Result<Config, ConfigError> {
        let mut config = Config::new();
        config.import_path = self.jpath.clone();
        config.max_stack = self.max_stack;
        config.max_trace = self.max_trace;

        for v in &self.ext_str {
            config.ext_vars.set_var(v, VmVar::ExtStr)?;
        }
        for v in &self.ext_code {
            config.ext_vars.set_var(v, VmVar::ExtCode)?;
        }
        for v in &self.ext_str_file {
            config.ext_vars.set_var(v, VmVar::ExtStrFile)?;
        }
        for v in &self.ext_code_file {
            config.ext_vars.set_var(v, VmVar::ExtCodeFile)?;
        }
        for v in &self.tla_str {
            config.tla_vars.set_var(v, VmVar::TlaStr)?;
        }
        for v in &self.tla_code {
            config.tla_vars.set_var(v, VmVar::TlaCode)?;
        }
        for v in &self.tla_str_file {
            config.tla_vars.set_var(v, VmVar::TlaStrFile)?;
        }
        for v in &self.tla_code_file {
            config.tla_vars.set_var(v, VmVar::TlaCodeFile)?;
        }

        Ok(config)
    }
}
