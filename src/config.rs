//! Evaluator configuration: search path, variables, and engine limits.
//!
//! [`Config`] holds everything an embedding application configures on a
//! Jsonnet evaluator and its [`Importer`]: the import search path, external
//! variables, top-level arguments, and stack limits. It is agnostic to where
//! the configuration comes from - the `cli` module populates it from the
//! command line, but an application can fill it from config files or code.
//!
//! The evaluation engine itself is not a dependency of this crate. Its
//! configuration surface is the narrow [`Vm`] trait, implemented by the
//! embedder for whatever engine it links against.

use std::collections::BTreeMap;
use std::env;

use crate::error::ConfigError;
use crate::importer::Importer;

/// Default evaluator stack frame limit (the standard jsonnet default).
pub const DEFAULT_MAX_STACK: usize = 500;

/// Default number of stack frames shown in error traces.
pub const DEFAULT_MAX_TRACE: usize = 20;

/// The configuration surface of a Jsonnet evaluator, as seen by this crate.
/// Implement this for the engine being embedded; [`Config::configure_vm`]
/// pushes variables and limits through it.
pub trait Vm {
    /// Sets an external variable to a string value.
    fn ext_var(&mut self, key: &str, value: &str);
    /// Sets an external variable to a code fragment.
    fn ext_code(&mut self, key: &str, code: &str);
    /// Sets a top-level argument to a string value.
    fn tla_var(&mut self, key: &str, value: &str);
    /// Sets a top-level argument to a code fragment.
    fn tla_code(&mut self, key: &str, code: &str);
    /// Sets the maximum evaluation stack depth.
    fn set_max_stack(&mut self, frames: usize);
    /// Sets the maximum number of stack frames output on error.
    fn set_max_trace(&mut self, frames: usize);
}

/// A variable that can be set in a Jsonnet evaluator: an external variable
/// (extVar) or a top-level argument (TLA), each as a string or code, from a
/// literal or a file. The file flavors become `import`/`importstr`
/// expressions so the engine resolves them through its importer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VmVar {
    ExtStr(String),
    ExtCode(String),
    ExtStrFile(String),
    ExtCodeFile(String),
    TlaStr(String),
    TlaCode(String),
    TlaStrFile(String),
    TlaCodeFile(String),
}

impl VmVar {
    /// Sets this variable under `key` in the given evaluator.
    pub fn set(&self, key: &str, vm: &mut dyn Vm) {
        match self {
            VmVar::ExtStr(s) => vm.ext_var(key, s),
            VmVar::ExtCode(s) => vm.ext_code(key, s),
            VmVar::ExtStrFile(f) => vm.ext_code(key, &mk_importstr(f)),
            VmVar::ExtCodeFile(f) => vm.ext_code(key, &mk_import(f)),
            VmVar::TlaStr(s) => vm.tla_var(key, s),
            VmVar::TlaCode(s) => vm.tla_code(key, s),
            VmVar::TlaStrFile(f) => vm.tla_code(key, &mk_importstr(f)),
            VmVar::TlaCodeFile(f) => vm.tla_code(key, &mk_import(f)),
        }
    }
}

/// A map of [`VmVar`]s sharing one key namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VmVarMap(BTreeMap<String, VmVar>);

impl VmVarMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, var: VmVar) {
        self.0.insert(key.into(), var);
    }

    pub fn get(&self, key: &str) -> Option<&VmVar> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Parses a `key[=value]` definition and inserts the variable built by
    /// `make` (typically a [`VmVar`] variant constructor). When `=value` is
    /// omitted the value is taken from the environment variable named by
    /// the key; it is an error if that variable is not set.
    pub fn set_var(
        &mut self,
        definition: &str,
        make: impl Fn(String) -> VmVar,
    ) -> Result<(), ConfigError> {
        let (key, value) = match definition.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string())),
            None => (definition, None),
        };
        if key.is_empty() {
            return Err(ConfigError::MissingKey {
                input: definition.to_string(),
            });
        }
        let value = match value {
            Some(value) => value,
            None => env::var(key).map_err(|_| ConfigError::MissingValue {
                key: key.to_string(),
            })?,
        };
        self.0.insert(key.to_string(), make(value));
        Ok(())
    }

    /// Sets every variable in the map in the given evaluator.
    pub fn configure_vm(&self, vm: &mut dyn Vm) {
        for (key, var) in &self.0 {
            var.set(key, vm);
        }
    }
}

/// Configuration for a Jsonnet evaluator and its [`Importer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Ordered library search directories, probed after the importing
    /// source's own directory.
    pub import_path: Vec<String>,
    /// External variables.
    pub ext_vars: VmVarMap,
    /// Top-level arguments.
    pub tla_vars: VmVarMap,
    /// Maximum evaluation stack depth.
    pub max_stack: usize,
    /// Maximum number of stack frames output on error.
    pub max_trace: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            import_path: Vec::new(),
            ext_vars: VmVarMap::new(),
            tla_vars: VmVarMap::new(),
            max_stack: DEFAULT_MAX_STACK,
            max_trace: DEFAULT_MAX_TRACE,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `importer` with the configured import path, then with the
    /// OS-list-separated entries of `env_var` if one is named.
    pub fn configure_importer(&self, importer: &mut Importer, env_var: Option<&str>) {
        for path in &self.import_path {
            importer.push_search_path(path.clone());
        }
        if let Some(var) = env_var {
            importer.append_search_from_env(var);
        }
    }

    /// Builds an [`Importer`] with the default transport, configured per
    /// [`Config::configure_importer`].
    pub fn importer(&self, env_var: Option<&str>) -> Importer {
        let mut importer = Importer::new();
        self.configure_importer(&mut importer, env_var);
        importer
    }

    /// Sets the external variables, top-level arguments, and limits in the
    /// given evaluator.
    pub fn configure_vm(&self, vm: &mut dyn Vm) {
        self.ext_vars.configure_vm(vm);
        self.tla_vars.configure_vm(vm);
        vm.set_max_stack(self.max_stack);
        vm.set_max_trace(self.max_trace);
    }
}

/// Quotes `s` as a Jsonnet verbatim string: `@'...'` with quotes doubled.
fn quote(s: &str) -> String {
    format!("@'{}'", s.replace('\'', "''"))
}

fn mk_import(file: &str) -> String {
    format!("import {}", quote(file))
}

fn mk_importstr(file: &str) -> String {
    format!("importstr {}", quote(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records every call made through the Vm trait, in order.
    #[derive(Default)]
    struct VmMock {
        calls: Vec<String>,
    }

    impl Vm for VmMock {
        fn ext_var(&mut self, key: &str, value: &str) {
            self.calls.push(format!("ext_var {key}={value}"));
        }
        fn ext_code(&mut self, key: &str, code: &str) {
            self.calls.push(format!("ext_code {key}={code}"));
        }
        fn tla_var(&mut self, key: &str, value: &str) {
            self.calls.push(format!("tla_var {key}={value}"));
        }
        fn tla_code(&mut self, key: &str, code: &str) {
            self.calls.push(format!("tla_code {key}={code}"));
        }
        fn set_max_stack(&mut self, frames: usize) {
            self.calls.push(format!("max_stack {frames}"));
        }
        fn set_max_trace(&mut self, frames: usize) {
            self.calls.push(format!("max_trace {frames}"));
        }
    }

    #[test]
    fn set_var_with_literal_value() {
        let mut m = VmVarMap::new();
        m.set_var("k=hello", VmVar::ExtStr).unwrap();
        assert_eq!(m.get("k"), Some(&VmVar::ExtStr("hello".to_string())));
    }

    #[test]
    fn set_var_with_empty_value() {
        let mut m = VmVarMap::new();
        m.set_var("k=", VmVar::ExtStr).unwrap();
        assert_eq!(m.get("k"), Some(&VmVar::ExtStr(String::new())));
    }

    #[test]
    fn set_var_from_env() {
        env::set_var("JSONNEXT_CONFIG_TEST_VAR", "from-env");
        let mut m = VmVarMap::new();
        m.set_var("JSONNEXT_CONFIG_TEST_VAR", VmVar::TlaStr).unwrap();
        assert_eq!(
            m.get("JSONNEXT_CONFIG_TEST_VAR"),
            Some(&VmVar::TlaStr("from-env".to_string()))
        );
    }

    #[test]
    fn set_var_missing_env_value() {
        env::remove_var("JSONNEXT_CONFIG_TEST_UNSET");
        let mut m = VmVarMap::new();
        let err = m
            .set_var("JSONNEXT_CONFIG_TEST_UNSET", VmVar::ExtStr)
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingValue {
                key: "JSONNEXT_CONFIG_TEST_UNSET".to_string()
            }
        );
    }

    #[test]
    fn set_var_missing_key() {
        let mut m = VmVarMap::new();
        let err = m.set_var("=v", VmVar::ExtStr).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingKey {
                input: "=v".to_string()
            }
        );
    }

    #[test]
    fn file_vars_become_import_expressions() {
        let mut vm = VmMock::default();
        VmVar::ExtStrFile("a.txt".to_string()).set("k", &mut vm);
        VmVar::ExtCodeFile("b.jsonnet".to_string()).set("l", &mut vm);
        VmVar::TlaStrFile("it's.txt".to_string()).set("m", &mut vm);
        assert_eq!(
            vm.calls,
            vec![
                "ext_code k=importstr @'a.txt'",
                "ext_code l=import @'b.jsonnet'",
                "tla_code m=importstr @'it''s.txt'",
            ]
        );
    }

    #[test]
    fn configure_vm_sets_vars_and_limits() {
        let mut c = Config::new();
        c.ext_vars.insert("e", VmVar::ExtStr("1".to_string()));
        c.tla_vars.insert("t", VmVar::TlaCode("{}".to_string()));
        c.max_stack = 100;

        let mut vm = VmMock::default();
        c.configure_vm(&mut vm);

        assert_eq!(
            vm.calls,
            vec!["ext_var e=1", "tla_code t={}", "max_stack 100", "max_trace 20"]
        );
    }

    #[test]
    fn configure_importer_appends_env_after_explicit() {
        env::set_var(
            "JSONNEXT_CONFIG_TEST_PATH",
            env::join_paths(["/env/1", "/env/2"]).unwrap(),
        );
        let mut c = Config::new();
        c.import_path = vec!["/explicit".to_string()];

        let importer = c.importer(Some("JSONNEXT_CONFIG_TEST_PATH"));

        assert_eq!(importer.search_path(), ["/explicit", "/env/1", "/env/2"]);
    }
}
