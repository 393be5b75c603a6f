//! Embedded scripting for processors.
//! Scripts are written in Rhai and compiled with `file`, `files` and `git`
//! already declared, so a script can reference any of them whether or not the
//! current invocation binds it.
use crate::constants::{FILES_VAR, FILE_VAR, GIT_VAR};
use crate::error::{Error, Result};
use log::debug;
use rhai::{Array, Dynamic, Engine, EvalAltResult, Scope, AST};
use std::path::PathBuf;

pub mod modules;
pub mod value;

use value::{HostList, HostValue, ValueError};

type FnResult<T> = std::result::Result<T, Box<EvalAltResult>>;

/// Values bound into a script run. Anything left unset is unit inside the script.
#[derive(Debug, Default)]
pub struct Bindings {
    pub file: HostValue,
    pub files: HostValue,
    pub git: Option<serde_json::Value>,
}

/// A compiled script, reusable across runs.
pub struct Script {
    ast: AST,
}

/// Rhai engine configured with the host types and the standard modules.
pub struct ScriptEngine {
    engine: Engine,
}

impl ScriptEngine {
    pub fn new() -> Self {
        let mut engine = Engine::new();
        engine.set_strict_variables(true);
        engine.set_module_resolver(modules::standard_modules());
        engine.on_debug(|text, source, pos| match source {
            Some(source) => debug!("script {source} @ {pos:?}: {text}"),
            None => debug!("script @ {pos:?}: {text}"),
        });
        register_host_list(&mut engine);
        Self { engine }
    }

    /// Compiles `source` against the declared variables.
    pub fn compile(&self, source: &str) -> Result<Script> {
        let scope = declared_scope();
        let ast = self.engine.compile_with_scope(&scope, source)?;
        Ok(Script { ast })
    }

    /// Runs a compiled script in a fresh scope.
    pub fn run(&self, script: &Script, bindings: Bindings) -> Result<()> {
        let mut scope = declared_scope();
        bind(&mut scope, FILE_VAR, to_dynamic(bindings.file));
        bind(&mut scope, FILES_VAR, to_dynamic(bindings.files));
        if let Some(git) = bindings.git {
            let git = rhai::serde::to_dynamic(&git).map_err(|e| Error::ScriptError(e.to_string()))?;
            bind(&mut scope, GIT_VAR, git);
        }

        self.engine
            .run_ast_with_scope(&mut scope, &script.ast)
            .map_err(|e| Error::ScriptError(e.to_string()))
    }

    /// Runs `source` once per path, binding `file`. Stops at the first failure.
    pub fn run_each(&self, source: &str, files: &[PathBuf]) -> Result<()> {
        let script = self.compile(source)?;
        for file in files {
            let file = file.display().to_string();
            debug!("Running script for {file}");
            let bindings = Bindings { file: HostValue::from(file.as_str()), ..Default::default() };
            self.run(&script, bindings).map_err(|e| e.context(format!("file '{file}'")))?;
        }
        Ok(())
    }

    /// Runs `source` once with `files` bound to every path.
    pub fn run_all(&self, source: &str, files: &[PathBuf]) -> Result<()> {
        let script = self.compile(source)?;
        let list: HostList = files.iter().map(|f| f.display().to_string()).collect::<Vec<_>>().into();
        debug!("Running script for {} file(s)", list.len());
        self.run(&script, Bindings { files: list.into(), ..Default::default() })
    }
}

impl Default for ScriptEngine {
    fn default() -> Self {
        ScriptEngine::new()
    }
}

fn declared_scope() -> Scope<'static> {
    let mut scope = Scope::new();
    for name in [FILE_VAR, FILES_VAR, GIT_VAR] {
        scope.push_dynamic(name, Dynamic::UNIT);
    }
    scope
}

fn bind(scope: &mut Scope<'_>, name: &str, value: Dynamic) {
    if let Some(slot) = scope.get_mut(name) {
        *slot = value;
    }
}

fn to_dynamic(value: HostValue) -> Dynamic {
    match value {
        HostValue::Unset => Dynamic::UNIT,
        HostValue::Int(i) => Dynamic::from(i),
        HostValue::Str(s) => Dynamic::from(s),
        HostValue::List(list) => Dynamic::from(list),
    }
}

fn from_dynamic(value: &Dynamic) -> HostValue {
    if let Ok(i) = value.as_int() {
        HostValue::Int(i)
    } else if value.is_string() || value.is_bool() || value.is_char() || value.is_float() {
        HostValue::Str(value.to_string())
    } else if let Some(list) = value.clone().try_cast::<HostList>() {
        HostValue::List(list)
    } else {
        HostValue::Unset
    }
}

fn value_error(err: ValueError) -> Box<EvalAltResult> {
    err.to_string().into()
}

/// Exposes [`HostList`] to scripts, one group of functions per capability.
fn register_host_list(engine: &mut Engine) {
    let caps = HostList::CAPABILITIES;

    engine
        .register_type_with_name::<HostList>(HostList::TYPE_NAME)
        .register_fn("len", |list: &mut HostList| list.len() as i64)
        .register_fn("is_empty", |list: &mut HostList| list.is_empty())
        .register_fn("!", |list: &mut HostList| !HostValue::List(list.clone()).is_truthy())
        .register_fn("==", |lhs: &mut HostList, rhs: HostList| *lhs == rhs)
        .register_fn("!=", |lhs: &mut HostList, rhs: HostList| *lhs != rhs)
        .register_fn("to_string", |list: &mut HostList| list.to_string())
        .register_fn("to_debug", |list: &mut HostList| format!("{list:?}"))
        .register_fn("to_array", |list: &mut HostList| -> Array {
            list.as_slice().iter().cloned().map(Dynamic::from).collect()
        });

    if caps.arithmetic {
        engine.register_fn("+", |lhs: HostList, rhs: HostList| -> FnResult<Dynamic> {
            HostValue::List(lhs).add(&HostValue::List(rhs)).map(to_dynamic).map_err(value_error)
        });
    }

    if caps.index {
        engine
            .register_indexer_get(|list: &mut HostList, index: i64| -> FnResult<Dynamic> {
                HostValue::List(list.clone())
                    .index_get(&HostValue::Int(index))
                    .map(to_dynamic)
                    .map_err(value_error)
            })
            .register_indexer_get(|list: &mut HostList, value: rhai::ImmutableString| -> FnResult<Dynamic> {
                HostValue::List(list.clone())
                    .index_get(&HostValue::from(value.as_str()))
                    .map(to_dynamic)
                    .map_err(value_error)
            })
            .register_indexer_set(|list: &mut HostList, index: i64, value: Dynamic| -> FnResult<()> {
                let mut host = HostValue::List(std::mem::take(list));
                let result = host.index_set(&HostValue::Int(index), &from_dynamic(&value));
                if let HostValue::List(updated) = host {
                    *list = updated;
                }
                result.map_err(value_error)
            });
    }

    if caps.call {
        engine.register_fn("position", |list: &mut HostList, value: Dynamic| -> FnResult<Dynamic> {
            HostValue::List(list.clone())
                .call(&[from_dynamic(&value)])
                .map(to_dynamic)
                .map_err(value_error)
        });
    }

    if caps.iterate {
        engine
            .register_iterator::<HostList>()
            .register_fn("pairs", |list: &mut HostList| -> FnResult<Array> {
                let pairs = HostValue::List(list.clone()).iterate().map_err(value_error)?;
                Ok(pairs
                    .into_iter()
                    .map(|(i, v)| Dynamic::from_array(vec![Dynamic::from(i), to_dynamic(v)]))
                    .collect())
            });
    }
}
