//! Modules scripts can `import`.
//!
//! The set is fixed: `os`, `fs`, `path` and `log`. Nothing is resolved from disk.
//! `debug` is a reserved word in scripts, so debug-level output goes through the
//! built-in `debug(..)` statement and the `log` module starts at `trace`.

use super::value::HostList;
use crate::error::Error;
use crate::renderer::filters::{basename, dirname, extension, stem};
use crate::{matcher, shell, writer};
use rhai::module_resolvers::StaticModuleResolver;
use rhai::{Dynamic, EvalAltResult, ImmutableString, Module};
use std::path::Path;

type FnResult<T> = Result<T, Box<EvalAltResult>>;

pub(crate) fn to_eval_error(err: Error) -> Box<EvalAltResult> {
    err.to_string().into()
}

/// Builds the resolver holding every importable module.
pub fn standard_modules() -> StaticModuleResolver {
    let mut resolver = StaticModuleResolver::new();
    resolver.insert("os", os_module());
    resolver.insert("fs", fs_module());
    resolver.insert("path", path_module());
    resolver.insert("log", log_module());
    resolver
}

fn os_module() -> Module {
    let mut module = Module::new();
    module.set_native_fn("exec", |command: ImmutableString| -> FnResult<()> {
        shell::run_command(&command).map_err(to_eval_error)
    });
    module.set_native_fn("output", |command: ImmutableString| -> FnResult<String> {
        shell::command_output(&command).map_err(to_eval_error)
    });
    module.set_native_fn("env", |name: ImmutableString| -> FnResult<Dynamic> {
        Ok(std::env::var(name.as_str()).map(Dynamic::from).unwrap_or(Dynamic::UNIT))
    });
    module.build_index();
    module
}

fn fs_module() -> Module {
    let mut module = Module::new();
    module.set_native_fn("read", |path: ImmutableString| -> FnResult<String> {
        std::fs::read_to_string(path.as_str()).map_err(|e| to_eval_error(e.into()))
    });
    module.set_native_fn(
        "write",
        |path: ImmutableString, content: ImmutableString| -> FnResult<()> {
            writer::write_artifact(path.as_str(), &content).map_err(to_eval_error)
        },
    );
    module.set_native_fn("exists", |path: ImmutableString| -> FnResult<bool> {
        Ok(Path::new(path.as_str()).exists())
    });
    module.set_native_fn(
        "glob",
        |root: ImmutableString, pattern: ImmutableString| -> FnResult<HostList> {
            let matches = matcher::find_matches(root.as_str(), &pattern).map_err(to_eval_error)?;
            Ok(matches.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().into())
        },
    );
    module.build_index();
    module
}

fn path_module() -> Module {
    let mut module = Module::new();
    module.set_native_fn("base", |path: ImmutableString| -> FnResult<String> { Ok(basename(&path)) });
    module.set_native_fn("dir", |path: ImmutableString| -> FnResult<String> { Ok(dirname(&path)) });
    module.set_native_fn("ext", |path: ImmutableString| -> FnResult<String> { Ok(extension(&path)) });
    module.set_native_fn("stem", |path: ImmutableString| -> FnResult<String> { Ok(stem(&path)) });
    module.set_native_fn(
        "join",
        |base: ImmutableString, child: ImmutableString| -> FnResult<String> {
            Ok(Path::new(base.as_str()).join(child.as_str()).display().to_string())
        },
    );
    module.build_index();
    module
}

fn log_module() -> Module {
    let mut module = Module::new();
    module.set_native_fn("trace", |message: ImmutableString| -> FnResult<()> {
        log::trace!("{message}");
        Ok(())
    });
    module.set_native_fn("info", |message: ImmutableString| -> FnResult<()> {
        log::info!("{message}");
        Ok(())
    });
    module.set_native_fn("warn", |message: ImmutableString| -> FnResult<()> {
        log::warn!("{message}");
        Ok(())
    });
    module.set_native_fn("error", |message: ImmutableString| -> FnResult<()> {
        log::error!("{message}");
        Ok(())
    });
    module.build_index();
    module
}
