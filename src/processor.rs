//! Core processor orchestration.
//! Runs every configured git source and exec source in order, feeding history or
//! matched files through the template renderer or the script engine. The first
//! failure stops the run.

use crate::config::{
    ExecAction, ExecSource, GitAction, GitMode, GitProcessor, GitSource, ProcessorConfig,
    ScriptMode,
};
use crate::error::Result;
use crate::history::History;
use crate::matcher::find_matches;
use crate::renderer::TemplateRenderer;
use crate::script::{Bindings, Script, ScriptEngine};
use crate::shell::run_command;
use crate::writer::write_artifact;
use log::debug;
use serde::Serialize;
use serde_json::json;

/// A git processor's action, with its script compiled once per processor.
enum Prepared<'a> {
    Template(&'a str),
    Script(Script),
}

/// Runs processors with a template renderer and a script engine.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    scripts: &'a ScriptEngine,
}

impl<'a> Processor<'a> {
    pub fn new(renderer: &'a dyn TemplateRenderer, scripts: &'a ScriptEngine) -> Self {
        Self { renderer, scripts }
    }

    /// Runs all git sources, then all exec sources.
    pub fn run(&self, config: &ProcessorConfig) -> Result<()> {
        self.run_gits(&config.git)?;
        self.run_execs(&config.exec)
    }

    /// Runs the configured git sources in order.
    ///
    /// The repository is opened once per source and shared by its processors.
    pub fn run_gits(&self, sources: &[GitSource]) -> Result<()> {
        debug!("Iterating git sources: {}", sources.len());
        for (i, source) in sources.iter().enumerate() {
            let label = format!("git {i} ('{}')", source.path.display());
            let history = History::open(&source.path).map_err(|e| e.context(label.clone()))?;

            debug!("{label}: iterating processors: {}", source.processors.len());
            for (j, processor) in source.processors.iter().enumerate() {
                debug!("{label}: processor {j}: mode: {}", processor.mode);
                self.run_git_processor(&history, processor)
                    .map_err(|e| e.context(format!("{label}: processor {j} ({})", processor.mode)))?;
            }
        }
        Ok(())
    }

    fn run_git_processor(&self, history: &History, processor: &GitProcessor) -> Result<()> {
        let action = match &processor.action {
            GitAction::Template(template) => Prepared::Template(template),
            GitAction::Script(source) => Prepared::Script(self.scripts.compile(source)?),
        };

        match processor.mode {
            GitMode::Head => {
                let head = history.head()?;
                debug!("Head commit: {}", head.hash);
                self.emit(&processor.file, &action, &head)
                    .map_err(|e| e.context(format!("commit {}", head.short_hash)))
            }
            GitMode::Each => {
                for record in history.each()? {
                    let record = record?;
                    debug!("Commit {}: {} file(s) changed", record.short_hash, record.files_changed);
                    self.emit(&processor.file, &action, &record)
                        .map_err(|e| e.context(format!("commit {}", record.short_hash)))?;
                }
                Ok(())
            }
            GitMode::All => {
                let snapshot = history.all()?;
                debug!("Head commit: {}, {} commit(s) in history", snapshot.head.hash, snapshot.commits.len());
                self.emit(&processor.file, &action, &snapshot)
            }
        }
    }

    /// Renders the file path and either writes rendered content or runs the script.
    fn emit<T: Serialize>(&self, file: &str, action: &Prepared<'_>, data: &T) -> Result<()> {
        let context = serde_json::to_value(data)?;
        let file = self.renderer.render(file, &context)?;
        debug!("File: {file}");

        match action {
            Prepared::Template(template) => {
                let content = self.renderer.render(template, &context)?;
                write_artifact(&file, &content).map_err(|e| e.context(format!("file '{file}'")))
            }
            Prepared::Script(script) => {
                let bindings =
                    Bindings { file: file.into(), git: Some(context), ..Default::default() };
                self.scripts.run(script, bindings)
            }
        }
    }

    /// Runs the configured exec sources in order.
    pub fn run_execs(&self, sources: &[ExecSource]) -> Result<()> {
        debug!("Iterating exec sources: {}", sources.len());
        for (i, source) in sources.iter().enumerate() {
            let label = format!("exec {i} ('{}', '{}')", source.path.display(), source.pattern);
            self.run_exec(source).map_err(|e| e.context(label))?;
        }
        Ok(())
    }

    fn run_exec(&self, source: &ExecSource) -> Result<()> {
        let files = find_matches(&source.path, &source.pattern)?;
        if files.is_empty() {
            debug!("No files matched; skipping");
            return Ok(());
        }

        match &source.action {
            ExecAction::Command(command) => {
                debug!("Iterating found files: {}", files.len());
                for file in &files {
                    let file = file.display().to_string();
                    let rendered = self
                        .renderer
                        .render(command, &json!({ "file": file }))
                        .map_err(|e| e.context(format!("file '{file}'")))?;
                    debug!("Command: {rendered}");
                    run_command(&rendered).map_err(|e| e.context(format!("file '{file}'")))?;
                }
                Ok(())
            }
            ExecAction::Script { body, mode: ScriptMode::Each } => self.scripts.run_each(body, &files),
            ExecAction::Script { body, mode: ScriptMode::All } => self.scripts.run_all(body, &files),
        }
    }
}
