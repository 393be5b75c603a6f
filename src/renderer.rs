//! Template renderer for file paths, content and commands.
//! Every render compiles its template afresh against a MiniJinja environment that
//! carries the function library from [`filters`].
use crate::error::Result;
use minijinja::{Environment, UndefinedBehavior};

pub mod filters;

use filters::*;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a new MiniJinjaRenderer with the function library registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        env.add_filter("camel_case", to_camel_case);
        env.add_filter("kebab_case", to_kebab_case);
        env.add_filter("pascal_case", to_pascal_case);
        env.add_filter("screaming_snake_case", to_screaming_snake_case);
        env.add_filter("snake_case", to_snake_case);
        env.add_filter("title_case", to_title_case);
        env.add_filter("train_case", to_train_case);

        env.add_filter("trim_prefix", trim_prefix);
        env.add_filter("trim_suffix", trim_suffix);
        env.add_filter("regex_replace", regex_replace);
        env.add_filter("shell_quote", shell_quote);

        env.add_filter("basename", basename);
        env.add_filter("dirname", dirname);
        env.add_filter("extension", extension);
        env.add_filter("stem", stem);

        env.add_filter("date", date);

        env.add_test("has_prefix", has_prefix);
        env.add_test("has_suffix", has_suffix);
        env.add_test("regex", matches_regex);

        env.add_function("env", env_function);

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse, or references an
    ///   undefined variable, attribute or function while rendering
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("temp", template)?;

        let tmpl = env.get_template("temp")?;
        Ok(tmpl.render(context)?)
    }
}
