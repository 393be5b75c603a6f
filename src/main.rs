//! hugo-preproc's main application entry point.
//! Loads the configuration and runs every configured processor.

use hugo_preproc::{
    cli::{get_args, Args},
    config::load_config,
    error::{default_error_handler, Result},
    logger::init_logger,
    processor::Processor,
    renderer::MiniJinjaRenderer,
    script::ScriptEngine,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.debug);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Finds, parses and validates the configuration
/// 2. Runs the git processors
/// 3. Runs the exec processors
fn run(args: Args) -> Result<()> {
    let (config_path, config) = load_config(args.config.as_deref())?;
    log::info!("Using config file: {}", config_path.display());

    let renderer = MiniJinjaRenderer::new();
    let scripts = ScriptEngine::new();
    Processor::new(&renderer, &scripts).run(&config)
}
