// SPDX-FileCopyrightText: 2026 Scriptor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scriptor - resolve and run scripts through pluggable engines.
//!
//! This is the binary entry point. Provider sources are directories whose
//! manifest names factories from the built-in catalog; without any, the
//! built-in engines are registered directly.

mod builtin;
mod executor;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use scriptor_bindings::ContributorRegistration;
use scriptor_bus::EventBus;
use scriptor_config::ScriptorConfig;
use scriptor_core::{Bindings, EventSink, ProviderSource, ServiceId, ServiceListener};
use scriptor_engine::{DirectorySource, FactoryCatalog};
use scriptor_script::ScriptingRuntime;
use tracing::{debug, warn};

use crate::builtin::builtin_catalog;
use crate::executor::FileExecutor;

/// Scriptor - resolve and run scripts through pluggable engines.
#[derive(Parser, Debug)]
#[command(name = "scriptor", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Additional provider source directory (repeatable).
    #[arg(long = "source", value_name = "DIR", global = true)]
    sources: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered engines and what they handle.
    Engines,
    /// Print the effective configuration as TOML.
    Config,
    /// Print the MIME type of the engine handling a file name.
    Mime { name: String },
    /// Print the file extension of the engine handling a MIME type.
    Extension { mime_type: String },
    /// Resolve a script by extension and run it.
    Run {
        path: PathBuf,
        /// Binding passed to the script as NAME=VALUE; VALUE is parsed as
        /// JSON when possible (repeatable).
        #[arg(long = "bind", value_name = "NAME=VALUE", value_parser = parse_binding)]
        bindings: Vec<(String, serde_json::Value)>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => scriptor_config::load_and_validate_path(path),
        None => scriptor_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            scriptor_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.level.to_ascii_lowercase());

    let bus = Arc::new(EventBus::new());
    let mut events = bus.subscribe();
    let runtime = activate(&config, &cli.sources, Arc::clone(&bus) as Arc<dyn EventSink>);
    while let Ok(event) = events.try_recv() {
        debug!(id = %event.id, topic = %event.event.topic, engine = %event.event.engine_name, "engine event");
    }

    let code = match cli.command {
        Commands::Config => print_config(&config),
        Commands::Engines => list_engines(&runtime),
        Commands::Mime { name } => print_or_fail(
            runtime.adapter().mime_type(&name),
            &format!("no engine handles `{name}`"),
        ),
        Commands::Extension { mime_type } => print_or_fail(
            runtime.adapter().extension(&mime_type),
            &format!("no engine handles MIME type `{mime_type}`"),
        ),
        Commands::Run { path, bindings } => run_script(&runtime, &path, bindings),
    };

    runtime.deactivate();
    code
}

/// Activate the runtime on the configured and command-line sources, falling
/// back to the built-in engines when no source declares any.
fn activate(config: &ScriptorConfig, extra: &[PathBuf], sink: Arc<dyn EventSink>) -> ScriptingRuntime {
    let catalog = Arc::new(builtin_catalog());
    let sources: Vec<Arc<dyn ProviderSource>> = config
        .engine
        .source_paths
        .iter()
        .map(PathBuf::from)
        .chain(extra.iter().cloned())
        .map(|dir| Arc::new(DirectorySource::new(dir, Arc::clone(&catalog))) as Arc<dyn ProviderSource>)
        .collect();

    let runtime = ScriptingRuntime::activate(config, Some(sink), sources);
    if runtime.registry().source_ids().is_empty() {
        register_builtins(&runtime, &catalog);
    }
    runtime
}

fn register_builtins(runtime: &ScriptingRuntime, catalog: &FactoryCatalog) {
    for name in catalog.names() {
        match catalog.instantiate(name) {
            Some(Ok(factory)) => {
                runtime.registry().register_factory(factory);
            }
            Some(Err(e)) => warn!(factory = name, error = %e, "cannot start built-in engine"),
            None => {}
        }
    }
}

fn list_engines(runtime: &ScriptingRuntime) -> ExitCode {
    let factories = runtime.registry().factories();
    if factories.is_empty() {
        println!("no engines registered");
        return ExitCode::SUCCESS;
    }
    for factory in factories {
        let d = factory.descriptor();
        println!(
            "{} {}\n  language:   {} {} ({})\n  extensions: {}\n  mime types: {}",
            d.engine_name,
            d.engine_version,
            d.language_name,
            d.language_version,
            d.names.join(", "),
            d.extensions.join(", "),
            d.mime_types.join(", "),
        );
    }
    ExitCode::SUCCESS
}

fn print_config(config: &ScriptorConfig) -> ExitCode {
    match config.to_toml_string() {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("scriptor: cannot render configuration: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_or_fail(value: Option<String>, missing: &str) -> ExitCode {
    match value {
        Some(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        None => {
            eprintln!("scriptor: {missing}");
            ExitCode::FAILURE
        }
    }
}

fn run_script(
    runtime: &ScriptingRuntime,
    path: &std::path::Path,
    bindings: Vec<(String, serde_json::Value)>,
) -> ExitCode {
    if !bindings.is_empty() {
        let values: Bindings = bindings.into_iter().collect();
        runtime
            .tracker()
            .on_add(ContributorRegistration::map(ServiceId(0), values).scoped("*"));
    }

    let path = path.to_string_lossy();
    let Some(script) = runtime.adapter().adapt(&path) else {
        eprintln!("scriptor: no script engine for `{path}`");
        return ExitCode::FAILURE;
    };

    match script.eval(&FileExecutor) {
        Ok(serde_json::Value::String(text)) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Ok(value) => {
            println!("{value:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("scriptor: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Parse a `NAME=VALUE` binding; VALUE is JSON when it parses as JSON.
fn parse_binding(raw: &str) -> Result<(String, serde_json::Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("binding name is empty in `{raw}`"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

/// Initialize tracing with an env filter, logging to stderr.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scriptor={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
