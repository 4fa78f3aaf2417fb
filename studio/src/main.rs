//! Velo Studio - Entry Point
//!
//! Drafts, checks and deploys n8n workflows from natural-language prompts.
//! Without a command flag the local API server is started.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

use colored::Colorize;
use tracing::{error, info};

use velo_studio::app::options::AppOptions;
use velo_studio::app::run::run;
use velo_studio::app::state::Services;
use velo_studio::deploy::deploy;
use velo_studio::diagram::to_mermaid;
use velo_studio::emotion::classify;
use velo_studio::errors::BuilderError;
use velo_studio::filesys::file::File;
use velo_studio::generator::parse;
use velo_studio::http::platform::WorkflowPlatform;
use velo_studio::logs::{init_logging, LogLevel, LogOptions};
use velo_studio::models::workflow::WorkflowGraph;
use velo_studio::storage::api_config::load_api_config;
use velo_studio::storage::layout::StorageLayout;
use velo_studio::storage::settings::{load_settings, Settings};
use velo_studio::utils::version_info;
use velo_studio::validation::{validate, ValidationReport};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to print version: {e}"),
        }
        return;
    }

    let layout = match cli_args.get("dir") {
        Some(dir) => StorageLayout::new(PathBuf::from(dir)),
        None => StorageLayout::default(),
    };

    // Retrieve the settings file
    let mut settings = match load_settings(&layout.settings_file()).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            std::process::exit(1);
        }
    };
    if let Some(level) = cli_args.get("log-level") {
        match level.parse::<LogLevel>() {
            Ok(level) => settings.log_level = level,
            Err(e) => eprintln!("{e}; keeping {}", settings.log_level.as_str()),
        }
    }

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_to_file.then(|| layout.logs_dir()),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let result = dispatch(&cli_args, layout, settings).await;
    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn dispatch(
    cli_args: &HashMap<String, String>,
    layout: StorageLayout,
    settings: Settings,
) -> Result<(), BuilderError> {
    if let Some(prompt) = cli_args.get("parse") {
        let graph = parse(prompt);
        return print_graph(&graph, cli_args.contains_key("mermaid"));
    }

    if let Some(text) = cli_args.get("emotion") {
        let reading = classify(text);
        println!(
            "{} {} ({}%)",
            reading.emotion.emoji(),
            reading.emotion.as_str(),
            reading.confidence
        );
        return Ok(());
    }

    if let Some(path) = cli_args.get("validate") {
        let value = File::new(path).read_json::<serde_json::Value>().await?;
        let report = validate(&value);
        print_report(&report);
        if !report.valid {
            return Err(BuilderError::ValidationFailed(report.errors));
        }
        return Ok(());
    }

    if let Some(path) = cli_args.get("diagram") {
        let graph = read_graph(path).await?;
        println!("{}", to_mermaid(&graph));
        return Ok(());
    }

    let needs_services = ["draft", "deploy", "list"]
        .iter()
        .any(|key| cli_args.contains_key(*key));
    if needs_services {
        let api_config = load_api_config(&layout.api_config_file()).await?;
        let services = Services::build(&api_config, &settings)?;

        if let Some(prompt) = cli_args.get("draft") {
            let draft = services.drafter.draft(prompt).await?;
            info!("Drafted workflow from {:?} source", draft.source);
            print_report(&draft.report);
            return print_graph(&draft.graph, cli_args.contains_key("mermaid"));
        }

        if let Some(path) = cli_args.get("deploy") {
            let graph = read_graph(path).await?;
            let platform = services.require_platform()?;
            let created = deploy(platform.as_ref(), &graph, cli_args.contains_key("activate")).await?;
            println!(
                "{} '{}' (id {}, active: {})",
                "Deployed".green().bold(),
                created.name,
                created.id.as_deref().unwrap_or("-"),
                created.active
            );
            return Ok(());
        }

        let platform = services.require_platform()?;
        let page = platform.list_workflows(None).await?;
        for workflow in page.data {
            let status = if workflow.active {
                "active".green()
            } else {
                "inactive".dimmed()
            };
            println!(
                "{:<12} {:<40} {}",
                workflow.id.as_deref().unwrap_or("-"),
                workflow.name,
                status
            );
        }
        return Ok(());
    }

    // Run the server
    let options = AppOptions::new(layout, settings);
    info!("Running Velo Studio with options: {:?}", options);
    let result = run(options, await_shutdown_signal()).await;
    if let Err(e) = &result {
        error!("Failed to run the server: {e}");
    }
    result
}

async fn read_graph(path: &str) -> Result<WorkflowGraph, BuilderError> {
    let text = File::new(path).read_string().await?;
    WorkflowGraph::from_json_str(&text)
}

fn print_graph(graph: &WorkflowGraph, mermaid: bool) -> Result<(), BuilderError> {
    if mermaid {
        println!("{}", to_mermaid(graph));
    } else {
        println!("{}", graph.to_json_pretty()?);
    }
    Ok(())
}

fn print_report(report: &ValidationReport) {
    if report.valid {
        eprintln!("{}", "✓ workflow is valid".green());
    } else {
        eprintln!("{}", "✗ workflow is invalid".red().bold());
    }
    for err in &report.errors {
        eprintln!("  {} {}", "error:".red(), err);
    }
    for warning in &report.warnings {
        eprintln!("  {} {}", "warning:".yellow(), warning);
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Unable to install signal handlers, falling back to Ctrl+C");
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("Ctrl+C received, shutting down...");
    }
}
