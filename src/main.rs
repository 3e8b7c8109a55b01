//! flowsmith CLI - describe a workflow, review it, store it in n8n

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing_subscriber::EnvFilter;

use flowsmith::config::mask_api_key;
use flowsmith::error::{FixSuggestion, FlowError, SubmissionError};
use flowsmith::workflow::{
    render_preview, validate, GeneratedWorkflow, Strictness, WorkflowDocument,
};
use flowsmith::{ChatSession, ClaudeProvider, FlowConfig, N8nClient, Orchestrator};

#[derive(Parser)]
#[command(name = "flowsmith")]
#[command(about = "Turn plain-language requests into n8n workflows")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workflow and print a preview
    Generate {
        /// What the workflow should do
        message: String,

        /// Print the workflow JSON instead of the preview
        #[arg(long)]
        json: bool,

        /// Write the workflow JSON to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Store a workflow JSON file in n8n (inactive)
    Create {
        /// Workflow document, bare or wrapped as {"workflow": ...}
        file: PathBuf,
    },

    /// Check a workflow JSON file without contacting n8n
    Validate {
        /// Workflow document, bare or wrapped as {"workflow": ...}
        file: PathBuf,

        /// Apply generation-time rules only
        #[arg(long)]
        lenient: bool,
    },

    /// Check that n8n is reachable with the configured key
    TestConnection,

    /// Interactive session: describe, review, confirm
    Chat,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = FlowConfig::from_env();

    let result = match cli.command {
        Commands::Generate {
            message,
            json,
            output,
        } => generate(&config, &message, json, output.as_deref()).await,
        Commands::Create { file } => create(&config, &file).await,
        Commands::Validate { file, lenient } => validate_file(&file, lenient),
        Commands::TestConnection => test_connection(&config).await,
        Commands::Chat => chat(&config).await,
        Commands::Config => {
            show_config(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        print_error(&e);
        std::process::exit(1);
    }
}

fn print_error(e: &FlowError) {
    tracing::debug!(code = e.code(), class = %e.class(), "command failed");
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e.fix_suggestion() {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}

fn build_orchestrator(config: &FlowConfig) -> Result<Orchestrator, FlowError> {
    let internal = |e: anyhow::Error| FlowError::Internal {
        reason: format!("{:#}", e),
    };
    let provider = ClaudeProvider::new(config).map_err(internal)?;
    let platform = N8nClient::new(config).map_err(internal)?;
    Ok(Orchestrator::new(
        Arc::new(provider),
        Arc::new(platform),
        config.model.as_str(),
    ))
}

/// Read a workflow file, unwrapping `{"workflow": {...}}` when present
fn read_workflow(file: &Path) -> Result<serde_json::Value, FlowError> {
    let text = std::fs::read_to_string(file)?;
    let mut value: serde_json::Value = serde_json::from_str(&text)?;

    let inner = value
        .get_mut("workflow")
        .filter(|w| w.is_object())
        .map(serde_json::Value::take);
    if let Some(inner) = inner {
        value = inner;
    }
    if !value.is_object() {
        return Err(FlowError::InvalidFile {
            reason: format!("{} does not contain a JSON object", file.display()),
        });
    }
    Ok(value)
}

fn print_generated(generated: &GeneratedWorkflow) {
    println!();
    println!(
        "{}",
        render_preview(&generated.workflow, Some(generated.explanation.as_str()))
    );
    println!();
}

async fn generate(
    config: &FlowConfig,
    message: &str,
    json: bool,
    output: Option<&Path>,
) -> Result<(), FlowError> {
    let request = serde_json::Value::String(message.to_string());
    let message = flowsmith::api::check_message(&request)?;
    let orchestrator = build_orchestrator(config)?;

    eprintln!("{} Generating with {}...", "→".cyan(), orchestrator.model().cyan());
    let generated = orchestrator.generate(message, &[]).await?;
    let pretty = serde_json::to_string_pretty(&generated.workflow)?;

    if json {
        println!("{}", pretty);
    } else {
        print_generated(&generated);
    }

    if let Some(path) = output {
        tokio::fs::write(path, format!("{}\n", pretty)).await?;
        eprintln!("{} Saved to {}", "✓".green(), path.display());
    }
    Ok(())
}

async fn create(config: &FlowConfig, file: &Path) -> Result<(), FlowError> {
    let workflow = read_workflow(file)?;
    let orchestrator = build_orchestrator(config)?;

    let receipt = orchestrator.submit(&workflow).await?;
    println!("{} Workflow created in n8n", "✓".green());
    println!("  ID:  {}", receipt.id);
    println!("  URL: {}", receipt.url.cyan());
    Ok(())
}

fn validate_file(file: &Path, lenient: bool) -> Result<(), FlowError> {
    let workflow = read_workflow(file)?;
    let strictness = if lenient {
        Strictness::Lenient
    } else {
        Strictness::Strict
    };

    let result = validate(&workflow, strictness);
    if !result.is_valid() {
        for error in result.errors() {
            eprintln!("  {} {}", "✗".red(), error);
        }
        return Err(SubmissionError::ValidationFailure {
            errors: result.errors(),
        }
        .into());
    }

    println!("{} Workflow '{}' is valid", "✓".green(), file.display());
    // both strictness levels guarantee name, nodes and connections
    if let Ok(document) = WorkflowDocument::from_value(&workflow) {
        println!("  Name: {}", document.name);
        println!("  Nodes: {}", document.nodes.len());
        for spec in document.node_specs() {
            println!(
                "    {} {} {}",
                "•".cyan(),
                spec.name,
                format!("[{} v{}]", spec.node_type, spec.type_version).dimmed()
            );
        }
        println!("  Connections: {}", document.edges().len());
    }
    Ok(())
}

async fn test_connection(config: &FlowConfig) -> Result<(), FlowError> {
    let orchestrator = build_orchestrator(config)?;
    let connectivity = orchestrator.check_connectivity().await?;
    println!("{} Successfully connected to n8n", "✓".green());
    println!("  Workflows: {}", connectivity.workflow_count);
    Ok(())
}

fn show_config(config: &FlowConfig) {
    let masked = |key: &Option<String>| {
        key.as_deref()
            .map(|k| mask_api_key(k, 8))
            .unwrap_or_else(|| "(not set)".dimmed().to_string())
    };

    println!("{}", "Configuration".cyan().bold());
    println!("  ANTHROPIC_API_KEY:  {}", masked(&config.anthropic_api_key));
    println!("  ANTHROPIC_BASE_URL: {}", config.anthropic_base_url);
    println!("  Model:              {}", config.model);
    println!(
        "  N8N_URL:            {}",
        config
            .n8n_url
            .clone()
            .unwrap_or_else(|| "(not set)".dimmed().to_string())
    );
    println!("  N8N_API_KEY:        {}", masked(&config.n8n_api_key));
}

async fn prompt(
    lines: &mut Lines<BufReader<Stdin>>,
    label: &str,
) -> Result<Option<String>, FlowError> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?)
}

async fn chat(config: &FlowConfig) -> Result<(), FlowError> {
    let orchestrator = build_orchestrator(config)?;
    let session = ChatSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", "Describe the workflow you want to build.".bold());
    println!("{}", "Commands: /clear resets the conversation, /quit exits".dimmed());

    while let Some(line) = prompt(&mut lines, &format!("{} ", ">".cyan().bold())).await? {
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/clear" => {
                session.clear();
                println!("{} Conversation cleared", "✓".green());
                continue;
            }
            _ => {}
        }

        let generated = match session.ask(&orchestrator, line).await {
            Ok(generated) => generated,
            Err(e) => {
                print_error(&e);
                continue;
            }
        };
        print_generated(&generated);

        loop {
            let Some(answer) =
                prompt(&mut lines, "Create this workflow in n8n? [y]es / [n]o / [j]son: ").await?
            else {
                return Ok(());
            };

            match answer.trim().to_lowercase().as_str() {
                "y" | "yes" => match session.confirm(&orchestrator).await {
                    Ok(receipt) => {
                        println!("{} Created workflow {}", "✓".green(), receipt.id);
                        println!("  {}", receipt.url.cyan());
                        break;
                    }
                    // still pending, the user may retry or cancel
                    Err(e) => print_error(&e),
                },
                "n" | "no" => {
                    let _ = session.cancel();
                    println!("Cancelled. Describe another workflow whenever you like.");
                    break;
                }
                "j" | "json" => {
                    println!("{}", serde_json::to_string_pretty(&generated.original)?);
                }
                _ => continue,
            }
        }
    }

    Ok(())
}
