//! Folio CLI - manage portfolio projects on a remote record store

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use folio_core::assets::resolve_asset_url;
use folio_core::config::Config;
use folio_core::prelude::*;
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "folio")]
#[command(author, version, about = "Portfolio project admin", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Backend base URL (overrides config and FOLIO_API_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Clone, Copy, Default, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Check configuration and backend reachability
    Doctor,
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List all projects
    List,
    /// Create a project
    Create {
        title: String,
        #[arg(short, long, default_value = "")]
        description: String,
        /// Image file to upload with the project
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Update a project; unspecified fields keep their current value
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        repo_url: Option<String>,
        #[arg(long)]
        live_url: Option<String>,
    },
    /// Delete a project
    Delete {
        id: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let level = if cli.verbose { "folio=debug" } else { "folio=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.parse()?),
        )
        .init();

    match cli.command {
        Commands::Projects { action } => {
            let config = load_config(cli.base_url.as_deref())?;
            cmd_projects(&config, action, cli.format, cli.quiet).await
        }
        Commands::Config { action } => cmd_config(action, cli.quiet),
        Commands::Doctor => cmd_doctor(cli.base_url.as_deref(), cli.quiet).await,
    }
}

fn load_config(base_url: Option<&str>) -> anyhow::Result<Config> {
    let mut config = Config::load()?;
    config.apply_base_url_override(base_url.map(str::to_string))?;
    debug!(base_url = %config.backend.base_url, "Configuration loaded");
    Ok(config)
}

fn synchronizer(config: &Config) -> anyhow::Result<RecordSynchronizer<HttpProjectStore>> {
    let store = HttpProjectStore::from_config(&config.backend)?;
    Ok(RecordSynchronizer::new(store))
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_projects(
    config: &Config,
    action: ProjectAction,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    let mut sync = synchronizer(config)?;

    match action {
        ProjectAction::List => {
            if let Err(failure) = sync.load_all().await {
                eprintln!("Warning: {}", failure);
            }
            print_projects(config, &sync, format, quiet)?;
        }
        ProjectAction::Create {
            title,
            description,
            image,
        } => {
            let mut draft = ProjectDraft::new(title, description);
            if let Some(path) = image {
                draft = draft.with_image(ImageUpload::from_path(&path).await?);
            }
            *sync.draft_mut() = draft;

            sync.create().await.map_err(failure_error)?;
            report_reload(&sync);
            if !quiet {
                println!("Project created.");
            }
            print_projects(config, &sync, format, quiet)?;
        }
        ProjectAction::Update {
            id,
            title,
            description,
            repo_url,
            live_url,
        } => {
            load_for_mutation(&mut sync).await?;
            let (id, _) = resolve_project(&sync, &id)?;
            if !sync.begin_edit(&id) {
                return Err(not_found(&id.to_string()));
            }

            if let Some(values) = sync.edit_values_mut() {
                if let Some(title) = title {
                    values.title = title;
                }
                if let Some(description) = description {
                    values.description = description;
                }
                if let Some(repo_url) = repo_url {
                    values.repo_url = repo_url;
                }
                if let Some(live_url) = live_url {
                    values.live_url = live_url;
                }
            }

            sync.commit_edit().await.map_err(failure_error)?;
            report_reload(&sync);
            if !quiet {
                println!("Project '{}' updated.", id);
            }
        }
        ProjectAction::Delete { id, force } => {
            if !force {
                if !quiet {
                    // Name the project when the backend can be reached
                    let name = match sync.load_all().await {
                        Ok(()) => resolve_project(&sync, &id)
                            .ok()
                            .map(|(_, title)| format!("'{}' ({})", title, id)),
                        Err(_) => None,
                    }
                    .unwrap_or_else(|| format!("'{}'", id));
                    println!("Warning: This will permanently delete project {}.", name);
                    println!("Use --force to confirm deletion.");
                }
                return Ok(());
            }

            load_for_mutation(&mut sync).await?;
            let (id, title) = resolve_project(&sync, &id)?;
            sync.remove(&id).await.map_err(failure_error)?;
            report_reload(&sync);
            if !quiet {
                println!("Project '{}' ({}) deleted.", title, id);
            }
        }
    }
    Ok(())
}

/// Editing needs a real listing; the fallback snapshot has no backend rows
async fn load_for_mutation(sync: &mut RecordSynchronizer<HttpProjectStore>) -> anyhow::Result<()> {
    sync.load_all().await.map_err(failure_error)
}

/// Match a typed id against the listing, keeping the id in the form the
/// backend sent it
fn resolve_project(
    sync: &RecordSynchronizer<HttpProjectStore>,
    typed: &str,
) -> anyhow::Result<(ProjectId, String)> {
    sync.state()
        .resolve(typed)
        .and_then(|p| p.id.clone().map(|id| (id, p.title.clone())))
        .ok_or_else(|| not_found(typed))
}

fn not_found(id: &str) -> anyhow::Error {
    anyhow::anyhow!(
        "Project '{}' not found. Run `folio projects list` to see all projects.",
        id
    )
}

fn failure_error(failure: SyncFailure) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", failure, failure.code())
}

/// A mutation can succeed while the reload after it falls back
fn report_reload(sync: &RecordSynchronizer<HttpProjectStore>) {
    if let Some(message) = sync.error_message() {
        warn!(message, "Reload after change failed");
        eprintln!("Warning: {}", message);
    }
}

fn print_projects(
    config: &Config,
    sync: &RecordSynchronizer<HttpProjectStore>,
    format: OutputFormat,
    quiet: bool,
) -> anyhow::Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sync.snapshot())?);
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    let records = sync.records();
    if records.is_empty() {
        println!("No projects yet.");
        println!("\nCreate one with: folio projects create <title>");
        return Ok(());
    }

    if sync.state().is_fallback() {
        println!("Projects (local copy):");
    } else {
        println!("Projects:");
    }
    for (index, p) in records.iter().enumerate() {
        println!("  {} - {}", p.display_key(index), p.title);
        if let Some(desc) = p.description.as_deref().filter(|d| !d.is_empty()) {
            println!("      {}", desc);
        }
        if let Some(src) = p.image_src.as_deref() {
            println!("      image: {}", resolve_asset_url(src, &config.assets.root_url));
        }
        if let Some(repo) = p.repo_url.as_deref().filter(|r| !r.is_empty()) {
            println!("      repo:  {}", repo);
        }
        if let Some(live) = p.live_url.as_deref().filter(|l| !l.is_empty()) {
            println!("      live:  {}", live);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load_from(&Config::config_path()?)?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(base_url: Option<&str>, quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Folio Health Check");
        println!("==================");
        println!();
    }

    let config = match load_config(base_url) {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
                println!("     Backend: {}", config.backend.base_url);
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {}", e);
            }
            return Err(anyhow::anyhow!("Health check failed"));
        }
    };

    let store = HttpProjectStore::from_config(&config.backend)?;
    match store.list().await {
        Ok(records) => {
            if !quiet {
                println!("[OK] Listing endpoint: {} project(s)", records.len());
            }
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Listing endpoint: {} ({})", e, e.code());
                if e.is_transport() {
                    println!("     Is the backend running at {}?", store.base_url());
                }
                if let Some(hint) = e.suggestion() {
                    println!("     Try: {}", hint);
                }
            }
            return Err(anyhow::anyhow!("Health check failed"));
        }
    }

    if !quiet {
        println!();
        println!("All checks passed.");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_image() {
        let cli = Cli::try_parse_from([
            "folio", "projects", "create", "Site", "-d", "A site", "--image", "shot.png",
        ])
        .unwrap();
        match cli.command {
            Commands::Projects {
                action:
                    ProjectAction::Create {
                        title,
                        description,
                        image,
                    },
            } => {
                assert_eq!(title, "Site");
                assert_eq!(description, "A site");
                assert_eq!(image, Some(PathBuf::from("shot.png")));
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn test_parse_update_optional_fields() {
        let cli = Cli::try_parse_from([
            "folio", "projects", "update", "3", "--live-url", "https://x.dev",
        ])
        .unwrap();
        match cli.command {
            Commands::Projects {
                action:
                    ProjectAction::Update {
                        id,
                        title,
                        live_url,
                        ..
                    },
            } => {
                assert_eq!(id, "3");
                assert_eq!(title, None);
                assert_eq!(live_url.as_deref(), Some("https://x.dev"));
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from([
            "folio",
            "projects",
            "list",
            "--format",
            "json",
            "--base-url",
            "http://127.0.0.1:8000",
        ])
        .unwrap();
        assert!(cli.format == OutputFormat::Json);
        assert_eq!(cli.base_url.as_deref(), Some("http://127.0.0.1:8000"));
    }

    #[test]
    fn test_failure_error_includes_code() {
        let err = failure_error(SyncFailure::Create);
        assert!(err.to_string().contains("Create failed"));
        assert!(err.to_string().contains("S002"));
    }
}
