use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use webengine_sync::config::Workspace;
use webengine_sync::prompt::{is_interactive, TerminalPrompt, UserPrompt};
use webengine_sync::remote::{HttpRemoteClient, RemoteClient, Variant};
use webengine_sync::settings::Settings;
use webengine_sync::state::InstanceStore;
use webengine_sync::sync::{self, SyncOutcome, SyncSession};
use webengine_sync::{logger, settings};

#[derive(Parser)]
#[command(name = "webengine-sync")]
#[command(about = "Sync a local webengine artifact tree with a remote CMS instance", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the workspace and bootstrap the artifact tree from the instance
    Init {
        /// Remote instance identifier
        #[arg(short, long)]
        instance: String,

        /// Developer access token (prompted for interactively when omitted)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Re-sync the whole artifact tree from the instance
    Sync,

    /// Push a file's content to the remote draft copy
    Push {
        /// File under the webengine artifact root
        file: PathBuf,
    },

    /// Pull the remote copy over the local file
    Pull {
        /// File under the webengine artifact root
        file: PathBuf,

        /// Pull the published (live) variant instead of the draft
        #[arg(long)]
        published: bool,
    },

    /// Sync a file's content, then publish it
    Publish {
        /// File under the webengine artifact root
        file: PathBuf,
    },

    /// Register a new local file with the remote instance
    Create {
        /// File under the webengine artifact root
        file: PathBuf,
    },

    /// Delete the remote resource backing a local file (one file per call)
    Delete {
        /// Files whose remote resources should be deleted
        files: Vec<PathBuf>,
    },

    /// Show tracked and untracked files in the artifact tree
    Status,

    /// Configure sync settings
    Config {
        /// Set the developer access token
        #[arg(long)]
        token: Option<String>,

        /// Push files to the instance automatically on save events
        #[arg(long)]
        sync_on_save: Option<bool>,

        /// Delete remote resources automatically on delete events
        #[arg(long)]
        sync_on_delete: Option<bool>,

        /// Override the remote API origin ({instance} is substituted)
        #[arg(long)]
        api_origin: Option<String>,

        /// Show current settings
        #[arg(long)]
        show: bool,
    },
}

fn main() -> Result<()> {
    logger::init_logger()?;
    logger::rotate_log_if_needed().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { instance, token } => init_workspace(&instance, token)?,
        Commands::Sync => {
            with_session(|session| sync::sync_all(session))?;
        }
        Commands::Push { file } => {
            let content = read_local(&file)?;
            let outcome = with_session(|session| sync::push_file(session, &file, &content))?;
            report(outcome);
        }
        Commands::Pull { file, published } => {
            let variant = if published { Variant::Live } else { Variant::Draft };
            let outcome =
                with_session(|session| sync::pull_file(session, &file, variant, false))?;
            report(outcome);
        }
        Commands::Publish { file } => {
            let content = read_local(&file)?;
            let outcome = with_session(|session| sync::publish_file(session, &file, &content))?;
            report(outcome);
        }
        Commands::Create { file } => {
            let content = read_local(&file)?;
            let outcome = with_session(|session| sync::create_file(session, &file, &content))?;
            report(outcome);
        }
        Commands::Delete { files } => {
            let outcome = with_session(|session| sync::delete_files(session, &files))?;
            report(outcome);
        }
        Commands::Status => {
            with_session(|session| {
                sync::show_status(session)?;
                Ok(SyncOutcome::Succeeded)
            })?;
        }
        Commands::Config {
            token,
            sync_on_save,
            sync_on_delete,
            api_origin,
            show,
        } => {
            if show {
                settings::show_settings()?;
            } else {
                settings::update_settings(token, sync_on_save, sync_on_delete, api_origin)?;
            }
        }
    }

    Ok(())
}

fn read_local(file: &Path) -> Result<String> {
    fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file.display()))
}

fn report(outcome: SyncOutcome) {
    match outcome {
        SyncOutcome::Succeeded => {}
        SyncOutcome::Skipped => println!("{}", "Nothing to do.".dimmed()),
        SyncOutcome::Cancelled => println!("{}", "Cancelled.".yellow()),
    }
}

/// Open a session over the discovered workspace and run one operation.
fn with_session<F>(op: F) -> Result<SyncOutcome>
where
    F: FnOnce(&mut SyncSession) -> Result<SyncOutcome>,
{
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let workspace = Workspace::discover(&cwd)?;
    let store = InstanceStore::load(&workspace.instance_file())?;

    let settings = Settings::load()?;
    let token = settings.require_token()?;
    let remote = HttpRemoteClient::new(
        &store.config.instance_id,
        token,
        settings.api_origin.as_deref(),
    )?;
    let prompt = TerminalPrompt;

    let mut session = SyncSession {
        workspace,
        store,
        remote: &remote,
        prompt: &prompt,
    };
    op(&mut session)
}

/// First-time setup: store the token, verify it, scaffold the artifact
/// tree, and bootstrap from the remote.
fn init_workspace(instance_id: &str, token: Option<String>) -> Result<()> {
    let mut settings = Settings::load()?;

    let token = match token.or_else(|| settings.token.clone()) {
        Some(token) if !token.is_empty() => token,
        _ if is_interactive() => inquire::Text::new("Enter your developer token:")
            .prompt()
            .context("Failed to read developer token")?,
        _ => {
            return Err(webengine_sync::error::SyncError::Auth(
                "Developer token is required to proceed.".to_string(),
            )
            .into())
        }
    };

    let remote = HttpRemoteClient::new(instance_id, &token, settings.api_origin.as_deref())?;
    remote.verify_token()?;

    settings.token = Some(token);
    settings.save()?;

    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let workspace = Workspace::at(&cwd);
    let store = InstanceStore::create(&workspace.instance_file(), instance_id)?;
    workspace.ensure_folders()?;
    workspace.ensure_gitignore()?;

    println!(
        "{} workspace for instance {}",
        "Initialized".green().bold(),
        instance_id.cyan()
    );

    let prompt = TerminalPrompt;
    let prompt_ref: &dyn UserPrompt = &prompt;
    let remote_ref: &dyn RemoteClient = &remote;
    let mut session = SyncSession {
        workspace,
        store,
        remote: remote_ref,
        prompt: prompt_ref,
    };
    sync::sync_all(&mut session)?;

    Ok(())
}
