//! workspace-vcs - version control for a specification workspace
//!
//! # Usage
//! ```bash
//! workspace-vcs -w ./my-spec status                 # Show unsaved changes
//! workspace-vcs -w ./my-spec save "Draft enablers"  # Commit and push
//! workspace-vcs -w ./my-spec history                # Browse saved versions
//! workspace-vcs -w ./my-spec team on                # Switch to branch workflow
//! workspace-vcs -w ./my-spec watch                  # Poll status until Ctrl+C
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use workspace_vcs::config::{self, Config, HistoryFallback};
use workspace_vcs::orchestrator::poller::DEFAULT_POLL_INTERVAL;
use workspace_vcs::store::FileStore;
use workspace_vcs::view::{self, PanelView};
use workspace_vcs::{GitControlClient, Orchestrator, Poller};

/// Save, browse and share versions of a specification workspace
#[derive(Parser)]
#[command(name = "workspace-vcs")]
#[command(about = "Version control for specification workspaces", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace directory
    #[arg(short, long, env = "WORKSPACE_VCS_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// Base URL of the git-control service
    #[arg(long, env = "WORKSPACE_VCS_URL", default_value = config::DEFAULT_SERVICE_URL)]
    url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "WORKSPACE_VCS_TIMEOUT", default_value = "30")]
    timeout: u64,

    /// Trunk branch that reviews merge into
    #[arg(long, env = "WORKSPACE_VCS_MAIN_BRANCH", default_value = config::DEFAULT_MAIN_BRANCH)]
    main_branch: String,

    /// Preferences and credentials file
    #[arg(long, env = "WORKSPACE_VCS_STORE")]
    store: Option<PathBuf>,

    /// Show placeholder history when the log cannot be fetched
    #[arg(long)]
    placeholder_history: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show branch and unsaved changes
    Status,
    /// Save a version (commit, then push if a remote is configured)
    Save { message: String },
    /// List saved versions
    History {
        /// Only versions touching this file
        #[arg(long)]
        file: Option<String>,
    },
    /// Show one saved version
    Show { hash: String },
    /// Restore the workspace to a saved version
    Revert {
        hash: String,
        /// Confirm the revert
        #[arg(long)]
        yes: bool,
    },
    /// Create and switch to a branch
    Branch { name: String },
    /// Switch to an existing branch
    Switch { name: String },
    /// List branches
    Branches,
    /// Pull then push
    Sync,
    /// Open a review request into the main branch
    Review {
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Turn team mode on or off
    Team { mode: Toggle },
    /// Initialize a repository in the workspace
    Init {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Set the commit identity
    Identity { name: String, email: String },
    /// Connect an existing remote repository as origin
    Remote { url: String },
    /// Create a hosted repository and connect it
    CreateRepo {
        name: String,
        #[arg(long)]
        public: bool,
    },
    /// Print the pending diff
    Diff {
        #[arg(long)]
        file: Option<String>,
    },
    /// Poll status until Ctrl+C
    Watch {
        /// Poll interval in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Toggle {
    On,
    Off,
}

fn print_panel(view: &PanelView) {
    if !view.visible {
        println!("✗ No git repository in this workspace");
        println!("  Run 'workspace-vcs init' to create one.");
        return;
    }

    let tentative = if view.branch_unconfirmed { " (switching)" } else { "" };
    println!("  Branch:  {}{}", view.branch, tentative);
    println!("  Mode:    {}", if view.team_mode { "team" } else { "solo" });
    if view.ahead > 0 || view.behind > 0 {
        println!("  Remote:  {} ahead, {} behind", view.ahead, view.behind);
    }
    println!("  {}", view.summary);
    for change in &view.changes {
        println!("    {} {}", change.kind.marker(), change.path);
    }
    if let Some(more) = &view.more {
        println!("    {}", more);
    }
}

/// Print the outcome of an action and exit non-zero on failure.
fn report(orchestrator: &Orchestrator, ok: bool, success: &str) {
    if ok {
        println!("✓ {}", success);
        return;
    }
    let error = orchestrator
        .state()
        .error
        .unwrap_or_else(|| "Operation failed".to_string());
    eprintln!("✗ {}", error);
    std::process::exit(1);
}

/// Line for an action that yields a URL on success. `Err` lines go to
/// stderr and fail the command.
fn url_outcome(what: &str, url: Option<&str>, error: Option<&str>) -> Result<String, String> {
    match (url, error) {
        (Some(url), _) => Ok(format!("✓ {}: {}", what, url)),
        (None, Some(error)) => Err(format!("✗ {}", error)),
        (None, None) => Ok(format!("✓ {}, but the service returned no URL", what)),
    }
}

fn print_url_outcome(orchestrator: &Orchestrator, what: &str, url: Option<String>) {
    match url_outcome(what, url.as_deref(), orchestrator.state().error.as_deref()) {
        Ok(line) => println!("{}", line),
        Err(line) => {
            eprintln!("{}", line);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config {
        service_url: cli.url.clone(),
        request_timeout: Duration::from_secs(cli.timeout),
        main_branch: cli.main_branch.clone(),
        history_fallback: if cli.placeholder_history {
            HistoryFallback::Placeholder
        } else {
            HistoryFallback::Disabled
        },
        store_path: cli.store.clone().unwrap_or_else(config::default_store_path),
    };

    let store = FileStore::open(&config.store_path)?;
    let client = GitControlClient::new(&config.service_url, config.request_timeout)?;
    let orchestrator = Orchestrator::new(Arc::new(client), Arc::new(store), config);

    let workspace = std::fs::canonicalize(&cli.workspace).unwrap_or_else(|_| cli.workspace.clone());
    orchestrator.set_workspace(Some(&workspace)).await;

    match cli.command {
        Commands::Status => {
            println!("  Workspace: {}", workspace.display());
            print_panel(&view::panel(&orchestrator.state()));
        }
        Commands::Save { message } => {
            let ok = orchestrator.save_version(&message).await;
            report(&orchestrator, ok, "Version saved");
        }
        Commands::History { file } => {
            orchestrator.view_history(file.as_deref()).await;
            let history = view::history(&orchestrator.state());
            if let Some(error) = orchestrator.state().error {
                eprintln!("✗ {}", error);
                std::process::exit(1);
            }
            if history.showing_placeholder {
                println!("  (history unavailable, showing placeholder entries)");
            }
            if let Some(message) = &history.empty_message {
                println!("  {}", message);
            }
            for entry in &history.entries {
                println!(
                    "  {}  {:<14} {}  ({})",
                    entry.short_hash, entry.when, entry.message, entry.author
                );
            }
        }
        Commands::Show { hash } => match orchestrator.view_commit(&hash).await {
            Some(commit) => {
                let detail = view::history::commit_detail(&commit);
                println!("  {} {}", detail.hash, detail.when);
                println!("  Author: {}", detail.author);
                println!("  Date:   {}", detail.date);
                println!();
                println!("  {}", detail.message);
                if !detail.body.is_empty() {
                    println!();
                    println!("  {}", detail.body);
                }
                for file in &detail.changed_files {
                    println!("    {} {}", file.status, file.file);
                }
            }
            None => {
                eprintln!("✗ Version {} not found", hash);
                std::process::exit(1);
            }
        },
        Commands::Revert { hash, yes } => {
            if !yes {
                eprintln!("✗ Reverting discards the current workspace contents.");
                eprintln!("  Re-run with --yes to confirm.");
                std::process::exit(1);
            }
            let ok = orchestrator.revert_to_commit(&hash).await;
            report(&orchestrator, ok, &format!("Workspace reverted to {}", hash));
        }
        Commands::Branch { name } => {
            let ok = orchestrator.create_branch(&name).await;
            report(&orchestrator, ok, &format!("Created and switched to {}", name));
        }
        Commands::Switch { name } => {
            let ok = orchestrator.switch_branch(&name).await;
            report(&orchestrator, ok, &format!("Switched to {}", name));
        }
        Commands::Branches => {
            let current = orchestrator.state().current_branch.name().to_string();
            for branch in orchestrator.list_branches().await {
                let marker = if branch.name == current { "*" } else { " " };
                println!("  {} {:<30} {}", marker, branch.name, branch.last_commit);
            }
        }
        Commands::Sync => {
            let ok = orchestrator.sync_changes().await;
            report(&orchestrator, ok, "Synced with remote");
        }
        Commands::Review { title, description } => {
            let state = orchestrator.state();
            if !state.can_submit_for_review() {
                eprintln!("✗ Reviews need team mode and a branch other than {}", state.main_branch);
                std::process::exit(1);
            }
            let url = orchestrator.submit_for_review(&title, &description).await;
            print_url_outcome(&orchestrator, "Review opened", url);
        }
        Commands::Team { mode } => match mode {
            Toggle::On => {
                orchestrator.enable_team_mode().await;
                println!("✓ Team mode enabled");
            }
            Toggle::Off => {
                orchestrator.disable_team_mode().await;
                println!("✓ Team mode disabled");
            }
        },
        Commands::Init { name, email } => {
            let ok = orchestrator
                .initialize_repository(name.as_deref(), email.as_deref())
                .await;
            report(&orchestrator, ok, "Repository initialized");
        }
        Commands::Identity { name, email } => {
            let ok = orchestrator.configure_identity(&name, &email).await;
            report(&orchestrator, ok, "Identity saved");
        }
        Commands::Remote { url } => {
            let ok = orchestrator.connect_remote(&url).await;
            report(&orchestrator, ok, &format!("Connected to {}", url));
        }
        Commands::CreateRepo { name, public } => {
            let url = orchestrator.create_remote_repository(&name, !public).await;
            print_url_outcome(&orchestrator, "Repository created", url);
        }
        Commands::Diff { file } => match orchestrator.pending_diff(file.as_deref()).await {
            Some(diff) if diff.is_empty() => println!("  No pending changes"),
            Some(diff) => println!("{}", diff),
            None => {
                eprintln!("✗ Could not load the pending diff");
                std::process::exit(1);
            }
        },
        Commands::Watch { interval } => {
            let interval = interval.map(Duration::from_secs).unwrap_or(DEFAULT_POLL_INTERVAL);
            println!("  Watching {} every {:?}. Press Ctrl+C to stop.", workspace.display(), interval);

            let poller = Poller::spawn(orchestrator.clone(), interval);
            let interval = poller.interval();
            let printer = {
                let orchestrator = orchestrator.clone();
                tokio::spawn(async move {
                    let mut last = None;
                    loop {
                        tokio::time::sleep(interval).await;
                        let panel = view::panel(&orchestrator.state());
                        if last.as_ref() != Some(&panel) {
                            println!();
                            print_panel(&panel);
                            last = Some(panel);
                        }
                    }
                })
            };

            tokio::signal::ctrl_c().await?;
            println!("\n  Stopping...");
            printer.abort();
            poller.stop();
        }
    }

    Ok(())
}
