//! Prepdash CLI - Command-line admin client for the exam preparation platform
//!
//! Thin presentation layer over prepdash-app: signs in, keeps the session
//! on disk between invocations, and applies user updates.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::debug;

use prepdash_api::{ApiClientConfig, RestClient};
use prepdash_app::{AdminService, Session, SessionManager, UserUpdateRequest};
use prepdash_core::{init_logging, PrepdashConfig};

#[derive(Parser)]
#[command(name = "prepdash")]
#[command(about = "Admin client for the exam preparation platform")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store a session
    Login {
        /// Account email
        email: String,

        /// Account password
        password: String,
    },

    /// Show the stored session
    Whoami,

    /// Sign out and discard the stored session
    Logout,

    /// User administration
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Initialize default configuration
        #[arg(long)]
        init: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Fetch the authoritative user record
    Show {
        /// User identifier
        user_id: String,
    },

    /// Apply a partial update to a user
    ///
    /// Only the fields given are touched; each one maps to its own
    /// backend call and there is no rollback on partial failure.
    Update {
        /// User identifier
        user_id: String,

        /// New role (user, sub-admin, admin)
        #[arg(long)]
        role: Option<String>,

        /// New subscription tier (starter, professional)
        #[arg(long)]
        tier: Option<String>,

        /// Sub-admin permission grant (repeatable); only applied when
        /// the resolved role is sub-admin
        #[arg(long = "permission")]
        permissions: Vec<String>,

        /// Activate or deactivate the account
        #[arg(long)]
        active: Option<bool>,

        /// Set a temporary password
        #[arg(long)]
        temp_password: Option<String>,
    },

    /// Unlock exams the user does not already have
    UnlockExams {
        /// User identifier
        user_id: String,

        /// Exam identifier to unlock (repeatable)
        #[arg(long = "exam", required = true)]
        exams: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    init_logging(&logging)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    config.validate()?;
    let api = Arc::new(RestClient::new(ApiClientConfig::from_settings(&config.api))?);

    match cli.command {
        Commands::Login { email, password } => {
            let manager = SessionManager::new(api);
            let session = manager.authenticate(&email, &password).await?;

            println!("Signed in as {} ({})", session.user_id, session.role);
            save_session(&session)?;
        }

        Commands::Whoami => {
            let session = load_session()?;
            println!("user:  {}", session.user_id);
            println!("role:  {}", session.role);
            if let Some(email) = &session.email {
                println!("email: {}", email);
            }
            let state = if session.is_errored() {
                "errored (refresh failed; sign in again)"
            } else if session.is_stale(prepdash_app::ACCESS_TOKEN_REFRESH_MARGIN_MS) {
                "stale (will refresh on next use)"
            } else {
                "fresh"
            };
            println!("token: {}", state);
        }

        Commands::Logout => {
            if let Ok(session) = load_session() {
                SessionManager::new(api).sign_out(session);
            }
            clear_session()?;
            println!("Signed out");
        }

        Commands::User { command } => {
            let service = AdminService::new(api);
            let mut session = load_session()?;

            let result = run_user_command(&service, &mut session, command).await;

            // The session may have refreshed its tokens along the way;
            // persist it even when the command itself failed
            save_session(&session)?;
            result?;
        }

        Commands::Config { show, init } => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(default_config_path);

            if init {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                PrepdashConfig::default().save_to_file(&path)?;
                println!("Wrote default configuration to {}", path.display());
            }

            if show || !init {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

async fn run_user_command(
    service: &AdminService,
    session: &mut Session,
    command: UserCommands,
) -> anyhow::Result<()> {
    match command {
        UserCommands::Show { user_id } => {
            let detail = service.fetch_user(session, &user_id).await?;

            println!("id:     {}", detail.id);
            println!("name:   {}", detail.name.as_deref().unwrap_or("-"));
            println!("email:  {}", detail.email.as_deref().unwrap_or("-"));
            println!("role:   {}", detail.role.as_deref().unwrap_or("-"));
            println!("tier:   {}", detail.subscription_tier.as_deref().unwrap_or("-"));
            println!("status: {}", detail.status.as_deref().unwrap_or("-"));
            if !detail.sub_admin_permissions.is_empty() {
                println!("permissions: {}", detail.sub_admin_permissions.join(", "));
            }
            let unlocked = detail.unlocked_exam_ids();
            if !unlocked.is_empty() {
                println!("unlocked exams: {}", unlocked.join(", "));
            }
        }

        UserCommands::Update {
            user_id,
            role,
            tier,
            permissions,
            active,
            temp_password,
        } => {
            let request = UserUpdateRequest {
                role,
                subscription_tier: tier,
                permissions,
                is_active: active,
                temp_password,
            };

            if request.is_empty() {
                println!("Nothing to update");
                return Ok(());
            }

            if let Err(e) = service.update_user(session, &user_id, &request).await {
                eprintln!("Update failed: {}", e);
                eprintln!(
                    "Some fields may have been applied; run 'prepdash user show {}' to reconcile",
                    user_id
                );
                return Err(e.into());
            }

            println!("User {} updated", user_id);
        }

        UserCommands::UnlockExams { user_id, exams } => {
            // The current record is the baseline: only exams not already
            // unlocked get an entitlement call
            let detail = service.fetch_user(session, &user_id).await?;
            let previously = detail.unlocked_exam_ids();

            let granted = service
                .sync_exam_entitlements(session, &user_id, &previously, &exams)
                .await?;

            if granted.is_empty() {
                println!("All requested exams were already unlocked");
            } else {
                println!("Unlocked: {}", granted.join(", "));
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> anyhow::Result<PrepdashConfig> {
    match path {
        Some(path) => PrepdashConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let path = default_config_path();
            if path.exists() {
                debug!("Loading configuration from {}", path.display());
                Ok(PrepdashConfig::from_file(&path)?)
            } else {
                Ok(PrepdashConfig::default())
            }
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prepdash")
        .join("config.toml")
}

fn session_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prepdash")
        .join("session.json")
}

fn load_session() -> anyhow::Result<Session> {
    let content = std::fs::read_to_string(session_path())
        .context("Not signed in; run 'prepdash login' first")?;
    serde_json::from_str(&content)
        .context("Stored session is unreadable; run 'prepdash login' again")
}

fn save_session(session: &Session) -> anyhow::Result<()> {
    let path = session_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

fn clear_session() -> anyhow::Result<()> {
    let path = session_path();
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}
