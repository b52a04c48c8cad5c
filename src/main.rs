use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use zeroize::Zeroize;

use maint_tools::config::Config;
use maint_tools::db::{self, Outcome};
use maint_tools::{auth, logger, templates, ui, users, validate};

#[derive(Parser, Debug)]
#[command(
    name = "maint",
    version,
    about = "Maintenance commands for the Voxtree user store and Famflix template store"
)]
struct Cli {
    /// Database file to operate on (overrides MAINT_USERS_DB / MAINT_TEMPLATES_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Do not append to the audit log
    #[arg(long, global = true)]
    no_audit: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every template video with its metadata pretty-printed
    InspectTemplates,
    /// Hash a new password and store it for the user with this email
    ResetPassword {
        #[arg(long)]
        email: String,
        /// Plaintext password; prompted for (hidden) when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Verify a password against the stored hash for a user
    CheckPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Write a transcript into a template's metadata
    UpdateTranscript {
        #[arg(long, default_value_t = templates::DEFAULT_TEMPLATE_ID)]
        id: i64,
        #[arg(long, default_value = templates::DEFAULT_TRANSCRIPT)]
        text: String,
    },
    /// Set a user's role and plan (admin / pro by default)
    Promote {
        #[arg(long)]
        email: String,
        #[arg(long, default_value = users::DEFAULT_ROLE)]
        role: String,
        #[arg(long, default_value = users::DEFAULT_PLAN)]
        plan: String,
    },
}

fn run(cli: Cli, cfg: &Config) -> Result<Outcome> {
    let audit_log = (!cli.no_audit).then_some(cfg.audit_log.as_path());

    match cli.command {
        Commands::InspectTemplates => {
            let path = cli.db.unwrap_or_else(|| cfg.templates_db.clone());
            ui::command_banner("Template inspector", &path);
            let conn = db::open_store_read_only(&path)?;
            let count = templates::inspect_templates(&conn, &mut io::stdout().lock())?;
            tracing::info!(count, "templates listed");
            Ok(Outcome::Done)
        }

        Commands::ResetPassword { email, password } => {
            let path = cli.db.unwrap_or_else(|| cfg.users_db.clone());
            ui::command_banner("Password reset", &path);
            validate::lookup_email(&email)?;
            let mut password = match password {
                Some(p) => auth::require_non_empty(p)?,
                None => auth::prompt_new_password()?,
            };
            let result = db::open_store(&path)
                .and_then(|mut conn| auth::reset_password(&mut conn, &email, &password));
            password.zeroize();
            logger::audit(audit_log, "reset-password", &email, &result);
            result
        }

        Commands::CheckPassword { email, password } => {
            let path = cli.db.unwrap_or_else(|| cfg.users_db.clone());
            ui::command_banner("Password check", &path);
            validate::lookup_email(&email)?;
            let mut password = match password {
                Some(p) => p,
                None => auth::prompt_password()?,
            };
            let result = db::open_store_read_only(&path)
                .and_then(|conn| auth::check_password(&conn, &email, &password));
            password.zeroize();
            result
        }

        Commands::UpdateTranscript { id, text } => {
            let path = cli.db.unwrap_or_else(|| cfg.templates_db.clone());
            ui::command_banner("Transcript updater", &path);
            let result = db::open_store(&path)
                .and_then(|mut conn| templates::update_transcript(&mut conn, id, &text));
            logger::audit(audit_log, "update-transcript", &format!("template {id}"), &result);
            result
        }

        Commands::Promote { email, role, plan } => {
            let path = cli.db.unwrap_or_else(|| cfg.users_db.clone());
            ui::command_banner("Admin promoter", &path);
            validate::lookup_email(&email)?;
            let result = db::open_store(&path)
                .and_then(|mut conn| users::promote_user(&mut conn, &email, &role, &plan));
            logger::audit(audit_log, "promote", &email, &result);
            result
        }
    }
}

fn main() -> ExitCode {
    logger::init_tracing().ok();
    let cli = Cli::parse();
    let cfg = Config::from_env();

    match run(cli, &cfg) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            ui::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
