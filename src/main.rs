//! stemfolio - school STEM program site
//!
//! Serves the showcase, dashboards and JSON API, or manages accounts from the shell.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stemfolio::models::{NewUser, Role};
use stemfolio::store::users;
use stemfolio::{create_app, db, AppState};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stemfolio")]
#[command(version, about, long_about = None)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "STEMFOLIO_DB", default_value = "stemfolio.sqlite3")]
    db: PathBuf,

    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive)
    #[arg(long, env = "STEMFOLIO_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the web server
    Serve {
        /// Address to listen on
        #[arg(long, env = "STEMFOLIO_BIND", default_value = "0.0.0.0:5000")]
        bind: SocketAddr,
    },

    /// Account management
    #[command(subcommand)]
    User(UserCommands),
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Create an account
    Add {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: Option<String>,
        /// student, teacher or admin
        #[arg(long, default_value = "student")]
        role: String,
        #[arg(long)]
        grade_level: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let filter = EnvFilter::try_new(&cli.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let conn = db::open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;

    match cli.command {
        Commands::Serve { bind } => serve(conn, bind).await,
        Commands::User(UserCommands::Add {
            username,
            email,
            password,
            first_name,
            last_name,
            role,
            grade_level,
        }) => {
            let role: Role = role.parse()?;
            let new = NewUser {
                username,
                email,
                password,
                role,
                first_name,
                last_name,
                grade_level,
                parent_email: None,
                tinkercad_username: None,
            };
            let id = users::create_user(&conn, &new)?;
            tracing::info!(user_id = id, username = %new.username, %role, "user created");
            println!("created {role} {} (id {id})", new.username);
            Ok(())
        }
    }
}

async fn serve(conn: rusqlite::Connection, bind: SocketAddr) -> Result<()> {
    let app = create_app(AppState::new(conn));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(%bind, "stemfolio listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
