use std::fs;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockman::config::ServerConfig;
use stockman::server::{AppState, create_router};
use stockman::store::{SqliteStore, Store};
use stockman::uploads::UploadStorage;

#[derive(Parser)]
#[command(name = "stockman")]
#[command(about = "A product catalog and admin API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database and uploaded images
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Reject products whose sell price is below their buy price
        #[arg(long)]
        require_margin: bool,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the database (and optionally create the first user)
    Init {
        /// Data directory for the database and uploaded images
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,
    },
}

fn run_init(data_dir: String, non_interactive: bool) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("stockman.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    println!("Database initialized at {}", db_path.display());

    if !non_interactive {
        create_first_user_prompt(&store)?;
    }

    Ok(())
}

fn create_first_user_prompt(store: &SqliteStore) -> anyhow::Result<()> {
    let create = inquire::Confirm::new("Would you like to create the first user?")
        .with_default(false)
        .prompt()?;

    if !create {
        return Ok(());
    }

    let name = inquire::Text::new("Name:")
        .with_validator(|input: &str| {
            if input.trim().is_empty() {
                Err("Name cannot be empty".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let email = inquire::Text::new("Email:")
        .with_validator(|input: &str| {
            if !input.contains('@') {
                Err("Enter a valid email address".into())
            } else {
                Ok(inquire::validator::Validation::Valid)
            }
        })
        .prompt()?;

    let password = inquire::Password::new("Password:").prompt()?;

    let password_hash = stockman::auth::PasswordHasher::new().hash(&password)?;
    let user = stockman::types::User {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email: email.trim().to_lowercase(),
        password_hash,
        avatar: String::new(),
        role_id: 1,
        status: 1,
        created_at: chrono::Utc::now(),
    };
    store.create_user(&user)?;

    println!();
    println!("Created user '{}' ({})", user.name, user.email);
    println!();

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("stockman=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                non_interactive,
            } => {
                run_init(data_dir, non_interactive)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            require_margin,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                require_margin,
            };

            fs::create_dir_all(&config.data_dir)?;

            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            let state = Arc::new(AppState {
                store: Arc::new(store),
                uploads: UploadStorage::new(&config.data_dir),
                require_margin: config.require_margin,
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
