mod cmd;
mod output;
mod root;
mod session;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "openchat",
    about = "A small social network whose state lives in an append-only action log",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .openchat/)
    #[arg(long, global = true, env = "OPENCHAT_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize openchat in the current directory
    Init,

    /// Register a new user
    Register {
        username: String,
        password: String,
        #[arg(long, default_value = "")]
        about: String,
    },

    /// Check a user's credentials
    Login { username: String, password: String },

    /// List registered users
    Users,

    /// Make one user follow another
    Follow {
        follower_id: String,
        followee_id: String,
    },

    /// List the users someone follows
    Followees { follower_id: String },

    /// Publish a message
    Publish { user_id: String, text: String },

    /// Show a user's own publications, newest first
    Timeline { user_id: String },

    /// Show a user's publications and those of everyone they follow
    Wall { user_id: String },

    /// Like a publication
    Like { post_id: String, user_id: String },

    /// Rebuild state from the action log and summarize it
    Replay,

    /// Inspect the configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let json = cli.json;

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Register {
            username,
            password,
            about,
        } => cmd::user::register(&root, &username, &password, &about, json),
        Commands::Login { username, password } => {
            cmd::user::login(&root, &username, &password, json)
        }
        Commands::Users => cmd::user::list(&root, json),
        Commands::Follow {
            follower_id,
            followee_id,
        } => cmd::follow::follow(&root, &follower_id, &followee_id, json),
        Commands::Followees { follower_id } => cmd::follow::followees(&root, &follower_id, json),
        Commands::Publish { user_id, text } => cmd::post::publish(&root, &user_id, &text, json),
        Commands::Timeline { user_id } => cmd::post::timeline(&root, &user_id, json),
        Commands::Wall { user_id } => cmd::post::wall(&root, &user_id, json),
        Commands::Like { post_id, user_id } => cmd::post::like(&root, &post_id, &user_id, json),
        Commands::Replay => cmd::replay::run(&root, json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
