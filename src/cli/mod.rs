pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tasktrack")]
#[command(about = "Tasktrack CLI - administrative tooling for the Tasktrack API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create a staff account with full administrative access")]
    CreateAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        username: String,

        #[arg(long, env = "TASKTRACK_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },

    #[command(about = "Apply pending database migrations")]
    Migrate,
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::CreateAdmin {
            email,
            username,
            password,
        } => commands::admin::create_admin(&email, &username, &password).await,
        Commands::Migrate => commands::migrate::run().await,
    }
}
