use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use cricketchat::app::{commands, run_repl_mode};
use cricketchat::{render, setup_from_cli, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cricketchat_logging::init_logging(cli.verbose);

    let ctx = setup_from_cli(&cli)?;

    match cli.command() {
        Commands::Chat => run_repl_mode(&ctx).await?,
        Commands::Ask { question } => {
            let reply = commands::ask(&ctx, &question.join(" ")).await?;
            render::print_message(&reply);
        }
        Commands::History { limit } => {
            let entries = commands::history(&ctx, limit).await?;
            render::print_history(&entries);
        }
        Commands::ClearMemory => {
            let identity = commands::clear_memory(&ctx).await?;
            println!("{} Cleared conversation memory for {}", "🧹".bright_green(), identity);
        }
        Commands::Login { email, password } => {
            let email = commands::prompt_if_missing(email, "Email")?;
            let password = commands::prompt_if_missing(password, "Password")?;
            let auth = commands::login(&ctx, &email, &password).await?;
            println!("{} Logged in as {}", "✓".green(), auth.display_name());
        }
        Commands::Signup { email, password, name } => {
            let email = commands::prompt_if_missing(email, "Email")?;
            let password = commands::prompt_if_missing(password, "Password")?;
            let auth = commands::signup(&ctx, &email, &password, name).await?;
            println!("{} Welcome, {}", "✓".green(), auth.display_name());
        }
        Commands::Logout => {
            commands::logout(&ctx)?;
            println!("Logged out.");
        }
        Commands::Whoami => println!("{}", commands::whoami(&ctx)),
    }

    Ok(())
}
