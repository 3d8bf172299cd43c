// contactbook — command-line address book
//
// Runs one command and exits, or starts an interactive shell when no
// command is given.

mod commands;
mod config;
mod shell;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use commands::BookCommand;
use contactbook_core::AddressBook;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "contactbook")]
#[command(about = "Contacts, phone numbers and birthdays from the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Address book file (overrides the configured path)
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Book(BookCommand),
    /// Configure settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Start the interactive shell (default)
    Shell,
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
    Get { key: String },
    List,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        None | Some(Commands::Shell) => cmd_shell(cli.file),
        Some(Commands::Book(command)) => cmd_book(command, cli.file),
        Some(Commands::Config { action }) => cmd_config(action),
    }
}

fn resolve_book_path(config: &config::Config, file: Option<PathBuf>) -> Result<PathBuf> {
    let path = match file {
        Some(path) => path,
        None => config.book_path()?,
    };
    tracing::debug!(path = %path.display(), "Using address book");
    Ok(path)
}

fn cmd_shell(file: Option<PathBuf>) -> Result<()> {
    let config = config::Config::load()?;
    let path = resolve_book_path(&config, file)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = shell::Shell::new(
        AddressBook::new(),
        path.clone(),
        config.page_size,
        config.autosave,
        stdin.lock(),
        stdout.lock(),
    );
    shell.load(path)?;
    shell.run()
}

fn cmd_book(command: BookCommand, file: Option<PathBuf>) -> Result<()> {
    let config = config::Config::load()?;
    let path = resolve_book_path(&config, file)?;

    let mut book = AddressBook::new();
    book.load(&path)
        .with_context(|| format!("Failed to load address book {}", path.display()))?;

    let command = match command {
        BookCommand::Clear { yes: false } => BookCommand::Clear {
            yes: confirm("Are you sure you want to delete all contacts? (y/n) ")?,
        },
        other => other,
    };

    let reply = commands::execute(&mut book, &command)?;
    println!("{}", reply.message);

    if reply.changed && config.autosave {
        save_book(&book, &path)?;
    } else if reply.changed {
        tracing::warn!("autosave is off, changes were not written");
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{}", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn save_book(book: &AddressBook, path: &Path) -> Result<()> {
    book.save(path)
        .with_context(|| format!("Failed to save address book {}", path.display()))?;
    Ok(())
}

fn cmd_config(action: ConfigAction) -> Result<()> {
    let mut config = config::Config::load()?;

    match action {
        ConfigAction::Set { key, value } => {
            config.set(&key, &value)?;
            config.save()?;
            println!("{} Set {} = {}", "✓".green(), key.bright_cyan(), value);
        }

        ConfigAction::Get { key } => {
            if let Some(value) = config.get(&key) {
                println!("{} = {}", key.bright_cyan(), value);
            } else if key == "book_path" {
                println!("{} = {}", key.bright_cyan(), config.book_path()?.display());
            } else {
                anyhow::bail!("Unknown config key: {}", key);
            }
        }

        ConfigAction::List => {
            println!("{}", "Configuration".bold());
            println!();

            for (key, value) in config.list() {
                println!("  {:<12} {}", key.bright_cyan(), value);
            }

            println!();
            println!(
                "Config file: {}",
                config::Config::config_file()?.display().to_string().dimmed()
            );
        }
    }

    Ok(())
}
