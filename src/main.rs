#![allow(dead_code)]

use crate::areas::repository::Repository;
use anyhow::Result;
use clap::{Parser, Subcommand};

mod areas;
mod artifacts;
mod commands;
mod error;

/// Author recorded when neither the flag nor the environment names one
const DEFAULT_AUTHOR: &str = "Anonymous";

/// Environment variable the front-end reads for the author name
const AUTHOR_ENV_VAR: &str = "MINIGIT_AUTHOR";

#[derive(Parser)]
#[command(
    name = "minigit",
    version = "0.1.0",
    about = "A miniature content-addressed version control system",
    long_about = "minigit manages snapshots of a working directory under a hidden \
    .minigit directory: staging, commits, branching, checkout, status, and \
    three-way merge with conflict reporting. It is a learning project, not a \
    git replacement.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Add files to the staging area",
        long_about = "This command stores each file as a blob and stages it for the next commit."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "rm",
        about = "Mark files for deletion in the next commit",
        long_about = "This command removes each file from the working tree and stages its deletion."
    )]
    Rm {
        #[arg(index = 1, required = true, help = "The tracked files to delete")]
        paths: Vec<String>,
    },
    #[command(
        name = "commit",
        about = "Record the staged tree as a new commit",
        long_about = "This command creates a new commit from the staged tree and advances the current branch."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "The author name (falls back to MINIGIT_AUTHOR, then 'Anonymous')")]
        author: Option<String>,
    },
    #[command(
        name = "log",
        about = "Show commit history",
        long_about = "This command walks history from HEAD along first parents and prints each commit."
    )]
    Log,
    #[command(
        name = "branch",
        about = "Create a new branch at the current HEAD commit"
    )]
    Branch {
        #[arg(index = 1, help = "The branch name")]
        name: String,
    },
    #[command(name = "ls-branches", about = "List branches, marking the active one")]
    LsBranches,
    #[command(
        name = "checkout",
        about = "Switch to a branch or commit",
        long_about = "This command replaces the working tree with the target snapshot. \
        A branch name moves HEAD symbolically; a commit digest detaches it."
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name or commit digest")]
        target: String,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command shows staged, unstaged, and untracked changes against HEAD and the index."
    )]
    Status,
    #[command(
        name = "merge",
        about = "Merge a branch into the current branch",
        long_about = "This command fast-forwards when possible and otherwise performs a \
        three-way merge, writing conflict markers into the working tree on conflicts."
    )]
    Merge {
        #[arg(index = 1, help = "The branch to merge")]
        branch: String,
    },
}

fn resolve_author(flag: Option<String>) -> String {
    flag.or_else(|| std::env::var(AUTHOR_ENV_VAR).ok())
        .unwrap_or_else(|| DEFAULT_AUTHOR.to_string())
}

fn repository_at_cwd() -> Result<Repository> {
    let pwd = std::env::current_dir()?;
    Repository::new(pwd, Box::new(std::io::stdout()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path } => {
            let mut repository = match path {
                Some(path) => Repository::new(path.into(), Box::new(std::io::stdout()))?,
                None => repository_at_cwd()?,
            };

            repository.init()?
        }
        Commands::Add { paths } => repository_at_cwd()?.add(&paths)?,
        Commands::Rm { paths } => repository_at_cwd()?.rm(&paths)?,
        Commands::Commit { message, author } => {
            repository_at_cwd()?.commit(&message, &resolve_author(author))?
        }
        Commands::Log => repository_at_cwd()?.log()?,
        Commands::Branch { name } => repository_at_cwd()?.branch(&name)?,
        Commands::LsBranches => repository_at_cwd()?.ls_branches()?,
        Commands::Checkout { target } => repository_at_cwd()?.checkout(&target)?,
        Commands::Status => repository_at_cwd()?.status()?,
        Commands::Merge { branch } => {
            repository_at_cwd()?.merge(&branch, &resolve_author(None))?
        }
    }

    Ok(())
}
