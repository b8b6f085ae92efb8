//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// prepify - Interview practice with AI-generated questions and feedback
#[derive(Parser, Debug)]
#[command(name = "prepify")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a practice interview session
    Run(RunArgs),

    /// List past interview sessions
    List {
        /// Maximum number of sessions to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Only show sessions created by this identity
        #[arg(short, long)]
        creator: Option<String>,
    },

    /// View (and lazily create) the report for a session
    Report {
        /// Interview ID or partial ID
        id: String,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Job position to practice for
    #[arg(short, long)]
    pub position: String,

    /// Years of experience (e.g. "3")
    #[arg(short, long)]
    pub experience: String,

    /// Job description text
    #[arg(short, long, conflicts_with = "description_file")]
    pub description: Option<String>,

    /// Read the job description from a file
    #[arg(long)]
    pub description_file: Option<PathBuf>,

    /// Resume PDF to extract and include in question generation
    #[arg(long)]
    pub resume: Option<PathBuf>,

    /// Number of questions to generate (1-10)
    #[arg(short, long)]
    pub questions: Option<usize>,

    /// Skip the prep confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
