//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};

use crate::cli::commands::{
    classes::ClassCommands, completions::CompletionsArgs, config::ConfigCommands,
    enrollments::EnrollmentCommands, go::GoArgs, rooms::RoomCommands,
    students::StudentCommands, subjects::SubjectCommands,
};

#[derive(Parser)]
#[command(name = "academia")]
#[command(author, version, about = "Academic management from the terminal")]
#[command(long_about = "Manage students, subjects, rooms, classes and enrollments stored in an academic management REST backend.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output (debug logs on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Backend base url (overrides config and ACADEMIA_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the managed areas
    Home,

    /// Open a page by path (e.g. /alunos, /turmas/novo, /salas/editar/3)
    Go(GoArgs),

    /// Student management
    #[command(subcommand, name = "alunos", visible_alias = "students")]
    Students(StudentCommands),

    /// Subject management
    #[command(subcommand, name = "disciplinas", visible_alias = "subjects")]
    Subjects(SubjectCommands),

    /// Room management
    #[command(subcommand, name = "salas", visible_alias = "rooms")]
    Rooms(RoomCommands),

    /// Class management
    #[command(subcommand, name = "turmas", visible_alias = "classes")]
    Classes(ClassCommands),

    /// Class-student enrollment management
    #[command(subcommand, name = "turma-alunos", visible_alias = "enrollments")]
    Enrollments(EnrollmentCommands),

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (pretty for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}
