//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "crab",
    bin_name = "crab",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f980} Python project scaffolding",
    long_about = "Crab creates Python projects from templates, and can set up \
                  a uv environment, a git repository and the declared \
                  dependencies in one go.",
    after_help = "EXAMPLES:\n\
        \x20 crab init my-project\n\
        \x20 crab init my-project --venv --setup-git --install\n\
        \x20 crab list\n\
        \x20 crab completions bash > ~/.local/share/bash-completion/completions/crab",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize a new Python project.
    #[command(
        about = "Initialize a new Python project",
        after_help = "EXAMPLES:\n\
            \x20 crab init my-project --author \"Ada Lovelace\"\n\
            \x20 crab init my-project --template basic --venv\n\
            \x20 crab init my-project --venv --install --no-setup-git"
    )]
    Init(InitArgs),

    /// List available template sets.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 crab list\n\
            \x20 crab list --format json"
    )]
    List(ListArgs),

    /// Inspect the effective configuration.
    #[command(
        about = "Configuration inspection",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 crab config show\n\
            \x20 crab config get venv_directory\n\
            \x20 crab config get paths.source\n\
            \x20 crab config path"
    )]
    Config(ConfigCommands),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 crab completions bash > ~/.local/share/bash-completion/completions/crab\n\
            \x20 crab completions zsh  > ~/.zfunc/_crab\n\
            \x20 crab completions fish > ~/.config/fish/completions/crab.fish"
    )]
    Completions(CompletionsArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `crab init`.
#[derive(Debug, Clone, Args)]
pub struct InitArgs {
    /// Name of the project directory to create in the current directory.
    #[arg(value_name = "NAME", help = "Name of the project")]
    pub name: String,

    /// Template set to render.  Defaults to the configured template.
    #[arg(
        short = 't',
        long = "template",
        value_name = "TEMPLATE",
        help = "Template to use"
    )]
    pub template: Option<String>,

    /// Create a package environment with uv.
    #[arg(long = "venv", help = "Create a virtual environment with uv")]
    pub venv: bool,

    #[arg(
        long = "setup-git",
        overrides_with = "no_setup_git",
        help = "Initialize a git repository"
    )]
    pub setup_git: bool,

    #[arg(
        long = "no-setup-git",
        overrides_with = "setup_git",
        help = "Do not initialize a git repository (default)"
    )]
    pub no_setup_git: bool,

    #[arg(
        long = "install",
        overrides_with = "no_install",
        help = "Install the project and its dependency groups"
    )]
    pub install: bool,

    #[arg(
        long = "no-install",
        overrides_with = "install",
        help = "Do not install dependencies (default)"
    )]
    pub no_install: bool,

    /// Author written into the generated files.
    #[arg(short = 'a', long = "author", value_name = "NAME", help = "Project author")]
    pub author: Option<String>,

    /// Never prompt; use defaults for anything not given.
    #[arg(short = 'y', long = "yes", help = "Do not prompt for missing values")]
    pub yes: bool,
}

impl InitArgs {
    /// `--setup-git` was given and not overridden.
    pub fn git(&self) -> bool {
        self.setup_git && !self.no_setup_git
    }

    /// `--install` was given and not overridden.
    pub fn install_dependencies(&self) -> bool {
        self.install && !self.no_install
    }
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `crab list`.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `crab completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `crab config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective project configuration as TOML.
    Show,
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `paths.source` or `test.coverage.threshold`.
        key: String,
    },
    /// Print the path to the user settings file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
