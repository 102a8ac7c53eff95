//! Clap derive structures for the `strapsync` CLI.
//!
//! Defines the command tree, global flags and shared value enums. Also
//! compiled by `build.rs` for man pages, so it depends on clap only.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// strapsync -- copy content and media between Strapi instances
#[derive(Debug, Parser)]
#[command(
    name = "strapsync",
    version,
    about = "Copy content and media between Strapi instances",
    long_about = "Transfer a whole instance, a single document or a single component\n\
        from one Strapi instance to another. Referenced media files are copied\n\
        into the matching folders of the destination media library.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "STRAPSYNC_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STRAPSYNC_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STRAPSYNC_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides config)
    #[arg(long, env = "STRAPSYNC_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage saved instances
    #[command(alias = "i")]
    Instances(InstancesArgs),

    /// Transfer data between two saved instances
    #[command(alias = "t")]
    Transfer(TransferArgs),

    /// Interactive menu (manage instances / transfer data)
    Menu,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Instances ────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct InstancesArgs {
    #[command(subcommand)]
    pub command: InstancesCommand,
}

#[derive(Debug, Subcommand)]
pub enum InstancesCommand {
    /// List saved instances
    #[command(alias = "ls")]
    List,

    /// Save a new instance (prompts for anything not given)
    Add(AddInstanceArgs),

    /// Remove a saved instance
    #[command(alias = "rm")]
    Remove {
        /// Instance name
        name: String,
    },

    /// Show one saved instance
    Show {
        /// Instance name
        name: String,
    },
}

#[derive(Debug, Default, Args)]
pub struct AddInstanceArgs {
    /// Unique instance name
    pub name: Option<String>,

    /// Base URL (e.g. https://cms.example.com)
    #[arg(long)]
    pub url: Option<String>,

    /// Admin account email
    #[arg(long)]
    pub email: Option<String>,

    /// Admin account password (prompted when omitted)
    #[arg(long)]
    pub password: Option<String>,

    /// Store the password in the system keyring instead of the config file
    #[arg(long)]
    pub keyring: bool,

    /// Custom CA certificate for this instance
    #[arg(long)]
    pub ca_cert: Option<PathBuf>,
}

// ── Transfer ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TransferArgs {
    #[command(subcommand)]
    pub mode: TransferMode,
}

#[derive(Debug, Subcommand)]
pub enum TransferMode {
    /// Replace all media and content of the destination with the source's
    Full(EndpointArgs),

    /// Copy one document and its assets
    #[command(alias = "doc")]
    Document(EndpointArgs),

    /// Append one component (and its assets) to a destination document
    #[command(alias = "comp")]
    Component(EndpointArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct EndpointArgs {
    /// Source instance name (prompted when omitted)
    #[arg(long)]
    pub from: Option<String>,

    /// Destination instance name (prompted when omitted)
    #[arg(long)]
    pub to: Option<String>,

    /// Fail when an asset reference cannot be mapped
    #[arg(long)]
    pub strict_assets: bool,

    /// Skip folder listings the backend reports as empty
    #[arg(long)]
    pub trust_count_hints: bool,

    /// Directory for temporary asset files
    #[arg(long)]
    pub scratch_dir: Option<PathBuf>,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
