//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// SchemaXtract - Extract user-defined entities from PDF documents with an LLM.
#[derive(Debug, Parser)]
#[command(name = "schemaxtract")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SCHEMAXTRACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Profile to use
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (responses only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract schema fields from a PDF
    Extract(ExtractArgs),

    /// Print the formatting instructions sent to the model
    Instructions(InstructionsArgs),

    /// Preview how a PDF is split into chunks
    Chunks(ChunksArgs),

    /// Manage configuration profiles
    Profile(ProfileArgs),
}

/// Schema field sources shared by commands that need a schema set.
#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Schema field as "Name=Description" (repeatable)
    #[arg(long = "field", value_name = "NAME=DESCRIPTION")]
    pub fields: Vec<String>,

    /// JSON or TOML file with schema fields
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Enter schema fields interactively
    #[arg(short, long)]
    pub interactive: bool,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// PDF file to extract from
    pub pdf: PathBuf,

    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Write the JSON rows to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// How chunks are sent to the model
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Maximum tokens per chunk
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Tokens shared between consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Override the profile's model
    #[arg(long)]
    pub model: Option<String>,
}

/// Arguments for the instructions command.
#[derive(Debug, Parser)]
pub struct InstructionsArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,
}

/// Arguments for the chunks command.
#[derive(Debug, Parser)]
pub struct ChunksArgs {
    /// PDF file to split
    pub pdf: PathBuf,

    /// Maximum tokens per chunk
    #[arg(long)]
    pub max_tokens: Option<usize>,

    /// Tokens shared between consecutive chunks
    #[arg(long)]
    pub overlap: Option<usize>,
}

/// Arguments for profile management.
#[derive(Debug, Parser)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

/// Profile management actions.
#[derive(Debug, Subcommand)]
pub enum ProfileAction {
    /// List all profiles
    List,

    /// Show active profile
    Show,

    /// Switch to a different profile
    Switch {
        /// Profile name
        name: String,
    },

    /// Create or update a profile
    Set {
        /// Profile name
        name: String,
        /// Chat-completions base URL
        #[arg(short, long)]
        endpoint: Option<String>,
        /// Model name
        #[arg(short, long)]
        model: Option<String>,
        /// Environment variable holding the API key
        #[arg(short = 'k', long)]
        api_key_env: Option<String>,
        /// Sampling temperature
        #[arg(short, long)]
        temperature: Option<f32>,
        /// Transport timeout in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Retries for transient failures
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Delete a profile
    Delete {
        /// Profile name
        name: String,
    },
}

/// Request mode argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeArg {
    /// Single request when the document fits, per-chunk otherwise
    Auto,
    /// One request with the whole document
    Single,
    /// One request per chunk
    PerChunk,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<ModeArg> for schemaxtract_extractor::RequestMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Auto => schemaxtract_extractor::RequestMode::Auto,
            ModeArg::Single => schemaxtract_extractor::RequestMode::Single,
            ModeArg::PerChunk => schemaxtract_extractor::RequestMode::PerChunk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaxtract_extractor::RequestMode;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "schemaxtract",
            "extract",
            "invoice.pdf",
            "--field",
            "Invoice Number=The invoice's unique ID",
            "--field",
            "Total=The total amount due",
            "--mode",
            "per-chunk",
            "-o",
            "out.json",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.pdf, PathBuf::from("invoice.pdf"));
                assert_eq!(args.schema.fields.len(), 2);
                assert!(matches!(args.mode, Some(ModeArg::PerChunk)));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["schemaxtract", "-vv", "--format", "json", "--no-color", "chunks", "a.pdf"]);
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(matches!(cli.command, Command::Chunks(_)));
    }

    #[test]
    fn test_profile_set_command() {
        let cli = Cli::parse_from([
            "schemaxtract",
            "profile",
            "set",
            "local",
            "--endpoint",
            "http://localhost:11434/v1",
            "--model",
            "llama3",
        ]);
        match cli.command {
            Command::Profile(ProfileArgs {
                action: ProfileAction::Set { name, endpoint, model, .. },
            }) => {
                assert_eq!(name, "local");
                assert_eq!(endpoint.as_deref(), Some("http://localhost:11434/v1"));
                assert_eq!(model.as_deref(), Some("llama3"));
            }
            _ => panic!("Expected Profile Set command"),
        }
    }

    #[test]
    fn test_missing_command_is_error() {
        assert!(Cli::try_parse_from(["schemaxtract"]).is_err());
    }

    #[test]
    fn test_mode_conversion() {
        let mode: RequestMode = ModeArg::PerChunk.into();
        assert_eq!(mode, RequestMode::PerChunk);
    }
}
