use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use pdftree::{
    fetch_tree_file, resolve_object_file, ErrorEnvelope, InspectOptions, ResolutionMode,
    ResolveDepth, TreeError, TreeRequest, MAX_NESTING_DEPTH,
};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "pdftree",
    about = "Inspect the object tree of a PDF document",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Maximum inline nesting depth before serialization gives up
    #[arg(long, global = true, default_value_t = MAX_NESTING_DEPTH)]
    max_depth: usize,

    /// Print JSON on a single line
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the object tree starting at the catalog or a given object
    Tree {
        /// Input PDF file
        input: PathBuf,

        /// Start at this object instead of the catalog (e.g. "12 0")
        #[arg(short, long)]
        object_id: Option<String>,

        /// Dotted path to follow (e.g. "Pages.Kids.0")
        #[arg(short, long)]
        path: Option<String>,

        /// How indirect references are handled
        #[arg(short, long, value_enum, default_value_t = Mode::Lazy)]
        mode: Mode,
    },

    /// Print a single indirect object
    Resolve {
        /// Input PDF file
        input: PathBuf,

        /// Object identifier (e.g. "12-0")
        object_id: String,

        /// Whether referenced objects are expanded too
        #[arg(short, long, value_enum, default_value_t = Depth::Shallow)]
        depth: Depth,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Lazy,
    Full,
}

impl From<Mode> for ResolutionMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Lazy => ResolutionMode::Lazy,
            Mode::Full => ResolutionMode::Full,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Depth {
    Shallow,
    Deep,
}

impl From<Depth> for ResolveDepth {
    fn from(depth: Depth) -> Self {
        match depth {
            Depth::Shallow => ResolveDepth::Shallow,
            Depth::Deep => ResolveDepth::Deep,
        }
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdftree=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = InspectOptions {
        max_depth: cli.max_depth,
    };

    let (output, failed) = match run(cli.command, &options) {
        Ok(value) => (value, false),
        Err(err) => (serde_json::to_value(ErrorEnvelope::from(&err))?, true),
    };

    let rendered = if cli.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{rendered}");

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn run(command: Commands, options: &InspectOptions) -> Result<Value, TreeError> {
    let value = match command {
        Commands::Tree {
            input,
            object_id,
            path,
            mode,
        } => {
            let request = TreeRequest {
                object_id,
                path,
                mode: mode.into(),
            };
            serde_json::to_value(fetch_tree_file(&input, &request, options)?)
        }
        Commands::Resolve {
            input,
            object_id,
            depth,
        } => serde_json::to_value(resolve_object_file(
            &input,
            &object_id,
            depth.into(),
            options,
        )?),
    };
    value.map_err(|e| TreeError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_arguments() {
        let cli = Cli::try_parse_from([
            "pdftree",
            "tree",
            "doc.pdf",
            "--object-id",
            "3 0",
            "--path",
            "Kids.0",
            "--mode",
            "full",
        ])
        .unwrap();

        assert_eq!(cli.max_depth, MAX_NESTING_DEPTH);
        match cli.command {
            Commands::Tree {
                input,
                object_id,
                path,
                mode,
            } => {
                assert_eq!(input, PathBuf::from("doc.pdf"));
                assert_eq!(object_id.as_deref(), Some("3 0"));
                assert_eq!(path.as_deref(), Some("Kids.0"));
                assert_eq!(ResolutionMode::from(mode), ResolutionMode::Full);
            }
            Commands::Resolve { .. } => panic!("Expected tree command"),
        }
    }

    #[test]
    fn test_resolve_arguments() {
        let cli = Cli::try_parse_from([
            "pdftree",
            "--compact",
            "--max-depth",
            "64",
            "resolve",
            "doc.pdf",
            "12-0",
        ])
        .unwrap();

        assert!(cli.compact);
        assert_eq!(cli.max_depth, 64);
        match cli.command {
            Commands::Resolve {
                object_id, depth, ..
            } => {
                assert_eq!(object_id, "12-0");
                assert_eq!(ResolveDepth::from(depth), ResolveDepth::Shallow);
            }
            Commands::Tree { .. } => panic!("Expected resolve command"),
        }
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["pdftree", "tree", "doc.pdf", "--mode", "eager"]).is_err());
    }

    #[test]
    fn test_run_reports_missing_file() {
        let err = run(
            Commands::Resolve {
                input: PathBuf::from("missing.pdf"),
                object_id: "1-0".to_string(),
                depth: Depth::Deep,
            },
            &InspectOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "document_access");
    }
}
