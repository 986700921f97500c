use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use deepmerge_codec::Format;
use deepmerge_core::PolicyOverrides;

#[derive(Parser)]
#[command(
    name = "deepmerge",
    about = "Deep merge YAML and JSON documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (default: ./deepmerge.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Merge documents left to right and print the result
    Merge(MergeArgs),
    /// Print the effective merge policy
    Policy(PolicyArgs),
    /// List the merge functions offered to hosts
    Functions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => Format::Yaml,
            FormatArg::Json => Format::Json,
        }
    }
}

/// Policy switches, applied after the config file and `--options`.
#[derive(Args, Clone, Debug, Default)]
pub struct PolicyFlags {
    /// Keep existing values on collisions
    #[arg(long)]
    pub no_override: bool,
    /// Ignore null values in later documents
    #[arg(long)]
    pub no_null_override: bool,
    /// Concatenate colliding lists
    #[arg(long)]
    pub append_list: bool,
    /// Merge colliding lists element by element
    #[arg(long)]
    pub deep_copy_list: bool,
    /// Union colliding lists, dropping duplicates
    #[arg(long)]
    pub union_lists: bool,
    /// Inline options document, e.g. '{union_lists: true}' (repeatable)
    #[arg(long = "options", value_name = "DOC")]
    pub options: Vec<String>,
}

impl PolicyFlags {
    /// The switches given on the command line; unset flags are left alone.
    pub fn overrides(&self) -> PolicyOverrides {
        let set = |flag: bool, value: bool| flag.then_some(value);
        PolicyOverrides {
            override_existing: set(self.no_override, false),
            null_override: set(self.no_null_override, false),
            append_list: set(self.append_list, true),
            deep_copy_list: set(self.deep_copy_list, true),
            union_lists: set(self.union_lists, true),
        }
    }
}

#[derive(Args)]
pub struct MergeArgs {
    /// Documents to merge, in order; `-` reads stdin
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Format of every input (default: by extension, else YAML)
    #[arg(long)]
    pub input_format: Option<FormatArg>,
    /// Format of the result
    #[arg(short = 'f', long)]
    pub output_format: Option<FormatArg>,
    /// Write the result to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub policy: PolicyFlags,
}

#[derive(Args)]
pub struct PolicyArgs {
    #[arg(short = 'f', long)]
    pub output_format: Option<FormatArg>,
    #[command(flatten)]
    pub policy: PolicyFlags,
}
