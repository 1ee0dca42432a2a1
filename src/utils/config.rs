use clap::{Parser, Subcommand, ValueEnum};

pub const DEFAULT_SYSTEM_NAMESPACE: &str = "keptn-lifecycle-toolkit-system";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
}

/// Command line and environment configuration of the binary.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Namespace holding the shared task and evaluation definitions
    #[arg(
        long,
        global = true,
        env = "KEPTN_SYSTEM_NAMESPACE",
        default_value = DEFAULT_SYSTEM_NAMESPACE
    )]
    pub system_namespace: String,

    /// Output format for printed manifests
    #[arg(long, global = true, env = "KEPTN_CRD_OUTPUT", value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Print the CustomResourceDefinition of every registered kind
    Crd,
    /// Decode a KeptnWorkload manifest and print its derived views
    Describe {
        /// Path to the JSON manifest
        path: String,
    },
}
