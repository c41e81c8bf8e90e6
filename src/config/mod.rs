pub mod network;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};

#[cfg(feature = "cli")]
mod cli {
    use crate::utils::error::{RejectionStatus, Result};
    use crate::utils::validation::{validate_path, Validate};
    use clap::{Parser, Subcommand};

    #[derive(Debug, Clone, Parser)]
    #[command(name = "subway")]
    #[command(about = "Manage subway lines and their sections")]
    pub struct CliConfig {
        /// Path to the TOML network file
        #[arg(long, default_value = "network.toml")]
        pub network: String,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON")]
        pub json_logs: bool,

        /// Override how section rejections map to status codes
        #[arg(long, value_enum)]
        pub rejection_status: Option<RejectionStatus>,

        /// Save the network back to the file after a successful change
        #[arg(long)]
        pub write: bool,

        #[command(subcommand)]
        pub command: Command,
    }

    #[derive(Debug, Clone, Subcommand)]
    pub enum Command {
        /// List all stations
        Stations,
        /// Create a station
        AddStation { name: String },
        /// Delete a station that no line uses
        DeleteStation { id: u64 },
        /// List all lines with their ordered stations
        Lines,
        /// Show one line
        ShowLine { id: u64 },
        /// Create a line with its first section
        CreateLine {
            #[arg(long)]
            name: String,
            #[arg(long)]
            color: String,
            #[arg(long)]
            up: u64,
            #[arg(long)]
            down: u64,
            #[arg(long)]
            distance: u64,
        },
        /// Rename or recolor a line
        UpdateLine {
            id: u64,
            #[arg(long)]
            name: String,
            #[arg(long)]
            color: String,
        },
        /// Delete a line and all of its sections
        DeleteLine { id: u64 },
        /// Add a section to a line
        AddSection {
            #[arg(long)]
            line: u64,
            #[arg(long)]
            up: u64,
            #[arg(long)]
            down: u64,
            #[arg(long)]
            distance: u64,
        },
        /// Remove the down terminus of a line
        RemoveSection {
            #[arg(long)]
            line: u64,
            #[arg(long)]
            station: u64,
        },
    }

    impl Command {
        pub fn is_mutation(&self) -> bool {
            !matches!(self, Command::Stations | Command::Lines | Command::ShowLine { .. })
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_path("network", &self.network)
        }
    }
}
