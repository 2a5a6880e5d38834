use clap::Subcommand;

/// Main CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the API server name and version
    Info,

    /// Publish the shape file and bring its resources up to date
    Upload,

    /// Render the data file and download the result (Ctrl-C stops waiting)
    Run,

    /// List services with their resources and jobs
    Services,

    /// Delete a service and everything attached to it
    DeleteService {
        /// Service ID
        id: String,
    },

    /// Manage CLI configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Get configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set configuration value
    Set {
        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },
}
