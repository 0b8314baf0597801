//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// Aurora - referral link redirect service
#[derive(Parser)]
#[command(name = "aurora")]
#[command(version)]
#[command(about = "Referral link redirect service", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Apply database migrations and exit
    Migrate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: stdout)
        output_path: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::parse_from(["aurora"]);
        assert_eq!(cli.config, DEFAULT_CONFIG_PATH);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_config_flag_and_subcommand() {
        let cli = Cli::parse_from(["aurora", "-c", "prod.toml", "migrate"]);
        assert_eq!(cli.config, "prod.toml");
        assert_eq!(cli.command, Some(Commands::Migrate));

        let cli = Cli::parse_from(["aurora", "config", "generate", "out.toml"]);
        assert_eq!(
            cli.command,
            Some(Commands::Config {
                action: ConfigCommands::Generate {
                    output_path: Some("out.toml".to_string())
                }
            })
        );
    }
}
