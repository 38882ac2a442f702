//! CLI argument parsing for resdep

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "resdep")]
#[command(version)]
#[command(about = "Check which syscalls of a fuzzer catalog have producible resources", long_about = None)]
pub struct Cli {
    /// Catalog file (TOML, or JSON by extension); overrides the config file's catalog
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Check configuration file (TOML)
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Syscall patterns to enable (e.g., -e open,read,socket$*)
    #[arg(short = 'e', long = "enable", value_name = "PATTERNS", value_delimiter = ',')]
    pub enable: Vec<String>,

    /// Syscall patterns to disable (e.g., -d socket$netlink)
    #[arg(short = 'd', long = "disable", value_name = "PATTERNS", value_delimiter = ',')]
    pub disable: Vec<String>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print the constructors of one resource instead of checking syscalls
    #[arg(long = "ctors", value_name = "RESOURCE")]
    pub ctors: Option<String>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["resdep", "--catalog", "linux.toml"]);
        assert_eq!(cli.catalog, Some(PathBuf::from("linux.toml")));
        assert!(cli.config.is_none());
        assert!(cli.enable.is_empty());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_pattern_lists() {
        let cli = Cli::parse_from([
            "resdep",
            "-e",
            "open,read,socket$*",
            "-d",
            "socket$unix",
            "-d",
            "pipe",
        ]);
        assert_eq!(cli.enable, vec!["open", "read", "socket$*"]);
        assert_eq!(cli.disable, vec!["socket$unix", "pipe"]);
    }

    #[test]
    fn test_cli_ctors_and_json() {
        let cli = Cli::parse_from(["resdep", "--ctors", "sock", "--format", "json"]);
        assert_eq!(cli.ctors.as_deref(), Some("sock"));
        assert_eq!(cli.format, OutputFormat::Json);
    }
}
