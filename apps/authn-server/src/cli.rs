use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Credential resolution server for the tenant platform
#[derive(Parser, Debug)]
#[command(name = "authn-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YAML configuration file (also: `AUTHN__*` environment overrides)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the tenant-management listener and serve until Ctrl-C (default)
    Serve,

    /// Resolve a single `Authorization` header value and print the principal
    Resolve {
        /// Header value, e.g. `Basic YWxpY2U6c2VjcmV0`
        #[arg(long)]
        authorization: String,
    },

    /// Print the SHA-256 digest of a password for the static identity store
    HashPassword {
        password: String,
    },
}

impl Cli {
    /// Default `EnvFilter` directive derived from `-v`.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serve_is_implied_without_subcommand() {
        let cli = Cli::try_parse_from(["authn-server"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level(), "info");
    }

    #[test]
    fn verbosity_is_counted() {
        let cli = Cli::try_parse_from(["authn-server", "-vv", "serve"]).unwrap();
        assert_eq!(cli.log_level(), "trace");
        assert!(matches!(cli.command, Some(Command::Serve)));
    }

    #[test]
    fn resolve_requires_header_value() {
        assert!(Cli::try_parse_from(["authn-server", "resolve"]).is_err());

        let cli = Cli::try_parse_from([
            "authn-server",
            "--config",
            "authn.yaml",
            "resolve",
            "--authorization",
            "Basic YWxpY2U6c2VjcmV0",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("authn.yaml")));
        assert!(matches!(
            cli.command,
            Some(Command::Resolve { ref authorization }) if authorization.starts_with("Basic ")
        ));
    }
}
