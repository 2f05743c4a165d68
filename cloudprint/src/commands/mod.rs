pub mod executor;
pub mod handlers;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use executor::{execute_command, Context};

/// Command-line client for Google Cloud Print
#[derive(Debug, Parser)]
#[command(name = "cloudprint", version, about)]
pub struct Cli {
    /// Settings file (defaults to ./config.toml or $CLOUDPRINT_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage client credentials and tokens.
    #[command(subcommand)]
    Auth(AuthAction),
    /// List available printers.
    Printers,
    /// Submit a file to a printer.
    Submit {
        /// Printer id, or its index in the `printers` listing.
        printer: String,
        /// File to print.
        filename: PathBuf,
        /// Job title (defaults to the file name).
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Store the OAuth client id and secret.
    Setcreds {
        client_id: String,
        client_secret: String,
    },
    /// Authorize this client through the device flow.
    Login {
        /// Print the verification URL instead of opening a browser.
        #[arg(long)]
        no_browser: bool,
    },
    /// Refresh the access token.
    Refresh {
        /// Refresh even if the token has not expired.
        #[arg(long)]
        force: bool,
    },
    /// Remove stored tokens.
    Clear {
        /// Also remove the client id and secret.
        #[arg(long)]
        all: bool,
        /// Confirm the removal.
        #[arg(long)]
        yes: bool,
    },
    /// Show the stored credentials.
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_table_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_submit_with_title() {
        let cli = Cli::try_parse_from(["cloudprint", "submit", "0", "doc.pdf", "--title", "Report"])
            .unwrap();

        match cli.command {
            Command::Submit {
                printer,
                filename,
                title,
            } => {
                assert_eq!(printer, "0");
                assert_eq!(filename, PathBuf::from("doc.pdf"));
                assert_eq!(title.as_deref(), Some("Report"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_auth_actions() {
        let cli = Cli::try_parse_from(["cloudprint", "auth", "setcreds", "id", "secret"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Auth(AuthAction::Setcreds { ref client_id, ref client_secret })
                if client_id == "id" && client_secret == "secret"
        ));

        let cli = Cli::try_parse_from(["cloudprint", "auth", "refresh", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Auth(AuthAction::Refresh { force: true })
        ));

        let cli = Cli::try_parse_from(["cloudprint", "--config", "cp.toml", "auth", "status"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("cp.toml")));
    }

    #[test]
    fn test_setcreds_requires_both_values() {
        assert!(Cli::try_parse_from(["cloudprint", "auth", "setcreds", "id"]).is_err());
    }
}
