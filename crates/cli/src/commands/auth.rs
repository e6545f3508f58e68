//! Storefront token commands.

use std::io::Write;

use clap::Subcommand;
use secrecy::SecretString;

use gigashop_storefront::state::AppState;

use super::CliError;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Store a token sent with every catalog request
    Login {
        /// Opaque bearer token
        token: String,
    },
    /// Forget the stored token
    Logout,
    /// Show whether a token is stored
    Status,
}

/// Run an auth command.
///
/// # Errors
///
/// Returns an error if the token storage or writing output fails.
pub fn run(command: AuthCommand, state: &AppState, out: &mut impl Write) -> Result<(), CliError> {
    match command {
        AuthCommand::Login { token } => {
            state.sign_in(&SecretString::from(token))?;
            writeln!(out, "Signed in.")?;
        }
        AuthCommand::Logout => {
            state.sign_out()?;
            writeln!(out, "Signed out.")?;
        }
        AuthCommand::Status => {
            if state.is_signed_in()? {
                writeln!(out, "Signed in.")?;
            } else {
                writeln!(out, "Not signed in.")?;
            }
        }
    }
    Ok(())
}
