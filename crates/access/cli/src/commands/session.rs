//! Session management commands

use crate::commands::session_store;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat};
use clap::Subcommand;
use facility_access_policy::{clear_session, establish_session, read_session};
use facility_access_types::{AccessSet, ProfileState, UserProfile};
use serde::Serialize;

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Store a session as the console does after login
    Login {
        /// Opaque credential
        #[arg(long)]
        token: String,

        /// Granted module codes, comma-separated (e.g. VMS,UMG)
        #[arg(long)]
        access: String,

        /// Extra profile field as KEY=VALUE (repeatable)
        #[arg(long = "field")]
        fields: Vec<String>,
    },

    /// Show the stored session
    Show,

    /// Remove the stored session
    Clear,
}

/// Session summary for display
#[derive(Serialize)]
struct SessionView {
    store: String,
    signed_in: bool,
    profile: String,
    access: Vec<String>,
}

pub fn execute(command: SessionCommands, config: &CliConfig, format: OutputFormat) -> CliResult<()> {
    let store = session_store(config);

    match command {
        SessionCommands::Login {
            token,
            access,
            fields,
        } => {
            let mut profile = UserProfile::new(AccessSet::Delimited(access));
            for field in &fields {
                let (key, value) = field.split_once('=').ok_or_else(|| {
                    CliError::InvalidInput(format!("profile field '{field}' is not KEY=VALUE"))
                })?;
                profile = profile.with_field(key.trim(), value.trim());
            }
            if profile.access.is_empty() {
                output::print_warning("Session has no module codes; every protected route will deny");
            }

            establish_session(store.as_ref(), &token, &profile)?;
            output::print_success(&format!(
                "Session stored in {}",
                store.path().display()
            ));
        }

        SessionCommands::Show => {
            let snapshot = read_session(store.as_ref())?;
            let (profile, access) = match &snapshot.profile {
                ProfileState::Absent => ("absent".to_string(), Vec::new()),
                ProfileState::Malformed(detail) => (format!("malformed: {detail}"), Vec::new()),
                ProfileState::Parsed(user) => (
                    "parsed".to_string(),
                    user.access.codes().map(str::to_string).collect(),
                ),
            };
            let view = SessionView {
                store: store.path().display().to_string(),
                signed_in: snapshot.has_token(),
                profile,
                access,
            };
            output::print_single(&view, format)?;
        }

        SessionCommands::Clear => {
            clear_session(store.as_ref())?;
            output::print_success("Session cleared");
        }
    }

    Ok(())
}
