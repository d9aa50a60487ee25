//! Interactive mode for the server.
//!
//! Prompts for bind address, port and deployment profile before starting
//! the server.

use dialoguer::{Confirm, Input, Select};

use crate::{ServerError, ServerOptions, profile};

/// Runs the server in interactive mode, prompting for configuration.
///
/// `defaults` (from flags and environment) pre-fill every prompt. The
/// answers are passed straight to [`super::run_server`].
///
/// # Errors
///
/// Returns [`ServerError`] if the underlying server fails to start.
#[allow(clippy::future_not_send)]
pub async fn run(defaults: ServerOptions) -> Result<(), ServerError> {
    println!("Ranch Map Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default(defaults.bind_addr.clone())
        .interact_text()
        .unwrap_or_else(|_| defaults.bind_addr.clone());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(defaults.port)
        .interact_text()
        .unwrap_or(defaults.port);

    let ids = profile::profile_ids();
    let default_idx = ids
        .iter()
        .position(|id| id.eq_ignore_ascii_case(&defaults.profile))
        .unwrap_or(0);
    let profile_id = Select::new()
        .with_prompt("Deployment profile")
        .items(&ids)
        .default(default_idx)
        .interact()
        .map_or_else(|_| defaults.profile.clone(), |idx| ids[idx].to_string());

    if !Confirm::new()
        .with_prompt(format!(
            "Start '{profile_id}' server on {bind_addr}:{port}?"
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(ServerOptions {
        bind_addr,
        port,
        profile: profile_id,
        ..defaults
    })
    .await
}
