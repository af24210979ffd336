//! Session command handlers

use anyhow::{Context, Result};

use linkmark_core::Session;

use crate::output::Output;

/// Sign in as the given user
pub fn login(session: &Session, user_id: String, output: &Output) -> Result<()> {
    session
        .sign_in(&user_id)
        .context("Failed to sign in")?;

    output.success(&format!("Logged in as {}", user_id));
    Ok(())
}

/// Sign out, removing the persisted session
pub fn logout(session: &Session, output: &Output) -> Result<()> {
    if !session.is_signed_in() {
        output.message("Not logged in.");
        return Ok(());
    }

    session.sign_out().context("Failed to sign out")?;
    output.success("Logged out");
    Ok(())
}

/// Show the signed-in user
pub fn whoami(session: &Session, output: &Output) -> Result<()> {
    match session.current_user()? {
        Some(user_id) => {
            if output.is_json() {
                println!("{}", serde_json::json!({ "user_id": user_id }));
            } else {
                println!("{}", user_id);
            }
        }
        None => {
            anyhow::bail!("Not logged in. Run `linkmark login <user-id>` first.");
        }
    }
    Ok(())
}
