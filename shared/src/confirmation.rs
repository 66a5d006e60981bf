use crate::types::Result;
use dialoguer::Confirm;

/// Ask before an operation that throws work away. `assume_yes` skips the prompt
/// for non-interactive runs.
pub fn confirm_discard(what: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        tracing::debug!(what, "confirmation skipped");
        return Ok(true);
    }
    let choice = Confirm::new()
        .with_prompt(format!("Discard {what}?"))
        .default(false)
        .show_default(true)
        .interact()?;
    Ok(choice)
}
