//! Interactive input: login details, run parameters and escalation answers.

use anyhow::Context;
use feedgrab_core::EscalationDecision;
use feedgrab_engine::{DecisionProvider, Escalation};
use feedgrab_logging::grab_warn;
use inquire::{CustomType, Password, PasswordDisplayMode, Select, Text};

const DEFAULT_LIMIT: usize = 200;

pub fn phone_number() -> anyhow::Result<String> {
    Text::new("Phone number (with country code):")
        .prompt()
        .context("Failed to read phone number")
}

pub fn two_factor_password() -> anyhow::Result<String> {
    Password::new("2FA password (blank if none):")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read 2FA password")
}

pub fn verification_code() -> anyhow::Result<String> {
    Text::new("Verification code:")
        .prompt()
        .map(|code| code.trim().to_string())
        .context("Failed to read verification code")
}

pub fn channel() -> anyhow::Result<String> {
    let channel = Text::new("Channel username or id:")
        .prompt()
        .context("Failed to read channel")?;
    let channel = channel.trim().to_string();
    anyhow::ensure!(!channel.is_empty(), "channel must not be empty");
    Ok(channel)
}

pub fn message_limit() -> anyhow::Result<usize> {
    CustomType::<usize>::new("Number of recent messages to fetch:")
        .with_default(DEFAULT_LIMIT)
        .with_error_message("Please type a whole number")
        .prompt()
        .context("Failed to read message limit")
}

const CONTINUE: &str = "Continue retrying";
const SKIP: &str = "Skip this file";
const EXIT: &str = "Exit program";

/// Asks the operator on the terminal. A prompt that cannot be answered
/// (closed stdin, Ctrl-C) counts as an abort.
pub struct TerminalDecisions;

#[async_trait::async_trait]
impl DecisionProvider for TerminalDecisions {
    async fn decide(&self, escalation: &Escalation) -> EscalationDecision {
        let message = format!(
            "\"{}\" has failed {} times. What now?",
            escalation.file_name, escalation.attempts
        );
        let answer = tokio::task::spawn_blocking(move || {
            Select::new(&message, vec![CONTINUE, SKIP, EXIT]).prompt()
        })
        .await;
        match answer {
            Ok(Ok(choice)) => decision_for(choice),
            Ok(Err(err)) => {
                grab_warn!("Escalation prompt failed: {}", err);
                EscalationDecision::Abort
            }
            Err(err) => {
                grab_warn!("Escalation prompt task failed: {}", err);
                EscalationDecision::Abort
            }
        }
    }
}

fn decision_for(choice: &str) -> EscalationDecision {
    match choice {
        SKIP => EscalationDecision::Skip,
        EXIT => EscalationDecision::Abort,
        _ => EscalationDecision::Continue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_map_to_decisions() {
        assert_eq!(decision_for(CONTINUE), EscalationDecision::Continue);
        assert_eq!(decision_for(SKIP), EscalationDecision::Skip);
        assert_eq!(decision_for(EXIT), EscalationDecision::Abort);
    }
}
