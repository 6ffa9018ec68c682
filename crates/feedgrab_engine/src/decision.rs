use feedgrab_core::EscalationDecision;

use crate::Escalation;

/// Answers an escalation: keep retrying, skip the item, or abort the run.
#[async_trait::async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn decide(&self, escalation: &Escalation) -> EscalationDecision;
}
