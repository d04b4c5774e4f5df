//! Coaching gateway: the one outbound AI call, wrapped so that no failure
//! ever crosses its boundary.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::error;

use crate::traits::ChatProvider;

/// Fixed system framing for every coaching reply.
pub const SYSTEM_FRAMING: &str = "You are an empathetic and professional life coach.";

/// Returned verbatim when the provider call fails for any reason. The
/// caller treats this as a normal response, not an error signal.
pub const APOLOGY: &str =
    "Sorry, I'm currently experiencing technical difficulties. Please try again later.";

/// Failure-tolerant wrapper around the chat provider.
pub struct CoachingGateway {
    provider: Arc<dyn ChatProvider>,
}

impl CoachingGateway {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Generate a coaching reply. Infallible at this boundary: transport,
    /// provider, and timeout failures all degrade to [`APOLOGY`].
    pub async fn generate(&self, prompt: &str) -> String {
        match self.provider.complete(SYSTEM_FRAMING, prompt).await {
            Ok(text) => text,
            Err(e) => {
                error!("Coaching request failed: {:#}", e);
                APOLOGY.to_string()
            }
        }
    }
}

/// Rolling-window rate limit for the *explicit* coaching command only.
/// Idle/fallback free text calls the gateway unmetered; that asymmetry is
/// product behavior.
///
/// Returns `Ok(())` when a session is allowed, or `Err(next_allowed)` with
/// the instant the window reopens.
pub fn check_rate_limit(
    last_coaching_at: Option<DateTime<Utc>>,
    window: Duration,
    now: DateTime<Utc>,
) -> Result<(), DateTime<Utc>> {
    match last_coaching_at {
        Some(last) if now - last < window => Err(last + window),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FailingProvider;

    #[async_trait]
    impl ChatProvider for FailingProvider {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl ChatProvider for EchoProvider {
        async fn complete(&self, _system: &str, user: &str) -> anyhow::Result<String> {
            Ok(format!("coach says: {}", user))
        }
    }

    #[tokio::test]
    async fn gateway_absorbs_provider_failures() {
        let gateway = CoachingGateway::new(Arc::new(FailingProvider));
        assert_eq!(gateway.generate("help me").await, APOLOGY);
    }

    #[tokio::test]
    async fn gateway_relays_successful_replies() {
        let gateway = CoachingGateway::new(Arc::new(EchoProvider));
        assert_eq!(gateway.generate("help me").await, "coach says: help me");
    }

    #[test]
    fn rate_limit_rejects_inside_window() {
        let now = Utc::now();
        let window = Duration::hours(1);
        let last = now - Duration::minutes(30);
        let next = check_rate_limit(Some(last), window, now).unwrap_err();
        assert_eq!(next, last + window);
    }

    #[test]
    fn rate_limit_admits_after_window_and_first_timers() {
        let now = Utc::now();
        let window = Duration::hours(1);
        assert!(check_rate_limit(None, window, now).is_ok());
        assert!(check_rate_limit(Some(now - Duration::minutes(61)), window, now).is_ok());
    }
}
