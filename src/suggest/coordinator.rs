use std::time::Duration;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::{ProviderError, Result};
use crate::formulation::{SuggestionResponse, parse_suggestion};
use crate::suggest::{SuggestionProvider, SuggestionRequest};

/// Result of a suggestion round trip that was not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionOutcome<T> {
    Ready(T),

    /// A newer request was issued (or the request was cancelled); the
    /// response was discarded.
    Superseded,
}

/// Handle for one issued request. Current only while no newer ticket exists.
#[derive(Debug, Clone)]
pub struct SuggestionTicket {
    generation: u64,
    latest: watch::Receiver<u64>,
}

impl SuggestionTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_current(&self) -> bool {
        *self.latest.borrow() == self.generation
    }

    /// Resolves once a newer ticket is issued.
    async fn superseded(&self) {
        let mut latest = self.latest.clone();
        if latest.wait_for(|g| *g != self.generation).await.is_err() {
            // Coordinator dropped: nothing can supersede this ticket anymore.
            std::future::pending::<()>().await;
        }
    }
}

/// Latest-request-wins gate in front of a suggestion provider.
#[derive(Debug)]
pub struct SuggestionCoordinator {
    latest: watch::Sender<u64>,
    timeout: Duration,
}

impl SuggestionCoordinator {
    pub fn new(timeout: Duration) -> Self {
        let (latest, _) = watch::channel(0);
        Self { latest, timeout }
    }

    /// Start a new request, superseding every earlier ticket.
    pub fn issue(&self) -> SuggestionTicket {
        let mut generation = 0;
        self.latest.send_modify(|g| {
            *g += 1;
            generation = *g;
        });
        SuggestionTicket {
            generation,
            latest: self.latest.subscribe(),
        }
    }

    /// Invalidate every outstanding ticket.
    pub fn cancel(&self) {
        self.latest.send_modify(|g| *g += 1);
    }

    /// Ask the provider for a mix and validate the response.
    ///
    /// The provider call is dropped as soon as the ticket is superseded.
    /// Timeouts and transport failures become `ProviderFailure`; a body that
    /// does not match the schema becomes `InvalidSuggestion`.
    pub async fn fetch(
        &self,
        ticket: &SuggestionTicket,
        provider: &dyn SuggestionProvider,
        request: &SuggestionRequest,
    ) -> Result<SuggestionOutcome<SuggestionResponse>> {
        let call = tokio::time::timeout(self.timeout, provider.suggest(request));

        let result = tokio::select! {
            result = call => result,
            _ = ticket.superseded() => {
                info!(generation = ticket.generation, "suggestion request superseded");
                return Ok(SuggestionOutcome::Superseded);
            }
        };

        if !ticket.is_current() {
            info!(generation = ticket.generation, "discarding stale suggestion response");
            return Ok(SuggestionOutcome::Superseded);
        }

        let body = match result {
            Ok(Ok(body)) => body,
            Ok(Err(err)) => {
                warn!(error = %err, "suggestion provider failed");
                return Err(err.into());
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "suggestion provider timed out");
                return Err(ProviderError::Timeout(self.timeout).into());
            }
        };

        parse_suggestion(&body).map(SuggestionOutcome::Ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_supersedes_older() {
        let coordinator = SuggestionCoordinator::new(Duration::from_secs(1));
        let first = coordinator.issue();
        assert!(first.is_current());

        let second = coordinator.issue();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert!(second.generation() > first.generation());
    }

    #[test]
    fn test_cancel_invalidates_all() {
        let coordinator = SuggestionCoordinator::new(Duration::from_secs(1));
        let ticket = coordinator.issue();
        coordinator.cancel();
        assert!(!ticket.is_current());
    }
}
