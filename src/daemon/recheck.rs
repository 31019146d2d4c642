use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::ClaimError;
use crate::application::verify_domain::VerifyDomain;

use super::Core;

/// Background re-verification.
///
/// One repeating task per non-terminal record: claimed domains are
/// re-checked on a fixed interval until they verify or disappear, so
/// users who configure DNS after closing the dashboard still converge
/// without clicking "verify" again. Each tick runs the same idempotent
/// use case as a manual verify; the two can interleave freely.
pub struct RecheckScheduler {
    core: Arc<Core>,
    interval: Duration,
}

impl RecheckScheduler {
    pub fn new(core: Arc<Core>, interval: Duration) -> Self {
        Self { core, interval }
    }

    /// Start watching every record that is still moving through
    /// verification. Called once at daemon start.
    pub fn resume_all(&self) {
        for id in self.core.store.non_terminal_ids() {
            self.watch(id);
        }
    }

    /// Spawn the repeating check for one record. The task stops on its
    /// own once the record verifies or no longer exists (removal and
    /// reconnect both retire the old id/token).
    pub fn watch(&self, id: Uuid) {
        let core = Arc::clone(&self.core);
        let interval = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so a connect
            // response isn't raced by its own background check.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let verify = VerifyDomain::new(&core.store, core.checker.as_ref(), &core.targets);
                match verify.execute_record(id).await {
                    Ok(outcome) if outcome.is_verified() => {
                        info!(%id, "background re-check: domain verified");
                        break;
                    }
                    Ok(_) => {
                        debug!(%id, "background re-check: not verified yet");
                    }
                    Err(ClaimError::NotFound(_)) => {
                        debug!(%id, "background re-check: record gone, stopping");
                        break;
                    }
                    Err(e) => {
                        warn!(%id, error = %e, "background re-check failed");
                    }
                }
            }
        });
    }
}
