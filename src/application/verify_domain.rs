use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    DnsRecordInstruction, DomainRecord, RoutingTargets, UserId, VerificationStatus,
};
use crate::infrastructure::dns::{DnsCheckError, DnsChecker};
use crate::infrastructure::store::DomainStore;

use super::ClaimError;

/// Outcome of one verification attempt. All variants are `Ok` values:
/// an unverified domain is a normal state the caller retries out of,
/// not an exception.
#[derive(Debug)]
pub enum VerifyOutcome {
    /// The domain was already verified; nothing was checked (idempotent
    /// short-circuit).
    AlreadyVerified(DomainRecord),
    /// Both checks passed; the record is now verified and stamped.
    Verified(DomainRecord),
    /// The TXT challenge was not found. Ownership is the gating
    /// requirement, so routing was not evaluated. Carries the exact
    /// record the user still needs to create.
    OwnershipUnproven {
        record: DomainRecord,
        expected: DnsRecordInstruction,
    },
    /// Ownership proven, but the hostname does not route to the
    /// platform yet. Carries the exact CNAME or A record needed.
    RoutingNotConfigured {
        record: DomainRecord,
        expected: DnsRecordInstruction,
    },
    /// The resolver timed out or failed transiently. Indistinguishable
    /// from "not yet verified" for the user; logged distinctly for
    /// operators.
    LookupFailed(DomainRecord),
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, Self::AlreadyVerified(_) | Self::Verified(_))
    }
}

/// Use case: drive a domain through the verification state machine.
///
/// `pending -> verifying -> {verified | failed}`, with `failed ->
/// verifying` retries. Entering `verifying` runs the checker exactly
/// once; every resulting transition is guarded by the record's token,
/// so a removal or reconnect racing the in-flight DNS lookup discards
/// the stale result instead of resurrecting the record.
pub struct VerifyDomain<'a> {
    store: &'a DomainStore,
    checker: &'a dyn DnsChecker,
    targets: &'a RoutingTargets,
}

impl<'a> VerifyDomain<'a> {
    pub fn new(
        store: &'a DomainStore,
        checker: &'a dyn DnsChecker,
        targets: &'a RoutingTargets,
    ) -> Self {
        Self {
            store,
            checker,
            targets,
        }
    }

    /// Verify the caller's account-level custom domain.
    pub async fn execute_for_owner(&self, owner: &UserId) -> Result<VerifyOutcome, ClaimError> {
        let record = self
            .store
            .find_custom_by_owner(owner)?
            .ok_or(ClaimError::NoDomainConfigured)?;
        self.run(record).await
    }

    /// Verify a specific record, used by the background re-check
    /// scheduler.
    pub async fn execute_record(&self, id: Uuid) -> Result<VerifyOutcome, ClaimError> {
        let record = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| ClaimError::NotFound(id.to_string()))?;
        self.run(record).await
    }

    async fn run(&self, record: DomainRecord) -> Result<VerifyOutcome, ClaimError> {
        if record.is_verified() {
            return Ok(VerifyOutcome::AlreadyVerified(record));
        }

        // Custom records always carry a token; one without was removed
        // or rewritten while we were looking at it.
        let Some(token) = record.token.clone() else {
            return Err(ClaimError::NotFound(record.hostname.to_string()));
        };

        // Re-entering verifying from pending/failed is the idempotent
        // retry path; a concurrent manual trigger and scheduled check
        // both land here safely.
        if self
            .store
            .update_status(record.id, VerificationStatus::Verifying, Some(&token))?
            .is_none()
        {
            return Err(ClaimError::NotFound(record.hostname.to_string()));
        }

        let check = match self.checker.check(&record.hostname, &token).await {
            Ok(check) => check,
            Err(DnsCheckError::Transient(reason)) => {
                warn!(hostname = %record.hostname, %reason, "transient DNS failure during verification");
                // Park the record back at pending: "failed" is reserved
                // for checks that completed and found records missing.
                let parked = self
                    .store
                    .update_status(record.id, VerificationStatus::Pending, Some(&token))?
                    .ok_or_else(|| ClaimError::NotFound(record.hostname.to_string()))?;
                return Ok(VerifyOutcome::LookupFailed(parked));
            }
        };

        if !check.txt_verified {
            let failed = self
                .store
                .update_status(record.id, VerificationStatus::Failed, Some(&token))?
                .ok_or_else(|| ClaimError::NotFound(record.hostname.to_string()))?;
            let expected = DnsRecordInstruction::txt_challenge(&record.hostname, &token);
            return Ok(VerifyOutcome::OwnershipUnproven {
                record: failed,
                expected,
            });
        }

        if !check.routing_ok {
            let failed = self
                .store
                .update_status(record.id, VerificationStatus::Failed, Some(&token))?
                .ok_or_else(|| ClaimError::NotFound(record.hostname.to_string()))?;
            let expected = DnsRecordInstruction::routing(&record.hostname, self.targets);
            return Ok(VerifyOutcome::RoutingNotConfigured {
                record: failed,
                expected,
            });
        }

        let verified = self
            .store
            .update_status(record.id, VerificationStatus::Verified, Some(&token))?
            .ok_or_else(|| ClaimError::NotFound(record.hostname.to_string()))?;

        info!(hostname = %verified.hostname, owner = %verified.owner, "domain verified");
        Ok(VerifyOutcome::Verified(verified))
    }
}
