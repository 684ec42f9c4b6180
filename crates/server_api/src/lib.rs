use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use sheets_integration::{StoreFactory, StoreWriteError};
use shared::{validate, FieldErrors, RawFormInput, RegistrationRecord};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

/// Collaborators shared by every page session.
#[derive(Clone)]
pub struct SubmissionContext {
    pub stores: Arc<dyn StoreFactory>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionState {
    Editing,
    Submitted,
}

/// Proof that a row was appended. `attempt` only correlates log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submitted {
    pub attempt: Uuid,
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Submitted(Submitted),
    Invalid(FieldErrors),
    Failed(StoreWriteError),
}

/// Owns the submitted flag of one page session and drives the store write.
///
/// Submissions are not serialized: two calls racing on the same controller
/// both write a row and both leave it `Submitted`.
pub struct SubmissionController {
    ctx: SubmissionContext,
    submitted: AtomicBool,
}

impl SubmissionController {
    pub fn new(ctx: SubmissionContext) -> Self {
        Self {
            ctx,
            submitted: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SubmissionState {
        if self.submitted.load(Ordering::Acquire) {
            SubmissionState::Submitted
        } else {
            SubmissionState::Editing
        }
    }

    /// Appends `record` through a store opened for this attempt. The state
    /// only moves to `Submitted` once the append returned successfully.
    pub async fn submit(&self, record: &RegistrationRecord) -> Result<Submitted, StoreWriteError> {
        let attempt = Uuid::new_v4();
        async move {
            info!("submitting registration");
            let result = match self.ctx.stores.open() {
                Ok(store) => store.append_row(record.to_row()).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(()) => {
                    self.submitted.store(true, Ordering::Release);
                    info!("registration appended");
                    Ok(Submitted { attempt })
                }
                Err(err) => {
                    error!(error = %err, "failed to append registration");
                    Err(err)
                }
            }
        }
        .instrument(info_span!("submission", %attempt))
        .await
    }

    /// Validates the raw form and submits it when every field passes.
    pub async fn submit_form(&self, raw: RawFormInput) -> SubmitOutcome {
        let record = match validate(raw) {
            Ok(record) => record,
            Err(errors) => {
                info!(fields = errors.len(), "registration rejected by schema");
                return SubmitOutcome::Invalid(errors);
            }
        };

        match self.submit(&record).await {
            Ok(submitted) => SubmitOutcome::Submitted(submitted),
            Err(err) => SubmitOutcome::Failed(err),
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
