//! The lead submission pipeline: validate, create through the store, then
//! either clear the form (success) or preserve it for a manual retry
//! (failure). One submission at a time; there is no automatic retry.

use tracing::{info, warn};

use super::{
    model::{Enquiry, EnquiryFields, EnquiryKind},
    validate::{FieldErrors, validate},
};
use crate::store::{EnquiryStore, StoreError};

pub const FAILURE_NOTICE: &str =
    "Failed to send enquiry. Please try again or contact us directly.";

const NOTIFY_EMAIL: &str = "info@follidoc.uk";

pub fn success_notice(kind: EnquiryKind) -> &'static str {
    match kind {
        EnquiryKind::Distributor => {
            "Your distributor enquiry has been sent successfully! We'll contact you within 24 hours."
        }
        EnquiryKind::Course => {
            "Your course enquiry has been sent successfully! We'll contact you within 24 hours."
        }
        EnquiryKind::General => {
            "Your message has been sent successfully! We'll get back to you within 24 hours."
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Submitting,
}

#[derive(Debug)]
pub enum Outcome {
    /// Validation failed; nothing was sent to the store.
    Rejected(FieldErrors),
    /// Created. The form has been cleared.
    Submitted {
        enquiry: Enquiry,
        notice: &'static str,
    },
    /// The store rejected the create. Field values are preserved.
    Failed(StoreError),
    /// A submission is already in flight; this one was ignored.
    InFlight,
}

/// Driver for one enquiry form. If a `submit` future is dropped mid-flight
/// the form stays in [`FlowState::Submitting`] and further submits are
/// ignored until [`LeadForm::reset`], so a late create can never be
/// double-reported.
#[derive(Debug)]
pub struct LeadForm {
    kind: EnquiryKind,
    fields: EnquiryFields,
    state: FlowState,
}

impl LeadForm {
    pub fn new(kind: EnquiryKind, fields: EnquiryFields) -> Self {
        Self {
            kind,
            fields,
            state: FlowState::Idle,
        }
    }

    pub fn fields(&self) -> &EnquiryFields {
        &self.fields
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub async fn submit(&mut self, store: &dyn EnquiryStore) -> Outcome {
        if self.state == FlowState::Submitting {
            return Outcome::InFlight;
        }

        let errors = validate(self.kind, &self.fields);
        if !errors.is_empty() {
            return Outcome::Rejected(errors);
        }

        self.state = FlowState::Submitting;
        let result = store.create(self.kind, self.fields.clone()).await;
        self.state = FlowState::Idle;

        match result {
            Ok(enquiry) => {
                info!(
                    to = NOTIFY_EMAIL,
                    id = enquiry.id,
                    kind = %self.kind,
                    "sending enquiry notification email"
                );
                self.fields = EnquiryFields::default();
                Outcome::Submitted {
                    notice: success_notice(self.kind),
                    enquiry,
                }
            }
            Err(err) => {
                warn!(error = %err, "enquiry submission failed, form values kept for retry");
                Outcome::Failed(err)
            }
        }
    }

    /// Clears fields and any stuck in-flight state. The "modal closed"
    /// path.
    pub fn reset(&mut self) {
        self.fields = EnquiryFields::default();
        self.state = FlowState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::{
        enquiries::model::EnquiryPatch,
        store::memory::MemStore,
    };

    fn distributor_fields() -> EnquiryFields {
        EnquiryFields {
            name: "Jane Tan".to_owned(),
            email: "jane@x.com".to_owned(),
            phone: "+60123456789".to_owned(),
            company: "Acme".to_owned(),
            location: "KL".to_owned(),
            experience: "5 years".to_owned(),
            ..EnquiryFields::default()
        }
    }

    #[tokio::test]
    async fn successful_submit_clears_the_form() {
        let store = MemStore::empty(false);
        let mut form = LeadForm::new(EnquiryKind::Distributor, distributor_fields());

        match form.submit(&store).await {
            Outcome::Submitted { enquiry, notice } => {
                assert_eq!(enquiry.id, 1);
                assert_eq!(enquiry.name, "Jane Tan");
                assert!(notice.contains("distributor enquiry has been sent successfully"));
            }
            other => panic!("expected Submitted, got {other:?}"),
        }
        assert_eq!(form.fields(), &EnquiryFields::default());
        assert_eq!(form.state(), FlowState::Idle);
    }

    #[tokio::test]
    async fn invalid_form_is_rejected_before_the_store_is_called() {
        let store = MemStore::empty(false);
        let mut fields = distributor_fields();
        fields.email.clear();
        let mut form = LeadForm::new(EnquiryKind::Distributor, fields);

        match form.submit(&store).await {
            Outcome::Rejected(errors) => assert!(errors.contains_key("email")),
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert!(EnquiryStore::all(&store).await.unwrap().is_empty());
        assert_eq!(form.state(), FlowState::Idle);
    }

    struct FailingStore;

    #[async_trait]
    impl EnquiryStore for FailingStore {
        async fn all(&self) -> Result<Vec<Enquiry>, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("down")))
        }
        async fn get(&self, _id: i64) -> Result<Enquiry, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("down")))
        }
        async fn create(
            &self,
            _kind: EnquiryKind,
            _fields: EnquiryFields,
        ) -> Result<Enquiry, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("down")))
        }
        async fn update(&self, _id: i64, _patch: EnquiryPatch) -> Result<Enquiry, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("down")))
        }
        async fn delete(&self, _id: i64) -> Result<Enquiry, StoreError> {
            Err(StoreError::Backend(anyhow::anyhow!("down")))
        }
    }

    #[tokio::test]
    async fn failed_submit_preserves_field_values() {
        let mut form = LeadForm::new(EnquiryKind::Distributor, distributor_fields());

        assert!(matches!(form.submit(&FailingStore).await, Outcome::Failed(_)));
        assert_eq!(form.fields(), &distributor_fields());
        // no automatic retry, but a manual one is allowed
        assert_eq!(form.state(), FlowState::Idle);
    }

    struct StalledStore;

    #[async_trait]
    impl EnquiryStore for StalledStore {
        async fn all(&self) -> Result<Vec<Enquiry>, StoreError> {
            std::future::pending().await
        }
        async fn get(&self, _id: i64) -> Result<Enquiry, StoreError> {
            std::future::pending().await
        }
        async fn create(
            &self,
            _kind: EnquiryKind,
            _fields: EnquiryFields,
        ) -> Result<Enquiry, StoreError> {
            std::future::pending().await
        }
        async fn update(&self, _id: i64, _patch: EnquiryPatch) -> Result<Enquiry, StoreError> {
            std::future::pending().await
        }
        async fn delete(&self, _id: i64) -> Result<Enquiry, StoreError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_submit_blocks_resubmits_until_reset() {
        let store = StalledStore;
        let mut form = LeadForm::new(EnquiryKind::Distributor, distributor_fields());

        {
            let mut in_flight = Box::pin(form.submit(&store));
            let timed_out =
                tokio::time::timeout(Duration::from_millis(50), in_flight.as_mut()).await;
            assert!(timed_out.is_err());
        }

        assert_eq!(form.state(), FlowState::Submitting);
        assert!(matches!(form.submit(&store).await, Outcome::InFlight));

        form.reset();
        assert_eq!(form.state(), FlowState::Idle);
        assert_eq!(form.fields(), &EnquiryFields::default());
    }
}
