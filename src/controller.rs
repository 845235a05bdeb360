//! Form-submit orchestration
//!
//! Each submit runs `Idle -> Validating -> {Rejected, Accepted} -> Idle`.
//! Nothing carries over between submits; storage is the only state.

use std::rc::Rc;

use thiserror::Error;

use crate::clock::Clock;
use crate::storage::KeyValueStore;
use crate::store::{StoreError, SubmissionStore};
use crate::submission::{FormValues, Submission};
use crate::timer::Scheduler;
use crate::ui::{Banner, Field, FieldHighlighter, Form, MessagePresenter, Severity};
use crate::validate::{is_valid_email, is_valid_indian_phone};

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const SAVE_FAILED_MESSAGE: &str = "⚠️ Could not save your message. Please try again.";

/// Why a submission was turned down. `Display` is the user-facing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("❌ Invalid email format! Please use format: example@domain.com")]
    InvalidEmail,
    #[error(
        "❌ Invalid Indian phone number! Please use format: 9876543210, +91 9876543210, or 98765 43210"
    )]
    InvalidPhone,
}

impl Rejection {
    /// Field to highlight, if the problem is with one field
    pub fn field(&self) -> Option<Field> {
        match self {
            Rejection::MissingFields => None,
            Rejection::InvalidEmail => Some(Field::Email),
            Rejection::InvalidPhone => Some(Field::Phone),
        }
    }
}

/// Result of one submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Stored; `total` is the new number of stored submissions
    Accepted { submission: Submission, total: usize },
    Rejected(Rejection),
}

/// Check presence, then email shape, then phone shape
pub fn validate(values: &FormValues) -> Result<(), Rejection> {
    if !values.is_complete() {
        return Err(Rejection::MissingFields);
    }
    if !is_valid_email(&values.email) {
        return Err(Rejection::InvalidEmail);
    }
    if !is_valid_indian_phone(&values.phone) {
        return Err(Rejection::InvalidPhone);
    }
    Ok(())
}

/// Handles submit events for one form
pub struct SubmissionController<F, B, K> {
    form: F,
    highlighter: FieldHighlighter<F>,
    presenter: MessagePresenter<B>,
    store: SubmissionStore<K>,
    clock: Box<dyn Clock>,
}

impl<F, B, K> SubmissionController<F, B, K>
where
    F: Form + Clone + 'static,
    B: Banner + Clone + 'static,
    K: KeyValueStore,
{
    pub fn new(
        form: F,
        banner: B,
        store: SubmissionStore<K>,
        scheduler: Rc<dyn Scheduler>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            highlighter: FieldHighlighter::new(form.clone(), scheduler.clone()),
            presenter: MessagePresenter::new(banner, scheduler),
            form,
            store,
            clock,
        }
    }

    pub fn store(&self) -> &SubmissionStore<K> {
        &self.store
    }

    pub fn highlighter(&self) -> &FieldHighlighter<F> {
        &self.highlighter
    }

    pub fn presenter(&self) -> &MessagePresenter<B> {
        &self.presenter
    }

    /// Log how many submissions are already stored
    pub fn announce(&self) {
        match self.store.len() {
            Ok(0) => {}
            Ok(count) => log::info!("Total contact form submissions: {}", count),
            Err(e) => log::warn!("Could not count stored submissions: {}", e),
        }
    }

    /// Handle one submit.
    ///
    /// Rejections are reported to the user and returned as
    /// `Outcome::Rejected`. A storage failure is reported to the user too,
    /// leaves the form filled in, and comes back as `Err`.
    pub fn submit(&self) -> Result<Outcome, StoreError> {
        let values = self.form.values();

        if let Err(rejection) = validate(&values) {
            log::debug!("Submission rejected: {:?}", rejection);
            self.presenter.present(&rejection.to_string(), Severity::Error);
            if let Some(field) = rejection.field() {
                self.highlighter.highlight(field);
            }
            return Ok(Outcome::Rejected(rejection));
        }

        let submission = Submission::new(values, self.clock.now());
        let total = match self.store.append(&submission) {
            Ok(total) => total,
            Err(e) => {
                log::error!("Could not store submission: {}", e);
                self.presenter.present(SAVE_FAILED_MESSAGE, Severity::Error);
                return Err(e);
            }
        };

        self.presenter.present(SUCCESS_MESSAGE, Severity::Success);
        self.form.reset();
        self.highlighter.clear();

        log::info!("New submission: {:?}", submission);
        log::info!("Total submissions: {}", total);

        Ok(Outcome::Accepted { submission, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SteppingClock;
    use crate::config::{CorruptPolicy, FormConfig};
    use crate::storage::MemoryStorage;
    use crate::timer::ManualScheduler;
    use crate::ui::headless::{HeadlessBanner, HeadlessForm};
    use chrono::{Duration, TimeZone, Utc};

    struct Harness {
        form: HeadlessForm,
        banner: HeadlessBanner,
        storage: MemoryStorage,
        scheduler: ManualScheduler,
        controller: Rc<SubmissionController<HeadlessForm, HeadlessBanner, MemoryStorage>>,
    }

    fn harness_with(config: FormConfig) -> Harness {
        let form = HeadlessForm::new();
        let banner = HeadlessBanner::new();
        let storage = MemoryStorage::new();
        let scheduler = ManualScheduler::new();
        let clock = SteppingClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            Duration::milliseconds(1500),
        );
        let controller = Rc::new(SubmissionController::new(
            form.clone(),
            banner.clone(),
            SubmissionStore::new(storage.clone(), &config),
            Rc::new(scheduler.clone()),
            Box::new(clock),
        ));
        // Same wiring as the page: focusing a field runs the focus handler
        let listener = Rc::downgrade(&controller);
        form.on_focus(move |field| {
            if let Some(controller) = listener.upgrade() {
                controller.highlighter().on_focus(field);
            }
        });
        Harness {
            form,
            banner,
            storage,
            scheduler,
            controller,
        }
    }

    fn harness() -> Harness {
        harness_with(FormConfig::default())
    }

    impl Harness {
        fn stored(&self) -> usize {
            self.controller.store().len().unwrap()
        }
    }

    #[test]
    fn test_validate_order() {
        let missing = FormValues::new("", "bad", "1", "hi");
        assert_eq!(validate(&missing), Err(Rejection::MissingFields));
        let bad_both = FormValues::new("A", "bad", "1", "hi");
        assert_eq!(validate(&bad_both), Err(Rejection::InvalidEmail));
        let bad_phone = FormValues::new("A", "a@b.com", "1", "hi");
        assert_eq!(validate(&bad_phone), Err(Rejection::InvalidPhone));
        let ok = FormValues::new("A", "a@b.com", "+91 98765 43210", "hi");
        assert_eq!(validate(&ok), Ok(()));
    }

    #[test]
    fn test_accepted_submission_is_stored_and_form_reset() {
        let h = harness();
        h.form.fill("Asha", "a@b.com", "9876543210", "hi");

        let outcome = h.controller.submit().unwrap();

        let (submission, total) = match outcome {
            Outcome::Accepted { submission, total } => (submission, total),
            other => panic!("expected acceptance, got {:?}", other),
        };
        assert_eq!(total, 1);
        assert_eq!(submission.name, "Asha");
        assert_eq!(h.stored(), 1);
        assert!(h.form.is_empty());
        assert_eq!(h.banner.text(), SUCCESS_MESSAGE);
        assert_eq!(h.banner.severity(), Some(Severity::Success));
        assert!(h.form.marked_fields().is_empty());
    }

    #[test]
    fn test_bad_email_is_rejected_and_marked() {
        let h = harness();
        h.form.fill("Asha", "bad-email", "9876543210", "hi");

        let outcome = h.controller.submit().unwrap();

        assert_eq!(outcome, Outcome::Rejected(Rejection::InvalidEmail));
        assert_eq!(h.banner.text(), Rejection::InvalidEmail.to_string());
        assert_eq!(h.banner.severity(), Some(Severity::Error));
        assert_eq!(h.form.marked_fields(), vec![Field::Email]);
        assert_eq!(h.form.focused(), Some(Field::Email));
        assert_eq!(h.stored(), 0);
        // Form keeps what the user typed
        assert_eq!(h.form.value(Field::Email), "bad-email");
    }

    #[test]
    fn test_bad_phone_is_rejected_and_marked() {
        let h = harness();
        h.form.fill("Asha", "a@b.com", "12345", "hi");

        let outcome = h.controller.submit().unwrap();

        assert_eq!(outcome, Outcome::Rejected(Rejection::InvalidPhone));
        assert!(h.banner.text().contains("Invalid Indian phone number"));
        assert_eq!(h.form.marked_fields(), vec![Field::Phone]);
        assert_eq!(h.stored(), 0);
    }

    #[test]
    fn test_missing_fields_highlight_nothing() {
        let h = harness();
        h.form.fill("Asha", "a@b.com", "   ", "hi");

        let outcome = h.controller.submit().unwrap();

        assert_eq!(outcome, Outcome::Rejected(Rejection::MissingFields));
        assert_eq!(h.banner.text(), "Please fill in all fields.");
        assert!(h.form.marked_fields().is_empty());
        assert_eq!(h.form.focused(), None);
    }

    #[test]
    fn test_two_submissions_in_order_with_distinct_timestamps() {
        let h = harness();
        h.form.fill("Asha", "a@b.com", "9876543210", "first");
        h.controller.submit().unwrap();
        h.form.fill("Ravi", "r@x.in", "+91 91234 56789", "second");
        h.controller.submit().unwrap();

        let stored = h.controller.store().load().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].message, "first");
        assert_eq!(stored[1].message, "second");
        assert!(stored[0].timestamp < stored[1].timestamp);
        // Separators survive in the stored value
        assert_eq!(stored[1].phone, "+91 91234 56789");
    }

    #[test]
    fn test_rejection_does_not_affect_next_submit() {
        let h = harness();
        h.form.fill("Asha", "bad", "9876543210", "hi");
        h.controller.submit().unwrap();
        h.form.set_value(Field::Email, "a@b.com");
        assert!(matches!(
            h.controller.submit().unwrap(),
            Outcome::Accepted { total: 1, .. }
        ));
    }

    #[test]
    fn test_banner_and_marker_expire() {
        let h = harness();
        h.form.fill("Asha", "a@b.com", "123", "hi");
        h.controller.submit().unwrap();
        h.scheduler.advance(3000);
        assert!(h.form.marked_fields().is_empty());
        assert!(h.banner.is_visible());
        h.scheduler.advance(5000);
        assert!(!h.banner.is_visible());
    }

    #[test]
    fn test_success_after_error_keeps_banner_for_full_delay() {
        let h = harness();
        h.form.fill("Asha", "bad", "9876543210", "hi");
        h.controller.submit().unwrap();
        h.scheduler.advance(7000);
        h.form.fill("Asha", "a@b.com", "9876543210", "hi");
        h.controller.submit().unwrap();
        // The error banner's hide was due at 8000
        h.scheduler.advance(2000);
        assert!(h.banner.is_visible());
        assert_eq!(h.banner.text(), SUCCESS_MESSAGE);
        h.scheduler.advance(3000);
        assert!(!h.banner.is_visible());
    }

    #[test]
    fn test_storage_failure_is_reported_and_form_kept() {
        let h = harness();
        h.storage.set_read_only(true);
        h.form.fill("Asha", "a@b.com", "9876543210", "hi");

        let err = h.controller.submit().unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(h.banner.text(), SAVE_FAILED_MESSAGE);
        assert_eq!(h.form.value(Field::Name), "Asha");
    }

    #[test]
    fn test_corrupt_storage_blocks_submit_when_reported() {
        let h = harness_with(FormConfig {
            on_corrupt: CorruptPolicy::Report,
            ..FormConfig::default()
        });
        h.storage.set_item("contactSubmissions", "not json").unwrap();
        h.form.fill("Asha", "a@b.com", "9876543210", "hi");

        assert!(matches!(
            h.controller.submit(),
            Err(StoreError::Corrupt { .. })
        ));
        assert_eq!(
            h.storage.get_item("contactSubmissions").unwrap().as_deref(),
            Some("not json")
        );
    }
}
