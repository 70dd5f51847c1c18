//! Registration form validation and submission.
//!
//! Field values are plain strings validated through the [`FieldValidator`]
//! seam. Validation is three-state: a field can be outright invalid,
//! intermediate (incomplete but could become valid with more input), or
//! acceptable. Submission is asynchronous: it validates, then resolves on a
//! timer with a generated registration ID.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use regex::Regex;
use vitrine_core::{TimerId, TimerManager};

use crate::analytics::{AnalyticsSink, EventPayload};

/// How long a submission stays in flight before resolving.
pub const SUBMIT_DELAY: Duration = Duration::from_secs(2);

/// Default registration price in rupees.
pub const BASE_PRICE: u32 = 1999;
/// Extra charge when accommodation is requested.
pub const ACCOMMODATION_SURCHARGE: u32 = 800;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"))
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\d+()\-]{10,}$").expect("valid phone pattern"))
}

/// The outcome of validating one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationState {
    /// The value can never become valid as entered.
    Invalid,
    /// The value is incomplete but further input could make it valid.
    Intermediate,
    /// The value is valid.
    Acceptable,
}

/// Validates a single field value.
pub trait FieldValidator {
    fn validate(&self, value: &str) -> ValidationState;
}

/// Requires a minimum number of characters after trimming.
#[derive(Debug, Clone, Copy)]
pub struct LengthValidator {
    pub min: usize,
}

impl FieldValidator for LengthValidator {
    fn validate(&self, value: &str) -> ValidationState {
        if value.trim().chars().count() >= self.min {
            ValidationState::Acceptable
        } else {
            ValidationState::Intermediate
        }
    }
}

/// Requires a full match against a pattern. Empty input is intermediate.
pub struct PatternValidator {
    regex: &'static Regex,
}

impl PatternValidator {
    /// An email address validator.
    pub fn email() -> Self {
        Self {
            regex: email_regex(),
        }
    }

    /// A phone number validator. Whitespace is stripped before matching, so
    /// `"+91 98765 43210"` is acceptable.
    pub fn phone() -> Self {
        Self {
            regex: phone_regex(),
        }
    }
}

impl FieldValidator for PatternValidator {
    fn validate(&self, value: &str) -> ValidationState {
        let stripped: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if stripped.is_empty() {
            ValidationState::Intermediate
        } else if self.regex.is_match(&stripped) {
            ValidationState::Acceptable
        } else {
            ValidationState::Invalid
        }
    }
}

/// Requires any non-empty selection.
#[derive(Debug, Clone, Copy)]
pub struct SelectionValidator;

impl FieldValidator for SelectionValidator {
    fn validate(&self, value: &str) -> ValidationState {
        if value.trim().is_empty() {
            ValidationState::Intermediate
        } else {
            ValidationState::Acceptable
        }
    }
}

/// The registration form's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    College,
    Experience,
    TshirtSize,
    Accommodation,
    Agreement,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::College,
        Field::Experience,
        Field::TshirtSize,
        Field::Accommodation,
        Field::Agreement,
    ];
}

/// Price configuration for the form.
#[derive(Debug, Clone, Copy)]
pub struct Pricing {
    pub base: u32,
    pub accommodation_surcharge: u32,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            base: BASE_PRICE,
            accommodation_surcharge: ACCOMMODATION_SURCHARGE,
        }
    }
}

/// Submission lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitState {
    /// Not submitted yet.
    Idle,
    /// Submission in flight.
    Submitting,
    /// Submission resolved.
    Succeeded {
        /// The generated registration ID.
        registration_id: String,
    },
}

/// Errors from form submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// One or more fields failed validation.
    #[error("validation failed for {0:?}")]
    ValidationFailed(Vec<Field>),
    /// A submission is already in flight or has already succeeded.
    #[error("form already submitted")]
    AlreadySubmitted,
    /// No form is installed on the page.
    #[error("no form installed")]
    NotInstalled,
}

/// The event registration form.
pub struct RegistrationForm {
    values: HashMap<Field, String>,
    pricing: Pricing,
    state: SubmitState,
    submit_timer: Option<TimerId>,
    pending_id: Option<String>,
    sink: Option<Arc<dyn AnalyticsSink>>,
}

impl RegistrationForm {
    /// Create an empty form with default pricing.
    pub fn new() -> Self {
        Self::with_pricing(Pricing::default())
    }

    /// Create an empty form with the given pricing.
    pub fn with_pricing(pricing: Pricing) -> Self {
        Self {
            values: HashMap::new(),
            pricing,
            state: SubmitState::Idle,
            submit_timer: None,
            pending_id: None,
            sink: None,
        }
    }

    /// Attach an analytics sink.
    pub fn set_analytics(&mut self, sink: Arc<dyn AnalyticsSink>) {
        self.sink = Some(sink);
    }

    /// Set a field's value.
    pub fn set_value(&mut self, field: Field, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Get a field's value. Unset fields read as empty.
    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// The submission state.
    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    /// Validate a single field.
    pub fn validate_field(&self, field: Field) -> ValidationState {
        let value = self.value(field);
        match field {
            Field::Name => LengthValidator { min: 2 }.validate(value),
            Field::Email => PatternValidator::email().validate(value),
            Field::Phone => PatternValidator::phone().validate(value),
            Field::College => LengthValidator { min: 3 }.validate(value),
            Field::Experience | Field::TshirtSize | Field::Accommodation => {
                SelectionValidator.validate(value)
            }
            Field::Agreement => {
                // The terms checkbox: anything but an explicit yes is invalid.
                if value == "yes" {
                    ValidationState::Acceptable
                } else {
                    ValidationState::Invalid
                }
            }
        }
    }

    /// The message to show beside a field that is not yet acceptable.
    pub fn error_message(&self, field: Field) -> Option<&'static str> {
        if self.validate_field(field) == ValidationState::Acceptable {
            return None;
        }
        Some(match field {
            Field::Name => "Please enter your full name (at least 2 characters)",
            Field::Email => "Please enter a valid email address",
            Field::Phone => "Please enter a valid phone number (at least 10 digits)",
            Field::College => "Please enter your college or institution name",
            Field::Experience => "Please select your experience level",
            Field::TshirtSize => "Please select a t-shirt size",
            Field::Accommodation => "Please choose an accommodation option",
            Field::Agreement => "Please accept the terms and conditions",
        })
    }

    /// Fields that are not yet acceptable.
    pub fn incomplete_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&f| self.validate_field(f) != ValidationState::Acceptable)
            .collect()
    }

    /// Whether every field validates as acceptable.
    pub fn is_complete(&self) -> bool {
        self.incomplete_fields().is_empty()
    }

    /// Completion percentage, for progress displays.
    pub fn progress(&self) -> f32 {
        let acceptable = Field::ALL.len() - self.incomplete_fields().len();
        acceptable as f32 / Field::ALL.len() as f32 * 100.0
    }

    /// Total price for the current selections.
    pub fn total_price(&self) -> u32 {
        let mut total = self.pricing.base;
        if self.value(Field::Accommodation) == "yes" {
            total += self.pricing.accommodation_surcharge;
        }
        total
    }

    /// Begin submission.
    ///
    /// Validates every field, then resolves after [`SUBMIT_DELAY`] on the
    /// timer returned through [`on_timer`](Self::on_timer). The registration
    /// ID is derived from `submitted_at`.
    pub fn submit(
        &mut self,
        timers: &mut TimerManager,
        now: Instant,
        submitted_at: DateTime<Utc>,
    ) -> Result<(), FormError> {
        if self.state != SubmitState::Idle {
            return Err(FormError::AlreadySubmitted);
        }
        let incomplete = self.incomplete_fields();
        if !incomplete.is_empty() {
            tracing::debug!(target: "vitrine::form", fields = ?incomplete, "submission rejected");
            return Err(FormError::ValidationFailed(incomplete));
        }

        self.pending_id = Some(registration_id(submitted_at));
        self.submit_timer = Some(timers.start_one_shot(now, SUBMIT_DELAY));
        self.state = SubmitState::Submitting;
        tracing::info!(target: "vitrine::form", "submission started");
        Ok(())
    }

    /// Handle a fired timer. Returns `true` when the timer was the
    /// submission timer.
    pub fn on_timer(&mut self, timer: TimerId) -> bool {
        if self.submit_timer != Some(timer) {
            return false;
        }
        self.submit_timer = None;
        let registration_id = self.pending_id.take().unwrap_or_default();
        tracing::info!(target: "vitrine::form", %registration_id, "submission succeeded");

        if let Some(sink) = &self.sink {
            sink.track(
                "Registration Completed",
                &EventPayload::new()
                    .with("registration_id", registration_id.clone())
                    .with("total_price", self.total_price() as u64),
            );
        }
        self.state = SubmitState::Succeeded { registration_id };
        true
    }

    /// Cancel an in-flight submission, returning the form to idle.
    pub fn cancel(&mut self, timers: &mut TimerManager) {
        if let Some(timer) = self.submit_timer.take() {
            let _ = timers.stop(timer);
        }
        if self.state == SubmitState::Submitting {
            self.state = SubmitState::Idle;
            self.pending_id = None;
        }
    }
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a registration ID from the submission time: a fixed prefix plus the
/// last six digits of the millisecond timestamp.
fn registration_id(submitted_at: DateTime<Utc>) -> String {
    let millis = submitted_at.timestamp_millis().rem_euclid(1_000_000);
    format!("ESM{millis:06}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn filled_form() -> RegistrationForm {
        let mut form = RegistrationForm::new();
        form.set_value(Field::Name, "Asha Rao");
        form.set_value(Field::Email, "asha@example.com");
        form.set_value(Field::Phone, "+91 98765 43210");
        form.set_value(Field::College, "IIT Madras");
        form.set_value(Field::Experience, "beginner");
        form.set_value(Field::TshirtSize, "M");
        form.set_value(Field::Accommodation, "no");
        form.set_value(Field::Agreement, "yes");
        form
    }

    #[test]
    fn test_length_validation() {
        let mut form = RegistrationForm::new();
        assert_eq!(form.validate_field(Field::Name), ValidationState::Intermediate);
        form.set_value(Field::Name, "A");
        assert_eq!(form.validate_field(Field::Name), ValidationState::Intermediate);
        form.set_value(Field::Name, "Al");
        assert_eq!(form.validate_field(Field::Name), ValidationState::Acceptable);
        form.set_value(Field::Name, "  A  ");
        assert_eq!(form.validate_field(Field::Name), ValidationState::Intermediate);
    }

    #[test]
    fn test_email_validation() {
        let mut form = RegistrationForm::new();
        form.set_value(Field::Email, "not-an-email");
        assert_eq!(form.validate_field(Field::Email), ValidationState::Invalid);
        form.set_value(Field::Email, "user@host");
        assert_eq!(form.validate_field(Field::Email), ValidationState::Invalid);
        form.set_value(Field::Email, "user@host.edu");
        assert_eq!(form.validate_field(Field::Email), ValidationState::Acceptable);
    }

    #[test]
    fn test_phone_validation_strips_whitespace() {
        let mut form = RegistrationForm::new();
        form.set_value(Field::Phone, "+91 98765 43210");
        assert_eq!(form.validate_field(Field::Phone), ValidationState::Acceptable);
        form.set_value(Field::Phone, "12345");
        assert_eq!(form.validate_field(Field::Phone), ValidationState::Invalid);
        form.set_value(Field::Phone, "phone me");
        assert_eq!(form.validate_field(Field::Phone), ValidationState::Invalid);
    }

    #[test]
    fn test_error_messages() {
        let mut form = RegistrationForm::new();
        assert!(form.error_message(Field::Email).unwrap().contains("email"));
        form.set_value(Field::Email, "asha@example.com");
        assert_eq!(form.error_message(Field::Email), None);
    }

    #[test]
    fn test_agreement_required() {
        let mut form = filled_form();
        form.set_value(Field::Agreement, "");
        assert_eq!(form.validate_field(Field::Agreement), ValidationState::Invalid);
        assert!(!form.is_complete());
        form.set_value(Field::Agreement, "yes");
        assert!(form.is_complete());
    }

    #[test]
    fn test_progress() {
        let mut form = RegistrationForm::new();
        assert_eq!(form.progress(), 0.0);
        form.set_value(Field::Name, "Asha");
        form.set_value(Field::Email, "asha@example.com");
        assert_eq!(form.progress(), 25.0);
        let form = filled_form();
        assert_eq!(form.progress(), 100.0);
    }

    #[test]
    fn test_pricing() {
        let mut form = filled_form();
        assert_eq!(form.total_price(), 1999);
        form.set_value(Field::Accommodation, "yes");
        assert_eq!(form.total_price(), 2799);
    }

    #[test]
    fn test_submit_rejects_incomplete() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut form = RegistrationForm::new();
        form.set_value(Field::Name, "Asha Rao");

        let err = form.submit(&mut timers, now, Utc::now()).unwrap_err();
        let FormError::ValidationFailed(fields) = err else {
            panic!("expected validation failure");
        };
        assert!(fields.contains(&Field::Email));
        assert!(!fields.contains(&Field::Name));
        assert_eq!(*form.state(), SubmitState::Idle);
        assert_eq!(timers.active_count(), 0);
    }

    #[test]
    fn test_submit_resolves_after_delay() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let submitted_at = Utc.timestamp_millis_opt(1_700_000_123_456).unwrap();
        let mut form = filled_form();

        form.submit(&mut timers, now, submitted_at).unwrap();
        assert_eq!(*form.state(), SubmitState::Submitting);

        // A second submit while in flight is rejected.
        assert_eq!(
            form.submit(&mut timers, now, submitted_at),
            Err(FormError::AlreadySubmitted)
        );

        assert!(timers.process_expired(now + Duration::from_secs(1)).is_empty());
        let fired = timers.process_expired(now + SUBMIT_DELAY);
        assert_eq!(fired.len(), 1);
        assert!(form.on_timer(fired[0]));

        // Last six digits of the millisecond timestamp.
        assert_eq!(
            *form.state(),
            SubmitState::Succeeded {
                registration_id: "ESM123456".to_string()
            }
        );
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut form = filled_form();

        form.submit(&mut timers, now, Utc::now()).unwrap();
        form.cancel(&mut timers);
        assert_eq!(*form.state(), SubmitState::Idle);
        assert_eq!(timers.active_count(), 0);

        // Cancelled submissions can be retried.
        form.submit(&mut timers, now, Utc::now()).unwrap();
    }

    #[test]
    fn test_unrelated_timer_not_claimed() {
        let mut timers = TimerManager::new();
        let now = Instant::now();
        let mut form = filled_form();
        form.submit(&mut timers, now, Utc::now()).unwrap();

        let other = timers.start_one_shot(now, Duration::from_millis(1));
        assert!(!form.on_timer(other));
        assert_eq!(*form.state(), SubmitState::Submitting);
    }

    #[test]
    fn test_analytics_on_completion() {
        use crate::analytics::tests_support::RecordingSink;

        let mut timers = TimerManager::new();
        let now = Instant::now();
        let sink = Arc::new(RecordingSink::default());
        let mut form = filled_form();
        form.set_value(Field::Accommodation, "yes");
        form.set_analytics(sink.clone());

        form.submit(&mut timers, now, Utc::now()).unwrap();
        let fired = timers.process_expired(now + SUBMIT_DELAY);
        form.on_timer(fired[0]);

        let events = sink.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "Registration Completed");
        assert_eq!(events[0].1.get("total_price"), Some(&2799u64.into()));
    }
}
