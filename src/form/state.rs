use std::{collections::BTreeMap, fmt};

use serde::{Serialize, Serializer, ser::SerializeMap, ser::SerializeStruct};

use crate::{types::FormRejection, validators::Validator};

/// A field of a statically declared form.
pub trait FormField: Copy + Ord + fmt::Debug + Send + Sync + 'static {
    /// Name used on the wire and as the error-map key.
    fn name(self) -> &'static str;
}

/// A record whose fields are all edited as text.
pub trait FormData: Clone {
    type Field: FormField;

    /// Every field of the form, in display order.
    const FIELDS: &'static [Self::Field];

    fn get(&self, field: Self::Field) -> &str;

    fn set(&mut self, field: Self::Field, value: String);
}

/// Snapshot of one form: current values, per-field errors and flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState<T: FormData> {
    data: T,
    errors: BTreeMap<T::Field, String>,
    is_submitting: bool,
    is_valid: bool,
}

impl<T: FormData> FormState<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            errors: BTreeMap::new(),
            is_submitting: false,
            is_valid: true,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn errors(&self) -> &BTreeMap<T::Field, String> {
        &self.errors
    }

    pub fn error(&self, field: T::Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Error map keyed by wire field names.
    pub fn named_errors(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(field, message)| (field.name().to_string(), message.clone()))
            .collect()
    }
}

impl<T: FormData> From<&FormState<T>> for FormRejection {
    fn from(state: &FormState<T>) -> Self {
        Self {
            errors: state.named_errors(),
            is_valid: state.is_valid,
        }
    }
}

struct NamedErrors<'a, F: FormField>(&'a BTreeMap<F, String>);

impl<F: FormField> Serialize for NamedErrors<'_, F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, message) in self.0 {
            map.serialize_entry(field.name(), message)?;
        }
        map.end()
    }
}

impl<T: FormData + Serialize> Serialize for FormState<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FormState", 4)?;
        state.serialize_field("data", &self.data)?;
        state.serialize_field("errors", &NamedErrors(&self.errors))?;
        state.serialize_field("isSubmitting", &self.is_submitting)?;
        state.serialize_field("isValid", &self.is_valid)?;
        state.end()
    }
}

/// Why a submit attempt was refused before reaching the external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitRefused {
    #[error("a submission is already in flight")]
    AlreadySubmitting,
    #[error("the form has validation errors")]
    Invalid,
}

/// Owns one form's state and mediates every read and write of it.
///
/// A controller moves `Idle -> Submitting -> Idle`; it has no terminal
/// state and can be reused until its owner drops it.
pub struct FormController<T: FormData> {
    initial: T,
    state: FormState<T>,
    validators: BTreeMap<T::Field, Validator>,
}

impl<T: FormData> FormController<T> {
    pub fn new(initial: T, validators: impl IntoIterator<Item = (T::Field, Validator)>) -> Self {
        Self {
            state: FormState::new(initial.clone()),
            initial,
            validators: validators.into_iter().collect(),
        }
    }

    pub fn state(&self) -> &FormState<T> {
        &self.state
    }

    pub fn data(&self) -> &T {
        &self.state.data
    }

    pub fn errors(&self) -> &BTreeMap<T::Field, String> {
        &self.state.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.state.is_submitting
    }

    pub fn is_valid(&self) -> bool {
        self.state.is_valid
    }

    /// Replace a field's value and re-run that field's validator.
    pub fn update_field(&mut self, field: T::Field, value: impl Into<String>) {
        let value = value.into();
        self.state.errors.remove(&field);

        if let Some(validator) = self.validators.get(&field)
            && let Some(error) = validator(value.as_str())
        {
            self.state.errors.insert(field, error.message);
        }

        self.state.data.set(field, value);
        self.state.is_valid = self.state.errors.is_empty();
    }

    /// Feed every field of `input` through [`Self::update_field`], as if a
    /// user had typed each value in turn.
    pub fn fill(&mut self, input: &T) {
        for &field in T::FIELDS {
            self.update_field(field, input.get(field));
        }
    }

    /// Run every registered validator and replace the error map wholesale.
    pub fn validate_all(&mut self) -> bool {
        let errors: BTreeMap<T::Field, String> = self
            .validators
            .iter()
            .filter_map(|(&field, validator)| {
                validator(self.state.data.get(field)).map(|error| (field, error.message))
            })
            .collect();

        self.state.is_valid = errors.is_empty();
        self.state.errors = errors;
        self.state.is_valid
    }

    pub fn set_submitting(&mut self, is_submitting: bool) {
        self.state.is_submitting = is_submitting;
    }

    /// Record an error no single-field validator can express, such as a
    /// password confirmation mismatch.
    pub fn set_error(&mut self, field: T::Field, message: impl Into<String>) {
        self.state.errors.insert(field, message.into());
        self.state.is_valid = false;
    }

    pub fn clear_errors(&mut self) {
        self.state.errors.clear();
        self.state.is_valid = true;
    }

    /// Restore construction-time data and drop all transient state.
    pub fn reset(&mut self) {
        self.state = FormState::new(self.initial.clone());
    }

    /// Accept a submit attempt only while idle and only if every
    /// validator passes. On success the controller is `Submitting`.
    pub fn try_begin_submit(&mut self) -> Result<(), SubmitRefused> {
        if self.state.is_submitting {
            return Err(SubmitRefused::AlreadySubmitting);
        }
        if !self.validate_all() {
            return Err(SubmitRefused::Invalid);
        }
        self.state.is_submitting = true;
        Ok(())
    }

    pub fn finish_submit(&mut self) {
        self.state.is_submitting = false;
    }

    pub fn rejection(&self) -> FormRejection {
        FormRejection::from(&self.state)
    }
}

impl<T: FormData + fmt::Debug> fmt::Debug for FormController<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("state", &self.state)
            .field("validated_fields", &self.validators.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
