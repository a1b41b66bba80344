use axum::Json;
use chrono::{SecondsFormat, Utc};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::ApiError,
    extractors::ValidJson,
    form::{ContactField, FormController, clean},
    types::{ApiResponse, ContactForm, ContactReceipt},
    validators,
};

pub const SUBJECT_MAX_CHARS: usize = 200;
pub const MESSAGE_MAX_CHARS: usize = 5000;

pub fn contact_form() -> FormController<ContactForm> {
    FormController::new(
        ContactForm::default(),
        [
            (ContactField::FirstName, validators::required("First name")),
            (ContactField::LastName, validators::required("Last name")),
            (ContactField::Email, validators::email()),
            (
                ContactField::Subject,
                validators::all_of(vec![
                    validators::required("Subject"),
                    validators::max_length("Subject", SUBJECT_MAX_CHARS),
                ]),
            ),
            (
                ContactField::Message,
                validators::all_of(vec![
                    validators::required("Message"),
                    validators::max_length("Message", MESSAGE_MAX_CHARS),
                ]),
            ),
        ],
    )
}

/// Accept a contact message. Messages are acknowledged and logged; no
/// delivery channel is attached yet.
pub async fn contact_handler(
    ValidJson(input): ValidJson<ContactForm>,
) -> Result<Json<ApiResponse<ContactReceipt>>, ApiError> {
    let mut form = contact_form();
    form.fill(&clean(&input));

    if form.try_begin_submit().is_err() {
        return Err(ApiError::Validation(form.rejection()));
    }

    let message = form.data();
    let receipt = ContactReceipt {
        id: Uuid::new_v4(),
        received_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    info!(
        receipt_id = %receipt.id,
        company = %message.company,
        subject = %message.subject,
        message_chars = message.message.chars().count(),
        "contact message received"
    );
    form.finish_submit();

    Ok(Json(ApiResponse::ok(receipt)))
}
