use std::future::Future;

use tracing::debug;

use crate::{
    errors::normalize_provider_error,
    form::{FormController, FormData, SubmitRefused},
    provider::ProviderError,
    types::AppError,
};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Refused(#[from] SubmitRefused),
    #[error(transparent)]
    Operation(AppError),
}

/// Validate, then run `op` with a copy of the form data while the
/// controller is marked as submitting.
///
/// The submitting flag is cleared again whatever `op` returns. A provider
/// failure comes back normalized.
pub async fn submit<T, R, F, Fut>(
    controller: &mut FormController<T>,
    op: F,
) -> Result<R, SubmitError>
where
    T: FormData,
    F: FnOnce(T) -> Fut,
    Fut: Future<Output = Result<R, ProviderError>>,
{
    controller.try_begin_submit()?;

    let outcome = op(controller.data().clone()).await;
    controller.finish_submit();

    outcome.map_err(|err| {
        debug!(error = %err, "form submission failed");
        SubmitError::Operation(normalize_provider_error(&err))
    })
}

/// Copy of `data` with every field trimmed.
pub fn clean<T: FormData>(data: &T) -> T {
    let mut cleaned = data.clone();
    for &field in T::FIELDS {
        cleaned.set(field, data.get(field).trim().to_string());
    }
    cleaned
}
