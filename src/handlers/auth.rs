use axum::{Extension, Json, extract::State};
use tracing::{info, warn};

use crate::{
    auth::AccessToken,
    error::ApiError,
    errors::normalize_provider_error,
    extractors::{ValidJson, ValidPath},
    form::{FormController, LoginField, SignupField, clean, submit},
    provider::SignupMetadata,
    state::AppState,
    types::{
        ApiResponse, LoginForm, OAuthProvider, OAuthRedirect, Session, SignupForm,
        SignupResponse,
    },
    validators,
};

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

pub fn login_form() -> FormController<LoginForm> {
    FormController::new(
        LoginForm::default(),
        [
            (LoginField::Email, validators::email()),
            (LoginField::Password, validators::password()),
        ],
    )
}

pub fn signup_form() -> FormController<SignupForm> {
    FormController::new(
        SignupForm::default(),
        [
            (SignupField::Email, validators::email()),
            (SignupField::Password, validators::password()),
            (SignupField::FirstName, validators::required("First name")),
            (SignupField::LastName, validators::required("Last name")),
        ],
    )
}

pub async fn login_handler(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<LoginForm>,
) -> Result<Json<ApiResponse<Session>>, ApiError> {
    let mut form = login_form();
    form.fill(&input);

    let provider = state.provider.clone();
    let outcome = submit(&mut form, |data| async move {
        provider
            .sign_in_with_password(&data.email, &data.password)
            .await
    })
    .await;

    let session = outcome.map_err(|err| ApiError::from_submit(err, form.rejection()))?;
    info!(user_id = %session.user.id, "signed in");
    Ok(Json(ApiResponse::ok(session)))
}

pub async fn signup_handler(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<SignupForm>,
) -> Result<Json<ApiResponse<SignupResponse>>, ApiError> {
    let mut form = signup_form();
    form.fill(&input);

    // Checked before the field validators, as the page does.
    if form.data().password != form.data().confirm_password {
        form.set_error(SignupField::ConfirmPassword, PASSWORD_MISMATCH);
        return Err(ApiError::Validation(form.rejection()));
    }

    let provider = state.provider.clone();
    let outcome = submit(&mut form, |data| async move {
        let names = clean(&data);
        let metadata = signup_metadata(&names.first_name, &names.last_name);
        provider.sign_up(&data.email, &data.password, metadata).await
    })
    .await;

    let session = outcome.map_err(|err| ApiError::from_submit(err, form.rejection()))?;
    match &session {
        Some(session) => info!(user_id = %session.user.id, "account created"),
        None => info!("account created, awaiting email confirmation"),
    }
    Ok(Json(ApiResponse::ok(SignupResponse { session })))
}

pub async fn oauth_handler(
    State(state): State<AppState>,
    ValidPath(provider): ValidPath<OAuthProvider>,
) -> Result<Json<ApiResponse<OAuthRedirect>>, ApiError> {
    let redirect_to = state.config.oauth_redirect();
    let url = state
        .provider
        .sign_in_with_oauth(provider, &redirect_to)
        .await
        .map_err(|err| {
            warn!(provider = provider.as_str(), error = %err, "oauth sign-in failed");
            normalize_provider_error(&err)
        })?;

    Ok(Json(ApiResponse::ok(OAuthRedirect { provider, url })))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    Extension(AccessToken(token)): Extension<AccessToken>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.provider.sign_out(&token).await.map_err(|err| {
        warn!(error = %err, "sign-out failed");
        normalize_provider_error(&err)
    })?;

    Ok(Json(ApiResponse::ok(())))
}

fn signup_metadata(first_name: &str, last_name: &str) -> SignupMetadata {
    SignupMetadata::from([
        ("first_name".to_string(), first_name.to_string()),
        ("last_name".to_string(), last_name.to_string()),
        (
            "full_name".to_string(),
            format!("{first_name} {last_name}").trim().to_string(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_is_trimmed() {
        let metadata = signup_metadata("Ada", "");
        assert_eq!(metadata["full_name"], "Ada");
        let metadata = signup_metadata("Ada", "Lovelace");
        assert_eq!(metadata["full_name"], "Ada Lovelace");
    }

    #[test]
    fn empty_signup_reports_every_validated_field() {
        let mut form = signup_form();
        assert!(!form.validate_all());
        let errors = form.rejection().errors;
        assert_eq!(errors["firstName"], "First name is required");
        assert_eq!(errors["lastName"], "Last name is required");
        assert_eq!(errors["email"], "Email is required");
        assert_eq!(errors["password"], "Password is required");
        assert!(!errors.contains_key("confirmPassword"));
    }
}
