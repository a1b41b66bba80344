pub mod app_error;
pub mod forms;
pub mod user;
pub mod api_response;

#[allow(unused_imports)]
pub use app_error::{AppError, ErrorCategory, ErrorCode, ErrorDisplay};
#[allow(unused_imports)]
pub use forms::{ContactForm, LoginForm, SignupForm, ValidationError};
#[allow(unused_imports)]
pub use user::{Session, Theme, User, UserPreferences};
#[allow(unused_imports)]
pub use api_response::{
    ApiResponse, ContactReceipt, FormRejection, OAuthProvider, OAuthRedirect, SignupResponse,
};
