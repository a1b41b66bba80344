mod fields;
mod state;
mod submit;

pub use fields::{ContactField, LoginField, SignupField};
pub use state::{FormController, FormData, FormField, FormState, SubmitRefused};
pub use submit::{SubmitError, clean, submit};
