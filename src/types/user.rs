use serde::{Deserialize, Serialize};
use specta::Type;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub theme: Theme,
    pub notifications: bool,
    pub email_updates: bool,
    pub language: String,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            notifications: true,
            email_updates: false,
            language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<i64>,
    pub user: User,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_preferences_follow_the_system_theme() {
        let json = serde_json::to_value(UserPreferences::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "theme": "system",
                "notifications": true,
                "emailUpdates": false,
                "language": "en",
            })
        );
    }

    #[test]
    fn preferences_accept_explicit_theme() {
        let prefs: UserPreferences = serde_json::from_str(
            r#"{"theme":"dark","notifications":false,"emailUpdates":true,"language":"de"}"#,
        )
        .unwrap();
        assert_eq!(prefs.theme, Theme::Dark);
        assert!(prefs.email_updates);
    }
}
