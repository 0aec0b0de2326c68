use serde::{Deserialize, Serialize};

/// Display identity derived from the login email. Nothing is verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub email: String,
    pub display_name: String,
    pub avatar: char,
}

impl Profile {
    pub fn from_email(email: &str) -> Self {
        let email = email.trim();
        let name = email.split('@').next().unwrap_or_default();
        let display_name = if name.is_empty() { "Trader" } else { name };
        let avatar = email
            .chars()
            .next()
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('U');

        Self {
            email: email.to_string(),
            display_name: display_name.to_string(),
            avatar,
        }
    }
}
