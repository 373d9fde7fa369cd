use serde::{Deserialize, Serialize};

/// Profile fields supplied by the session/identity provider.
///
/// Everything except the user id is optional; the receipt renders
/// placeholders for whatever is missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
    #[serde(rename = "userId")]
    pub user_id: u64,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerInfo {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }
}
