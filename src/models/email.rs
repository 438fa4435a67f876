use serde::{Deserialize, Serialize};

/// A composed notification, ready to be handed to whatever delivers mail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

impl NotificationEmail {
    /// Recipients as a single `To` header value.
    pub fn to_header(&self) -> String {
        self.to.join(", ")
    }
}
