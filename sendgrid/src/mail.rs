//! Module dedicated to the SendGrid v3 `mail/send` payload.
//!
//! The payload is only built and serialized here, sending it over
//! HTTP is left to the caller.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Address, Error, Result};

/// A content of the mail, identified by its MIME type.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Content {
    #[serde(rename = "type")]
    pub mime_type: String,
    pub value: String,
}

/// A base64-encoded attachment.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Attachment {
    pub content: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub filename: String,
    pub disposition: String,
}

/// Recipients and per-recipient data of the mail.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Personalization {
    pub to: Vec<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc: Vec<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc: Vec<Address>,
    pub subject: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Setting {
    pub enable: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ClickTracking {
    pub enable: bool,
    pub enable_text: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TrackingSettings {
    pub click_tracking: ClickTracking,
    pub open_tracking: Setting,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MailSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spam_check: Option<Setting>,
}

impl MailSettings {
    fn is_empty(&self) -> bool {
        self.spam_check.is_none()
    }
}

/// The SendGrid mail payload.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct SendGridMail {
    pub personalizations: Vec<Personalization>,
    pub from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<Address>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_args: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(skip_serializing_if = "MailSettings::is_empty")]
    pub mail_settings: MailSettings,
    pub tracking_settings: TrackingSettings,
}

impl SendGridMail {
    /// Get the first personalization, creating it if needed.
    pub fn personalization(&mut self) -> &mut Personalization {
        if self.personalizations.is_empty() {
            self.personalizations.push(Personalization::default());
        }
        &mut self.personalizations[0]
    }

    pub fn add_content(&mut self, mime_type: impl ToString, value: impl ToString) {
        self.content.push(Content {
            mime_type: mime_type.to_string(),
            value: value.to_string(),
        });
    }

    /// Get the value of the first content of the given MIME type.
    pub fn content(&self, mime_type: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|content| content.mime_type == mime_type)
            .map(|content| content.value.as_str())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Error::SerializeMailError)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(Error::SerializeMailError)
    }
}
