//! Module dedicated to the messages handed over by the mail pipeline.

use std::{collections::BTreeMap, path::PathBuf};

/// An attachment given through the message params.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case", untagged)
)]
pub enum ParamAttachment {
    /// An attachment read from the file system, with an optional
    /// custom filename.
    File {
        filepath: PathBuf,
        filename: Option<String>,
    },

    /// An attachment given with its raw content.
    Content {
        filename: String,
        filemime: String,
        filecontent: Vec<u8>,
    },
}

/// Extra parameters of a message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct MessageParams {
    /// API secret key overriding the configured one.
    pub api_key: Option<String>,

    /// Identifier of the user account the message is sent to.
    pub uid: Option<u64>,

    #[cfg_attr(feature = "derive", serde(default))]
    pub attachments: Vec<ParamAttachment>,
}

/// SendGrid specific parameters of a message.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct SendGridParams {
    pub template_id: Option<String>,
    #[cfg_attr(feature = "derive", serde(default))]
    pub substitutions: BTreeMap<String, String>,
}

/// A message as given by the mail pipeline.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct Message {
    /// The message identifier, like `user_password_reset`.
    pub id: String,

    /// The module sending the message.
    pub module: String,

    /// The message key within its module.
    pub key: String,

    /// The comma-separated recipients.
    pub to: String,

    pub subject: String,

    /// The body chunks, joined when formatting.
    pub body: Vec<String>,

    /// The message headers, in their original order.
    pub headers: Vec<(String, String)>,

    /// Whether the message should be sent at all.
    pub send: bool,

    /// Paths of files to attach.
    #[cfg_attr(feature = "derive", serde(default))]
    pub attachments: Vec<PathBuf>,

    #[cfg_attr(feature = "derive", serde(default))]
    pub params: MessageParams,

    #[cfg_attr(feature = "derive", serde(default))]
    pub sendgrid: SendGridParams,
}

impl Default for Message {
    fn default() -> Self {
        Self {
            id: Default::default(),
            module: Default::default(),
            key: Default::default(),
            to: Default::default(),
            subject: Default::default(),
            body: Default::default(),
            headers: Default::default(),
            send: true,
            attachments: Default::default(),
            params: Default::default(),
            sendgrid: Default::default(),
        }
    }
}

impl Message {
    pub fn new(module: impl ToString, key: impl ToString) -> Self {
        let module = module.to_string();
        let key = key.to_string();

        Self {
            id: format!("{module}_{key}"),
            module,
            key,
            ..Default::default()
        }
    }

    pub fn with_to(mut self, to: impl ToString) -> Self {
        self.to = to.to_string();
        self
    }

    pub fn with_subject(mut self, subject: impl ToString) -> Self {
        self.subject = subject.to_string();
        self
    }

    pub fn with_body(mut self, body: impl ToString) -> Self {
        self.body.push(body.to_string());
        self
    }

    pub fn with_header(mut self, name: impl ToString, value: impl ToString) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_send(mut self, send: bool) -> Self {
        self.send = send;
        self
    }

    pub fn with_attachment(mut self, path: impl Into<PathBuf>) -> Self {
        self.attachments.push(path.into());
        self
    }

    pub fn with_param_attachment(mut self, attachment: ParamAttachment) -> Self {
        self.params.attachments.push(attachment);
        self
    }

    /// Get the first header matching the given case-insensitive name.
    pub fn header(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, val)| val.as_str())
    }

    /// Join the body chunks into a single one, separated by a blank
    /// line.
    pub fn format(mut self) -> Self {
        self.body = vec![self.body.join("\n\n")];
        self
    }

    /// Get the body as a single string.
    pub fn body(&self) -> String {
        self.body.join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::Message;

    #[test]
    fn format_joins_body() {
        let msg = Message::new("user", "password_reset")
            .with_body("Hello,")
            .with_body("Bye.")
            .format();

        assert_eq!(msg.id, "user_password_reset");
        assert_eq!(msg.body, vec![String::from("Hello,\n\nBye.")]);
    }

    #[test]
    fn header_is_case_insensitive() {
        let msg = Message::default().with_header("Content-Type", "text/plain");
        assert_eq!(msg.header("content-type"), Some("text/plain"));
        assert_eq!(msg.header("From"), None);
    }
}
