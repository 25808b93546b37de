//! Module dedicated to the SendGrid mailer configuration.
//!
//! The mailer never reads configuration from a global place: it asks
//! an injected [`ConfigProvider`] instead. [`StaticConfig`] is the
//! plain, in-memory provider.

use std::collections::HashMap;

/// Attachment MIME types accepted when none are configured. An entry
/// matches any MIME type containing it.
pub const DEFAULT_VALID_ATTACHMENT_TYPES: [&str; 5] = [
    "image/",
    "text/",
    "application/pdf",
    "application/x-zip",
    "application/xml",
];

/// The site configuration, used as default sender.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct SiteConfig {
    /// The site name, used as sender name and as first category.
    pub name: String,

    /// The site email address, used as sender address.
    pub mail: String,
}

/// The SendGrid configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(
    feature = "derive",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub struct SendGridConfig {
    /// The API secret key, or the identifier of a key that
    /// [`ConfigProvider::resolve_key`] can resolve.
    pub api_key: Option<String>,

    /// Enable click tracking, for HTML and plain text contents.
    #[cfg_attr(feature = "derive", serde(default))]
    pub track_clicks: bool,

    /// Enable open tracking.
    #[cfg_attr(feature = "derive", serde(default))]
    pub track_opens: bool,

    /// Override the list of accepted attachment MIME types.
    ///
    /// Defaults to [`DEFAULT_VALID_ATTACHMENT_TYPES`].
    pub valid_attachment_types: Option<Vec<String>>,
}

impl SendGridConfig {
    pub fn valid_attachment_types(&self) -> Vec<&str> {
        match &self.valid_attachment_types {
            Some(types) => types.iter().map(String::as_str).collect(),
            None => DEFAULT_VALID_ATTACHMENT_TYPES.to_vec(),
        }
    }

    /// Whether the given MIME type is accepted for attachments.
    pub fn is_valid_attachment_type(&self, mime_type: &str) -> bool {
        self.valid_attachment_types()
            .into_iter()
            .any(|valid| mime_type.contains(valid))
    }
}

/// Configuration collaborator of the mailer.
pub trait ConfigProvider {
    fn site_config(&self) -> &SiteConfig;

    fn sendgrid_config(&self) -> &SendGridConfig;

    /// Resolve a key identifier into its secret value.
    ///
    /// Returns `None` when the identifier is not a known key, in
    /// which case it is used as the secret itself.
    fn resolve_key(&self, _id: &str) -> Option<String> {
        None
    }
}

/// In-memory configuration provider.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StaticConfig {
    pub site: SiteConfig,
    pub sendgrid: SendGridConfig,
    pub keys: HashMap<String, String>,
}

impl StaticConfig {
    pub fn new(site: SiteConfig, sendgrid: SendGridConfig) -> Self {
        Self {
            site,
            sendgrid,
            keys: HashMap::new(),
        }
    }

    /// Register a secret under the given key identifier.
    pub fn with_key(mut self, id: impl ToString, secret: impl ToString) -> Self {
        self.keys.insert(id.to_string(), secret.to_string());
        self
    }
}

impl ConfigProvider for StaticConfig {
    fn site_config(&self) -> &SiteConfig {
        &self.site
    }

    fn sendgrid_config(&self) -> &SendGridConfig {
        &self.sendgrid
    }

    fn resolve_key(&self, id: &str) -> Option<String> {
        self.keys.get(id).cloned()
    }
}
