//! Module dedicated to email address parsing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Matches `"Name" <address>` as well as `Name <address>`.
static NAMED_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*"?(.+?)"?\s*<\s*([^>]+)\s*>$"#).unwrap());

/// An email address with its optional display name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Address {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Address {
    pub fn new(email: impl ToString, name: Option<impl ToString>) -> Self {
        Self {
            email: email.to_string(),
            name: name.map(|name| name.to_string()),
        }
    }

    /// Parse the given address, splitting the display name from the
    /// email address when there is one.
    pub fn parse(address: impl AsRef<str>) -> Self {
        let address = address.as_ref();

        match NAMED_ADDRESS.captures(address) {
            Some(captures) => Self {
                email: captures[2].trim().to_owned(),
                name: Some(captures[1].to_owned()),
            },
            None => Self {
                email: address.trim().to_owned(),
                name: None,
            },
        }
    }

    /// Parse a comma-separated list of addresses.
    pub fn parse_list(addresses: impl AsRef<str>) -> Vec<Self> {
        addresses
            .as_ref()
            .split(',')
            .map(str::trim)
            .filter(|address| !address.is_empty())
            .map(Self::parse)
            .collect()
    }

    /// Use the email address as name when there is none.
    pub fn or_email_as_name(mut self) -> Self {
        if self.name.is_none() {
            self.name = Some(self.email.clone());
        }
        self
    }
}
