//! Module dedicated to the SendGrid mailer.
//!
//! The mailer turns a [`Message`] given by the mail pipeline into a
//! [`SendGridMail`] payload, ready to be posted to the SendGrid v3
//! `mail/send` endpoint.

use std::fmt;

use mime_body::{ExtractWarning, MultipartBodyExtractor};
use tracing::{debug, error, info, warn};

use crate::{
    hook::{CategoryFilterHook, KeepCategories},
    mail::{Attachment, ClickTracking, Setting, TrackingSettings},
    Address, ConfigProvider, Error, Message, ParamAttachment, Result, SendGridMail,
};

const DEFAULT_CONTENT_TYPE: &str = "text/plain";
const SPAM_CHECK_BYPASS_IDS: [&str; 2] = ["password", "commerce"];
const UID_ARG: &str = "uid";

/// A payload ready to be posted, with the API key to post it with.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreparedMail {
    pub api_key: String,
    pub mail: SendGridMail,

    /// Warnings to show to the user, like an unsupported content
    /// type sent as plain text.
    pub warnings: Vec<ExtractWarning>,
}

/// The result of building a mail.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The message asked not to be sent.
    Skipped,
    Ready(Box<PreparedMail>),
}

impl Outcome {
    pub fn into_prepared(self) -> Option<PreparedMail> {
        match self {
            Self::Skipped => None,
            Self::Ready(prepared) => Some(*prepared),
        }
    }
}

/// Message → SendGrid payload builder.
pub struct SendGridMailer<C: ConfigProvider> {
    config: C,
    category_filter: Box<dyn CategoryFilterHook>,
    extractor: MultipartBodyExtractor,
}

impl<C: ConfigProvider> fmt::Debug for SendGridMailer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendGridMailer")
            .field("extractor", &self.extractor)
            .finish_non_exhaustive()
    }
}

impl<C: ConfigProvider> SendGridMailer<C> {
    pub fn new(config: C) -> Self {
        Self {
            config,
            category_filter: Box::new(KeepCategories),
            extractor: MultipartBodyExtractor::default(),
        }
    }

    pub fn with_category_filter(mut self, hook: impl CategoryFilterHook + 'static) -> Self {
        self.category_filter = Box::new(hook);
        self
    }

    pub fn with_extractor(mut self, extractor: MultipartBodyExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Join the message body chunks.
    pub fn format(&self, msg: Message) -> Message {
        msg.format()
    }

    /// Build the SendGrid payload of the given message.
    pub fn build(&self, msg: &Message) -> Result<Outcome> {
        let site_config = self.config.site_config();
        let sendgrid_config = self.config.sendgrid_config();

        let api_key = self.api_key(msg)?;
        let site_name = encode_site_name(&site_config.name);
        let mut mail = SendGridMail::default();
        let mut warnings = Vec::new();

        if SPAM_CHECK_BYPASS_IDS.iter().any(|id| msg.id.contains(id)) {
            debug!(id = msg.id, "bypassing spam check");
            mail.mail_settings.spam_check = Some(Setting { enable: false });
        }

        if let Some(uid) = msg.params.uid {
            mail.custom_args.insert(UID_ARG.to_owned(), uid.to_string());
        }

        mail.from = match msg.header("From") {
            Some(from) => {
                let mut from = Address::parse(from);
                from.name = from.name.or_else(|| Some(site_name.clone()));
                from
            }
            None => Address::new(&site_config.mail, Some(&site_name)),
        };

        if !msg.send {
            info!(id = msg.id, "email was not sent because send value was disabled");
            return Ok(Outcome::Skipped);
        }

        let categories = vec![site_name, msg.module.clone(), msg.id.clone()];
        let filtered = self
            .category_filter
            .filter_categories(msg, categories.clone());
        mail.categories = if filtered.is_empty() {
            categories
        } else {
            filtered
        };

        let personalization = mail.personalization();
        personalization.subject = msg.subject.clone();
        personalization.to = Address::parse_list(&msg.to);

        if msg.header("Content-Type").is_none() {
            debug!("no content type header, assuming {DEFAULT_CONTENT_TYPE}");
            self.add_contents(&mut mail, &mut warnings, DEFAULT_CONTENT_TYPE, msg);
        }

        for (key, val) in &msg.headers {
            match key.to_lowercase().as_str() {
                "content-type" => {
                    self.add_contents(&mut mail, &mut warnings, val, msg);
                }
                "reply-to" => {
                    mail.reply_to = Some(Address::parse(val));
                }
                "cc" => {
                    let cc = Address::parse_list(val)
                        .into_iter()
                        .map(Address::or_email_as_name);
                    mail.personalization().cc.extend(cc);
                }
                "bcc" => {
                    let bcc = Address::parse_list(val)
                        .into_iter()
                        .map(Address::or_email_as_name);
                    mail.personalization().bcc.extend(bcc);
                }
                _ => (),
            }
        }

        self.add_attachments(&mut mail, msg);

        if let Some(id) = &msg.sendgrid.template_id {
            mail.template_id = Some(id.clone());
        }

        mail.personalization()
            .substitutions
            .extend(msg.sendgrid.substitutions.clone());

        mail.tracking_settings = TrackingSettings {
            click_tracking: ClickTracking {
                enable: sendgrid_config.track_clicks,
                enable_text: sendgrid_config.track_clicks,
            },
            open_tracking: Setting {
                enable: sendgrid_config.track_opens,
            },
        };

        Ok(Outcome::Ready(Box::new(PreparedMail {
            api_key,
            mail,
            warnings,
        })))
    }

    /// Resolve the API secret key, message params first.
    fn api_key(&self, msg: &Message) -> Result<String> {
        let api_key = match &msg.params.api_key {
            Some(api_key) => api_key.clone(),
            None => {
                let id = self
                    .config
                    .sendgrid_config()
                    .api_key
                    .clone()
                    .unwrap_or_default();
                self.config
                    .resolve_key(&id)
                    .filter(|secret| !secret.is_empty())
                    .unwrap_or(id)
            }
        };

        if api_key.trim().is_empty() {
            error!("no API secret key has been set");
            return Err(Error::MissingApiKeyError);
        }

        Ok(api_key)
    }

    fn add_contents(
        &self,
        mail: &mut SendGridMail,
        warnings: &mut Vec<ExtractWarning>,
        content_type: &str,
        msg: &Message,
    ) {
        let extracted = self.extractor.extract(content_type, msg.body());

        for (kind, text) in extracted.contents() {
            mail.add_content(kind.mime_type(), text);
        }

        for warning in extracted.warnings {
            match warning {
                ExtractWarning::UnsupportedContentType(_) => {
                    error!("{warning}");
                    warnings.push(warning);
                }
                ExtractWarning::MalformedBoundary(_) => {
                    warn!("{warning}");
                }
            }
        }
    }

    /// Attach files and params attachments. Failing attachments are
    /// logged and skipped.
    fn add_attachments(&self, mail: &mut SendGridMail, msg: &Message) {
        let config = self.config.sendgrid_config();

        for path in &msg.attachments {
            if !path.is_file() {
                debug!(?path, "skipping attachment: not a file");
                continue;
            }

            match Attachment::from_path(path, None, config) {
                Ok(attachment) => mail.attachments.push(attachment),
                Err(err) => error!(?err, "attachment processing failed"),
            }
        }

        for attachment in &msg.params.attachments {
            match attachment {
                ParamAttachment::File { filepath, filename } => {
                    if !filepath.is_file() {
                        debug!(?filepath, "skipping params attachment: not a file");
                        continue;
                    }

                    match Attachment::from_path(filepath, filename.as_deref(), config) {
                        Ok(attachment) => mail.attachments.push(attachment),
                        Err(err) => error!(?err, "error processing attachments"),
                    }
                }
                ParamAttachment::Content {
                    filename,
                    filemime,
                    filecontent,
                } => {
                    let attachment = Attachment::from_content(filename, filemime, filecontent);
                    mail.attachments.push(attachment);
                }
            }
        }
    }
}

/// URL-encode non-ASCII site names.
fn encode_site_name(name: &str) -> String {
    if name.is_ascii() {
        name.to_owned()
    } else {
        urlencoding::encode(name).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::encode_site_name;

    #[test]
    fn site_name() {
        assert_eq!(encode_site_name("My site"), "My site");
        assert_eq!(encode_site_name("Café"), "Caf%C3%A9");
    }
}
