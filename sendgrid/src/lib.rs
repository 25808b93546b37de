//! Rust library to format mail messages as SendGrid v3 mail
//! payloads.
//!
//! The [`SendGridMailer`] takes a [`Message`] as given by a mail
//! pipeline (headers, body chunks, recipients, attachments and
//! params) and builds a [`SendGridMail`] payload out of it:
//!
//! - the body is split into plain text and HTML contents according to
//! the `Content-Type` header, using [`mime_body`];
//! - sender, recipients, cc, bcc and reply-to addresses are parsed
//! from the message and its headers;
//! - categories are given by the site name, the module and the
//! message id, and can be altered with a [`CategoryFilterHook`];
//! - attachments are read, sniffed and base64-encoded.
//!
//! Configuration comes from an injected [`ConfigProvider`]. Posting
//! the payload to SendGrid is left to the caller.

pub mod address;
pub mod attachment;
pub mod config;
pub mod error;
pub mod hook;
pub mod mail;
pub mod mailer;
pub mod message;

#[doc(inline)]
pub use self::{
    address::Address,
    config::{ConfigProvider, SendGridConfig, SiteConfig, StaticConfig},
    error::{Error, Result},
    hook::{CategoryFilterHook, KeepCategories},
    mail::SendGridMail,
    mailer::{Outcome, PreparedMail, SendGridMailer},
    message::{Message, MessageParams, ParamAttachment, SendGridParams},
};
