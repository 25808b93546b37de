//! Module dedicated to the hooks altering the mail being built.

use crate::Message;

/// Alters the categories attached to a mail.
///
/// Categories are the only way to sort mails in the SendGrid UI. The
/// mailer gives `[site name, module, message id]` and keeps them when
/// the hook returns an empty list.
///
/// Closures taking the message and the categories implement this
/// trait.
pub trait CategoryFilterHook {
    fn filter_categories(&self, msg: &Message, categories: Vec<String>) -> Vec<String>;
}

impl<F> CategoryFilterHook for F
where
    F: Fn(&Message, Vec<String>) -> Vec<String>,
{
    fn filter_categories(&self, msg: &Message, categories: Vec<String>) -> Vec<String> {
        self(msg, categories)
    }
}

/// The hook keeping categories untouched.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct KeepCategories;

impl CategoryFilterHook for KeepCategories {
    fn filter_categories(&self, _msg: &Message, categories: Vec<String>) -> Vec<String> {
        categories
    }
}
