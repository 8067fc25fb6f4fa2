//! What to send: recipient, subject and either body text or a template

use crate::template::{format_template, TemplateValues};
use crate::{MailError, MailResult};

/// Content type of the single body part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Plain,
    Html,
}

/// Resolved message body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub content: String,
    pub kind: BodyKind,
}

impl Body {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: BodyKind::Plain,
        }
    }

    pub fn html(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: BodyKind::Html,
        }
    }
}

/// A single email to send
///
/// Exactly one of `text` (sent as `text/plain`) or `template` (filled from
/// `template_values` and sent as `text/html`) must be set.
#[derive(Debug, Clone)]
pub struct EmailRequest {
    pub recipient: String,
    pub subject: String,
    pub text: Option<String>,
    pub template: Option<String>,
    pub template_values: TemplateValues,
}

impl EmailRequest {
    pub fn new(recipient: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            text: None,
            template: None,
            template_values: TemplateValues::new(),
        }
    }

    /// Set the plain text body
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the HTML template
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Set one template value
    pub fn value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.template_values.insert(key, value);
        self
    }

    /// Set several template values
    pub fn values<K, V>(mut self, values: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.template_values.extend(values);
        self
    }

    /// Validate the body arguments and apply template values
    ///
    /// Empty strings count as absent.
    pub fn resolve_body(&self) -> MailResult<Body> {
        let text = self.text.as_deref().filter(|t| !t.is_empty());
        let template = self.template.as_deref().filter(|t| !t.is_empty());

        match (text, template) {
            (None, None) => Err(MailError::MissingBody),
            (Some(_), Some(_)) => Err(MailError::ConflictingBody),
            (Some(text), None) => Ok(Body::plain(text)),
            (None, Some(template)) => Ok(Body::html(format_template(
                template,
                &self.template_values,
            ))),
        }
    }
}
