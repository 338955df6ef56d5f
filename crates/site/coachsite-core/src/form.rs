//! Client-only contact form: validates, acknowledges with a toast, clears.
//! Nothing is ever sent anywhere.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::Messages;
use crate::error::ValidationError;
use crate::events::PageEvent;
use crate::host::{EventKind, Host, ListenTarget, NodeId, Propagation};
use crate::notify::{NotificationController, ToastKind};

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile"));

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ] {
            if value.is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(ValidationError::MalformedEmail);
        }
        Ok(())
    }

    fn read<H: Host + ?Sized>(host: &H, form: NodeId) -> Self {
        let field = |name: &str| host.form_value(form, name).unwrap_or_default();
        Self {
            name: field("name"),
            email: field("email"),
            message: field("message"),
        }
    }
}

#[derive(Debug)]
pub struct ContactForm {
    form: NodeId,
    messages: Messages,
    accepted: usize,
}

impl ContactForm {
    pub fn init<H: Host + ?Sized>(host: &mut H, messages: &Messages) -> Option<Self> {
        let form = host.by_id("contactForm")?;
        host.listen(ListenTarget::Node(form), EventKind::Submit);
        Some(Self {
            form,
            messages: messages.clone(),
            accepted: 0,
        })
    }

    /// Number of submissions acknowledged so far.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    pub fn submit<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        toasts: &mut NotificationController,
    ) -> Result<ContactSubmission, ValidationError> {
        let submission = ContactSubmission::read(host, self.form);
        if let Err(err) = submission.validate() {
            let text = match err {
                ValidationError::MissingField(_) => &self.messages.missing_fields,
                ValidationError::MalformedEmail => &self.messages.invalid_email,
            };
            toasts.show(host, text, ToastKind::Error);
            log::debug!("contact form rejected: {err}");
            return Err(err);
        }
        toasts.show(host, &self.messages.submitted, ToastKind::Success);
        host.reset_form(self.form);
        self.accepted += 1;
        log::info!("contact form acknowledged locally for {}", submission.name);
        Ok(submission)
    }

    pub fn handle<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        toasts: &mut NotificationController,
        event: &PageEvent,
    ) -> Option<Propagation> {
        match *event {
            PageEvent::Submit { form } if form == self.form => {
                let _ = self.submit(host, toasts);
                Some(Propagation::PreventDefault)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(name: &str, email: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            name: name.into(),
            email: email.into(),
            message: message.into(),
        }
    }

    #[test]
    fn accepts_minimal_valid_submission() {
        assert_eq!(sub("A", "a@b.co", "hi").validate(), Ok(()));
    }

    #[test]
    fn reports_first_missing_field() {
        assert_eq!(
            sub("A", "", "hi").validate(),
            Err(ValidationError::MissingField("email"))
        );
        assert_eq!(
            sub("", "", "").validate(),
            Err(ValidationError::MissingField("name"))
        );
    }

    #[test]
    fn rejects_malformed_email_shapes() {
        for email in ["plain", "a@b", "a b@c.de", "@b.co", "a@.co", "a@@b.co"] {
            assert_eq!(
                sub("A", email, "hi").validate(),
                Err(ValidationError::MalformedEmail),
                "{email} should be rejected"
            );
        }
        assert!(sub("A", "first.last@sub.domain.tr", "hi").validate().is_ok());
    }
}
