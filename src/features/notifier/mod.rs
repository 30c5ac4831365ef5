//! # Notifier Feature
//!
//! Renders the email template for a contact, builds the message envelope,
//! and hands it to the mail transport. Reminders reuse the template with
//! the reminder banner enabled and a `Reminder:` subject prefix.
//!
//! - **Version**: 1.1.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 1.1.0: Send failures returned as MailError values instead of logged-and-swallowed
//! - 1.0.0: Initial template rendering and SMTP submission

pub mod mailer;

pub use mailer::{MailError, Mailer, OutgoingEmail, SmtpMailer};

use std::sync::Arc;

use crate::core::{Config, EmailTemplate, TemplateVars};
use crate::store::Contact;

/// Renders and sends campaign email for contacts
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    template: EmailTemplate,
    company_name: String,
    product_name: String,
    sender_name: String,
    base_url: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, template: EmailTemplate, config: &Config) -> Self {
        Notifier {
            mailer,
            template,
            company_name: config.company_name.clone(),
            product_name: config.product_name.clone(),
            sender_name: config.sender_name.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send the initial campaign email to a contact
    pub async fn send_initial(&self, contact: &Contact) -> Result<(), MailError> {
        self.send(contact, None).await
    }

    /// Send reminder number `ordinal` to a contact
    pub async fn send_reminder(&self, contact: &Contact, ordinal: u32) -> Result<(), MailError> {
        self.send(contact, Some(ordinal)).await
    }

    async fn send(&self, contact: &Contact, reminder: Option<u32>) -> Result<(), MailError> {
        let vars = self.template_vars(contact, reminder);
        let html_body = self
            .template
            .render(&vars)
            .map_err(|e| MailError::Template(e.to_string()))?;

        let email = OutgoingEmail {
            to_name: contact.name.clone(),
            to_email: contact.email.clone(),
            subject: self.subject(reminder.is_some()),
            html_body,
        };
        self.mailer.send(&email).await
    }

    fn subject(&self, is_reminder: bool) -> String {
        let base = format!("Let's Schedule a Demo - {}", self.company_name);
        if is_reminder {
            format!("Reminder: {base}")
        } else {
            base
        }
    }

    fn template_vars(&self, contact: &Contact, reminder: Option<u32>) -> TemplateVars {
        TemplateVars {
            contact_name: contact.name.clone(),
            contact_email: contact.email.clone(),
            contact_company: contact.company_or_default().to_string(),
            company_name: self.company_name.clone(),
            product_name: self.product_name.clone(),
            sender_name: self.sender_name.clone(),
            interested_link: format!("{}/interested/{}", self.base_url, contact.id),
            not_interested_link: format!("{}/not-interested/{}", self.base_url, contact.id),
            is_reminder: reminder.is_some(),
            reminder_number: reminder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ContactStatus;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Records every send; optionally fails them all
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingEmail>>,
        fail: bool,
    }

    impl RecordingMailer {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(RecordingMailer {
                sent: Mutex::new(Vec::new()),
                fail,
            })
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
            if self.fail {
                return Err(MailError::Smtp("connection refused".to_string()));
            }
            self.sent.lock().await.push(email.clone());
            Ok(())
        }
    }

    fn config() -> Config {
        Config {
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "user".to_string(),
            smtp_password: "pass".to_string(),
            sender_email: "sam@mindlinks.example".to_string(),
            sender_name: "Sam".to_string(),
            company_name: "MindLinks Inc".to_string(),
            product_name: "LinkBoard".to_string(),
            base_url: "http://localhost:8000/".to_string(),
            calendly_link: "https://calendly.example/demo".to_string(),
            app_port: 8000,
            log_level: "info".to_string(),
            contacts_file: "contacts.json".to_string(),
            tracking_file: "email_tracking.json".to_string(),
            template_file: "templates/outreach.html".to_string(),
            reminder_interval_minutes: 1,
            max_reminders: 3,
        }
    }

    fn contact() -> Contact {
        Contact {
            id: 42,
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            company: None,
            status: ContactStatus::Pending,
            reminder_count: 0,
            sent_at: None,
            last_reminder_sent: None,
            updated_at: None,
            next_reminder_at: None,
        }
    }

    const SOURCE: &str = "{% if is_reminder %}[reminder {{ reminder_number }}] {% endif %}\
{{ contact_name }} / {{ contact_company }} / {{ interested_link }} / {{ not_interested_link }}";

    fn notifier(mailer: Arc<RecordingMailer>) -> Notifier {
        Notifier::new(
            mailer,
            EmailTemplate::from_source(SOURCE).unwrap(),
            &config(),
        )
    }

    #[tokio::test]
    async fn test_send_initial_renders_and_submits() {
        let mailer = RecordingMailer::new(false);
        notifier(mailer.clone()).send_initial(&contact()).await.unwrap();

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "ada@example.com");
        assert_eq!(sent[0].subject, "Let's Schedule a Demo - MindLinks Inc");
        assert!(sent[0].html_body.contains("Ada Lovelace / your organization"));
        assert!(!sent[0].html_body.contains("[reminder"));
    }

    #[tokio::test]
    async fn test_tracking_links_carry_contact_id() {
        let mailer = RecordingMailer::new(false);
        notifier(mailer.clone()).send_initial(&contact()).await.unwrap();

        let sent = mailer.sent.lock().await;
        // Trailing slash on BASE_URL must not double up
        assert!(sent[0].html_body.contains("http://localhost:8000/interested/42"));
        assert!(sent[0]
            .html_body
            .contains("http://localhost:8000/not-interested/42"));
    }

    #[tokio::test]
    async fn test_send_reminder_prefixes_subject_and_flags_template() {
        let mailer = RecordingMailer::new(false);
        notifier(mailer.clone())
            .send_reminder(&contact(), 2)
            .await
            .unwrap();

        let sent = mailer.sent.lock().await;
        assert_eq!(
            sent[0].subject,
            "Reminder: Let's Schedule a Demo - MindLinks Inc"
        );
        assert!(sent[0].html_body.starts_with("[reminder 2]"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_a_returned_value() {
        let mailer = RecordingMailer::new(true);
        let err = notifier(mailer).send_initial(&contact()).await.unwrap_err();
        assert!(matches!(err, MailError::Smtp(_)));
    }
}
