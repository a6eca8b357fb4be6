//! Contact form relay over SMTP.
//!
//! Uses lettre for delivery with Askama templates for the HTML and plain
//! text bodies.

use askama::Template;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use tezukuri_core::Email;

use crate::config::ContactConfig;

/// HTML body for a contact form message.
#[derive(Template)]
#[template(path = "email/contact.html")]
struct ContactEmailHtml<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Plain text body for a contact form message.
#[derive(Template)]
#[template(path = "email/contact.txt")]
struct ContactEmailText<'a> {
    name: &'a str,
    email: &'a str,
    message: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A validated contact form submission.
#[derive(Debug, Clone)]
pub struct ContactMessage {
    /// Sender's name.
    pub name: String,
    /// Sender's address, used as `Reply-To`.
    pub email: Email,
    /// Message body.
    pub message: String,
}

impl ContactMessage {
    /// Subject line for the relayed message.
    #[must_use]
    pub fn subject(&self) -> String {
        format!("New contact form submission from {}", self.name)
    }
}

/// Relays contact form submissions to the business inbox.
#[derive(Clone)]
pub struct ContactMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl ContactMailer {
    /// Create a new mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the SMTP relay cannot be configured or an address
    /// does not parse.
    pub fn new(config: &ContactConfig) -> Result<Self, EmailError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from: parse_mailbox(&config.from_address)?,
            to: parse_mailbox(&config.to_address)?,
        })
    }

    /// Send a contact form message.
    ///
    /// Returns a message ID for the response body.
    ///
    /// # Errors
    ///
    /// Returns error if the template fails to render or the message cannot
    /// be delivered.
    pub async fn send(&self, contact: &ContactMessage) -> Result<String, EmailError> {
        let message_id = format!("<{}@tezukurivan.ca>", uuid::Uuid::new_v4());
        let email = self.build(contact, &message_id)?;

        self.mailer.send(email).await?;

        tracing::info!(reply_to = %contact.email, "Contact message sent");
        Ok(message_id)
    }

    /// Build the multipart message without sending it.
    fn build(&self, contact: &ContactMessage, message_id: &str) -> Result<Message, EmailError> {
        let html = ContactEmailHtml {
            name: &contact.name,
            email: contact.email.as_str(),
            message: &contact.message,
        }
        .render()?;
        let text = ContactEmailText {
            name: &contact.name,
            email: contact.email.as_str(),
            message: &contact.message,
        }
        .render()?;

        let reply_to = Mailbox::new(
            Some(contact.name.clone()),
            contact
                .email
                .as_str()
                .parse::<Address>()
                .map_err(|_| EmailError::InvalidAddress(contact.email.to_string()))?,
        );

        let email = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .reply_to(reply_to)
            .message_id(Some(message_id.to_string()))
            .subject(contact.subject())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )?;

        Ok(email)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, EmailError> {
    address
        .parse()
        .map_err(|_| EmailError::InvalidAddress(address.to_string()))
}
