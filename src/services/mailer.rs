use lettre::message::{header::ContentType, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;

use crate::config::SmtpConfig;

/// A notification to be rendered and delivered
#[derive(Debug, Clone)]
pub enum Notification {
    InquiryResponse {
        name: String,
        subject: String,
        response: String,
    },
    RegistrationConfirmation {
        name: String,
        email: String,
    },
    DonationReceipt {
        donor_name: String,
        amount: f64,
        currency: String,
        date: String,
    },
}

/// Rendered message content
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedMail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

impl Notification {
    /// Render subject/html/text. Pure: same notification, same output.
    pub fn render(&self) -> RenderedMail {
        match self {
            Notification::InquiryResponse {
                name,
                subject,
                response,
            } => RenderedMail {
                subject: format!("Re: {}", subject),
                html: format!(
                    "<html><body>\
                     <p>Dear {name},</p>\
                     <p>Thank you for reaching out to us regarding <strong>{subject}</strong>.</p>\
                     <p>{response}</p>\
                     <p>Warm regards,<br>The Charity Portal Team</p>\
                     </body></html>",
                    name = escape(name),
                    subject = escape(subject),
                    response = escape(response),
                ),
                text: format!(
                    "Dear {name},\n\n\
                     Thank you for reaching out to us regarding \"{subject}\".\n\n\
                     {response}\n\n\
                     Warm regards,\nThe Charity Portal Team\n",
                    name = name,
                    subject = subject,
                    response = response,
                ),
            },
            Notification::RegistrationConfirmation { name, email } => RenderedMail {
                subject: "Welcome to Charity Portal".to_string(),
                html: format!(
                    "<html><body>\
                     <p>Dear {name},</p>\
                     <p>Your account <strong>{email}</strong> has been created.</p>\
                     <p>You can now sign in to the portal.</p>\
                     <p>Warm regards,<br>The Charity Portal Team</p>\
                     </body></html>",
                    name = escape(name),
                    email = escape(email),
                ),
                text: format!(
                    "Dear {name},\n\n\
                     Your account {email} has been created.\n\
                     You can now sign in to the portal.\n\n\
                     Warm regards,\nThe Charity Portal Team\n",
                    name = name,
                    email = email,
                ),
            },
            Notification::DonationReceipt {
                donor_name,
                amount,
                currency,
                date,
            } => RenderedMail {
                subject: "Thank you for your donation".to_string(),
                html: format!(
                    "<html><body>\
                     <p>Dear {name},</p>\
                     <p>We gratefully acknowledge your donation of \
                     <strong>{amount:.2} {currency}</strong> received on {date}.</p>\
                     <p>Your generosity makes our work possible.</p>\
                     <p>Warm regards,<br>The Charity Portal Team</p>\
                     </body></html>",
                    name = escape(donor_name),
                    amount = amount,
                    currency = escape(currency),
                    date = escape(date),
                ),
                text: format!(
                    "Dear {name},\n\n\
                     We gratefully acknowledge your donation of {amount:.2} {currency} \
                     received on {date}.\n\
                     Your generosity makes our work possible.\n\n\
                     Warm regards,\nThe Charity Portal Team\n",
                    name = donor_name,
                    amount = amount,
                    currency = currency,
                    date = date,
                ),
            },
        }
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Delivery result, reported alongside the primary CRUD outcome.
/// Delivery failure never fails the request that triggered it.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub delivered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NotificationOutcome {
    fn failed(error: impl Into<String>) -> Self {
        Self {
            delivered: false,
            reference: None,
            error: Some(error.into()),
        }
    }
}

/// SMTP-backed notification sender. Constructed once at startup and shared
/// through the application state; an unconfigured transport renders but
/// never delivers.
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
}

impl Mailer {
    pub fn from_config(config: &SmtpConfig) -> Self {
        if config.host.is_empty() {
            tracing::info!("SMTP host not configured, mail delivery disabled");
            return Self {
                transport: None,
                from: None,
            };
        }

        let from = match config.from_address.parse::<Mailbox>() {
            Ok(mb) => mb,
            Err(e) => {
                tracing::warn!("Invalid SMTP from address {:?}: {}", config.from_address, e);
                return Self {
                    transport: None,
                    from: None,
                };
            }
        };

        let mut builder = match AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
        {
            Ok(b) => b.port(config.port),
            Err(e) => {
                tracing::warn!("Failed to build SMTP transport: {}", e);
                return Self {
                    transport: None,
                    from: None,
                };
            }
        };

        if !config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ));
        }

        Self {
            transport: Some(builder.build()),
            from: Some(from),
        }
    }

    /// Render and deliver a notification. Never returns an error: the
    /// outcome carries the failure for the caller to report.
    pub async fn send(&self, to: &str, notification: Notification) -> NotificationOutcome {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            return NotificationOutcome::failed("mail transport not configured");
        };

        let recipient: Mailbox = match to.parse() {
            Ok(mb) => mb,
            Err(e) => return NotificationOutcome::failed(format!("invalid recipient: {}", e)),
        };

        let rendered = notification.render();

        let message = Message::builder()
            .from(from.clone())
            .to(recipient)
            .subject(&rendered.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(rendered.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(rendered.html),
                    ),
            );

        let message = match message {
            Ok(m) => m,
            Err(e) => return NotificationOutcome::failed(format!("failed to build message: {}", e)),
        };

        match transport.send(message).await {
            Ok(response) => NotificationOutcome {
                delivered: true,
                reference: Some(response.code().to_string()),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Mail delivery to {} failed: {}", to, e);
                NotificationOutcome::failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendering_is_pure() {
        let n = Notification::DonationReceipt {
            donor_name: "Sam".to_string(),
            amount: 50.0,
            currency: "USD".to_string(),
            date: "2026-02-01".to_string(),
        };
        assert_eq!(n.render(), n.render());
    }

    #[test]
    fn donation_receipt_interpolates_every_field() {
        let rendered = Notification::DonationReceipt {
            donor_name: "Sam Lee".to_string(),
            amount: 120.5,
            currency: "EUR".to_string(),
            date: "2026-03-14".to_string(),
        }
        .render();

        for needle in ["Sam Lee", "120.50 EUR", "2026-03-14"] {
            assert!(rendered.html.contains(needle), "html missing {}", needle);
            assert!(rendered.text.contains(needle), "text missing {}", needle);
        }
        assert!(!rendered.html.contains('{'));
    }

    #[test]
    fn inquiry_response_escapes_html() {
        let rendered = Notification::InquiryResponse {
            name: "A <script>".to_string(),
            subject: "Help & support".to_string(),
            response: "See docs".to_string(),
        }
        .render();
        assert!(rendered.html.contains("A &lt;script&gt;"));
        assert!(rendered.html.contains("Help &amp; support"));
        assert!(rendered.subject.contains("Help & support"));
    }

    #[tokio::test]
    async fn unconfigured_transport_reports_failure_without_erroring() {
        let mailer = Mailer::from_config(&SmtpConfig::default());
        let outcome = mailer
            .send(
                "someone@example.org",
                Notification::RegistrationConfirmation {
                    name: "Sam".to_string(),
                    email: "someone@example.org".to_string(),
                },
            )
            .await;
        assert!(!outcome.delivered);
        assert!(outcome.error.is_some());
    }
}
