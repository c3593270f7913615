//! SMTP delivery via lettre.

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use portwatch_core::{BannerEvent, KnownService, NotificationConfig};

use crate::error::Result;
use crate::format;

/// Outbound notification channel for the monitor.
///
/// One call per logical message; no batching, no rate limiting. The
/// caller decides what a delivery failure means.
#[allow(async_fn_in_trait)]
pub trait Notifier {
    /// Announce a single newly discovered service.
    async fn notify_discovery(&self, event: &BannerEvent) -> Result<()>;

    /// Announce monitor startup with a summary of the known list.
    async fn notify_startup(&self, known: &[KnownService], learning: bool) -> Result<()>;
}

/// Delivers notifications through a plain SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Vec<Mailbox>,
}

impl SmtpNotifier {
    /// Build a notifier from the persisted notification settings.
    ///
    /// The relay is dialed without TLS or authentication; this targets
    /// a trusted internal relay, conventionally on port 25.
    pub fn new(config: &NotificationConfig, port: u16) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server)
            .port(port)
            .build();

        let from = config.from.parse::<Mailbox>()?;
        let to = config
            .to
            .iter()
            .map(|addr| addr.parse::<Mailbox>())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self { transport, from, to })
    }

    /// Send one HTML message to the full recipient list.
    async fn send_html(&self, subject: &str, body: String) -> Result<()> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(subject)
            .header(ContentType::TEXT_HTML);
        for rcpt in &self.to {
            builder = builder.to(rcpt.clone());
        }
        let message = builder.body(body)?;

        self.transport.send(message).await?;
        tracing::debug!(subject, recipients = self.to.len(), "Notification sent");
        Ok(())
    }
}

impl Notifier for SmtpNotifier {
    async fn notify_discovery(&self, event: &BannerEvent) -> Result<()> {
        self.send_html(
            &format::discovery_subject(event),
            format::discovery_body(event),
        )
        .await
    }

    async fn notify_startup(&self, known: &[KnownService], learning: bool) -> Result<()> {
        self.send_html("portwatch: monitor started", format::startup_body(known, learning))
            .await
    }
}
