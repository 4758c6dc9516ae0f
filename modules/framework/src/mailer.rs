use crate::error::Error;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender, e.g. `Bakehouse <orders@bakehouse.example>`.
    pub from: String,
}

/// Order summary lines for the confirmation mail.
#[derive(Debug, Clone)]
pub struct OrderMail {
    pub order_id: Uuid,
    pub total: Decimal,
    pub delivery_date: time::Date,
    pub delivery_time: Option<String>,
}

/// SMTP relay client. Constructed without credentials it stays disabled and
/// every send reports the misconfiguration instead of panicking at startup.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl Mailer {
    pub fn new(config: &MailerConfig) -> Result<Self, Error> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| Error::validation(format!("Invalid sender address: {e}")))?;

        let transport = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                // Port 465 is implicit TLS, everything else goes through STARTTLS.
                let builder = if config.port == 465 {
                    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
                } else {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
                };
                Some(
                    builder
                        .port(config.port)
                        .credentials(Credentials::new(user.clone(), pass.clone()))
                        .build(),
                )
            }
            _ => {
                tracing::warn!("SMTP credentials not set, outbound mail is disabled");
                None
            }
        };

        Ok(Self { transport, from })
    }

    async fn send(&self, message: Message) -> Result<(), Error> {
        let Some(transport) = &self.transport else {
            return Err(Error::BusinessPanic(anyhow::anyhow!(
                "Mail service is not configured"
            )));
        };
        transport.send(message).await?;
        Ok(())
    }

    pub async fn send_otp(
        &self,
        to: &str,
        code: &str,
        expires_in: time::Duration,
    ) -> Result<(), Error> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| Error::validation(format!("Invalid email address: {e}")))?)
            .subject("Your Bakehouse login code")
            .body(format!(
                "Your one-time login code is {code}.\n\n\
                 It expires in {} minutes. If you did not request this code, \
                 you can safely ignore this email.\n",
                expires_in.whole_minutes()
            ))
            .map_err(|e| Error::BusinessPanic(e.into()))?;
        self.send(message).await
    }

    pub async fn send_order_confirmation(&self, to: &str, order: &OrderMail) -> Result<(), Error> {
        let delivery_time = order.delivery_time.as_deref().unwrap_or("any time");
        let message = Message::builder()
            .from(self.from.clone())
            .to(to
                .parse()
                .map_err(|e| Error::validation(format!("Invalid email address: {e}")))?)
            .subject(format!("Order confirmed: {}", order.order_id))
            .body(format!(
                "Thank you for your order!\n\n\
                 Order ID: {}\n\
                 Total: {}\n\
                 Delivery: {} ({})\n\n\
                 We will keep you posted as your order moves along.\n",
                order.order_id, order.total, order.delivery_date, delivery_time
            ))
            .map_err(|e| Error::BusinessPanic(e.into()))?;
        self.send(message).await
    }
}
