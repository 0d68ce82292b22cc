//! Notification rendering and delivery.
//!
//! Renders plain-text client and staff e-mails for each notification event
//! and hands them to the [`Mailer`] transport. The shipped transport logs
//! deliveries; swapping in a real SMTP client only touches the trait impl.

use crate::config::WorkerConfig;
use async_trait::async_trait;
use pyrostage_domain::events::{BookingSnapshot, NotificationEvent};
use std::sync::Arc;
use tracing::info;

/// A rendered outbound e-mail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Mail transport abstraction.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Transport that logs deliveries instead of speaking SMTP.
///
/// TODO: wire a real SMTP transport once the mail relay credentials are
/// provisioned for the production environment.
pub struct LoggingMailer {
    from: String,
}

impl LoggingMailer {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Mailer for LoggingMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        info!(
            from = %self.from,
            to = %message.to,
            subject = %message.subject,
            "Email delivered"
        );
        Ok(())
    }
}

/// Renders and dispatches notifications for queue jobs.
pub struct NotificationWorker {
    mailer: Arc<dyn Mailer>,
    config: WorkerConfig,
}

impl NotificationWorker {
    pub fn new(mailer: Arc<dyn Mailer>, config: WorkerConfig) -> Self {
        Self { mailer, config }
    }

    /// Process one notification event: render the messages it implies and
    /// send them all.
    pub async fn process(&self, event: &NotificationEvent) -> anyhow::Result<()> {
        for message in self.render(event) {
            self.mailer.send(&message).await?;
        }
        Ok(())
    }

    /// Render the outbound messages for an event.
    pub fn render(&self, event: &NotificationEvent) -> Vec<EmailMessage> {
        match event {
            NotificationEvent::BookingReceived { booking } => vec![
                self.booking_confirmation(booking),
                self.admin_booking_alert(booking),
            ],
            NotificationEvent::BookingStatusChanged {
                booking,
                old_status,
                new_status,
                notes,
            } => {
                let mut body = format!(
                    "Hello {},\n\n\
                     The status of your booking {} ({}) has changed:\n\
                     {} -> {}\n",
                    booking.client_name,
                    booking.id,
                    booking.event_name,
                    old_status,
                    new_status,
                );
                if let Some(notes) = notes {
                    body.push_str(&format!("\nNotes: {}\n", notes));
                }
                body.push_str(&self.signature());

                vec![EmailMessage {
                    to: booking.client_email.clone(),
                    subject: format!("Booking status updated - {}", booking.event_name),
                    body,
                }]
            }
            NotificationEvent::PaymentRecorded { booking, amount } => vec![EmailMessage {
                to: booking.client_email.clone(),
                subject: format!("Payment received - booking {}", booking.id),
                body: format!(
                    "Hello {},\n\n\
                     We have received your payment of {}.\n\n\
                     Total amount: {}\n\
                     Paid to date: {}\n\
                     Balance due:  {}\n\
                     Payment status: {}\n{}",
                    booking.client_name,
                    amount,
                    booking.total_price,
                    booking.deposit_paid,
                    booking.balance_due,
                    booking.payment_status,
                    self.signature(),
                ),
            }],
            NotificationEvent::BookingCancelled {
                booking,
                fee,
                reason,
            } => {
                let mut body = format!(
                    "Hello {},\n\n\
                     Your booking {} ({}) has been cancelled.\n",
                    booking.client_name, booking.id, booking.event_name,
                );
                if let Some(reason) = reason {
                    body.push_str(&format!("\nReason: {}\n", reason));
                }
                if !fee.is_zero() {
                    body.push_str(&format!("\nCancellation fee: {}\n", fee));
                }
                body.push_str(
                    "\nIf you have questions about the cancellation or a refund, \
                     please contact us.\n",
                );
                body.push_str(&self.signature());

                vec![EmailMessage {
                    to: booking.client_email.clone(),
                    subject: format!("Booking cancelled - {}", booking.event_name),
                    body,
                }]
            }
            NotificationEvent::ContactReceived {
                name,
                email,
                phone,
                event_type,
                message,
            } => vec![EmailMessage {
                to: self.config.email.admin_address.clone(),
                subject: format!("New inquiry from {}", name),
                body: format!(
                    "New contact inquiry:\n\n\
                     Name:  {}\n\
                     Email: {}\n\
                     Phone: {}\n\
                     Event: {}\n\n\
                     {}\n\n\
                     Please follow up from the admin panel.\n",
                    name, email, phone, event_type, message,
                ),
            }],
            NotificationEvent::NewsletterSubscribed { email } => vec![EmailMessage {
                to: email.clone(),
                subject: format!("Welcome to the {} newsletter", self.config.company.name),
                body: format!(
                    "You are now subscribed to news and offers from {}.\n\
                     You can unsubscribe at any time.\n{}",
                    self.config.company.name,
                    self.signature(),
                ),
            }],
        }
    }

    fn booking_confirmation(&self, booking: &BookingSnapshot) -> EmailMessage {
        EmailMessage {
            to: booking.client_email.clone(),
            subject: format!("Booking received - {}", booking.event_name),
            body: format!(
                "Dear {},\n\n\
                 Thank you for booking {} for your {}. Your booking has been \
                 received and is being processed.\n\n\
                 Booking details:\n\
                 Booking id: {}\n\
                 Event:      {}\n\
                 Date:       {}\n\
                 Time:       {}\n\
                 Location:   {}\n\
                 Package:    {}\n\
                 Duration:   {}\n\n\
                 Total amount: {}\n\
                 Balance due:  {}\n\n\
                 Next steps:\n\
                 1. Our team will contact you within 24 hours for a site assessment\n\
                 2. A deposit payment secures your date\n\
                 3. We will send the safety and permit documentation\n{}",
                booking.client_name,
                self.config.company.name,
                booking.event_type,
                booking.id,
                booking.event_name,
                booking.event_date,
                booking.event_time,
                booking.event_location,
                booking.service_package,
                booking.display_duration,
                booking.total_price,
                booking.balance_due,
                self.signature(),
            ),
        }
    }

    fn admin_booking_alert(&self, booking: &BookingSnapshot) -> EmailMessage {
        EmailMessage {
            to: self.config.email.admin_address.clone(),
            subject: format!("New booking - {} - {}", booking.id, booking.event_name),
            body: format!(
                "New booking received:\n\n\
                 Booking id: {}\n\
                 Client: {} <{}> ({})\n\
                 Event:  {} ({})\n\
                 Date:   {} at {}\n\
                 Location: {}\n\
                 Service:  {} - {}\n\
                 Amount:   {}\n\
                 Status:   {}\n\n\
                 Please review in the admin panel.\n",
                booking.id,
                booking.client_name,
                booking.client_email,
                booking.client_phone,
                booking.event_name,
                booking.event_type,
                booking.event_date,
                booking.event_time,
                booking.event_location,
                booking.service_type,
                booking.service_package,
                booking.total_price,
                booking.booking_status,
            ),
        }
    }

    fn signature(&self) -> String {
        format!(
            "\nBest regards,\n{}\n{} | {}\n",
            self.config.company.name, self.config.company.phone, self.config.company.email,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use parking_lot::Mutex;
    use pyrostage_domain::booking::{BookingStatus, PaymentStatus};
    use pyrostage_domain::identifiers::BookingId;
    use rust_decimal_macros::dec;

    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
            self.sent.lock().push(message.clone());
            Ok(())
        }
    }

    fn snapshot() -> BookingSnapshot {
        BookingSnapshot {
            id: BookingId::new(),
            client_name: "Amina Odhiambo".into(),
            client_email: "amina@example.com".into(),
            client_phone: "+254700111222".into(),
            event_type: "wedding".into(),
            event_name: "Odhiambo Wedding".into(),
            event_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            event_time: "20:00".into(),
            event_location: "Karen Country Club".into(),
            service_type: "fireworks".into(),
            service_package: "gold".into(),
            display_duration: "15 minutes".into(),
            total_price: dec!(75000),
            deposit_paid: dec!(25000),
            balance_due: dec!(50000),
            booking_status: BookingStatus::Pending,
            payment_status: PaymentStatus::Partial,
        }
    }

    fn worker(mailer: Arc<dyn Mailer>) -> NotificationWorker {
        NotificationWorker::new(mailer, WorkerConfig::default())
    }

    #[tokio::test]
    async fn booking_received_sends_client_and_admin_mail() {
        let mailer = Arc::new(RecordingMailer {
            sent: Mutex::new(vec![]),
        });
        let worker = worker(mailer.clone());

        worker
            .process(&NotificationEvent::BookingReceived {
                booking: snapshot(),
            })
            .await
            .unwrap();

        let sent = mailer.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, "amina@example.com");
        assert!(sent[0].body.contains("Odhiambo Wedding"));
        assert_eq!(sent[1].to, WorkerConfig::default().email.admin_address);
    }

    #[test]
    fn payment_mail_carries_the_new_totals() {
        let worker = worker(Arc::new(LoggingMailer::new("noreply@pyrostage.example")));

        let messages = worker.render(&NotificationEvent::PaymentRecorded {
            booking: snapshot(),
            amount: dec!(25000),
        });

        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("25000"));
        assert!(messages[0].body.contains("50000"));
        assert!(messages[0].body.contains("partial"));
    }

    #[test]
    fn cancellation_mail_includes_fee_and_reason() {
        let worker = worker(Arc::new(LoggingMailer::new("noreply@pyrostage.example")));

        let messages = worker.render(&NotificationEvent::BookingCancelled {
            booking: snapshot(),
            fee: dec!(37500.00),
            reason: Some("venue flooded".into()),
        });

        assert_eq!(messages.len(), 1);
        assert!(messages[0].body.contains("37500.00"));
        assert!(messages[0].body.contains("venue flooded"));
    }

    #[test]
    fn zero_fee_cancellation_omits_fee_line() {
        let worker = worker(Arc::new(LoggingMailer::new("noreply@pyrostage.example")));

        let messages = worker.render(&NotificationEvent::BookingCancelled {
            booking: snapshot(),
            fee: rust_decimal::Decimal::ZERO,
            reason: None,
        });

        assert!(!messages[0].body.contains("Cancellation fee"));
    }

    #[test]
    fn status_change_mail_names_both_statuses() {
        let worker = worker(Arc::new(LoggingMailer::new("noreply@pyrostage.example")));

        let messages = worker.render(&NotificationEvent::BookingStatusChanged {
            booking: snapshot(),
            old_status: BookingStatus::Pending,
            new_status: BookingStatus::Confirmed,
            notes: Some("Deposit received".into()),
        });

        assert!(messages[0].body.contains("pending -> confirmed"));
        assert!(messages[0].body.contains("Deposit received"));
    }
}
