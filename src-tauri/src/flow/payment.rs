//! Payment stage. Card input is only formatted, never authorised; settlement
//! goes through a [`PaymentProcessor`], which in this client is simulated.

use super::navigation::ViewTicket;
use crate::error::{FlowError, SettlementError};
use crate::models::{CardDetails, Draft, QrRecord};
use crate::store::{SessionStore, SessionStoreExt};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const CARD_NUMBER_DIGITS: usize = 16;
pub const SECURITY_CODE_DIGITS: usize = 4;

fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups up to sixteen digits in blocks of four: `1234 5678 9012 3456`.
pub fn format_card_number(input: &str) -> String {
    let digits: Vec<char> = digits(input).chars().take(CARD_NUMBER_DIGITS).collect();

    digits
        .chunks(4)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `MMYY` -> `MM/YY`; the slash appears once two digits are typed.
pub fn format_expiry(input: &str) -> String {
    let digits = digits(input);
    if digits.len() < 2 {
        return digits;
    }
    let (month, year) = digits.split_at(2);
    format!("{month}/{}", &year[..year.len().min(2)])
}

pub fn format_security_code(input: &str) -> String {
    digits(input).chars().take(SECURITY_CODE_DIGITS).collect()
}

impl CardDetails {
    /// Applies the input formatting and rejects empty fields.
    pub fn normalized(&self) -> Result<CardDetails, FlowError> {
        let card = CardDetails {
            number: format_card_number(&self.number),
            holder: self.holder.trim().to_string(),
            expiry: format_expiry(&self.expiry),
            security_code: format_security_code(&self.security_code),
        };

        if card.number.is_empty() {
            return Err(FlowError::InvalidCard("card number is required"));
        }
        if card.holder.is_empty() {
            return Err(FlowError::InvalidCard("card holder is required"));
        }
        if card.expiry.is_empty() {
            return Err(FlowError::InvalidCard("expiry is required"));
        }
        if card.security_code.is_empty() {
            return Err(FlowError::InvalidCard("security code is required"));
        }

        Ok(card)
    }
}

#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn settle(&self, draft: &Draft, card: &CardDetails) -> Result<(), SettlementError>;
}

/// Waits a fixed delay and then always settles.
pub struct SimulatedProcessor {
    delay: Duration,
}

impl SimulatedProcessor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn settle(&self, draft: &Draft, _card: &CardDetails) -> Result<(), SettlementError> {
        tracing::debug!(
            field = %draft.resource_id,
            delay_ms = self.delay.as_millis() as u64,
            "simulating settlement"
        );
        tokio::time::sleep(self.delay).await;
        Ok(())
    }
}

/// Holds the in-flight flag for as long as a submission is pending.
struct Pending<'a>(&'a AtomicBool);

impl<'a> Pending<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Pending(flag))
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Default)]
pub struct PaymentStage {
    in_flight: AtomicBool,
}

impl PaymentStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Settles the stored draft and swaps it for a receipt.
    ///
    /// A second call while one is pending fails with
    /// [`FlowError::PaymentInFlight`]. If the view behind `ticket` is left
    /// before settlement completes the result is dropped and the draft stays.
    /// A failed settlement also keeps the draft so the user can retry.
    pub async fn submit(
        &self,
        store: &dyn SessionStore,
        processor: &dyn PaymentProcessor,
        card: &CardDetails,
        ticket: &mut ViewTicket,
    ) -> Result<QrRecord, FlowError> {
        let _pending = Pending::acquire(&self.in_flight).ok_or(FlowError::PaymentInFlight)?;

        let draft = store.draft()?.ok_or(FlowError::NoDraft)?;
        let card = card.normalized()?;

        tracing::info!(field = %draft.resource_id, slot = %draft.slot_id, "submitting payment");

        let settled = tokio::select! {
            result = processor.settle(&draft, &card) => result,
            _ = ticket.left() => {
                tracing::info!("payment view left before settlement, discarding result");
                return Err(FlowError::Superseded);
            }
        };

        if let Err(err) = settled {
            tracing::warn!(error = %err, "settlement failed, draft kept for retry");
            return Err(err.into());
        }

        ticket.ensure_current()?;

        let receipt = QrRecord::issue(&draft, Utc::now());
        store.settle(&receipt)?;

        tracing::info!(
            reservation = %receipt.reservation_id,
            total = receipt.total_price,
            "payment settled, receipt issued"
        );
        Ok(receipt)
    }
}
