//! The reservation hand-off: slot selection, payment and QR issuance.
//!
//! ```text
//! Entry --confirm available slot--> DraftHeld --payment settles--> QrHeld
//!   ^            |                      |                            |
//!   |            +--- navigate away ----+                            |
//!   +------------------------- start new booking --------------------+
//! ```
//!
//! Payment and QR issuance are guarded: without their upstream artifact in the
//! store they redirect to the entry listing.

pub mod guard;
pub mod navigation;
pub mod payment;
pub mod receipt;
pub mod selection;

pub use navigation::{Navigator, Route, Screen, ViewTicket};
pub use payment::{PaymentProcessor, PaymentStage, SimulatedProcessor};
pub use receipt::{ClipboardSink, ShareError, ShareOutcome, ShareSink};
pub use selection::SlotSelection;

use crate::api::BookingApi;
use crate::config::FlowConfig;
use crate::error::{FlowError, StoreError};
use crate::models::{CardDetails, Draft, Field, QrRecord, ReceiptView, SelectionView};
use crate::store::{SessionStore, SessionStoreExt, StoreKey};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct BookingFlow {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn BookingApi>,
    processor: Arc<dyn PaymentProcessor>,
    navigator: Navigator,
    selection: Mutex<Option<SlotSelection>>,
    payment: PaymentStage,
    settings: FlowConfig,
}

impl BookingFlow {
    pub fn new(
        store: Arc<dyn SessionStore>,
        api: Arc<dyn BookingApi>,
        processor: Arc<dyn PaymentProcessor>,
        settings: FlowConfig,
    ) -> Self {
        Self {
            store,
            api,
            processor,
            navigator: Navigator::new(),
            selection: Mutex::new(None),
            payment: PaymentStage::new(),
            settings,
        }
    }

    pub fn route(&self) -> Route {
        self.navigator.route()
    }

    pub fn payment_pending(&self) -> bool {
        self.payment.is_pending()
    }

    /// Host-driven navigation (back buttons, links). Pending work for the
    /// previous view is discarded.
    pub fn leave(&self, to: Route) {
        self.navigator.navigate(to);
    }

    fn selection(&self) -> Result<MutexGuard<'_, Option<SlotSelection>>, FlowError> {
        self.selection
            .lock()
            .map_err(|e| StoreError::Backend(e.to_string()).into())
    }

    /// Entry listing. An unreachable API reads as an empty listing.
    pub async fn entry(&self) -> Result<Vec<Field>, FlowError> {
        let ticket = self.navigator.navigate(Route::Entry);

        let fields = match self.api.available_fields().await {
            Ok(fields) => fields,
            Err(err) => {
                tracing::warn!(error = %err, "failed to load available fields");
                Vec::new()
            }
        };

        ticket.ensure_current()?;
        Ok(fields)
    }

    pub async fn open_field(
        &self,
        field_id: &str,
        today: NaiveDate,
    ) -> Result<Screen<SelectionView>, FlowError> {
        let ticket = self
            .navigator
            .navigate(Route::FieldDetail(field_id.to_string()));

        let field = match self.api.field(field_id).await {
            Ok(Some(field)) => Some(field),
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(field = field_id, error = %err, "failed to load field");
                None
            }
        };

        let Some(field) = field else {
            ticket.ensure_current()?;
            *self.selection()? = None;
            return Ok(Screen::NotFound {
                recovery: Route::Entry,
            });
        };

        let slots = match self.api.schedules(&field).await {
            Ok(slots) => slots,
            Err(err) => {
                tracing::warn!(field = field_id, error = %err, "failed to load schedules");
                Vec::new()
            }
        };

        ticket.ensure_current()?;

        let selection = SlotSelection::new(field, slots, today);
        let view = selection.view();
        *self.selection()? = Some(selection);

        Ok(Screen::Render { view })
    }

    pub fn choose_date(&self, date: NaiveDate) -> Result<SelectionView, FlowError> {
        let mut guard = self.selection()?;
        let selection = guard.as_mut().ok_or(FlowError::NoFieldOpen)?;
        selection.choose_date(date)?;
        Ok(selection.view())
    }

    pub fn select_slot(&self, slot_id: &str) -> Result<SelectionView, FlowError> {
        let mut guard = self.selection()?;
        let selection = guard.as_mut().ok_or(FlowError::NoFieldOpen)?;
        selection.select(slot_id)?;
        Ok(selection.view())
    }

    /// Writes the draft and hands off to payment.
    pub fn confirm_selection(&self) -> Result<Route, FlowError> {
        {
            let guard = self.selection()?;
            let selection = guard.as_ref().ok_or(FlowError::NoFieldOpen)?;
            selection::confirm(self.store.as_ref(), selection)?;
        }

        self.navigator.navigate(Route::Payment);
        Ok(Route::Payment)
    }

    pub fn enter_payment(&self) -> Result<Screen<Draft>, FlowError> {
        self.navigator.navigate(Route::Payment);
        let screen = guard::payment(self.store.as_ref())?;
        if screen.is_redirect() {
            self.navigator.navigate(Route::Entry);
        }
        Ok(screen)
    }

    pub async fn submit_payment(&self, card: &CardDetails) -> Result<QrRecord, FlowError> {
        let mut ticket = self.navigator.ticket();

        let receipt = self
            .payment
            .submit(
                self.store.as_ref(),
                self.processor.as_ref(),
                card,
                &mut ticket,
            )
            .await?;

        self.navigator.navigate(Route::Qr);
        Ok(receipt)
    }

    pub fn enter_receipt(&self) -> Result<Screen<ReceiptView>, FlowError> {
        self.navigator.navigate(Route::Qr);

        let screen = guard::receipt(self.store.as_ref())?;
        if screen.is_redirect() {
            self.navigator.navigate(Route::Entry);
        }

        Ok(screen.try_map(|record| receipt::render(&record))?)
    }

    pub fn download_receipt(&self, dir: &Path) -> Result<PathBuf, FlowError> {
        let record = self.store.receipt()?.ok_or(FlowError::NoReceipt)?;
        Ok(receipt::download(&record, dir)?)
    }

    pub async fn share_receipt(
        &self,
        target: &dyn ShareSink,
        clipboard: &dyn ClipboardSink,
    ) -> Result<ShareOutcome, FlowError> {
        let record = self.store.receipt()?.ok_or(FlowError::NoReceipt)?;
        Ok(receipt::share(&record, target, clipboard).await?)
    }

    /// Back to the entry listing. The last receipt stays in the store unless
    /// the flow is configured to clear it.
    pub fn start_new_booking(&self) -> Result<Route, FlowError> {
        if self.settings.clear_receipt_on_new_booking {
            self.store.clear(StoreKey::QrRecord)?;
            tracing::debug!("cleared previous receipt");
        }

        *self.selection()? = None;
        self.navigator.navigate(Route::Entry);
        Ok(Route::Entry)
    }
}
