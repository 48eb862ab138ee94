use crate::error::FlowError;
use crate::models::{Draft, Field, SelectionView, Slot};
use crate::store::{SessionStore, SessionStoreExt, StoreKey};
use chrono::{Days, NaiveDate};

/// Today plus the following six days.
pub const BOOKING_WINDOW_DAYS: u64 = 7;

/// The open field page: its slots, the chosen day and the chosen slot.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    field: Field,
    slots: Vec<Slot>,
    today: NaiveDate,
    date: NaiveDate,
    selected: Option<String>,
}

impl SlotSelection {
    pub fn new(field: Field, slots: Vec<Slot>, today: NaiveDate) -> Self {
        Self {
            field,
            slots,
            today,
            date: today,
            selected: None,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..BOOKING_WINDOW_DAYS)
            .filter_map(|offset| self.today.checked_add_days(Days::new(offset)))
            .collect()
    }

    pub fn choose_date(&mut self, date: NaiveDate) -> Result<(), FlowError> {
        if !self.dates().contains(&date) {
            return Err(FlowError::DateOutOfRange(date));
        }
        self.date = date;
        Ok(())
    }

    /// Unavailable slots are refused and leave the current choice untouched.
    pub fn select(&mut self, slot_id: &str) -> Result<&Slot, FlowError> {
        let slot = self
            .slots
            .iter()
            .find(|s| s.id == slot_id)
            .ok_or_else(|| FlowError::UnknownSlot(slot_id.to_string()))?;

        if !slot.is_available {
            tracing::debug!(slot = slot_id, "ignoring selection of unavailable slot");
            return Err(FlowError::SlotUnavailable(slot_id.to_string()));
        }

        self.selected = Some(slot.id.clone());
        Ok(slot)
    }

    pub fn selected(&self) -> Option<&Slot> {
        let id = self.selected.as_deref()?;
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn draft(&self) -> Result<Draft, FlowError> {
        let slot = self.selected().ok_or(FlowError::NoSlotSelected)?;
        Ok(Draft::new(&self.field, slot, self.date))
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            field: self.field.clone(),
            slots: self.slots.clone(),
            dates: self.dates(),
            date: self.date,
            selected_slot_id: self.selected.clone(),
        }
    }
}

/// Persists the draft for the chosen slot, replacing any abandoned one.
pub fn confirm(store: &dyn SessionStore, selection: &SlotSelection) -> Result<Draft, FlowError> {
    let draft = selection.draft()?;
    store.save(StoreKey::Draft, &draft)?;

    tracing::info!(
        field = %draft.resource_id,
        slot = %draft.slot_id,
        date = %draft.date,
        total = draft.total_price,
        "reservation draft created"
    );
    Ok(draft)
}
