use crate::api::BookingApi;
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::FlowError;
use crate::flow::{BookingFlow, SimulatedProcessor};
use crate::session::Session;
use crate::store::SessionStore;
use std::sync::Arc;
use tauri::{AppHandle, Manager};

/// Everything the commands need, registered once in `setup`.
pub struct AppState {
    pub db: Arc<Database>,
    pub session: Session,
    pub flow: BookingFlow,
}

impl AppState {
    pub fn new(db: Arc<Database>, api: Arc<dyn BookingApi>, config: AppConfig) -> Self {
        let store: Arc<dyn SessionStore> = db.clone();
        let processor = Arc::new(SimulatedProcessor::new(config.flow.payment_delay));

        Self {
            session: Session::new(store.clone(), api.clone()),
            flow: BookingFlow::new(store, api, processor, config.flow),
            db,
        }
    }

    /// The booking flow, available only while someone is signed in.
    pub fn signed_in_flow(&self) -> Result<&BookingFlow, FlowError> {
        self.session.require_user()?;
        Ok(&self.flow)
    }
}

pub trait AppStateExt {
    fn booking(&self) -> &AppState;
}

impl AppStateExt for AppHandle {
    fn booking(&self) -> &AppState {
        self.state::<AppState>().inner()
    }
}
