use super::navigation::{Route, Screen};
use crate::error::StoreResult;
use crate::models::{Draft, QrRecord};
use crate::store::{SessionStore, SessionStoreExt};

/// Stages that can only be entered with an upstream artifact in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardedStage {
    Payment,
    Receipt,
}

/// Does the artifact `stage` depends on exist?
pub fn admits(store: &dyn SessionStore, stage: GuardedStage) -> StoreResult<bool> {
    Ok(match stage {
        GuardedStage::Payment => store.draft()?.is_some(),
        GuardedStage::Receipt => store.receipt()?.is_some(),
    })
}

pub fn payment(store: &dyn SessionStore) -> StoreResult<Screen<Draft>> {
    Ok(match store.draft()? {
        Some(draft) => Screen::Render { view: draft },
        None => redirect(GuardedStage::Payment),
    })
}

pub fn receipt(store: &dyn SessionStore) -> StoreResult<Screen<QrRecord>> {
    Ok(match store.receipt()? {
        Some(record) => Screen::Render { view: record },
        None => redirect(GuardedStage::Receipt),
    })
}

fn redirect<T>(stage: GuardedStage) -> Screen<T> {
    tracing::info!(?stage, "required upstream state missing, redirecting to entry");
    Screen::Redirect { to: Route::Entry }
}
