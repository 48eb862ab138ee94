use crate::error::FlowError;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Screens the host can be asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", content = "id", rename_all = "camelCase")]
pub enum Route {
    Entry,
    FieldDetail(String),
    Payment,
    Qr,
    Admin,
}

/// What a stage asks the host to do on entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Screen<T> {
    Render { view: T },
    Redirect { to: Route },
    NotFound { recovery: Route },
}

impl<T> Screen<T> {
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Screen<U>, E> {
        Ok(match self {
            Screen::Render { view } => Screen::Render { view: f(view)? },
            Screen::Redirect { to } => Screen::Redirect { to },
            Screen::NotFound { recovery } => Screen::NotFound { recovery },
        })
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Screen::Redirect { .. })
    }
}

#[derive(Debug, Clone)]
struct View {
    epoch: u64,
    route: Route,
}

/// Tracks the displayed screen. Every navigation starts a new view epoch;
/// work started under an older epoch must not apply its result.
pub struct Navigator {
    current: watch::Sender<View>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        let (current, _) = watch::channel(View {
            epoch: 0,
            route: Route::Entry,
        });
        Self { current }
    }

    pub fn navigate(&self, route: Route) -> ViewTicket {
        self.current.send_modify(|view| {
            view.epoch += 1;
            view.route = route;
        });
        tracing::debug!(route = ?self.route(), "navigated");
        self.ticket()
    }

    /// Ticket for the view currently on screen.
    pub fn ticket(&self) -> ViewTicket {
        let views = self.current.subscribe();
        let epoch = views.borrow().epoch;
        ViewTicket { epoch, views }
    }

    pub fn route(&self) -> Route {
        self.current.borrow().route.clone()
    }
}

pub struct ViewTicket {
    epoch: u64,
    views: watch::Receiver<View>,
}

impl ViewTicket {
    pub fn is_current(&self) -> bool {
        self.views.borrow().epoch == self.epoch
    }

    pub fn ensure_current(&self) -> Result<(), FlowError> {
        if self.is_current() {
            Ok(())
        } else {
            Err(FlowError::Superseded)
        }
    }

    /// Resolves once the view this ticket was issued for is gone.
    pub async fn left(&mut self) {
        while self.is_current() {
            if self.views.changed().await.is_err() {
                return;
            }
        }
    }
}
