//! Aggregated views of a single event.

use serde::Serialize;

use crate::domain::client::Client;
use crate::domain::email_history::EmailRecord;
use crate::domain::event::{Event, SnapshotDish, WineLine};
use crate::domain::menu::Menu;

/// Everything the event screen shows at once.
#[derive(Debug, Clone, Serialize)]
pub struct EventDetails {
    pub event: Event,
    pub client: Option<Client>,
    pub menu: Option<Menu>,
    pub wines: Vec<WineLine>,
    pub dishes: Vec<SnapshotDish>,
    pub email_history: Vec<EmailRecord>,
}
