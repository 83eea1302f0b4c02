use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::handoff::HandoffStore;
use crate::services::notify::Notifier;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub handoff: HandoffStore,
    pub in_flight: Mutex<HashSet<String>>,
    pub notifier: Box<dyn Notifier>,
}
