use std::sync::Arc;

use crate::config::Config;
use crate::email::Mailer;
use crate::llm_client::TextGenerator;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` when no AI key is configured; suggestions then use the fallback pool.
    pub llm: Option<Arc<dyn TextGenerator>>,
    pub config: Config,
}
