use charter_core::{CatalogAdmin, Notifier, QuotingService, QuotingSettings, Stores};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub quoting: Arc<QuotingService>,
    pub admin: Arc<CatalogAdmin>,
}

impl AppState {
    pub fn new(stores: Stores, notifier: Arc<dyn Notifier>, settings: QuotingSettings) -> Self {
        Self {
            quoting: Arc::new(QuotingService::new(&stores, notifier, settings)),
            admin: Arc::new(CatalogAdmin::new(&stores)),
        }
    }
}
