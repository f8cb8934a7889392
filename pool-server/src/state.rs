use std::sync::Arc;

use pool_core::EstimateRepository;
use pool_core::export::CompanyProfile;

use crate::client_store::ClientStore;
use crate::config::ServerConfig;
use crate::draft_store::DraftStore;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn EstimateRepository>,
    pub clients: Arc<ClientStore>,
    pub drafts: Arc<DraftStore>,
    pub company: Arc<CompanyProfile>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn EstimateRepository>,
        config: &ServerConfig,
    ) -> Self {
        Self {
            repo,
            clients: Arc::new(ClientStore::new(config.clients_file())),
            drafts: Arc::new(DraftStore::new(config.drafts_dir())),
            company: Arc::new(config.company.clone()),
        }
    }
}
