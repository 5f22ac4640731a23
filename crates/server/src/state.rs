use service::RiskService;

/// Shared handler state. Cloned per request; holds only the service handle.
#[derive(Clone)]
pub struct AppState {
    pub risks: RiskService,
}

impl AppState {
    pub fn new(risks: RiskService) -> Self {
        Self { risks }
    }
}
