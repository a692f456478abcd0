use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, ProviderRegistry};
use crate::workflow::plan::PlanSynthesizer;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub providers: Arc<ProviderRegistry>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        issue_tracker: Arc<dyn IssueTrackerService>,
        providers: ProviderRegistry,
    ) -> Self {
        Self {
            config,
            issue_tracker,
            providers: Arc::new(providers),
        }
    }

    pub fn synthesizer(&self) -> PlanSynthesizer {
        PlanSynthesizer::new(self.issue_tracker.clone(), self.providers.clone())
    }
}
