use std::sync::Arc;
use tracing::debug;

use crate::host::GlobalNavigator;
use crate::types::RuleError;

pub struct BackAction {
    navigator: Arc<dyn GlobalNavigator>,
}

impl BackAction {
    pub fn new(navigator: Arc<dyn GlobalNavigator>) -> Self {
        Self { navigator }
    }

    pub fn on_seen(&self) -> Result<(), RuleError> {
        debug!("执行全局返回");
        if !self.navigator.back() {
            return Err(RuleError::NavigationRejected);
        }
        Ok(())
    }
}

impl std::fmt::Debug for BackAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BackAction")
    }
}
