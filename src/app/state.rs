use super::{ComponentState, DashboardOrchestrator};
use std::collections::HashMap;
use tracing::{debug, warn};

impl DashboardOrchestrator {
    /// Record a component's new state, logging the transition
    pub async fn set_component_state(&self, component: &str, state: ComponentState) {
        let previous = self
            .component_states
            .lock()
            .await
            .insert(component.to_string(), state);

        match (previous, state) {
            (_, ComponentState::Failed) => warn!("Component '{}' failed", component),
            (Some(previous), _) if previous != state => {
                debug!("Component '{}': {} -> {}", component, previous, state)
            }
            (None, _) => debug!("Component '{}' registered as {}", component, state),
            _ => {}
        }
    }

    pub async fn get_component_state(&self, component: &str) -> Option<ComponentState> {
        self.component_states.lock().await.get(component).copied()
    }

    pub async fn get_all_component_states(&self) -> HashMap<String, ComponentState> {
        self.component_states.lock().await.clone()
    }

    /// Names of components currently in `state`, sorted
    pub async fn components_in(&self, state: ComponentState) -> Vec<String> {
        let mut names: Vec<String> = self
            .component_states
            .lock()
            .await
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        names
    }
}
