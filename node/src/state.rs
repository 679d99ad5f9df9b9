//! The node's authoritative state.

use estate_registry::PropertyRegistry;
use estate_types::EstateEvent;
use estate_valuation::ValuationWorkflow;
use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;
use crate::NodeError;

/// Registry plus valuation workflow: everything a snapshot persists.
///
/// Each component owns its own tables; cross-component access goes through
/// their public operations only.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EstateState {
    pub registry: PropertyRegistry,
    pub workflow: ValuationWorkflow,
}

impl EstateState {
    /// Fresh, empty state. When `authorize_workflow` is set the workflow's
    /// writer identity is designated as the registry's writer.
    pub fn new(config: &NodeConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let mut registry =
            PropertyRegistry::new(config.administrator.clone(), config.params.clone());
        if config.authorize_workflow {
            registry.designate_writer(config.workflow_writer.clone(), &config.administrator)?;
        }
        let workflow = ValuationWorkflow::new(config.workflow_writer.clone(), config.params.clone());
        Ok(Self { registry, workflow })
    }

    /// Configured identities and thresholds that this state disagrees with.
    ///
    /// Restored state keeps its own values for these, so a non-empty result
    /// means the corresponding config entries have no effect.
    pub fn config_overrides(&self, config: &NodeConfig) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.registry.authorization().administrator() != &config.administrator {
            fields.push("administrator");
        }
        if self.workflow.writer() != &config.workflow_writer {
            fields.push("workflow_writer");
        }
        if self.registry.params() != &config.params || self.workflow.params() != &config.params {
            fields.push("params");
        }
        fields
    }

    /// Events from both components, registry first.
    pub fn drain_events(&mut self) -> Vec<EstateEvent> {
        let mut events = self.registry.drain_events();
        events.extend(self.workflow.drain_events());
        events
    }
}
