//! YAML-authored behavior configuration.
//!
//! ```yaml
//! initial_state: patrol
//! states:
//!   - name: patrol
//!     actions: [{ kind: patrol }]
//!     transitions:
//!       - when: { kind: can_see_target }
//!         to: chase
//!   - name: chase
//!     actions: [{ kind: chase }, { kind: catch }]
//!     transitions:
//!       - when: { kind: can_see_target }
//!         trigger_on: false
//!         to: search
//!         actions: [{ kind: record_target_state }]
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use warden_nav::Vec3;

use crate::{Action, Condition, FsmError, Result, StateGraph, StateId, Transition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    pub initial_state: String,
    pub states: Vec<StateConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateConfig {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub transitions: Vec<TransitionConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionConfig {
    pub when: Condition,
    #[serde(default = "default_trigger_on")]
    pub trigger_on: bool,
    pub to: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

fn default_trigger_on() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatrolPointConfig {
    pub name: String,
    pub position: Vec3,
    #[serde(default)]
    pub neighbors: Vec<String>,
}

impl MachineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Resolve state names and build the shared graph, returning it with the initial state.
    pub fn build(&self) -> Result<(StateGraph, StateId)> {
        let mut seen = BTreeSet::new();
        for state in &self.states {
            if !seen.insert(state.name.as_str()) {
                return Err(FsmError::DuplicateState(state.name.clone()));
            }
        }

        let mut builder = StateGraph::builder();
        let ids: Vec<StateId> = self
            .states
            .iter()
            .map(|state| builder.state(state.name.clone()))
            .collect();

        let resolve = |name: &str| -> Result<StateId> {
            self.states
                .iter()
                .position(|s| s.name == name)
                .map(|idx| ids[idx])
                .ok_or_else(|| FsmError::UnknownState(name.to_string()))
        };

        for (state, id) in self.states.iter().zip(ids.iter().copied()) {
            for action in &state.actions {
                builder.action(id, *action);
            }
            for transition in &state.transitions {
                if let Condition::TimeInStateElapsed { seconds: Some(seconds) } = transition.when {
                    if !seconds.is_finite() || seconds < 0.0 {
                        return Err(FsmError::InvalidThreshold {
                            state: state.name.clone(),
                            seconds,
                        });
                    }
                }
                let next = resolve(&transition.to)?;
                builder.transition(
                    id,
                    Transition {
                        condition: transition.when,
                        trigger_on: transition.trigger_on,
                        next_state: next,
                        actions: transition.actions.clone(),
                    },
                );
            }
        }

        let initial = resolve(&self.initial_state)?;
        let graph = builder.build()?;
        Ok((graph, initial))
    }
}
