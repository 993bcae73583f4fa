use std::collections::BTreeMap;

use warden_core::TickContext;

use crate::{Action, Condition, FsmError, GuardWorldMut, Result, StateController};

/// Index of a [`State`] inside the [`StateGraph`] that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Edge of the behavior graph.
///
/// Fires when `condition` evaluates to `trigger_on`; `actions` run before the state changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub condition: Condition,
    pub trigger_on: bool,
    pub next_state: StateId,
    pub actions: Vec<Action>,
}

impl Transition {
    pub fn new(condition: Condition, next_state: StateId) -> Self {
        Self {
            condition,
            trigger_on: true,
            next_state,
            actions: Vec::new(),
        }
    }

    /// Fire when the condition is `false` instead.
    pub fn when_false(mut self) -> Self {
        self.trigger_on = false;
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct State {
    name: String,
    actions: Vec<Action>,
    transitions: Vec<Transition>,
}

impl State {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    /// Run every action in order, then fire the first matching transition, if any.
    pub(crate) fn update<W>(&self, ctx: &TickContext, controller: &mut StateController<W>, world: &mut W)
    where
        W: GuardWorldMut,
    {
        for action in &self.actions {
            action.act(ctx, controller, world);
        }

        for transition in &self.transitions {
            if transition.condition.evaluate(ctx, controller, world) != transition.trigger_on {
                continue;
            }

            for action in &transition.actions {
                action.act(ctx, controller, world);
            }
            controller.change_state(ctx, transition.next_state);
            return;
        }
    }
}

/// Immutable set of states shared by every controller configured with it.
#[derive(Debug, Clone, PartialEq)]
pub struct StateGraph {
    states: Vec<State>,
}

impl StateGraph {
    pub fn builder() -> StateGraphBuilder {
        StateGraphBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, id: StateId) -> Option<&State> {
        self.states.get(id.index())
    }

    /// Like [`StateGraph::get`] for ids known to come from this graph.
    ///
    /// # Panics
    /// If `id` was issued by a different, smaller graph.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .map(|idx| StateId(idx as u32))
    }

    pub fn contains(&self, id: StateId) -> bool {
        id.index() < self.states.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(idx, state)| (StateId(idx as u32), state))
    }
}

/// Declare states by name first, then attach actions and transitions to them.
///
/// ```
/// use warden_fsm::{Action, Condition, StateGraph, Transition};
///
/// let mut builder = StateGraph::builder();
/// let patrol = builder.state("patrol");
/// let chase = builder.state("chase");
/// builder
///     .action(patrol, Action::Patrol)
///     .transition(patrol, Transition::new(Condition::CanSeeTarget, chase))
///     .action(chase, Action::Chase)
///     .transition(chase, Transition::new(Condition::CanSeeTarget, patrol).when_false());
/// let graph = builder.build().unwrap();
/// assert_eq!(graph.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StateGraphBuilder {
    states: Vec<State>,
    by_name: BTreeMap<String, StateId>,
}

impl StateGraphBuilder {
    /// Declare a state, or return the id of the state already declared under `name`.
    pub fn state(&mut self, name: impl Into<String>) -> StateId {
        let name = name.into();
        if let Some(id) = self.by_name.get(&name) {
            return *id;
        }
        let id = StateId(self.states.len() as u32);
        self.by_name.insert(name.clone(), id);
        self.states.push(State {
            name,
            actions: Vec::new(),
            transitions: Vec::new(),
        });
        id
    }

    /// # Panics
    /// If `state` was not returned by this builder.
    pub fn action(&mut self, state: StateId, action: Action) -> &mut Self {
        self.states[state.index()].actions.push(action);
        self
    }

    /// # Panics
    /// If `state` was not returned by this builder.
    pub fn transition(&mut self, state: StateId, transition: Transition) -> &mut Self {
        self.states[state.index()].transitions.push(transition);
        self
    }

    pub fn build(self) -> Result<StateGraph> {
        if self.states.is_empty() {
            return Err(FsmError::EmptyStateGraph);
        }
        let len = self.states.len();
        for state in &self.states {
            for transition in &state.transitions {
                if transition.next_state.index() >= len {
                    return Err(FsmError::InvalidStateId(transition.next_state.index()));
                }
            }
        }
        Ok(StateGraph {
            states: self.states,
        })
    }
}
