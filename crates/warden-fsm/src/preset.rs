//! Ready-made behavior graphs.

use crate::{Action, Condition, StateGraph, StateId, Transition};

/// Patrol → chase on sight → search after losing sight → back to patrol after the search time
/// limit. Chasing guards catch the target when close enough.
///
/// Returns the graph and its initial (patrol) state.
pub fn standard_guard() -> (StateGraph, StateId) {
    let mut builder = StateGraph::builder();
    let patrol = builder.state("patrol");
    let chase = builder.state("chase");
    let search = builder.state("search");

    builder
        .action(patrol, Action::Patrol)
        .transition(patrol, Transition::new(Condition::CanSeeTarget, chase));

    builder
        .action(chase, Action::Chase)
        .action(chase, Action::Catch)
        .transition(
            chase,
            Transition::new(Condition::CanSeeTarget, search)
                .when_false()
                .with_action(Action::RecordTargetState),
        );

    builder
        .action(search, Action::Search)
        .transition(search, Transition::new(Condition::CanSeeTarget, chase))
        .transition(
            search,
            Transition::new(Condition::TimeInStateElapsed { seconds: None }, patrol)
                .with_action(Action::MoveToPatrolPoint),
        );

    let graph = match builder.build() {
        Ok(graph) => graph,
        Err(err) => unreachable!("standard guard graph is statically valid: {err}"),
    };
    (graph, patrol)
}
