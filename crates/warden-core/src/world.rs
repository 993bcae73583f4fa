use crate::AgentId;

/// Read-only world access.
///
/// The core crate does not prescribe which queries a world must expose; navigation and guard
/// behavior define extension traits on top of this one.
pub trait WorldView {
    type Agent: AgentId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
