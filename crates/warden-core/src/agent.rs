use core::fmt::Debug;

/// Stable identifier for a simulated entity (guards and the targets they hunt).
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`), used to schedule controllers in a fixed order
/// - a stable numeric ID (`stable_id`) for seeding per-agent RNG streams and trace events
pub trait AgentId: Copy + Ord + Eq + Debug {
    fn stable_id(self) -> u64;
}

impl AgentId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl AgentId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}
