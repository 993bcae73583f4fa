use crate::{ObserverId, ObserverList};

/// Edge emitted by [`PauseSignal`] when the pause flag actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PauseEdge {
    Paused,
    Resumed,
}

/// Process-wide pause flag with edge-triggered notifications.
///
/// Setting the flag to its current value is a no-op and notifies nobody.
#[derive(Debug, Default)]
pub struct PauseSignal {
    paused: bool,
    observers: ObserverList<PauseEdge>,
}

impl PauseSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) -> Option<PauseEdge> {
        if self.paused == paused {
            return None;
        }
        self.paused = paused;

        let edge = if paused {
            PauseEdge::Paused
        } else {
            PauseEdge::Resumed
        };
        tracing::debug!(?edge, "pause signal changed");
        self.observers.notify(&edge);
        Some(edge)
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PauseEdge) + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }
}
