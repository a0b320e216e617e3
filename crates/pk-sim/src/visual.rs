//! Rendering collaborator seam.

use pk_core::{AgentId, Demographic, GridPos, VisualHandle};
use pk_venue::BuildingKind;

/// Hands out opaque visual handles.  The park stores them and gives them
/// back on removal, nothing more.
pub trait VisualFactory {
    fn visitor(&mut self, agent: AgentId, demographic: Demographic) -> VisualHandle;

    fn building(&mut self, kind: BuildingKind, subtype: &str, pos: GridPos) -> VisualHandle;

    /// The entity owning `handle` is gone.
    fn release(&mut self, _handle: VisualHandle) {}
}

/// Sequential handles, no rendering.
#[derive(Debug, Default)]
pub struct SequentialVisuals {
    next: u64,
}

impl SequentialVisuals {
    fn issue(&mut self) -> VisualHandle {
        let handle = VisualHandle(self.next);
        self.next += 1;
        handle
    }
}

impl VisualFactory for SequentialVisuals {
    fn visitor(&mut self, _agent: AgentId, _demographic: Demographic) -> VisualHandle {
        self.issue()
    }

    fn building(&mut self, _kind: BuildingKind, _subtype: &str, _pos: GridPos) -> VisualHandle {
        self.issue()
    }
}
