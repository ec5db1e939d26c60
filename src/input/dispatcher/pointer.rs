use crate::error::DispatchError;
use crate::input::events::{PointerPhase, PointerTarget};
use crate::tool::{HostControls, SketchWorld, SurfaceTool};
use log::debug;

use super::{Ignored, InputDispatcher, Intent, Outcome};

impl<T, W, H> InputDispatcher<T, W, H>
where
    T: SurfaceTool,
    W: SketchWorld,
    H: HostControls,
{
    /// Processes a laser pointer notification.
    ///
    /// # Behavior
    /// - Enter on a surface: highlights it
    /// - Exit from a surface: reverts the highlight
    /// - Click on a surface: deletes it
    /// - Any other target is ignored
    /// - Nothing is dispatched while the tool runs and the pointer is disabled
    pub fn on_pointer(
        &mut self,
        phase: PointerPhase,
        target: &PointerTarget,
    ) -> Result<Outcome, DispatchError> {
        if self.tool_actions_active {
            let result = self.ignore(Ignored::PointerDisabled);
            self.forward_tool_events();
            return result;
        }
        let Some(surface) = target.surface() else {
            let result = self.ignore(Ignored::NotASurface);
            self.forward_tool_events();
            return result;
        };

        let intent = match phase {
            PointerPhase::Enter => {
                self.world.highlight_surface(surface);
                Intent::HighlightSurface { surface }
            }
            PointerPhase::Exit => {
                self.world.revert_highlight(surface);
                Intent::RevertHighlight { surface }
            }
            PointerPhase::Click => {
                debug!("Deleting {surface} on pointer click");
                self.world.delete_surface(surface);
                Intent::DeleteSurface { surface }
            }
        };
        self.forward_tool_events();
        Ok(Outcome::Dispatched(intent))
    }
}
