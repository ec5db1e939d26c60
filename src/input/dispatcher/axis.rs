use crate::error::DispatchError;
use crate::input::events::{Action, SourceId};
use crate::tool::{HostControls, SketchWorld, SurfaceTool};
use log::trace;

use super::{Ignored, InputDispatcher, Intent, Outcome};

impl<T, W, H> InputDispatcher<T, W, H>
where
    T: SurfaceTool,
    W: SketchWorld,
    H: HostControls,
{
    /// Processes a curve intensity stick change.
    ///
    /// Only the vertical axis is read. Deflection beyond the threshold in
    /// either direction changes the intensity by one step; every event fires
    /// again while the stick stays deflected.
    pub fn on_axis(&mut self, source: &SourceId, x: f32, y: f32) -> Result<Outcome, DispatchError> {
        trace!("Stick from {source}: ({x:.3}, {y:.3})");
        let result = match self.resolve(Action::CurveIntensity, source) {
            Ok(hand) => {
                let threshold = self.settings.intensity_threshold;
                let step = self.settings.intensity_step;
                let delta = if y > threshold {
                    step
                } else if y < -threshold {
                    -step
                } else {
                    0.0
                };

                if delta == 0.0 {
                    Ok(Outcome::Ignored(Ignored::DeadZone))
                } else {
                    self.tool.change_curve_intensity(hand, delta);
                    Ok(Outcome::Dispatched(Intent::ChangeIntensity { hand, delta }))
                }
            }
            Err(reason) => self.ignore(reason),
        };
        self.forward_tool_events();
        result
    }
}
