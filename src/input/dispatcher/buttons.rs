use crate::error::DispatchError;
use crate::input::events::{Action, ButtonEdge, Hand, SourceId};
use crate::input::strategy::CurveStrategy;
use crate::tool::{HostControls, SketchWorld, SurfaceTool};
use log::{debug, info, warn};

use super::{Ignored, InputDispatcher, Intent, Outcome};

impl<T, W, H> InputDispatcher<T, W, H>
where
    T: SurfaceTool,
    W: SketchWorld,
    H: HostControls,
{
    /// Processes a boolean action edge.
    ///
    /// Handles:
    /// - Tool toggle (down, either hand)
    /// - Two-handed draw start (down) and single-handed stop (up)
    /// - Strategy cycling (down)
    /// - World save/load (down, only while the tool is not started)
    pub fn on_button(
        &mut self,
        action: Action,
        source: &SourceId,
        edge: ButtonEdge,
    ) -> Result<Outcome, DispatchError> {
        if action == Action::Draw {
            self.track_draw_edge(source, edge);
        }
        let result = match self.resolve(action, source) {
            Ok(hand) => self.handle_button(action, hand, edge),
            Err(reason) => self.ignore(reason),
        };
        self.forward_tool_events();
        result
    }

    fn handle_button(
        &mut self,
        action: Action,
        hand: Hand,
        edge: ButtonEdge,
    ) -> Result<Outcome, DispatchError> {
        match (action, edge) {
            (Action::ToggleTool, ButtonEdge::Down) => Ok(self.toggle_tool()),
            (Action::Draw, ButtonEdge::Down) => Ok(self.draw_pressed(hand)),
            (Action::Draw, ButtonEdge::Up) => Ok(self.draw_released(hand)),
            (Action::NextStrategy, ButtonEdge::Down) => {
                let strategy = self.strategies.next();
                Ok(self.apply_strategy(strategy))
            }
            (Action::PreviousStrategy, ButtonEdge::Down) => {
                let strategy = self.strategies.previous();
                Ok(self.apply_strategy(strategy))
            }
            (Action::SaveWorld, ButtonEdge::Down) => self.save_world(),
            (Action::LoadWorld, ButtonEdge::Down) => self.load_world(),
            _ => self.ignore(Ignored::NoHandler { action, edge }),
        }
    }

    fn toggle_tool(&mut self) -> Outcome {
        if self.tool.current_state().is_started() {
            info!("Surface tool deactivated");
            self.host.deactivate_tool_actions();
            self.tool_actions_active = false;
            self.tool.exit_tool();
            self.host.set_pointer_enabled(true);
            Outcome::Dispatched(Intent::ExitTool)
        } else {
            info!("Surface tool activated");
            self.host.activate_tool_actions();
            self.tool_actions_active = true;
            self.tool
                .start_tool(&self.settings.left_origin, &self.settings.right_origin);
            self.host.set_pointer_enabled(false);
            Outcome::Dispatched(Intent::StartTool)
        }
    }

    fn track_draw_edge(&mut self, source: &SourceId, edge: ButtonEdge) {
        let Some(hand) = self.settings.hands.hand_for(source) else {
            return;
        };
        if self.settings.bindings.is_bound(Action::Draw, hand) {
            self.draw_held.set(hand, edge == ButtonEdge::Down);
        }
    }

    /// Starts a stroke when this press completes a two-handed hold.
    fn draw_pressed(&mut self, hand: Hand) -> Outcome {
        if !self.draw_held.is_held(hand.other()) {
            debug!("Draw held on {hand} hand, waiting for {}", hand.other());
            return Outcome::Ignored(Ignored::WaitingForOtherHand { hand });
        }
        debug!("Both draw buttons held, starting surface");
        self.tool.start_draw_surface();
        Outcome::Dispatched(Intent::StartDraw)
    }

    /// Any release ends the stroke, regardless of which hand started it.
    fn draw_released(&mut self, hand: Hand) -> Outcome {
        debug!("Draw released on {hand} hand, stopping surface");
        self.tool.stop_draw_surface();
        Outcome::Dispatched(Intent::StopDraw)
    }

    fn apply_strategy(&mut self, strategy: CurveStrategy) -> Outcome {
        debug!(
            "Curve strategy -> {:?} (counter {})",
            strategy,
            self.strategies.counter()
        );
        self.tool.set_drawing_curve_strategy(strategy);
        Outcome::Dispatched(Intent::SetStrategy { strategy })
    }

    fn save_world(&mut self) -> Result<Outcome, DispatchError> {
        if self.tool.current_state().is_started() {
            warn!("Refusing to save sketch world while the surface tool is running");
            return Err(DispatchError::ToolActive {
                intent: Intent::SaveWorld,
            });
        }

        let path = self.settings.world_path.clone();
        self.world
            .save(&path)
            .map_err(|cause| DispatchError::Save {
                path: path.clone(),
                cause,
            })?;
        info!("Sketch world saved to {}", path.display());
        Ok(Outcome::Dispatched(Intent::SaveWorld))
    }

    fn load_world(&mut self) -> Result<Outcome, DispatchError> {
        if self.tool.current_state().is_started() {
            warn!("Refusing to load sketch world while the surface tool is running");
            return Err(DispatchError::ToolActive {
                intent: Intent::LoadWorld,
            });
        }

        let path = self.settings.world_path.clone();
        self.world
            .load(&path)
            .map_err(|cause| DispatchError::Load {
                path: path.clone(),
                cause,
            })?;
        info!("Sketch world loaded from {}", path.display());
        Ok(Outcome::Dispatched(Intent::LoadWorld))
    }
}
