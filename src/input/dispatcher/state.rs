//! Dispatcher state and event entry points.

use crate::config::{BindingMap, Config, HandMap};
use crate::error::DispatchError;
use crate::input::events::{Action, ButtonEdge, Hand, InputEvent, SourceId, SurfaceId};
use crate::input::relay::{ListenerId, Listeners};
use crate::input::strategy::{CurveStrategy, StrategyCycle};
use crate::tool::{ControllerOrigin, HostControls, SketchWorld, SurfaceTool, ToolEvent, ToolState};
use anyhow::Result;
use log::{debug, trace};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A single call the dispatcher decided to make on a collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    StartTool,
    ExitTool,
    StartDraw,
    StopDraw,
    SetStrategy { strategy: CurveStrategy },
    ChangeIntensity { hand: Hand, delta: f32 },
    SaveWorld,
    LoadWorld,
    HighlightSurface { surface: SurfaceId },
    RevertHighlight { surface: SurfaceId },
    DeleteSurface { surface: SurfaceId },
}

/// Why an event produced no collaborator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Ignored {
    /// Event came from a source that is neither hand
    UnknownSource { source: SourceId },
    /// Action is not bound on this hand
    Unbound { action: Action, hand: Hand },
    /// Tool action set is inactive, so the host would not deliver this action
    ToolActionsInactive { action: Action },
    /// Draw pressed with one hand; the other hand is not holding draw
    WaitingForOtherHand { hand: Hand },
    /// Stick deflection inside the dead zone
    DeadZone,
    /// Pointer target is not a drawn surface
    NotASurface,
    /// Pointer is disabled while the surface tool runs
    PointerDisabled,
    /// Action has no handler for this edge
    NoHandler { action: Action, edge: ButtonEdge },
}

/// Result of dispatching one input event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Dispatched(Intent),
    Ignored(Ignored),
}

/// Resolved, validated settings the dispatcher runs with.
#[derive(Debug, Clone)]
pub struct DispatcherSettings {
    pub hands: HandMap,
    pub bindings: BindingMap,
    pub left_origin: ControllerOrigin,
    pub right_origin: ControllerOrigin,
    /// Stick deflection beyond which intensity changes
    pub intensity_threshold: f32,
    /// Intensity change per stick event
    pub intensity_step: f32,
    /// File the sketch world is saved to and loaded from
    pub world_path: PathBuf,
}

impl DispatcherSettings {
    /// Builds settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (hands, bindings) = config.build_input_maps()?;
        Ok(Self {
            hands,
            bindings,
            left_origin: config.hands.left_origin.clone(),
            right_origin: config.hands.right_origin.clone(),
            intensity_threshold: config.intensity.threshold,
            intensity_step: config.intensity.step,
            world_path: config.world_path()?,
        })
    }
}

/// Draw-button state per hand, tracked from down/up edges.
///
/// Edges are recorded before the tool action set gate, so the flags mirror
/// the physical buttons even while draw presses are not dispatched.
#[derive(Debug, Clone, Copy, Default)]
pub(super) struct HeldButtons {
    left: bool,
    right: bool,
}

impl HeldButtons {
    pub(super) fn set(&mut self, hand: Hand, held: bool) {
        match hand {
            Hand::Left => self.left = held,
            Hand::Right => self.right = held,
        }
    }

    pub(super) fn is_held(&self, hand: Hand) -> bool {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }
}

/// Routes controller events to the surface tool, the sketch world and the host.
///
/// The dispatcher owns no tool state of its own beyond the strategy cursor
/// and the held draw buttons; it reads the tool's state to decide between
/// start and exit and to gate save/load. Handlers take `&mut self` and run to
/// completion, so events are processed strictly in delivery order.
pub struct InputDispatcher<T, W, H> {
    pub(super) tool: T,
    pub(super) world: W,
    pub(super) host: H,
    pub(super) settings: DispatcherSettings,
    pub(super) strategies: StrategyCycle,
    pub(super) draw_held: HeldButtons,
    pub(super) tool_actions_active: bool,
    state_listeners: Listeners<ToolState>,
    strategy_listeners: Listeners<CurveStrategy>,
}

impl<T, W, H> InputDispatcher<T, W, H>
where
    T: SurfaceTool,
    W: SketchWorld,
    H: HostControls,
{
    pub fn new(tool: T, world: W, host: H, settings: DispatcherSettings) -> Self {
        Self {
            tool,
            world,
            host,
            settings,
            strategies: StrategyCycle::new(),
            draw_held: HeldButtons::default(),
            tool_actions_active: false,
            state_listeners: Listeners::new(),
            strategy_listeners: Listeners::new(),
        }
    }

    /// Registers a listener for tool state changes.
    pub fn on_state_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ToolState) + 'static,
    {
        self.state_listeners.subscribe(listener)
    }

    /// Registers a listener for curve strategy changes.
    pub fn on_strategy_changed<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CurveStrategy) + 'static,
    {
        self.strategy_listeners.subscribe(listener)
    }

    pub fn remove_state_listener(&mut self, id: ListenerId) -> bool {
        self.state_listeners.unsubscribe(id)
    }

    pub fn remove_strategy_listener(&mut self, id: ListenerId) -> bool {
        self.strategy_listeners.unsubscribe(id)
    }

    /// Emits the tool's current state to state listeners.
    ///
    /// Call once after wiring listeners so they start from a known state.
    pub fn announce(&mut self) {
        self.forward_tool_events();
        let state = self.tool.current_state();
        debug!("Announcing initial tool state {:?}", state);
        self.state_listeners.emit(&state);
    }

    /// Dispatches one raw input event.
    pub fn handle(&mut self, event: &InputEvent) -> Result<Outcome, DispatchError> {
        match event {
            InputEvent::Button {
                action,
                source,
                edge,
            } => self.on_button(*action, source, *edge),
            InputEvent::Axis { source, x, y } => self.on_axis(source, *x, *y),
            InputEvent::Pointer { phase, target } => self.on_pointer(*phase, target),
        }
    }

    /// Re-emits notifications the tool produced since the last drain.
    pub(super) fn forward_tool_events(&mut self) {
        for event in self.tool.drain_events() {
            trace!("Forwarding tool event {:?}", event);
            match event {
                ToolEvent::StateChanged(state) => self.state_listeners.emit(&state),
                ToolEvent::StrategyChanged(strategy) => self.strategy_listeners.emit(&strategy),
            }
        }
    }

    /// Maps a source to a hand and checks the action is deliverable from it.
    pub(super) fn resolve(&self, action: Action, source: &SourceId) -> Result<Hand, Ignored> {
        let Some(hand) = self.settings.hands.hand_for(source) else {
            return Err(Ignored::UnknownSource {
                source: source.clone(),
            });
        };
        if !self.settings.bindings.is_bound(action, hand) {
            return Err(Ignored::Unbound { action, hand });
        }
        if action.in_tool_set() && !self.tool_actions_active {
            return Err(Ignored::ToolActionsInactive { action });
        }
        Ok(hand)
    }

    pub(super) fn ignore(&self, reason: Ignored) -> Result<Outcome, DispatchError> {
        debug!("Ignoring input: {:?}", reason);
        Ok(Outcome::Ignored(reason))
    }

    pub fn tool(&self) -> &T {
        &self.tool
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }

    pub fn world_path(&self) -> &Path {
        &self.settings.world_path
    }

    pub fn strategy_cycle(&self) -> &StrategyCycle {
        &self.strategies
    }

    pub fn is_draw_held(&self, hand: Hand) -> bool {
        self.draw_held.is_held(hand)
    }

    pub fn tool_actions_active(&self) -> bool {
        self.tool_actions_active
    }
}
