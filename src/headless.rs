//! Recording collaborators for running the dispatcher without a host engine.
//!
//! Every call is appended to a shared [`CallLog`]. The tool keeps a minimal
//! lifecycle (`NotStarted → Ready ↔ Drawing`) so that start/exit toggling and
//! save/load gating behave as they would against the real tool. The world
//! records save/load requests but never touches the filesystem.

use crate::input::{CurveStrategy, Hand, STRATEGY_ORDER, SurfaceId};
use crate::tool::{ControllerOrigin, HostControls, SketchWorld, SurfaceTool, ToolEvent, ToolState};
use anyhow::{Result, anyhow};
use log::{debug, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

const INITIAL_INTENSITY: f32 = 0.5;

/// One collaborator call, in the order it was made.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum Call {
    StartTool { left: String, right: String },
    ExitTool,
    StartDrawSurface,
    StopDrawSurface,
    SetStrategy { strategy: CurveStrategy },
    ChangeIntensity { hand: Hand, delta: f32 },
    SaveWorld { path: PathBuf },
    LoadWorld { path: PathBuf },
    HighlightSurface { surface: SurfaceId },
    RevertHighlight { surface: SurfaceId },
    DeleteSurface { surface: SurfaceId },
    ActivateToolActions,
    DeactivateToolActions,
    SetPointerEnabled { enabled: bool },
}

/// Shared, append-only call record.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<Call>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        debug!("headless call: {:?}", call);
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Removes and returns all recorded calls.
    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Surface tool stand-in with a three-state lifecycle.
#[derive(Debug)]
pub struct HeadlessTool {
    log: CallLog,
    state: ToolState,
    strategy: CurveStrategy,
    intensity: [f32; 2],
    pending: Vec<ToolEvent>,
}

impl HeadlessTool {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            state: ToolState::NotStarted,
            strategy: STRATEGY_ORDER[0],
            intensity: [INITIAL_INTENSITY; 2],
            pending: Vec::new(),
        }
    }

    pub fn strategy(&self) -> CurveStrategy {
        self.strategy
    }

    pub fn intensity(&self, hand: Hand) -> f32 {
        self.intensity[hand_index(hand)]
    }

    fn transition(&mut self, next: ToolState) {
        if self.state != next {
            self.state = next;
            self.pending.push(ToolEvent::StateChanged(next));
        }
    }
}

impl SurfaceTool for HeadlessTool {
    fn current_state(&self) -> ToolState {
        self.state
    }

    fn start_tool(&mut self, left: &ControllerOrigin, right: &ControllerOrigin) {
        self.log.push(Call::StartTool {
            left: left.to_string(),
            right: right.to_string(),
        });
        if self.state == ToolState::NotStarted {
            self.transition(ToolState::Ready);
        }
    }

    fn exit_tool(&mut self) {
        self.log.push(Call::ExitTool);
        self.transition(ToolState::NotStarted);
    }

    fn start_draw_surface(&mut self) {
        self.log.push(Call::StartDrawSurface);
        match self.state {
            ToolState::Ready => self.transition(ToolState::Drawing),
            ToolState::Drawing => {}
            ToolState::NotStarted => warn!("start_draw_surface called before the tool started"),
        }
    }

    fn stop_draw_surface(&mut self) {
        self.log.push(Call::StopDrawSurface);
        if self.state == ToolState::Drawing {
            self.transition(ToolState::Ready);
        }
    }

    fn set_drawing_curve_strategy(&mut self, strategy: CurveStrategy) {
        self.log.push(Call::SetStrategy { strategy });
        self.strategy = strategy;
        self.pending.push(ToolEvent::StrategyChanged(strategy));
    }

    fn change_curve_intensity(&mut self, hand: Hand, delta: f32) {
        self.log.push(Call::ChangeIntensity { hand, delta });
        let slot = &mut self.intensity[hand_index(hand)];
        *slot = (*slot + delta).clamp(0.0, 1.0);
    }

    fn drain_events(&mut self) -> Vec<ToolEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Sketch world stand-in tracking surfaces and their highlight flag.
#[derive(Debug)]
pub struct HeadlessWorld {
    log: CallLog,
    surfaces: BTreeMap<SurfaceId, bool>,
    fail_persistence: bool,
}

impl HeadlessWorld {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            surfaces: BTreeMap::new(),
            fail_persistence: false,
        }
    }

    pub fn with_surfaces(mut self, ids: impl IntoIterator<Item = SurfaceId>) -> Self {
        self.surfaces.extend(ids.into_iter().map(|id| (id, false)));
        self
    }

    /// Makes subsequent save/load calls fail.
    pub fn fail_persistence(&mut self, fail: bool) {
        self.fail_persistence = fail;
    }

    pub fn contains(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    pub fn is_highlighted(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).copied().unwrap_or(false)
    }
}

impl SketchWorld for HeadlessWorld {
    fn save(&mut self, path: &Path) -> Result<()> {
        self.log.push(Call::SaveWorld {
            path: path.to_path_buf(),
        });
        if self.fail_persistence {
            return Err(anyhow!("simulated write failure"));
        }
        Ok(())
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        self.log.push(Call::LoadWorld {
            path: path.to_path_buf(),
        });
        if self.fail_persistence {
            return Err(anyhow!("simulated read failure"));
        }
        Ok(())
    }

    fn highlight_surface(&mut self, id: SurfaceId) {
        self.log.push(Call::HighlightSurface { surface: id });
        if let Some(flag) = self.surfaces.get_mut(&id) {
            *flag = true;
        }
    }

    fn revert_highlight(&mut self, id: SurfaceId) {
        self.log.push(Call::RevertHighlight { surface: id });
        if let Some(flag) = self.surfaces.get_mut(&id) {
            *flag = false;
        }
    }

    fn delete_surface(&mut self, id: SurfaceId) {
        self.log.push(Call::DeleteSurface { surface: id });
        if self.surfaces.remove(&id).is_none() {
            debug!("delete requested for unknown {id}");
        }
    }
}

/// Host stand-in tracking the tool action set and pointer visibility.
#[derive(Debug)]
pub struct HeadlessHost {
    log: CallLog,
    tool_actions_active: bool,
    pointer_enabled: bool,
}

impl HeadlessHost {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            tool_actions_active: false,
            pointer_enabled: true,
        }
    }

    pub fn tool_actions_active(&self) -> bool {
        self.tool_actions_active
    }

    pub fn pointer_enabled(&self) -> bool {
        self.pointer_enabled
    }
}

impl HostControls for HeadlessHost {
    fn activate_tool_actions(&mut self) {
        self.log.push(Call::ActivateToolActions);
        self.tool_actions_active = true;
    }

    fn deactivate_tool_actions(&mut self) {
        self.log.push(Call::DeactivateToolActions);
        self.tool_actions_active = false;
    }

    fn set_pointer_enabled(&mut self, enabled: bool) {
        self.log.push(Call::SetPointerEnabled { enabled });
        self.pointer_enabled = enabled;
    }
}

fn hand_index(hand: Hand) -> usize {
    match hand {
        Hand::Left => 0,
        Hand::Right => 1,
    }
}
