//! Event trace replay against the headless collaborators.
//!
//! A trace is a TOML file with one `[[event]]` table per input event:
//!
//! ```toml
//! [[event]]
//! kind = "button"
//! action = "toggle_tool"
//! source = "left_hand"
//! edge = "down"
//!
//! [[event]]
//! kind = "axis"
//! source = "right_hand"
//! y = 0.95
//!
//! [[event]]
//! kind = "pointer"
//! phase = "click"
//! target = { surface = 3 }
//! ```

use crate::headless::{Call, CallLog, HeadlessHost, HeadlessTool, HeadlessWorld};
use crate::input::{
    DispatcherSettings, InputDispatcher, InputEvent, Outcome, PointerTarget, SurfaceId,
};
use crate::tool::ToolEvent;
use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Parsed event trace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trace {
    #[serde(default, rename = "event")]
    pub events: Vec<InputEvent>,
}

impl Trace {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("Failed to parse event trace")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read event trace {}", path.display()))?;
        let trace = Self::from_toml_str(&raw)
            .with_context(|| format!("Invalid event trace {}", path.display()))?;
        info!(
            "Loaded {} events from {}",
            trace.events.len(),
            path.display()
        );
        Ok(trace)
    }

    /// Distinct surfaces referenced by pointer events, seeded into the headless world.
    fn referenced_surfaces(&self) -> Vec<SurfaceId> {
        self.events
            .iter()
            .filter_map(|event| match event {
                InputEvent::Pointer {
                    target: PointerTarget::Surface(id),
                    ..
                } => Some(*id),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// What one replayed event produced.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayStep {
    pub index: usize,
    pub event: InputEvent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub calls: Vec<Call>,
    pub notifications: Vec<ToolEvent>,
}

/// Full replay result.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Notifications emitted by the initial state announcement
    pub initial: Vec<ToolEvent>,
    pub steps: Vec<ReplayStep>,
}

impl ReplayReport {
    pub fn error_count(&self) -> usize {
        self.steps.iter().filter(|step| step.error.is_some()).count()
    }

    /// Human-readable rendering, one block per event.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for note in &self.initial {
            let _ = writeln!(out, "initial: {}", describe_notification(note));
        }
        for step in &self.steps {
            let _ = writeln!(out, "#{} {}", step.index, describe_event(&step.event));
            match (&step.outcome, &step.error) {
                (_, Some(error)) => {
                    let _ = writeln!(out, "    error: {error}");
                }
                (Some(Outcome::Dispatched(intent)), None) => {
                    let _ = writeln!(out, "    dispatched: {intent:?}");
                }
                (Some(Outcome::Ignored(reason)), None) => {
                    let _ = writeln!(out, "    ignored: {reason:?}");
                }
                (None, None) => {}
            }
            for call in &step.calls {
                let _ = writeln!(out, "    call: {call:?}");
            }
            for note in &step.notifications {
                let _ = writeln!(out, "    notify: {}", describe_notification(note));
            }
        }
        out
    }
}

/// Replays a trace against fresh headless collaborators.
pub fn run(trace: &Trace, settings: DispatcherSettings) -> ReplayReport {
    let log = CallLog::new();
    let world = HeadlessWorld::new(log.clone()).with_surfaces(trace.referenced_surfaces());
    let mut dispatcher = InputDispatcher::new(
        HeadlessTool::new(log.clone()),
        world,
        HeadlessHost::new(log.clone()),
        settings,
    );

    let notifications = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&notifications);
    dispatcher.on_state_changed(move |state| sink.borrow_mut().push(ToolEvent::StateChanged(*state)));
    let sink = Rc::clone(&notifications);
    dispatcher.on_strategy_changed(move |strategy| {
        sink.borrow_mut().push(ToolEvent::StrategyChanged(*strategy))
    });

    dispatcher.announce();
    let initial = std::mem::take(&mut *notifications.borrow_mut());

    let mut steps = Vec::with_capacity(trace.events.len());
    for (index, event) in trace.events.iter().enumerate() {
        let result = dispatcher.handle(event);
        debug!("Replayed event #{index}: {:?}", result);
        let (outcome, error) = match result {
            Ok(outcome) => (Some(outcome), None),
            Err(err) => (None, Some(err.to_string())),
        };
        steps.push(ReplayStep {
            index,
            event: event.clone(),
            outcome,
            error,
            calls: log.take(),
            notifications: std::mem::take(&mut *notifications.borrow_mut()),
        });
    }

    ReplayReport { initial, steps }
}

fn describe_event(event: &InputEvent) -> String {
    match event {
        InputEvent::Button {
            action,
            source,
            edge,
        } => format!("button {action:?} {edge:?} from {source}"),
        InputEvent::Axis { source, x, y } => format!("axis ({x:.2}, {y:.2}) from {source}"),
        InputEvent::Pointer { phase, target } => format!("pointer {phase:?} on {target:?}"),
    }
}

fn describe_notification(event: &ToolEvent) -> String {
    match event {
        ToolEvent::StateChanged(state) => format!("state -> {state:?}"),
        ToolEvent::StrategyChanged(strategy) => format!("strategy -> {strategy:?}"),
    }
}
