use super::*;
use crate::config::{BindingsConfig, HandMap};
use crate::error::DispatchError;
use crate::headless::{Call, CallLog, HeadlessHost, HeadlessTool, HeadlessWorld};
use crate::input::{
    Action, ButtonEdge, CurveStrategy, Hand, InputEvent, PointerPhase, PointerTarget, SourceId,
    SurfaceId,
};
use crate::tool::{ControllerOrigin, SurfaceTool, ToolState};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

type TestDispatcher = InputDispatcher<HeadlessTool, HeadlessWorld, HeadlessHost>;

fn test_settings() -> DispatcherSettings {
    DispatcherSettings {
        hands: HandMap::new("left_hand", "right_hand").unwrap(),
        bindings: BindingsConfig::default().build_binding_map().unwrap(),
        left_origin: ControllerOrigin("left_origin".to_string()),
        right_origin: ControllerOrigin("right_origin".to_string()),
        intensity_threshold: 0.9,
        intensity_step: 0.05,
        world_path: PathBuf::from("/tmp/sketch/serialization/BezierSurfaceTool.xml"),
    }
}

fn create_test_dispatcher() -> (TestDispatcher, CallLog) {
    let log = CallLog::new();
    let world = HeadlessWorld::new(log.clone()).with_surfaces([SurfaceId(1), SurfaceId(2)]);
    let dispatcher = InputDispatcher::new(
        HeadlessTool::new(log.clone()),
        world,
        HeadlessHost::new(log.clone()),
        test_settings(),
    );
    (dispatcher, log)
}

fn source(hand: Hand) -> SourceId {
    match hand {
        Hand::Left => SourceId::new("left_hand"),
        Hand::Right => SourceId::new("right_hand"),
    }
}

fn press(dispatcher: &mut TestDispatcher, action: Action, hand: Hand) -> Outcome {
    dispatcher
        .on_button(action, &source(hand), ButtonEdge::Down)
        .unwrap()
}

fn release(dispatcher: &mut TestDispatcher, action: Action, hand: Hand) -> Outcome {
    dispatcher
        .on_button(action, &source(hand), ButtonEdge::Up)
        .unwrap()
}

/// Starts the tool and clears the call log.
fn start_tool(dispatcher: &mut TestDispatcher, log: &CallLog) {
    press(dispatcher, Action::ToggleTool, Hand::Left);
    assert_eq!(dispatcher.tool().current_state(), ToolState::Ready);
    log.take();
}

fn count_calls(log: &CallLog, wanted: &Call) -> usize {
    log.calls().iter().filter(|call| *call == wanted).count()
}

#[test]
fn toggle_from_not_started_activates_and_starts_tool() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let outcome = press(&mut dispatcher, Action::ToggleTool, Hand::Right);

    assert_eq!(outcome, Outcome::Dispatched(Intent::StartTool));
    assert_eq!(
        log.calls(),
        vec![
            Call::ActivateToolActions,
            Call::StartTool {
                left: "left_origin".to_string(),
                right: "right_origin".to_string(),
            },
            Call::SetPointerEnabled { enabled: false },
        ]
    );
    assert!(dispatcher.tool_actions_active());
    assert!(dispatcher.host().tool_actions_active());
    assert!(!dispatcher.host().pointer_enabled());
}

#[test]
fn toggle_while_started_deactivates_and_exits() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    let outcome = press(&mut dispatcher, Action::ToggleTool, Hand::Left);

    assert_eq!(outcome, Outcome::Dispatched(Intent::ExitTool));
    assert_eq!(
        log.calls(),
        vec![
            Call::DeactivateToolActions,
            Call::ExitTool,
            Call::SetPointerEnabled { enabled: true },
        ]
    );
    assert_eq!(dispatcher.tool().current_state(), ToolState::NotStarted);
    assert!(!dispatcher.tool_actions_active());
    assert!(dispatcher.host().pointer_enabled());
}

#[test]
fn toggle_while_drawing_still_exits() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);
    press(&mut dispatcher, Action::Draw, Hand::Left);
    press(&mut dispatcher, Action::Draw, Hand::Right);
    assert_eq!(dispatcher.tool().current_state(), ToolState::Drawing);
    log.take();

    let outcome = press(&mut dispatcher, Action::ToggleTool, Hand::Right);

    assert_eq!(outcome, Outcome::Dispatched(Intent::ExitTool));
    assert_eq!(count_calls(&log, &Call::ExitTool), 1);
    assert_eq!(dispatcher.tool().current_state(), ToolState::NotStarted);
}

#[test]
fn toggle_release_edge_is_ignored() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let outcome = release(&mut dispatcher, Action::ToggleTool, Hand::Left);

    assert_eq!(
        outcome,
        Outcome::Ignored(Ignored::NoHandler {
            action: Action::ToggleTool,
            edge: ButtonEdge::Up,
        })
    );
    assert!(log.is_empty());
}

#[test]
fn draw_starts_only_when_second_hand_completes_pair() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    let first = press(&mut dispatcher, Action::Draw, Hand::Left);
    assert_eq!(
        first,
        Outcome::Ignored(Ignored::WaitingForOtherHand { hand: Hand::Left })
    );
    assert!(log.is_empty());

    let second = press(&mut dispatcher, Action::Draw, Hand::Right);
    assert_eq!(second, Outcome::Dispatched(Intent::StartDraw));
    assert_eq!(log.calls(), vec![Call::StartDrawSurface]);
}

#[test]
fn single_hand_press_with_other_released_never_draws() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    press(&mut dispatcher, Action::Draw, Hand::Right);
    release(&mut dispatcher, Action::Draw, Hand::Right);
    press(&mut dispatcher, Action::Draw, Hand::Left);

    assert_eq!(count_calls(&log, &Call::StartDrawSurface), 0);
    assert!(dispatcher.is_draw_held(Hand::Left));
    assert!(!dispatcher.is_draw_held(Hand::Right));
}

#[test]
fn releasing_either_hand_stops_drawing() {
    for released in [Hand::Left, Hand::Right] {
        let (mut dispatcher, log) = create_test_dispatcher();
        start_tool(&mut dispatcher, &log);
        press(&mut dispatcher, Action::Draw, Hand::Left);
        press(&mut dispatcher, Action::Draw, Hand::Right);
        log.take();

        let outcome = release(&mut dispatcher, Action::Draw, released);

        assert_eq!(outcome, Outcome::Dispatched(Intent::StopDraw));
        assert_eq!(log.calls(), vec![Call::StopDrawSurface]);
        assert!(dispatcher.is_draw_held(released.other()));
        assert_eq!(dispatcher.tool().current_state(), ToolState::Ready);
    }
}

#[test]
fn draw_held_before_tool_start_completes_pair() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let early = press(&mut dispatcher, Action::Draw, Hand::Left);
    assert_eq!(
        early,
        Outcome::Ignored(Ignored::ToolActionsInactive {
            action: Action::Draw
        })
    );
    assert!(dispatcher.is_draw_held(Hand::Left));

    start_tool(&mut dispatcher, &log);
    let outcome = press(&mut dispatcher, Action::Draw, Hand::Right);

    assert_eq!(outcome, Outcome::Dispatched(Intent::StartDraw));
    assert_eq!(dispatcher.tool().current_state(), ToolState::Drawing);
}

#[test]
fn draw_released_while_tool_exited_no_longer_counts() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);
    press(&mut dispatcher, Action::Draw, Hand::Left);

    press(&mut dispatcher, Action::ToggleTool, Hand::Left);
    release(&mut dispatcher, Action::Draw, Hand::Left);
    press(&mut dispatcher, Action::ToggleTool, Hand::Left);
    let outcome = press(&mut dispatcher, Action::Draw, Hand::Right);

    assert_eq!(
        outcome,
        Outcome::Ignored(Ignored::WaitingForOtherHand { hand: Hand::Right })
    );
    assert_eq!(count_calls(&log, &Call::StartDrawSurface), 0);
}

#[test]
fn tool_actions_are_ignored_before_tool_starts() {
    let (mut dispatcher, log) = create_test_dispatcher();

    for action in [Action::Draw, Action::NextStrategy] {
        let hand = if action == Action::NextStrategy {
            Hand::Right
        } else {
            Hand::Left
        };
        let outcome = press(&mut dispatcher, action, hand);
        assert_eq!(
            outcome,
            Outcome::Ignored(Ignored::ToolActionsInactive { action })
        );
    }
    let axis = dispatcher
        .on_axis(&source(Hand::Left), 0.0, 1.0)
        .unwrap();
    assert_eq!(
        axis,
        Outcome::Ignored(Ignored::ToolActionsInactive {
            action: Action::CurveIntensity
        })
    );

    assert!(log.is_empty());
    assert_eq!(dispatcher.strategy_cycle().counter(), 4);
}

#[test]
fn stick_beyond_threshold_changes_intensity() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    let up = dispatcher.on_axis(&source(Hand::Left), 0.0, 0.95).unwrap();
    let down = dispatcher.on_axis(&source(Hand::Right), 0.3, -0.95).unwrap();

    assert_eq!(
        up,
        Outcome::Dispatched(Intent::ChangeIntensity {
            hand: Hand::Left,
            delta: 0.05
        })
    );
    assert_eq!(
        down,
        Outcome::Dispatched(Intent::ChangeIntensity {
            hand: Hand::Right,
            delta: -0.05
        })
    );
    assert_eq!(
        log.calls(),
        vec![
            Call::ChangeIntensity {
                hand: Hand::Left,
                delta: 0.05
            },
            Call::ChangeIntensity {
                hand: Hand::Right,
                delta: -0.05
            },
        ]
    );
}

#[test]
fn stick_inside_dead_zone_does_nothing() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    for y in [0.5, -0.5, 0.9, -0.9, 0.0] {
        let outcome = dispatcher.on_axis(&source(Hand::Left), 1.0, y).unwrap();
        assert_eq!(outcome, Outcome::Ignored(Ignored::DeadZone));
    }
    assert!(log.is_empty());
}

#[test]
fn held_stick_fires_on_every_event() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    for _ in 0..3 {
        dispatcher.on_axis(&source(Hand::Right), 0.0, 1.0).unwrap();
    }

    assert_eq!(log.len(), 3);
    let intensity = dispatcher.tool().intensity(Hand::Right);
    assert!((intensity - 0.65).abs() < 1e-5);
}

#[test]
fn next_strategy_cycles_through_all_four() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    for _ in 0..5 {
        press(&mut dispatcher, Action::NextStrategy, Hand::Right);
    }

    let selected: Vec<CurveStrategy> = log
        .calls()
        .into_iter()
        .filter_map(|call| match call {
            Call::SetStrategy { strategy } => Some(strategy),
            _ => None,
        })
        .collect();
    assert_eq!(
        selected,
        vec![
            CurveStrategy::VectorAngle,
            CurveStrategy::RotationAngle,
            CurveStrategy::Distance,
            CurveStrategy::Simple,
            CurveStrategy::VectorAngle,
        ]
    );
    assert_eq!(dispatcher.strategy_cycle().counter(), 1);
}

#[test]
fn previous_strategy_from_one_selects_first_and_resets() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);
    press(&mut dispatcher, Action::NextStrategy, Hand::Right);
    assert_eq!(dispatcher.strategy_cycle().counter(), 1);

    let outcome = press(&mut dispatcher, Action::PreviousStrategy, Hand::Left);

    assert_eq!(
        outcome,
        Outcome::Dispatched(Intent::SetStrategy {
            strategy: CurveStrategy::Simple
        })
    );
    assert_eq!(dispatcher.strategy_cycle().counter(), 4);
    assert_eq!(dispatcher.tool().strategy(), CurveStrategy::Simple);
}

#[test]
fn strategy_buttons_respect_hand_bindings() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    let next_left = press(&mut dispatcher, Action::NextStrategy, Hand::Left);
    let previous_right = press(&mut dispatcher, Action::PreviousStrategy, Hand::Right);

    assert_eq!(
        next_left,
        Outcome::Ignored(Ignored::Unbound {
            action: Action::NextStrategy,
            hand: Hand::Left
        })
    );
    assert_eq!(
        previous_right,
        Outcome::Ignored(Ignored::Unbound {
            action: Action::PreviousStrategy,
            hand: Hand::Right
        })
    );
    assert!(log.is_empty());
}

#[test]
fn save_and_load_reach_world_when_tool_not_started() {
    let (mut dispatcher, log) = create_test_dispatcher();
    let path = PathBuf::from("/tmp/sketch/serialization/BezierSurfaceTool.xml");

    let saved = press(&mut dispatcher, Action::SaveWorld, Hand::Left);
    let loaded = press(&mut dispatcher, Action::LoadWorld, Hand::Right);

    assert_eq!(saved, Outcome::Dispatched(Intent::SaveWorld));
    assert_eq!(loaded, Outcome::Dispatched(Intent::LoadWorld));
    assert_eq!(
        log.calls(),
        vec![
            Call::SaveWorld { path: path.clone() },
            Call::LoadWorld { path },
        ]
    );
}

#[test]
fn save_and_load_are_refused_while_tool_runs() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);

    let save = dispatcher.on_button(Action::SaveWorld, &source(Hand::Left), ButtonEdge::Down);
    let load = dispatcher.on_button(Action::LoadWorld, &source(Hand::Right), ButtonEdge::Down);

    assert!(matches!(
        save,
        Err(DispatchError::ToolActive {
            intent: Intent::SaveWorld
        })
    ));
    assert!(matches!(
        load,
        Err(DispatchError::ToolActive {
            intent: Intent::LoadWorld
        })
    ));
    assert!(log.is_empty());
}

#[test]
fn save_from_unbound_hand_is_ignored() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let outcome = press(&mut dispatcher, Action::SaveWorld, Hand::Right);

    assert_eq!(
        outcome,
        Outcome::Ignored(Ignored::Unbound {
            action: Action::SaveWorld,
            hand: Hand::Right
        })
    );
    assert!(log.is_empty());
}

#[test]
fn persistence_failure_is_reported() {
    let log = CallLog::new();
    let mut world = HeadlessWorld::new(log.clone());
    world.fail_persistence(true);
    let mut dispatcher = InputDispatcher::new(
        HeadlessTool::new(log.clone()),
        world,
        HeadlessHost::new(log.clone()),
        test_settings(),
    );

    let err = dispatcher
        .on_button(Action::LoadWorld, &source(Hand::Right), ButtonEdge::Down)
        .unwrap_err();

    match &err {
        DispatchError::Load { path, .. } => {
            assert!(path.ends_with("BezierSurfaceTool.xml"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("simulated read failure"));
}

#[test]
fn unknown_source_is_ignored() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let outcome = dispatcher
        .on_button(Action::ToggleTool, &SourceId::new("head"), ButtonEdge::Down)
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Ignored(Ignored::UnknownSource {
            source: SourceId::new("head")
        })
    );
    assert!(log.is_empty());
    assert_eq!(dispatcher.tool().current_state(), ToolState::NotStarted);
}

#[test]
fn pointer_events_drive_surface_highlight_and_delete() {
    let (mut dispatcher, log) = create_test_dispatcher();
    let target = PointerTarget::Surface(SurfaceId(1));

    dispatcher.on_pointer(PointerPhase::Enter, &target).unwrap();
    assert!(dispatcher.world().is_highlighted(SurfaceId(1)));

    dispatcher.on_pointer(PointerPhase::Exit, &target).unwrap();
    assert!(!dispatcher.world().is_highlighted(SurfaceId(1)));

    let outcome = dispatcher.on_pointer(PointerPhase::Click, &target).unwrap();
    assert_eq!(
        outcome,
        Outcome::Dispatched(Intent::DeleteSurface {
            surface: SurfaceId(1)
        })
    );
    assert!(!dispatcher.world().contains(SurfaceId(1)));
    assert!(dispatcher.world().contains(SurfaceId(2)));
    assert_eq!(log.len(), 3);
}

#[test]
fn pointer_is_ignored_while_tool_runs() {
    let (mut dispatcher, log) = create_test_dispatcher();
    start_tool(&mut dispatcher, &log);
    press(&mut dispatcher, Action::Draw, Hand::Left);
    press(&mut dispatcher, Action::Draw, Hand::Right);
    log.take();
    let target = PointerTarget::Surface(SurfaceId(1));

    for phase in [PointerPhase::Enter, PointerPhase::Click] {
        let outcome = dispatcher.on_pointer(phase, &target).unwrap();
        assert_eq!(outcome, Outcome::Ignored(Ignored::PointerDisabled));
    }

    assert!(log.is_empty());
    assert!(dispatcher.world().contains(SurfaceId(1)));
    assert!(!dispatcher.world().is_highlighted(SurfaceId(1)));
}

#[test]
fn pointer_on_other_objects_is_ignored() {
    let (mut dispatcher, log) = create_test_dispatcher();
    let target = PointerTarget::Other("BezierSurface".to_string());

    for phase in [PointerPhase::Enter, PointerPhase::Exit, PointerPhase::Click] {
        let outcome = dispatcher.on_pointer(phase, &target).unwrap();
        assert_eq!(outcome, Outcome::Ignored(Ignored::NotASurface));
    }
    assert!(log.is_empty());
}

#[test]
fn tool_notifications_reach_listeners_in_order() {
    let (mut dispatcher, log) = create_test_dispatcher();
    let states = Rc::new(RefCell::new(Vec::new()));
    let strategies = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&states);
    dispatcher.on_state_changed(move |state| sink.borrow_mut().push(*state));
    let sink = Rc::clone(&strategies);
    dispatcher.on_strategy_changed(move |strategy| sink.borrow_mut().push(*strategy));
    dispatcher.announce();

    press(&mut dispatcher, Action::ToggleTool, Hand::Left);
    press(&mut dispatcher, Action::Draw, Hand::Left);
    press(&mut dispatcher, Action::Draw, Hand::Right);
    press(&mut dispatcher, Action::NextStrategy, Hand::Right);
    release(&mut dispatcher, Action::Draw, Hand::Left);
    press(&mut dispatcher, Action::ToggleTool, Hand::Right);

    assert_eq!(
        *states.borrow(),
        vec![
            ToolState::NotStarted,
            ToolState::Ready,
            ToolState::Drawing,
            ToolState::Ready,
            ToolState::NotStarted,
        ]
    );
    assert_eq!(*strategies.borrow(), vec![CurveStrategy::VectorAngle]);
    assert!(!log.is_empty());
}

#[test]
fn removed_listener_stops_receiving() {
    let (mut dispatcher, _log) = create_test_dispatcher();
    let states = Rc::new(RefCell::new(Vec::new()));

    let sink = Rc::clone(&states);
    let id = dispatcher.on_state_changed(move |state| sink.borrow_mut().push(*state));
    press(&mut dispatcher, Action::ToggleTool, Hand::Left);
    assert!(dispatcher.remove_state_listener(id));
    press(&mut dispatcher, Action::ToggleTool, Hand::Left);

    assert_eq!(*states.borrow(), vec![ToolState::Ready]);
}

#[test]
fn handle_routes_each_event_kind() {
    let (mut dispatcher, log) = create_test_dispatcher();

    let events = [
        InputEvent::Pointer {
            phase: PointerPhase::Enter,
            target: PointerTarget::Surface(SurfaceId(2)),
        },
        InputEvent::Button {
            action: Action::ToggleTool,
            source: source(Hand::Left),
            edge: ButtonEdge::Down,
        },
        InputEvent::Axis {
            source: source(Hand::Left),
            x: 0.0,
            y: -1.0,
        },
    ];
    for event in &events {
        assert!(matches!(
            dispatcher.handle(event).unwrap(),
            Outcome::Dispatched(_)
        ));
    }

    assert!(log.calls().contains(&Call::ChangeIntensity {
        hand: Hand::Left,
        delta: -0.05
    }));
    assert!(log.calls().contains(&Call::HighlightSurface {
        surface: SurfaceId(2)
    }));
}
