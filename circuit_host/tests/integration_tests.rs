//! Integration tests for the circuit host
//!
//! These tests drive complete editing and run workflows through injected
//! key and pointer events with a manual clock.

use std::cell::RefCell;
use std::rc::Rc;

use circuit_editor::{CircuitEditor, FrameReport, GoalMode, Invalidation, RunState};
use circuit_host::{
    CircuitHost, EditMode, HostAction, HostConfig, InputEvent, KeyCode, KeyEvent, PointerEvent,
};
use circuit_types::{CellFlags, Coord, GridSize};
use sim_engine::{GridEngine, ManualClock, SimEngine, TickRule, Timestamp};

fn config(width: usize, height: usize) -> HostConfig {
    let mut config = HostConfig::default();
    config.grid_width = width;
    config.grid_height = height;
    config
}

fn host(width: usize, height: usize) -> CircuitHost {
    CircuitHost::with_clock(config(width, height), Box::new(ManualClock::new())).unwrap()
}

fn press(host: &mut CircuitHost, code: KeyCode) -> HostAction {
    host.handle_event(InputEvent::key(KeyEvent::pressed(code)))
}

fn release(host: &mut CircuitHost, code: KeyCode) -> HostAction {
    host.handle_event(InputEvent::key(KeyEvent::released(code)))
}

fn drag(host: &mut CircuitHost, from: (i32, i32), to: (i32, i32)) -> HostAction {
    host.handle_event(InputEvent::pointer(PointerEvent::down(from.0, from.1)));
    host.handle_event(InputEvent::pointer(PointerEvent::moved(to.0, to.1)));
    host.handle_event(InputEvent::pointer(PointerEvent::up(to.0, to.1)))
}

fn click(host: &mut CircuitHost, x: i32, y: i32) -> HostAction {
    drag(host, (x, y), (x, y))
}

fn cell(host: &CircuitHost, x: usize, y: usize) -> CellFlags {
    host.editor().engine().get_cell(Coord::new(x, y))
}

/// Signals spread one cell per tick along wire
fn propagate() -> TickRule {
    Box::new(|cells: &mut [CellFlags], size: GridSize| {
        let before = cells.to_vec();
        for coord in size.coords() {
            if !size.is_interior(coord) {
                continue;
            }
            let here = before[size.index(coord)];
            if !here.has_wire() || here.is_signaled() {
                continue;
            }
            let neighbours = [
                Coord::new(coord.x - 1, coord.y),
                Coord::new(coord.x + 1, coord.y),
                Coord::new(coord.x, coord.y - 1),
                Coord::new(coord.x, coord.y + 1),
            ];
            if neighbours
                .iter()
                .any(|n| before[size.index(*n)].is_signaled())
            {
                let index = size.index(coord);
                cells[index] = cells[index].with_signal_level(1);
            }
        }
    })
}

fn propagating_host(width: usize, height: usize, clock: ManualClock) -> CircuitHost {
    let engine = GridEngine::with_rule(GridSize::new(width, height), propagate());
    let editor = CircuitEditor::with_clock(engine, Box::new(clock));
    CircuitHost::with_editor(config(width, height), editor).unwrap()
}

#[test]
fn test_draw_and_erase_workflow() {
    let mut host = host(10, 10);

    // L-shaped wire from (1, 1) to (6, 3)
    assert_eq!(drag(&mut host, (1, 1), (6, 3)), HostAction::Edited);
    assert!(cell(&host, 1, 1).has_wire());
    assert!(cell(&host, 6, 1).has_wire());
    assert!(cell(&host, 6, 3).has_wire());
    assert!(!cell(&host, 1, 3).has_wire());

    // Subtract-drag clears the same path
    press(&mut host, KeyCode::D);
    drag(&mut host, (1, 1), (6, 3));
    release(&mut host, KeyCode::D);
    assert_eq!(host.editor().snapshot().wire_count(), 0);

    // Erase a box
    drag(&mut host, (2, 5), (7, 5));
    press(&mut host, KeyCode::E);
    drag(&mut host, (4, 4), (8, 6));
    release(&mut host, KeyCode::E);
    assert!(cell(&host, 3, 5).has_wire());
    assert!(!cell(&host, 4, 5).has_wire());
    assert_eq!(host.editor().snapshot().wire_count(), 2);
}

#[test]
fn test_protection_blocks_unforced_edits() {
    let mut host = host(10, 10);

    press(&mut host, KeyCode::Num2);
    drag(&mut host, (3, 1), (3, 8));
    assert!(cell(&host, 3, 4).is_protected());

    press(&mut host, KeyCode::Num1);
    drag(&mut host, (1, 4), (6, 4));
    assert!(!cell(&host, 3, 4).has_wire());
    assert!(cell(&host, 4, 4).has_wire());

    press(&mut host, KeyCode::Num3);
    assert_eq!(host.mode(), EditMode::ForcedWire);
    drag(&mut host, (1, 4), (6, 4));
    assert_eq!(cell(&host, 3, 4), CellFlags::WIRE | CellFlags::PROTECTED);
}

#[test]
fn test_cut_rotate_paste() {
    let mut host = host(8, 8);
    drag(&mut host, (1, 1), (3, 1));

    press(&mut host, KeyCode::X);
    drag(&mut host, (1, 1), (3, 1));
    release(&mut host, KeyCode::X);
    assert_eq!(host.editor().snapshot().wire_count(), 0);

    assert_eq!(press(&mut host, KeyCode::L), HostAction::ClipboardChanged);
    release(&mut host, KeyCode::L);
    assert_eq!(host.editor().clipboard().width(), 1);
    assert_eq!(host.editor().clipboard().height(), 3);

    press(&mut host, KeyCode::V);
    assert!(host.paste_preview());
    click(&mut host, 5, 2);
    release(&mut host, KeyCode::V);

    assert!(cell(&host, 5, 2).has_wire());
    assert!(cell(&host, 5, 3).has_wire());
    assert!(cell(&host, 5, 4).has_wire());
    assert_eq!(host.editor().snapshot().wire_count(), 3);
}

#[test]
fn test_subtractive_paste() {
    let mut host = host(8, 8);
    drag(&mut host, (1, 1), (2, 1));
    press(&mut host, KeyCode::C);
    drag(&mut host, (1, 1), (2, 1));
    release(&mut host, KeyCode::C);

    drag(&mut host, (1, 4), (5, 4));

    press(&mut host, KeyCode::B);
    press(&mut host, KeyCode::D);
    click(&mut host, 2, 4);
    release(&mut host, KeyCode::D);
    release(&mut host, KeyCode::B);

    assert!(cell(&host, 1, 4).has_wire());
    assert!(!cell(&host, 2, 4).has_wire());
    assert!(!cell(&host, 3, 4).has_wire());
    assert!(cell(&host, 4, 4).has_wire());
}

#[test]
fn test_forced_empty_paste_removes_covered_goals() {
    let mut host = host(10, 10);

    press(&mut host, KeyCode::Num4);
    for x in 2..=4 {
        click(&mut host, x, 3);
    }
    assert_eq!(host.editor().goals().len(), 3);

    // Clipboard: empty, wire, empty
    press(&mut host, KeyCode::Num1);
    click(&mut host, 3, 6);
    press(&mut host, KeyCode::C);
    drag(&mut host, (2, 6), (4, 6));
    release(&mut host, KeyCode::C);

    // Unforced paste leaves goals alone
    press(&mut host, KeyCode::V);
    click(&mut host, 2, 3);
    assert_eq!(host.editor().goals().len(), 3);

    press(&mut host, KeyCode::Num3);
    click(&mut host, 2, 3);
    release(&mut host, KeyCode::V);

    let goals: Vec<Coord> = host.editor().goals().coords().collect();
    assert_eq!(goals, vec![Coord::new(3, 3)]);
    assert!(!cell(&host, 2, 3).is_goal());
    assert!(!cell(&host, 4, 3).is_goal());
    assert!(cell(&host, 3, 3).is_goal());
}

#[test]
fn test_run_until_all_goals_signaled() {
    let mut host = propagating_host(10, 6, ManualClock::new());

    drag(&mut host, (1, 2), (6, 2));
    press(&mut host, KeyCode::Num4);
    click(&mut host, 6, 2);
    host.editor_mut()
        .engine_mut()
        .set_cell(Coord::new(1, 2), CellFlags::WIRE.with_signal_level(1));

    press(&mut host, KeyCode::Num6);
    assert_eq!(host.editor().goal_mode(), GoalMode::All);

    host.editor_mut().set_speed(-119);
    press(&mut host, KeyCode::Space);

    let report = host.frame(Timestamp::ZERO);
    assert_eq!(
        report,
        FrameReport::Completed {
            ticks: 5,
            total_iterations: 5
        }
    );
    assert_eq!(host.editor().run_state(), RunState::Stopped);
    assert_eq!(host.status(), "Complete: iteration count 5");

    // Further frames do nothing
    assert_eq!(
        host.frame(Timestamp::from_micros(16_000)),
        FrameReport::Stopped {
            total_iterations: 5
        }
    );
}

#[test]
fn test_throttled_run() {
    let clock = ManualClock::new();
    let mut host = propagating_host(8, 8, clock.clone());
    host.editor_mut().set_speed(5);
    press(&mut host, KeyCode::Space);

    let mut ticks = Vec::new();
    for _ in 0..18 {
        clock.advance(16_000);
        ticks.push(host.frame(clock.current()).ticks());
    }
    assert_eq!(ticks.iter().sum::<u64>(), 3);
    assert_eq!(ticks[5], 1);
    assert_eq!(ticks[11], 1);
    assert_eq!(ticks[17], 1);
}

#[test]
fn test_frame_time_cap() {
    // Every clock poll costs 300us; the fifth poll reads past the 1ms cap
    let mut host = propagating_host(8, 8, ManualClock::with_auto_advance(300));
    host.editor_mut().set_speed(-120);
    press(&mut host, KeyCode::Space);

    let report = host.frame(Timestamp::ZERO);
    assert_eq!(report.ticks(), 5);
    assert!(host.editor().is_running());
}

#[test]
fn test_change_mode_fires_once_per_transition() {
    let mut host = propagating_host(8, 6, ManualClock::new());
    drag(&mut host, (1, 2), (3, 2));
    press(&mut host, KeyCode::Num4);
    click(&mut host, 4, 2);
    press(&mut host, KeyCode::Num8);
    host.editor_mut().set_speed(-119);

    host.editor_mut()
        .engine_mut()
        .set_cell(Coord::new(1, 2), CellFlags::WIRE.with_signal_level(1));
    press(&mut host, KeyCode::Space);

    // The goal at (4, 2) flips on the third tick
    let report = host.frame(Timestamp::ZERO);
    assert_eq!(report.ticks(), 3);
    assert!(report.is_completed());

    // Nothing changes any more, so the next run uses its whole budget
    release(&mut host, KeyCode::Space);
    press(&mut host, KeyCode::Space);
    let report = host.frame(Timestamp::ZERO);
    assert_eq!(report.ticks(), 120);
    assert!(!report.is_completed());
}

#[test]
fn test_guarded_reset() {
    let mut host = propagating_host(10, 10, ManualClock::new());
    drag(&mut host, (1, 1), (5, 1));
    host.editor_mut()
        .engine_mut()
        .set_cell(Coord::new(1, 1), CellFlags::WIRE.with_signal_level(1));

    press(&mut host, KeyCode::Space);
    host.frame(Timestamp::ZERO);
    assert!(cell(&host, 2, 1).is_signaled());
    assert_eq!(host.editor().total_iterations(), 1);

    assert_eq!(press(&mut host, KeyCode::R), HostAction::Continue);
    release(&mut host, KeyCode::R);
    assert!(cell(&host, 2, 1).is_signaled());

    press(&mut host, KeyCode::G);
    assert_eq!(press(&mut host, KeyCode::R), HostAction::Reset);
    assert!(!cell(&host, 1, 1).is_signaled());
    assert!(!cell(&host, 2, 1).is_signaled());
    assert!(cell(&host, 2, 1).has_wire());
    assert_eq!(host.editor().total_iterations(), 0);
    assert_eq!(host.status(), "Reset");
}

#[test]
fn test_config_from_json_drives_host() {
    let config = HostConfig::from_json(
        r#"{
            "grid_width": 9,
            "grid_height": 7,
            "initial_speed": -60,
            "key_bindings": { "pause": "P" }
        }"#,
    )
    .unwrap();
    let mut host = CircuitHost::with_clock(config, Box::new(ManualClock::new())).unwrap();
    assert_eq!(host.editor().size(), GridSize::new(9, 7));

    assert_eq!(press(&mut host, KeyCode::Space), HostAction::Continue);
    assert_eq!(
        press(&mut host, KeyCode::P),
        HostAction::RunToggled { running: true }
    );
    assert_eq!(host.frame(Timestamp::ZERO).ticks(), 2);
}

#[test]
fn test_resize_keeps_interior_goals() {
    let mut host = host(10, 10);
    press(&mut host, KeyCode::Num4);
    click(&mut host, 2, 2);
    click(&mut host, 6, 6);
    click(&mut host, 8, 8);

    assert!(host.resize(8, 8));
    let goals: Vec<Coord> = host.editor().goals().coords().collect();
    assert_eq!(goals.len(), 2);
    assert!(goals.contains(&Coord::new(2, 2)));
    assert!(goals.contains(&Coord::new(6, 6)));

    assert!(!host.resize(2, 2));
    assert_eq!(host.editor().size(), GridSize::new(8, 8));
}

#[test]
fn test_invalidation_observers() {
    let mut host = host(8, 8);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    {
        let dirty = host.editor_mut().dirty_mut();
        dirty.take(Invalidation::Redraw);
        dirty.take(Invalidation::Downstream);
        dirty.subscribe(Box::new(move |kind| sink.borrow_mut().push(kind)));
    }

    press(&mut host, KeyCode::V);
    assert_eq!(*seen.borrow(), vec![Invalidation::Redraw]);

    release(&mut host, KeyCode::V);
    click(&mut host, 2, 2);
    assert_eq!(
        *seen.borrow(),
        vec![Invalidation::Redraw, Invalidation::Downstream]
    );

    let dirty = host.editor_mut().dirty_mut();
    assert!(dirty.take(Invalidation::Redraw));
    assert!(dirty.take(Invalidation::Downstream));
}

#[test]
fn test_import_rgba_through_host() {
    let mut host = host(8, 8);
    let mut bytes = Vec::new();
    for y in 0..4 {
        for x in 0..5 {
            let pixel: [u8; 4] = match (x, y) {
                (1, 1) => [0, 128, 255, 255],
                (2, 1) => [255, 128, 1, 255],
                (3, 2) => [128, 0, 0, 255],
                _ => [0, 0, 0, 255],
            };
            bytes.extend_from_slice(&pixel);
        }
    }
    let image = circuit_editor::RasterImage::from_rgba(5, 4, &bytes).unwrap();

    host.import_raster(&image).unwrap();
    assert_eq!(host.editor().size(), GridSize::new(5, 4));
    assert_eq!(cell(&host, 1, 1), CellFlags::WIRE);
    assert!(cell(&host, 2, 1).is_signaled());
    assert_eq!(cell(&host, 3, 2), CellFlags::DESIGN);
    assert!(host.editor().goals().contains(Coord::new(3, 2)));
    assert_eq!(host.status(), "Loaded from image");
}

#[test]
fn test_same_trace_same_snapshot() {
    fn run() -> circuit_editor::CircuitSnapshot {
        let mut host = propagating_host(12, 12, ManualClock::with_auto_advance(50));
        drag(&mut host, (1, 1), (9, 6));
        press(&mut host, KeyCode::C);
        drag(&mut host, (1, 1), (4, 4));
        release(&mut host, KeyCode::C);
        press(&mut host, KeyCode::J);
        press(&mut host, KeyCode::V);
        click(&mut host, 5, 7);
        release(&mut host, KeyCode::V);
        host.editor_mut()
            .engine_mut()
            .set_cell(Coord::new(1, 1), CellFlags::WIRE.with_signal_level(1));
        press(&mut host, KeyCode::RightBracket);
        press(&mut host, KeyCode::Space);
        for frame in 0..5 {
            host.frame(Timestamp::from_micros(frame * 16_000));
        }
        host.editor().snapshot()
    }

    assert_eq!(run(), run());
}
