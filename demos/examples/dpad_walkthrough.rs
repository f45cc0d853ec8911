// Copyright 2026 the Padnav Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end d-pad navigation over a synthetic panel.
//!
//! This example wires `padnav_graph` and `padnav_session` to an in-memory
//! host: a 2x3 grid of buttons, a fake input dispatcher, and a shared
//! overlay. It walks focus around the grid, simulates a content change that
//! goes through the debounced rebuild path, and finishes with an exclusive
//! lock forcing teardown.
//!
//! Run:
//! - `cargo run -p padnav_demos --example dpad_walkthrough`

use std::cell::RefCell;

use kurbo::Rect;
use padnav_graph::{Direction, Discovered, ElementCaps, ElementDiscovery, GeometrySource};
use padnav_session::{
    BindingId, Control, CursorState, CursorVisual, ExclusiveLock, InputDispatch, OverlayHost,
    OverlayOwner, Session,
};

/// The host UI: a flat list of buttons with rectangles in screen space.
struct Panel {
    buttons: RefCell<Vec<(u32, Rect)>>,
}

impl Panel {
    fn grid(cols: u32, rows: u32) -> Self {
        let mut buttons = Vec::new();
        for row in 0..rows {
            for col in 0..cols {
                let handle = row * cols + col + 1;
                let x = f64::from(col) * 120.0;
                let y = f64::from(row) * 60.0;
                buttons.push((handle, Rect::new(x, y, x + 100.0, y + 40.0)));
            }
        }
        Self {
            buttons: RefCell::new(buttons),
        }
    }
}

impl ElementDiscovery<u32> for Panel {
    fn discover(&self, _roots: &[u32]) -> Vec<Discovered<u32>> {
        self.buttons
            .borrow()
            .iter()
            .map(|&(handle, _)| Discovered {
                handle,
                clipping_ancestor: None,
                caps: ElementCaps::INTERACTIVE,
            })
            .collect()
    }
}

impl GeometrySource<u32> for Panel {
    fn bounding_box(&self, handle: u32) -> Option<Rect> {
        self.buttons
            .borrow()
            .iter()
            .find(|&&(h, _)| h == handle)
            .map(|&(_, rect)| rect)
    }
}

/// Fake input dispatcher that just prints what it is asked to do.
#[derive(Default)]
struct Gamepad {
    next: u64,
}

impl InputDispatch<u32> for Gamepad {
    fn acquire(&mut self, control: Control) -> Option<BindingId> {
        self.next += 1;
        println!("  gamepad: acquired {control:?} as binding {}", self.next);
        Some(BindingId(self.next))
    }

    fn bind(&mut self, binding: BindingId, target: u32) {
        println!("  gamepad: binding {} -> button {target}", binding.0);
    }

    fn release(&mut self, binding: BindingId) {
        println!("  gamepad: released binding {}", binding.0);
    }
}

struct Lock(bool);

impl ExclusiveLock for Lock {
    fn is_locked(&self) -> bool {
        self.0
    }
}

struct PrintCursor;

impl CursorVisual for PrintCursor {
    fn apply(&mut self, state: CursorState) {
        println!("  cursor: {state:?}");
    }
}

struct Overlay {
    owner: OverlayOwner<u32>,
}

impl OverlayHost<u32> for Overlay {
    fn owner(&self) -> OverlayOwner<u32> {
        self.owner
    }

    fn hide(&mut self) {
        println!("  overlay: hidden");
        self.owner = OverlayOwner::Unset;
    }

    fn show(&mut self, element: u32) {
        println!("  overlay: over button {element}");
        self.owner = OverlayOwner::Element(element);
    }
}

fn main() {
    let panel = Panel::grid(3, 2);
    let mut session: Session<u32> = Session::new();
    let mut gamepad = Gamepad::default();
    let mut cursor = PrintCursor;
    let mut overlay = Overlay {
        owner: OverlayOwner::Unset,
    };
    let mut now = 0_u64;

    println!("enable over the panel root:");
    session
        .enable(&[0], &panel, &panel, &mut gamepad, &Lock(false), &mut cursor, &mut overlay, now)
        .expect("enable");
    println!("focused: {:?}\n", session.focus_handle());

    println!("walk right, right, down:");
    for direction in [Direction::Right, Direction::Right, Direction::Down] {
        now += 16;
        let outcome = session.navigate(
            direction, &panel, &mut gamepad, &Lock(false), &mut cursor, &mut overlay, now,
        );
        println!("  {direction:?} -> {outcome:?}, focused {:?}", session.focus_handle());
    }
    println!();

    println!("a button disappears; change notification + debounce:");
    panel.buttons.borrow_mut().retain(|&(h, _)| h != 1);
    now += 5;
    let generation = session.request_rebuild(now);
    now += 150;
    let outcome = session.on_timer(
        generation, &[0], &panel, &panel, &mut gamepad, &Lock(false), &mut cursor, &mut overlay, now,
    );
    println!("rebuild: {outcome:?}, focused {:?}\n", session.focus_handle());

    println!("exclusive lock asserted:");
    session.on_lock_asserted(&mut gamepad, &mut cursor, &mut overlay);
    println!("active: {}", session.is_active());
}
