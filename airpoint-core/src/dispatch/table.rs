//! Event × mode action table
//!
//! Every (event, mode) cell holds an action, so dispatch always resolves.
//! Actions read the current mode and may rewrite it; there is no separate
//! transition relation.

use crate::traits::{keys, HidSink, MouseButton};

use super::event::{GestureEvent, OperatingMode};

/// Context handed to an action
pub struct ActionContext<'a> {
    /// Current mode; actions may rewrite it
    pub mode: OperatingMode,
    /// Pointer delta for this cycle, if the pointer is moving
    pub delta: Option<(i16, i16)>,
    /// Wheel units per scroll gesture
    pub scroll_step: i8,
    hid: &'a mut dyn HidSink,
    hid_calls: u8,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        mode: OperatingMode,
        delta: Option<(i16, i16)>,
        scroll_step: i8,
        hid: &'a mut dyn HidSink,
    ) -> Self {
        Self {
            mode,
            delta,
            scroll_step,
            hid,
            hid_calls: 0,
        }
    }

    /// Number of HID calls made by the action
    pub fn hid_calls(&self) -> u8 {
        self.hid_calls
    }

    fn move_pointer(&mut self, dx: i16, dy: i16, wheel: i8) {
        self.hid.move_pointer(dx, dy, wheel);
        self.hid_calls = self.hid_calls.saturating_add(1);
    }

    fn click(&mut self, button: MouseButton) {
        self.hid.press_button(button);
        self.hid.release_button(button);
        self.hid_calls = self.hid_calls.saturating_add(2);
    }

    fn tap(&mut self, code: u8) {
        self.hid.press_key(code);
        self.hid.release_key(code);
        self.hid_calls = self.hid_calls.saturating_add(2);
    }
}

/// Action stored in a table cell
pub type Action = fn(&mut ActionContext<'_>);

fn no_op(_: &mut ActionContext<'_>) {}

fn enter_idle(ctx: &mut ActionContext<'_>) {
    ctx.mode = OperatingMode::Idle;
}

fn enter_mouse(ctx: &mut ActionContext<'_>) {
    ctx.mode = OperatingMode::MouseButtons;
}

fn enter_keyboard(ctx: &mut ActionContext<'_>) {
    ctx.mode = OperatingMode::Keyboard;
}

fn pointer_move(ctx: &mut ActionContext<'_>) {
    if let Some((dx, dy)) = ctx.delta {
        ctx.move_pointer(dx, dy, 0);
    }
}

fn left_click(ctx: &mut ActionContext<'_>) {
    ctx.click(MouseButton::Left);
}

fn right_click(ctx: &mut ActionContext<'_>) {
    ctx.click(MouseButton::Right);
}

fn middle_click(ctx: &mut ActionContext<'_>) {
    ctx.click(MouseButton::Middle);
}

fn double_click(ctx: &mut ActionContext<'_>) {
    ctx.click(MouseButton::Left);
    ctx.click(MouseButton::Left);
}

fn scroll_up(ctx: &mut ActionContext<'_>) {
    let step = ctx.scroll_step;
    ctx.move_pointer(0, 0, step);
}

fn scroll_down(ctx: &mut ActionContext<'_>) {
    let step = ctx.scroll_step;
    ctx.move_pointer(0, 0, step.saturating_neg());
}

fn key_up(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::UP_ARROW);
}

fn key_down(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::DOWN_ARROW);
}

fn key_left(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::LEFT_ARROW);
}

fn key_right(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::RIGHT_ARROW);
}

fn key_enter(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::ENTER);
}

fn key_tab(ctx: &mut ActionContext<'_>) {
    ctx.tap(keys::TAB);
}

/// Rows follow [`GestureEvent::ALL`], columns follow [`OperatingMode::ALL`]
const ACTIONS: [[Action; OperatingMode::COUNT]; GestureEvent::COUNT] = [
    // None
    [no_op, pointer_move, no_op],
    // Up
    [no_op, scroll_up, key_up],
    // Down
    [no_op, scroll_down, key_down],
    // Left
    [no_op, left_click, key_left],
    // Right
    [no_op, right_click, key_right],
    // RollRight
    [enter_mouse, middle_click, key_tab],
    // RollLeft
    [enter_keyboard, enter_keyboard, enter_mouse],
    // ShakeYes
    [no_op, double_click, key_enter],
    // ShakeNo
    [no_op, enter_idle, enter_idle],
];

/// Result of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchOutcome {
    /// Mode before the action ran
    pub previous: OperatingMode,
    /// Mode after the action ran
    pub mode: OperatingMode,
    /// HID calls made
    pub hid_calls: u8,
}

impl DispatchOutcome {
    pub fn mode_changed(&self) -> bool {
        self.previous != self.mode
    }

    /// Check if the action touched the HID sink or the mode
    pub fn had_effect(&self) -> bool {
        self.hid_calls > 0 || self.mode_changed()
    }
}

/// Owner of the current operating mode
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    mode: OperatingMode,
}

impl DispatchTable {
    pub fn new() -> Self {
        Self {
            mode: OperatingMode::Idle,
        }
    }

    /// Current operating mode
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Look up the action for a cell
    pub fn action(event: GestureEvent, mode: OperatingMode) -> Action {
        ACTIONS[event.index()][mode.index()]
    }

    /// Run the action for `event` in the current mode
    pub fn dispatch(
        &mut self,
        event: GestureEvent,
        delta: Option<(i16, i16)>,
        scroll_step: i8,
        hid: &mut dyn HidSink,
    ) -> DispatchOutcome {
        let previous = self.mode;
        let mut ctx = ActionContext::new(previous, delta, scroll_step, hid);
        Self::action(event, previous)(&mut ctx);
        self.mode = ctx.mode;

        #[cfg(feature = "defmt")]
        if event != GestureEvent::None {
            defmt::debug!("dispatch {} in {} -> {}", event, previous, self.mode);
        }

        DispatchOutcome {
            previous,
            mode: self.mode,
            hid_calls: ctx.hid_calls(),
        }
    }
}
