use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// A mouse button is held over the maze, position relative to its top-left corner
    Pointer { x: f32, y: f32, button: MouseButton },
    KeyPressed(KeyAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Main,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Solve,
    Reset,
}

impl KeyAction {
    pub fn from_key(key: egui::Key) -> Option<KeyAction> {
        match key {
            egui::Key::Space => Some(KeyAction::Solve),
            egui::Key::Escape => Some(KeyAction::Reset),
            _ => None,
        }
    }
}

/// Queue a pointer event if a button is held while over `surface`
pub fn push_pointer(ctx: &egui::Context, surface: egui::Rect, events: &mut VecDeque<Event>) {
    let (pos, primary, secondary) = ctx.input(|i| {
        (
            i.pointer.interact_pos(),
            i.pointer.primary_down(),
            i.pointer.secondary_down(),
        )
    });

    let button = match (primary, secondary) {
        (true, _) => MouseButton::Main,
        (false, true) => MouseButton::Secondary,
        (false, false) => return,
    };

    if let Some(pos) = pos.filter(|pos| surface.contains(*pos)) {
        events.push_back(Event::Pointer {
            x: pos.x - surface.left(),
            y: pos.y - surface.top(),
            button,
        });
    }
}

pub fn push_keys(ctx: &egui::Context, events: &mut VecDeque<Event>) {
    ctx.input(|i| {
        for event in &i.events {
            if let egui::Event::Key {
                key,
                pressed: true,
                repeat: false,
                ..
            } = event
            {
                if let Some(action) = KeyAction::from_key(*key) {
                    events.push_back(Event::KeyPressed(action));
                }
            }
        }
    });
}
