//! Per-frame input snapshot
//!
//! Built from delivered [`FramedEvent`]s. Buttons carry edge information
//! (just pressed / just released) that lasts for one frame; call
//! [`InputState::advance_frame`] between frames.

use std::collections::HashMap;

use super::devices::DeviceKind;
use super::events::{DeviceChange, FramedEvent, GamepadInput, WindowEventKind};
use super::keys::{GamepadAxis, GamepadButton, Key, Keymod, MouseButton};

/// Input state snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub mouse: MouseState,
    pub gamepads: HashMap<u32, GamepadState>,
    /// Text committed this frame
    pub text: String,
    /// Timestamp of the last applied event, in nanoseconds
    pub time: u64,
}

/// Mouse input state
#[derive(Debug, Clone, Default)]
pub struct MouseState {
    /// Window coordinates of the cursor, if it has been seen
    pub position: Option<[f32; 2]>,
    /// Accumulated relative motion this frame
    pub motion: [f32; 2],
    pub buttons: MouseButtonStates,
    /// Scroll delta this frame
    pub scroll_delta: [f32; 2],
}

/// State of all mouse buttons
#[derive(Debug, Clone, Default)]
pub struct MouseButtonStates {
    pub left: ButtonState,
    pub right: ButtonState,
    pub middle: ButtonState,
    pub x1: ButtonState,
    pub x2: ButtonState,
}

impl MouseButtonStates {
    pub fn get(&self, button: MouseButton) -> ButtonState {
        match button {
            MouseButton::Left => self.left,
            MouseButton::Right => self.right,
            MouseButton::Middle => self.middle,
            MouseButton::X1 => self.x1,
            MouseButton::X2 => self.x2,
            MouseButton::Other(_) => ButtonState::Released,
        }
    }

    fn get_mut(&mut self, button: MouseButton) -> Option<&mut ButtonState> {
        match button {
            MouseButton::Left => Some(&mut self.left),
            MouseButton::Right => Some(&mut self.right),
            MouseButton::Middle => Some(&mut self.middle),
            MouseButton::X1 => Some(&mut self.x1),
            MouseButton::X2 => Some(&mut self.x2),
            MouseButton::Other(_) => None,
        }
    }

    fn advance(&mut self) {
        for state in [
            &mut self.left,
            &mut self.right,
            &mut self.middle,
            &mut self.x1,
            &mut self.x2,
        ] {
            *state = state.advance();
        }
    }
}

/// Button press state with edge detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonState {
    #[default]
    Released,
    /// Pressed this frame (edge)
    JustPressed,
    /// Held down (multiple frames)
    Pressed,
    /// Released this frame (edge)
    JustReleased,
}

impl ButtonState {
    /// Advance state for next frame (transitions edges to steady states)
    pub fn advance(self) -> Self {
        match self {
            Self::JustPressed => Self::Pressed,
            Self::JustReleased => Self::Released,
            state => state,
        }
    }

    /// Returns true if button is currently down (just pressed or held)
    pub fn is_down(self) -> bool {
        matches!(self, Self::JustPressed | Self::Pressed)
    }

    pub fn is_just_pressed(self) -> bool {
        matches!(self, Self::JustPressed)
    }

    pub fn is_just_released(self) -> bool {
        matches!(self, Self::JustReleased)
    }

    fn with(self, down: bool) -> Self {
        match (down, self.is_down()) {
            (true, false) => Self::JustPressed,
            (false, true) => Self::JustReleased,
            _ => self,
        }
    }
}

/// Keyboard input state
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    pub keys: HashMap<Key, ButtonState>,
    pub modifiers: Keymod,
}

impl KeyboardState {
    pub fn key(&self, key: Key) -> ButtonState {
        self.keys.get(&key).copied().unwrap_or_default()
    }
}

/// One gamepad's buttons and axes
#[derive(Debug, Clone, Default)]
pub struct GamepadState {
    pub buttons: HashMap<GamepadButton, ButtonState>,
    /// Normalized to -1.0..=1.0 (triggers 0.0..=1.0)
    pub axes: HashMap<GamepadAxis, f32>,
}

impl GamepadState {
    pub fn button(&self, button: GamepadButton) -> ButtonState {
        self.buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn axis(&self, axis: GamepadAxis) -> f32 {
        self.axes.get(&axis).copied().unwrap_or(0.0)
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(&self, key: Key) -> ButtonState {
        self.keyboard.key(key)
    }

    pub fn gamepad(&self, id: u32) -> Option<&GamepadState> {
        self.gamepads.get(&id)
    }

    /// Folds one delivered event into the snapshot
    pub fn apply(&mut self, event: &FramedEvent) {
        self.time = self.time.max(event.timestamp());
        match event {
            FramedEvent::Key {
                key,
                modifiers,
                down,
                ..
            } => {
                let state = self.keyboard.keys.entry(*key).or_default();
                *state = state.with(*down);
                self.keyboard.modifiers = *modifiers;
            }
            FramedEvent::TextInput { text, .. } => self.text.push_str(text),
            FramedEvent::MouseMotion { x, y, dx, dy, .. } => {
                self.mouse.position = Some([*x, *y]);
                self.mouse.motion[0] += dx;
                self.mouse.motion[1] += dy;
            }
            FramedEvent::MouseButton {
                button, down, x, y, ..
            } => {
                self.mouse.position = Some([*x, *y]);
                if let Some(state) = self.mouse.buttons.get_mut(*button) {
                    *state = state.with(*down);
                }
            }
            FramedEvent::MouseWheel { x, y, .. } => {
                self.mouse.scroll_delta[0] += x;
                self.mouse.scroll_delta[1] += y;
            }
            FramedEvent::Gamepad { id, input, .. } => {
                let pad = self.gamepads.entry(*id).or_default();
                match input {
                    GamepadInput::Button { button, down } => {
                        let state = pad.buttons.entry(*button).or_default();
                        *state = state.with(*down);
                    }
                    GamepadInput::Axis { axis, value } => {
                        pad.axes.insert(*axis, normalize_axis(*value));
                    }
                    GamepadInput::Touchpad { .. } | GamepadInput::Sensor { .. } => {}
                }
            }
            FramedEvent::DeviceChange {
                kind: DeviceKind::Gamepad,
                id,
                change,
                ..
            } => match change {
                DeviceChange::Added => {
                    self.gamepads.entry(*id).or_default();
                }
                DeviceChange::Removed => {
                    self.gamepads.remove(id);
                }
                DeviceChange::Remapped => {}
            },
            FramedEvent::Window {
                kind: WindowEventKind::FocusLost,
                ..
            } => self.release_all(),
            FramedEvent::Window {
                kind: WindowEventKind::MouseLeave,
                ..
            } => self.mouse.position = None,
            _ => {}
        }
    }

    /// Advance all button states for next frame
    pub fn advance_frame(&mut self) {
        for state in self.keyboard.keys.values_mut() {
            *state = state.advance();
        }
        self.keyboard
            .keys
            .retain(|_, state| *state != ButtonState::Released);
        self.mouse.buttons.advance();
        for pad in self.gamepads.values_mut() {
            for state in pad.buttons.values_mut() {
                *state = state.advance();
            }
        }

        // Clear per-frame state
        self.mouse.scroll_delta = [0.0, 0.0];
        self.mouse.motion = [0.0, 0.0];
        self.text.clear();
    }

    /// Releases every held key and button, e.g. when focus is lost
    fn release_all(&mut self) {
        for state in self.keyboard.keys.values_mut() {
            *state = state.with(false);
        }
        self.keyboard.modifiers = Keymod::empty();
        for button in [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::X1,
            MouseButton::X2,
        ] {
            if let Some(state) = self.mouse.buttons.get_mut(button) {
                *state = state.with(false);
            }
        }
    }
}

fn normalize_axis(value: i16) -> f32 {
    (f32::from(value) / f32::from(i16::MAX)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::WindowId;

    fn key(key: Key, down: bool) -> FramedEvent {
        FramedEvent::Key {
            timestamp: 0,
            window: WindowId(1),
            device: 0,
            key,
            keycode: key.default_keycode(),
            modifiers: Keymod::empty(),
            down,
            repeat: false,
        }
    }

    #[test]
    fn test_button_state_advance() {
        assert_eq!(ButtonState::JustPressed.advance(), ButtonState::Pressed);
        assert_eq!(ButtonState::JustReleased.advance(), ButtonState::Released);
        assert_eq!(ButtonState::Pressed.advance(), ButtonState::Pressed);
    }

    #[test]
    fn test_key_edges() {
        let mut input = InputState::new();
        input.apply(&key(Key::Space, true));
        assert!(input.key(Key::Space).is_just_pressed());

        input.advance_frame();
        assert_eq!(input.key(Key::Space), ButtonState::Pressed);

        // Repeats do not produce a new edge
        input.apply(&key(Key::Space, true));
        assert_eq!(input.key(Key::Space), ButtonState::Pressed);

        input.apply(&key(Key::Space, false));
        assert!(input.key(Key::Space).is_just_released());
        input.advance_frame();
        assert_eq!(input.key(Key::Space), ButtonState::Released);
        assert!(input.keyboard.keys.is_empty());
    }

    #[test]
    fn test_focus_lost_releases_keys() {
        let mut input = InputState::new();
        input.apply(&key(Key::W, true));
        input.advance_frame();
        input.apply(&FramedEvent::Window {
            timestamp: 1,
            window: WindowId(1),
            kind: WindowEventKind::FocusLost,
        });
        assert!(input.key(Key::W).is_just_released());
    }

    #[test]
    fn test_gamepad_axis_and_removal() {
        let mut input = InputState::new();
        input.apply(&FramedEvent::Gamepad {
            timestamp: 0,
            id: 4,
            input: GamepadInput::Axis {
                axis: GamepadAxis::LeftX,
                value: i16::MIN,
            },
        });
        let pad = input.gamepad(4).unwrap();
        assert_eq!(pad.axis(GamepadAxis::LeftX), -1.0);

        input.apply(&FramedEvent::DeviceChange {
            timestamp: 1,
            kind: DeviceKind::Gamepad,
            id: 4,
            change: DeviceChange::Removed,
        });
        assert!(input.gamepad(4).is_none());
    }

    #[test]
    fn test_per_frame_accumulators_reset() {
        let mut input = InputState::new();
        input.apply(&FramedEvent::TextInput {
            timestamp: 0,
            window: WindowId(1),
            text: "ab".to_string(),
        });
        input.apply(&FramedEvent::MouseWheel {
            timestamp: 0,
            window: WindowId(1),
            device: 1,
            x: 0.0,
            y: 1.0,
            mouse_x: 0.0,
            mouse_y: 0.0,
        });
        assert_eq!(input.text, "ab");
        assert_eq!(input.mouse.scroll_delta, [0.0, 1.0]);

        input.advance_frame();
        assert!(input.text.is_empty());
        assert_eq!(input.mouse.scroll_delta, [0.0, 0.0]);
    }
}
