//! Native event decoder
//!
//! Turns one [`NativeEvent`] into at most one [`FramedEvent`]. Tags without a
//! known payload shape, reserved tags and the user range decode to `None`.
//! Text payloads are copied into owned strings before the native buffer is
//! released.

use tracing::warn;

use super::devices::DeviceKind;
use super::events::{
    DeviceChange, DisplayEventKind, DropKind, FramedEvent, GamepadInput, JoystickInput,
    TouchPhase, WindowEventKind,
};
use super::keys::{GamepadAxis, GamepadButton, HatPosition, Key, Keymod, MouseButton, MouseButtons};
use crate::platform::native::{
    AxisPayload, BallPayload, ButtonPayload, CommonPayload, DevicePayload, DisplayPayload,
    DropPayload, EventType, HatPayload, KeyboardPayload, MOUSE_WHEEL_FLIPPED, MouseButtonPayload,
    MouseMotionPayload, MouseWheelPayload, SensorPayload, TextEditingPayload, TextInputPayload,
    TouchpadPayload, WindowPayload,
};
use crate::platform::{DisplayId, NativeEvent, NativeText, WindowId};

/// Decodes a native event, or returns `None` if it is not recognized
pub fn decode(event: &NativeEvent, text: &dyn NativeText) -> Option<FramedEvent> {
    let tag = event.event_type();
    if tag.is_reserved() {
        return None;
    }
    let timestamp = event.read::<CommonPayload>().timestamp;

    let framed = match tag {
        EventType::QUIT => FramedEvent::Quit { timestamp },

        t if (EventType::WINDOW_SHOWN.0..=EventType::WINDOW_HDR_STATE_CHANGED.0)
            .contains(&t.0) =>
        {
            decode_window(t, event.read(), timestamp)?
        }

        EventType::KEY_DOWN | EventType::KEY_UP => {
            let p: KeyboardPayload = event.read();
            FramedEvent::Key {
                timestamp,
                window: WindowId(p.window_id),
                device: p.which,
                key: Key::from_scancode(p.scancode),
                keycode: p.key,
                modifiers: Keymod::from_bits_retain(p.modifiers),
                down: p.down != 0,
                repeat: p.repeat != 0,
            }
        }
        EventType::TEXT_EDITING => {
            let p: TextEditingPayload = event.read();
            FramedEvent::TextEditing {
                timestamp,
                window: WindowId(p.window_id),
                text: resolve(text, p.text, "text_editing"),
                start: p.start,
                length: p.length,
            }
        }
        EventType::TEXT_INPUT => {
            let p: TextInputPayload = event.read();
            FramedEvent::TextInput {
                timestamp,
                window: WindowId(p.window_id),
                text: resolve(text, p.text, "text_input"),
            }
        }

        EventType::MOUSE_MOTION => {
            let p: MouseMotionPayload = event.read();
            FramedEvent::MouseMotion {
                timestamp,
                window: WindowId(p.window_id),
                device: p.which,
                buttons: MouseButtons::from_bits_retain(p.state),
                x: p.x,
                y: p.y,
                dx: p.xrel,
                dy: p.yrel,
            }
        }
        EventType::MOUSE_BUTTON_DOWN | EventType::MOUSE_BUTTON_UP => {
            let p: MouseButtonPayload = event.read();
            FramedEvent::MouseButton {
                timestamp,
                window: WindowId(p.window_id),
                device: p.which,
                button: MouseButton::from_native(p.button),
                down: p.down != 0,
                clicks: p.clicks,
                x: p.x,
                y: p.y,
            }
        }
        EventType::MOUSE_WHEEL => {
            let p: MouseWheelPayload = event.read();
            let flip = if p.direction == MOUSE_WHEEL_FLIPPED {
                -1.0
            } else {
                1.0
            };
            FramedEvent::MouseWheel {
                timestamp,
                window: WindowId(p.window_id),
                device: p.which,
                x: p.x * flip,
                y: p.y * flip,
                mouse_x: p.mouse_x,
                mouse_y: p.mouse_y,
            }
        }

        EventType::JOYSTICK_AXIS_MOTION => {
            let p: AxisPayload = event.read();
            FramedEvent::Joystick {
                timestamp,
                id: p.which,
                input: JoystickInput::Axis {
                    axis: p.axis,
                    value: p.value,
                },
            }
        }
        EventType::JOYSTICK_BALL_MOTION => {
            let p: BallPayload = event.read();
            FramedEvent::Joystick {
                timestamp,
                id: p.which,
                input: JoystickInput::Ball {
                    ball: p.ball,
                    dx: p.xrel,
                    dy: p.yrel,
                },
            }
        }
        EventType::JOYSTICK_HAT_MOTION => {
            let p: HatPayload = event.read();
            FramedEvent::Joystick {
                timestamp,
                id: p.which,
                input: JoystickInput::Hat {
                    hat: p.hat,
                    position: HatPosition::from_bits_truncate(p.value),
                },
            }
        }
        EventType::JOYSTICK_BUTTON_DOWN | EventType::JOYSTICK_BUTTON_UP => {
            let p: ButtonPayload = event.read();
            FramedEvent::Joystick {
                timestamp,
                id: p.which,
                input: JoystickInput::Button {
                    button: p.button,
                    down: p.down != 0,
                },
            }
        }

        EventType::GAMEPAD_AXIS_MOTION => {
            let p: AxisPayload = event.read();
            FramedEvent::Gamepad {
                timestamp,
                id: p.which,
                input: GamepadInput::Axis {
                    axis: GamepadAxis::from_native(p.axis),
                    value: p.value,
                },
            }
        }
        EventType::GAMEPAD_BUTTON_DOWN | EventType::GAMEPAD_BUTTON_UP => {
            let p: ButtonPayload = event.read();
            FramedEvent::Gamepad {
                timestamp,
                id: p.which,
                input: GamepadInput::Button {
                    button: GamepadButton::from_native(p.button),
                    down: p.down != 0,
                },
            }
        }
        EventType::GAMEPAD_TOUCHPAD_DOWN
        | EventType::GAMEPAD_TOUCHPAD_MOTION
        | EventType::GAMEPAD_TOUCHPAD_UP => {
            let p: TouchpadPayload = event.read();
            let phase = match tag {
                EventType::GAMEPAD_TOUCHPAD_DOWN => TouchPhase::Down,
                EventType::GAMEPAD_TOUCHPAD_UP => TouchPhase::Up,
                _ => TouchPhase::Motion,
            };
            FramedEvent::Gamepad {
                timestamp,
                id: p.which,
                input: GamepadInput::Touchpad {
                    touchpad: p.touchpad,
                    finger: p.finger,
                    phase,
                    x: p.x,
                    y: p.y,
                    pressure: p.pressure,
                },
            }
        }
        EventType::GAMEPAD_SENSOR_UPDATE => {
            let p: SensorPayload = event.read();
            FramedEvent::Gamepad {
                timestamp,
                id: p.which,
                input: GamepadInput::Sensor {
                    sensor: p.sensor,
                    data: p.data,
                },
            }
        }

        EventType::KEYBOARD_ADDED
        | EventType::KEYBOARD_REMOVED
        | EventType::MOUSE_ADDED
        | EventType::MOUSE_REMOVED
        | EventType::JOYSTICK_ADDED
        | EventType::JOYSTICK_REMOVED
        | EventType::GAMEPAD_ADDED
        | EventType::GAMEPAD_REMOVED
        | EventType::GAMEPAD_REMAPPED => decode_device(tag, event.read(), timestamp),

        t if (EventType::DISPLAY_ORIENTATION.0..=EventType::DISPLAY_CONTENT_SCALE_CHANGED.0)
            .contains(&t.0) =>
        {
            let p: DisplayPayload = event.read();
            let kind = match t {
                EventType::DISPLAY_ORIENTATION => DisplayEventKind::Orientation(p.data1),
                EventType::DISPLAY_ADDED => DisplayEventKind::Added,
                EventType::DISPLAY_REMOVED => DisplayEventKind::Removed,
                EventType::DISPLAY_MOVED => DisplayEventKind::Moved,
                EventType::DISPLAY_DESKTOP_MODE_CHANGED => DisplayEventKind::DesktopModeChanged,
                EventType::DISPLAY_CURRENT_MODE_CHANGED => DisplayEventKind::CurrentModeChanged,
                _ => DisplayEventKind::ContentScaleChanged,
            };
            FramedEvent::Display {
                timestamp,
                display: DisplayId(p.display_id),
                kind,
            }
        }

        EventType::DROP_BEGIN
        | EventType::DROP_FILE
        | EventType::DROP_TEXT
        | EventType::DROP_COMPLETE
        | EventType::DROP_POSITION => {
            let p: DropPayload = event.read();
            let kind = match tag {
                EventType::DROP_BEGIN => DropKind::Begin,
                EventType::DROP_FILE => DropKind::File {
                    path: resolve(text, p.data, "drop_file"),
                },
                EventType::DROP_TEXT => DropKind::Text {
                    text: resolve(text, p.data, "drop_text"),
                },
                EventType::DROP_POSITION => DropKind::Position { x: p.x, y: p.y },
                _ => DropKind::Complete,
            };
            FramedEvent::Drop {
                timestamp,
                window: WindowId(p.window_id),
                kind,
            }
        }

        EventType::RENDER_TARGETS_RESET => FramedEvent::RenderReset {
            timestamp,
            device_lost: false,
        },
        EventType::RENDER_DEVICE_RESET => FramedEvent::RenderReset {
            timestamp,
            device_lost: true,
        },

        _ => return None,
    };

    Some(framed)
}

fn decode_window(tag: EventType, p: WindowPayload, timestamp: u64) -> Option<FramedEvent> {
    let size = || {
        (
            u32::try_from(p.data1).unwrap_or(0),
            u32::try_from(p.data2).unwrap_or(0),
        )
    };
    let kind = match tag {
        EventType::WINDOW_SHOWN => WindowEventKind::Shown,
        EventType::WINDOW_HIDDEN => WindowEventKind::Hidden,
        EventType::WINDOW_EXPOSED => WindowEventKind::Exposed,
        EventType::WINDOW_MOVED => WindowEventKind::Moved {
            x: p.data1,
            y: p.data2,
        },
        EventType::WINDOW_RESIZED => {
            let (width, height) = size();
            WindowEventKind::Resized { width, height }
        }
        EventType::WINDOW_PIXEL_SIZE_CHANGED => {
            let (width, height) = size();
            WindowEventKind::PixelSizeChanged { width, height }
        }
        EventType::WINDOW_MINIMIZED => WindowEventKind::Minimized,
        EventType::WINDOW_MAXIMIZED => WindowEventKind::Maximized,
        EventType::WINDOW_RESTORED => WindowEventKind::Restored,
        EventType::WINDOW_MOUSE_ENTER => WindowEventKind::MouseEnter,
        EventType::WINDOW_MOUSE_LEAVE => WindowEventKind::MouseLeave,
        EventType::WINDOW_FOCUS_GAINED => WindowEventKind::FocusGained,
        EventType::WINDOW_FOCUS_LOST => WindowEventKind::FocusLost,
        EventType::WINDOW_CLOSE_REQUESTED => WindowEventKind::CloseRequested,
        EventType::WINDOW_DISPLAY_CHANGED => WindowEventKind::DisplayChanged {
            display: DisplayId(u32::try_from(p.data1).unwrap_or(0)),
        },
        EventType::WINDOW_DISPLAY_SCALE_CHANGED => WindowEventKind::DisplayScaleChanged,
        EventType::WINDOW_OCCLUDED => WindowEventKind::Occluded,
        EventType::WINDOW_ENTER_FULLSCREEN => WindowEventKind::EnterFullscreen,
        EventType::WINDOW_LEAVE_FULLSCREEN => WindowEventKind::LeaveFullscreen,
        EventType::WINDOW_DESTROYED => WindowEventKind::Destroyed,
        // hit test, ICC profile, safe area, pen and HDR notifications
        _ => return None,
    };
    Some(FramedEvent::Window {
        timestamp,
        window: WindowId(p.window_id),
        kind,
    })
}

fn decode_device(tag: EventType, p: DevicePayload, timestamp: u64) -> FramedEvent {
    let (kind, change) = match tag {
        EventType::KEYBOARD_ADDED => (DeviceKind::Keyboard, DeviceChange::Added),
        EventType::KEYBOARD_REMOVED => (DeviceKind::Keyboard, DeviceChange::Removed),
        EventType::MOUSE_ADDED => (DeviceKind::Mouse, DeviceChange::Added),
        EventType::MOUSE_REMOVED => (DeviceKind::Mouse, DeviceChange::Removed),
        EventType::JOYSTICK_ADDED => (DeviceKind::Joystick, DeviceChange::Added),
        EventType::JOYSTICK_REMOVED => (DeviceKind::Joystick, DeviceChange::Removed),
        EventType::GAMEPAD_ADDED => (DeviceKind::Gamepad, DeviceChange::Added),
        EventType::GAMEPAD_REMOVED => (DeviceKind::Gamepad, DeviceChange::Removed),
        _ => (DeviceKind::Gamepad, DeviceChange::Remapped),
    };
    FramedEvent::DeviceChange {
        timestamp,
        kind,
        id: p.which,
        change,
    }
}

/// Copies a native string; unresolvable handles become empty strings
fn resolve(text: &dyn NativeText, handle: u64, field: &'static str) -> String {
    if handle == 0 {
        return String::new();
    }
    text.resolve_text(handle).unwrap_or_else(|| {
        warn!(handle, field, "Native text handle could not be resolved");
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::platform::native::NATIVE_EVENT_SIZE;

    #[derive(Default)]
    struct Texts(HashMap<u64, String>);

    impl NativeText for Texts {
        fn resolve_text(&self, handle: u64) -> Option<String> {
            self.0.get(&handle).cloned()
        }
    }

    fn raw(tag: u32) -> NativeEvent {
        let mut bytes = [0u8; NATIVE_EVENT_SIZE];
        bytes[..4].copy_from_slice(&tag.to_ne_bytes());
        NativeEvent::from_bytes(bytes)
    }

    #[test]
    fn test_quit() {
        let event = NativeEvent::encode(&CommonPayload::new(EventType::QUIT, 77));
        assert_eq!(
            decode(&event, &Texts::default()),
            Some(FramedEvent::Quit { timestamp: 77 })
        );
    }

    #[test]
    fn test_unknown_and_reserved_tags_are_dropped() {
        let texts = Texts::default();
        for tag in [
            0x0, 0x150, 0x7F00, 0x8000, 0x8123, 0xFFFF, 0x7FFF_FFFF, 0x1234_5678,
        ] {
            assert_eq!(decode(&raw(tag), &texts), None, "tag {tag:#x}");
        }
    }

    #[test]
    fn test_uninteresting_window_tags_are_dropped() {
        let texts = Texts::default();
        assert_eq!(decode(&raw(EventType::WINDOW_HIT_TEST.0), &texts), None);
        let safe_area = raw(EventType::WINDOW_SAFE_AREA_CHANGED.0);
        assert_eq!(decode(&safe_area, &texts), None);
    }

    #[test]
    fn test_window_resized() {
        let event = NativeEvent::encode(&WindowPayload {
            common: CommonPayload::new(EventType::WINDOW_RESIZED, 5),
            window_id: 3,
            data1: 1024,
            data2: 768,
            _padding: 0,
        });
        let expected = FramedEvent::Window {
            timestamp: 5,
            window: WindowId(3),
            kind: WindowEventKind::Resized {
                width: 1024,
                height: 768,
            },
        };
        assert_eq!(decode(&event, &Texts::default()), Some(expected));
    }

    #[test]
    fn test_key_down() {
        let event = NativeEvent::encode(&KeyboardPayload {
            common: CommonPayload::new(EventType::KEY_DOWN, 1),
            window_id: 1,
            which: 9,
            scancode: Key::W.scancode(),
            key: u32::from(b'w'),
            modifiers: Keymod::LSHIFT.bits(),
            raw: 0,
            down: 1,
            repeat: 1,
            _padding: [0; 2],
        });
        let Some(FramedEvent::Key {
            key,
            keycode,
            modifiers,
            down,
            repeat,
            device,
            ..
        }) = decode(&event, &Texts::default())
        else {
            panic!("expected key event");
        };
        assert_eq!(key, Key::W);
        assert_eq!(keycode, u32::from(b'w'));
        assert_eq!(modifiers, Keymod::LSHIFT);
        assert!(down && repeat);
        assert_eq!(device, 9);
    }

    #[test]
    fn test_text_is_copied() {
        let mut texts = Texts::default();
        texts.0.insert(4, "héllo".to_string());
        let event = NativeEvent::encode(&TextInputPayload {
            common: CommonPayload::new(EventType::TEXT_INPUT, 0),
            window_id: 1,
            _padding: 0,
            text: 4,
        });
        let decoded = decode(&event, &texts);
        drop(texts);
        let expected = FramedEvent::TextInput {
            timestamp: 0,
            window: WindowId(1),
            text: "héllo".to_string(),
        };
        assert_eq!(decoded, Some(expected));
    }

    #[test]
    fn test_unresolved_text_becomes_empty() {
        let event = NativeEvent::encode(&TextEditingPayload {
            common: CommonPayload::new(EventType::TEXT_EDITING, 0),
            window_id: 1,
            _padding: 0,
            text: 99,
            start: 2,
            length: 1,
        });
        let Some(FramedEvent::TextEditing {
            text,
            start,
            length,
            ..
        }) = decode(&event, &Texts::default())
        else {
            panic!("expected text editing event");
        };
        assert!(text.is_empty());
        assert_eq!((start, length), (2, 1));
    }

    #[test]
    fn test_flipped_wheel_is_normalized() {
        let event = NativeEvent::encode(&MouseWheelPayload {
            common: CommonPayload::new(EventType::MOUSE_WHEEL, 0),
            window_id: 1,
            which: 1,
            x: 1.0,
            y: -2.0,
            direction: MOUSE_WHEEL_FLIPPED,
            mouse_x: 10.0,
            mouse_y: 20.0,
            _padding: 0,
        });
        let Some(FramedEvent::MouseWheel { x, y, .. }) = decode(&event, &Texts::default()) else {
            panic!("expected wheel event");
        };
        assert_eq!((x, y), (-1.0, 2.0));
    }

    #[test]
    fn test_device_events() {
        let event = NativeEvent::encode(&DevicePayload {
            common: CommonPayload::new(EventType::GAMEPAD_REMAPPED, 0),
            which: 12,
            _padding: 0,
        });
        let expected = FramedEvent::DeviceChange {
            timestamp: 0,
            kind: DeviceKind::Gamepad,
            id: 12,
            change: DeviceChange::Remapped,
        };
        assert_eq!(decode(&event, &Texts::default()), Some(expected));
    }

    #[test]
    fn test_gamepad_button() {
        let event = NativeEvent::encode(&ButtonPayload {
            common: CommonPayload::new(EventType::GAMEPAD_BUTTON_DOWN, 0),
            which: 2,
            button: 0,
            down: 1,
            _padding: [0; 2],
        });
        let expected = FramedEvent::Gamepad {
            timestamp: 0,
            id: 2,
            input: GamepadInput::Button {
                button: GamepadButton::South,
                down: true,
            },
        };
        assert_eq!(decode(&event, &Texts::default()), Some(expected));
    }

    #[test]
    fn test_drop_file_and_render_reset() {
        let mut texts = Texts::default();
        texts.0.insert(1, "/tmp/a.png".to_string());
        let event = NativeEvent::encode(&DropPayload {
            common: CommonPayload::new(EventType::DROP_FILE, 0),
            window_id: 1,
            x: 0.0,
            y: 0.0,
            _padding: 0,
            source: 0,
            data: 1,
        });
        let expected = FramedEvent::Drop {
            timestamp: 0,
            window: WindowId(1),
            kind: DropKind::File {
                path: "/tmp/a.png".to_string(),
            },
        };
        assert_eq!(decode(&event, &texts), Some(expected));

        let event = NativeEvent::encode(&CommonPayload::new(EventType::RENDER_DEVICE_RESET, 0));
        let expected = FramedEvent::RenderReset {
            timestamp: 0,
            device_lost: true,
        };
        assert_eq!(decode(&event, &texts), Some(expected));
    }
}
