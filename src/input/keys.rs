//! Key, modifier and button identifiers
//!
//! Keys are identified by USB HID usage (the native scancode), so they name
//! a physical position rather than the character the layout produces.

use bitflags::bitflags;

/// Bit set on keycodes that have no character representation
pub const SCANCODE_MASK: u32 = 1 << 30;

macro_rules! keys {
    ($($name:ident = $code:literal),* $(,)?) => {
        /// Physical key
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Key {
            $($name,)*
            /// A scancode with no named variant
            Unknown(u32),
        }

        impl Key {
            pub fn from_scancode(scancode: u32) -> Self {
                match scancode {
                    $($code => Self::$name,)*
                    other => Self::Unknown(other),
                }
            }

            pub fn scancode(self) -> u32 {
                match self {
                    $(Self::$name => $code,)*
                    Self::Unknown(code) => code,
                }
            }
        }
    };
}

keys! {
    A = 4, B = 5, C = 6, D = 7, E = 8, F = 9, G = 10, H = 11, I = 12, J = 13,
    K = 14, L = 15, M = 16, N = 17, O = 18, P = 19, Q = 20, R = 21, S = 22,
    T = 23, U = 24, V = 25, W = 26, X = 27, Y = 28, Z = 29,
    Digit1 = 30, Digit2 = 31, Digit3 = 32, Digit4 = 33, Digit5 = 34,
    Digit6 = 35, Digit7 = 36, Digit8 = 37, Digit9 = 38, Digit0 = 39,
    Enter = 40, Escape = 41, Backspace = 42, Tab = 43, Space = 44,
    Minus = 45, Equal = 46, BracketLeft = 47, BracketRight = 48,
    Backslash = 49, Semicolon = 51, Quote = 52, Backquote = 53, Comma = 54,
    Period = 55, Slash = 56, CapsLock = 57,
    F1 = 58, F2 = 59, F3 = 60, F4 = 61, F5 = 62, F6 = 63, F7 = 64, F8 = 65,
    F9 = 66, F10 = 67, F11 = 68, F12 = 69,
    PrintScreen = 70, ScrollLock = 71, Pause = 72, Insert = 73, Home = 74,
    PageUp = 75, Delete = 76, End = 77, PageDown = 78,
    Right = 79, Left = 80, Down = 81, Up = 82, NumLock = 83,
    ControlLeft = 224, ShiftLeft = 225, AltLeft = 226, SuperLeft = 227,
    ControlRight = 228, ShiftRight = 229, AltRight = 230, SuperRight = 231,
}

impl Key {
    /// Keycode a US layout would report for this key
    pub fn default_keycode(self) -> u32 {
        let code = self.scancode();
        match self {
            Self::Digit0 => u32::from(b'0'),
            Self::Enter => u32::from(b'\r'),
            Self::Escape => 0x1B,
            Self::Backspace => 0x08,
            Self::Tab => u32::from(b'\t'),
            Self::Space => u32::from(b' '),
            _ if (4..=29).contains(&code) => u32::from(b'a') + (code - 4),
            _ if (30..=38).contains(&code) => u32::from(b'1') + (code - 30),
            _ => code | SCANCODE_MASK,
        }
    }

    /// Modifier bit this key toggles, if it is a modifier key
    pub fn modifier(self) -> Keymod {
        match self {
            Self::ShiftLeft => Keymod::LSHIFT,
            Self::ShiftRight => Keymod::RSHIFT,
            Self::ControlLeft => Keymod::LCTRL,
            Self::ControlRight => Keymod::RCTRL,
            Self::AltLeft => Keymod::LALT,
            Self::AltRight => Keymod::RALT,
            Self::SuperLeft => Keymod::LGUI,
            Self::SuperRight => Keymod::RGUI,
            _ => Keymod::empty(),
        }
    }
}

impl From<winit::keyboard::KeyCode> for Key {
    fn from(code: winit::keyboard::KeyCode) -> Self {
        use winit::keyboard::KeyCode as K;
        match code {
            K::KeyA => Self::A,
            K::KeyB => Self::B,
            K::KeyC => Self::C,
            K::KeyD => Self::D,
            K::KeyE => Self::E,
            K::KeyF => Self::F,
            K::KeyG => Self::G,
            K::KeyH => Self::H,
            K::KeyI => Self::I,
            K::KeyJ => Self::J,
            K::KeyK => Self::K,
            K::KeyL => Self::L,
            K::KeyM => Self::M,
            K::KeyN => Self::N,
            K::KeyO => Self::O,
            K::KeyP => Self::P,
            K::KeyQ => Self::Q,
            K::KeyR => Self::R,
            K::KeyS => Self::S,
            K::KeyT => Self::T,
            K::KeyU => Self::U,
            K::KeyV => Self::V,
            K::KeyW => Self::W,
            K::KeyX => Self::X,
            K::KeyY => Self::Y,
            K::KeyZ => Self::Z,
            K::Digit0 => Self::Digit0,
            K::Digit1 => Self::Digit1,
            K::Digit2 => Self::Digit2,
            K::Digit3 => Self::Digit3,
            K::Digit4 => Self::Digit4,
            K::Digit5 => Self::Digit5,
            K::Digit6 => Self::Digit6,
            K::Digit7 => Self::Digit7,
            K::Digit8 => Self::Digit8,
            K::Digit9 => Self::Digit9,
            K::Enter => Self::Enter,
            K::Escape => Self::Escape,
            K::Backspace => Self::Backspace,
            K::Tab => Self::Tab,
            K::Space => Self::Space,
            K::Minus => Self::Minus,
            K::Equal => Self::Equal,
            K::BracketLeft => Self::BracketLeft,
            K::BracketRight => Self::BracketRight,
            K::Backslash => Self::Backslash,
            K::Semicolon => Self::Semicolon,
            K::Quote => Self::Quote,
            K::Backquote => Self::Backquote,
            K::Comma => Self::Comma,
            K::Period => Self::Period,
            K::Slash => Self::Slash,
            K::CapsLock => Self::CapsLock,
            K::F1 => Self::F1,
            K::F2 => Self::F2,
            K::F3 => Self::F3,
            K::F4 => Self::F4,
            K::F5 => Self::F5,
            K::F6 => Self::F6,
            K::F7 => Self::F7,
            K::F8 => Self::F8,
            K::F9 => Self::F9,
            K::F10 => Self::F10,
            K::F11 => Self::F11,
            K::F12 => Self::F12,
            K::PrintScreen => Self::PrintScreen,
            K::ScrollLock => Self::ScrollLock,
            K::Pause => Self::Pause,
            K::Insert => Self::Insert,
            K::Home => Self::Home,
            K::PageUp => Self::PageUp,
            K::Delete => Self::Delete,
            K::End => Self::End,
            K::PageDown => Self::PageDown,
            K::ArrowRight => Self::Right,
            K::ArrowLeft => Self::Left,
            K::ArrowDown => Self::Down,
            K::ArrowUp => Self::Up,
            K::NumLock => Self::NumLock,
            K::ControlLeft => Self::ControlLeft,
            K::ShiftLeft => Self::ShiftLeft,
            K::AltLeft => Self::AltLeft,
            K::SuperLeft => Self::SuperLeft,
            K::ControlRight => Self::ControlRight,
            K::ShiftRight => Self::ShiftRight,
            K::AltRight => Self::AltRight,
            K::SuperRight => Self::SuperRight,
            _ => Self::Unknown(0),
        }
    }
}

bitflags! {
    /// Keyboard modifier state
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Keymod: u16 {
        const LSHIFT = 0x0001;
        const RSHIFT = 0x0002;
        const LEVEL5 = 0x0004;
        const LCTRL = 0x0040;
        const RCTRL = 0x0080;
        const LALT = 0x0100;
        const RALT = 0x0200;
        const LGUI = 0x0400;
        const RGUI = 0x0800;
        const NUM = 0x1000;
        const CAPS = 0x2000;
        const MODE = 0x4000;
        const SCROLL = 0x8000;

        const SHIFT = Self::LSHIFT.bits() | Self::RSHIFT.bits();
        const CTRL = Self::LCTRL.bits() | Self::RCTRL.bits();
        const ALT = Self::LALT.bits() | Self::RALT.bits();
        const GUI = Self::LGUI.bits() | Self::RGUI.bits();
    }
}

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
    Other(u8),
}

impl MouseButton {
    pub fn from_native(button: u8) -> Self {
        match button {
            1 => Self::Left,
            2 => Self::Middle,
            3 => Self::Right,
            4 => Self::X1,
            5 => Self::X2,
            other => Self::Other(other),
        }
    }

    pub fn to_native(self) -> u8 {
        match self {
            Self::Left => 1,
            Self::Middle => 2,
            Self::Right => 3,
            Self::X1 => 4,
            Self::X2 => 5,
            Self::Other(button) => button,
        }
    }

    /// Bit in a [`MouseButtons`] mask, if the button has one
    pub fn mask(self) -> MouseButtons {
        match self.to_native() {
            button @ 1..=32 => MouseButtons::from_bits_retain(1 << (button - 1)),
            _ => MouseButtons::empty(),
        }
    }
}

bitflags! {
    /// Buttons held during a mouse motion
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MouseButtons: u32 {
        const LEFT = 1 << 0;
        const MIDDLE = 1 << 1;
        const RIGHT = 1 << 2;
        const X1 = 1 << 3;
        const X2 = 1 << 4;
    }
}

bitflags! {
    /// Joystick hat position; centered is empty
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HatPosition: u8 {
        const UP = 0x01;
        const RIGHT = 0x02;
        const DOWN = 0x04;
        const LEFT = 0x08;
    }
}

/// Gamepad button, named by position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    South,
    East,
    West,
    North,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Other(u8),
}

impl GamepadButton {
    pub fn from_native(button: u8) -> Self {
        match button {
            0 => Self::South,
            1 => Self::East,
            2 => Self::West,
            3 => Self::North,
            4 => Self::Back,
            5 => Self::Guide,
            6 => Self::Start,
            7 => Self::LeftStick,
            8 => Self::RightStick,
            9 => Self::LeftShoulder,
            10 => Self::RightShoulder,
            11 => Self::DpadUp,
            12 => Self::DpadDown,
            13 => Self::DpadLeft,
            14 => Self::DpadRight,
            other => Self::Other(other),
        }
    }

    pub fn to_native(self) -> u8 {
        match self {
            Self::South => 0,
            Self::East => 1,
            Self::West => 2,
            Self::North => 3,
            Self::Back => 4,
            Self::Guide => 5,
            Self::Start => 6,
            Self::LeftStick => 7,
            Self::RightStick => 8,
            Self::LeftShoulder => 9,
            Self::RightShoulder => 10,
            Self::DpadUp => 11,
            Self::DpadDown => 12,
            Self::DpadLeft => 13,
            Self::DpadRight => 14,
            Self::Other(button) => button,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    LeftTrigger,
    RightTrigger,
    Other(u8),
}

impl GamepadAxis {
    pub fn from_native(axis: u8) -> Self {
        match axis {
            0 => Self::LeftX,
            1 => Self::LeftY,
            2 => Self::RightX,
            3 => Self::RightY,
            4 => Self::LeftTrigger,
            5 => Self::RightTrigger,
            other => Self::Other(other),
        }
    }

    pub fn to_native(self) -> u8 {
        match self {
            Self::LeftX => 0,
            Self::LeftY => 1,
            Self::RightX => 2,
            Self::RightY => 3,
            Self::LeftTrigger => 4,
            Self::RightTrigger => 5,
            Self::Other(axis) => axis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scancode_table() {
        assert_eq!(Key::A.scancode(), 4);
        assert_eq!(Key::Z.scancode(), 29);
        assert_eq!(Key::from_scancode(41), Key::Escape);
        assert_eq!(Key::from_scancode(231), Key::SuperRight);
        assert_eq!(Key::from_scancode(500), Key::Unknown(500));
        assert_eq!(Key::Unknown(500).scancode(), 500);
    }

    #[test]
    fn test_default_keycodes() {
        assert_eq!(Key::A.default_keycode(), u32::from(b'a'));
        assert_eq!(Key::Digit1.default_keycode(), u32::from(b'1'));
        assert_eq!(Key::Digit0.default_keycode(), u32::from(b'0'));
        assert_eq!(Key::Up.default_keycode(), 82 | SCANCODE_MASK);
    }

    #[test]
    fn test_winit_key_mapping() {
        use winit::keyboard::KeyCode;
        assert_eq!(Key::from(KeyCode::KeyW), Key::W);
        assert_eq!(Key::from(KeyCode::ArrowLeft), Key::Left);
        assert_eq!(Key::from(KeyCode::ShiftRight), Key::ShiftRight);
    }

    #[test]
    fn test_mouse_button_mask() {
        assert_eq!(MouseButton::Left.mask(), MouseButtons::LEFT);
        assert_eq!(MouseButton::Right.mask(), MouseButtons::RIGHT);
        assert_eq!(MouseButton::X2.mask(), MouseButtons::X2);
        assert_eq!(MouseButton::Other(0).mask(), MouseButtons::empty());
    }

    #[test]
    fn test_modifier_groups() {
        assert!(Keymod::SHIFT.contains(Keymod::LSHIFT));
        assert_eq!(Key::AltRight.modifier(), Keymod::RALT);
        assert!(Key::A.modifier().is_empty());
    }
}
