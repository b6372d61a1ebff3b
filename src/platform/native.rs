//! Native event buffer layout
//!
//! A [`NativeEvent`] is a fixed 128 byte record whose first four bytes are a
//! type tag. The rest of the record is one of the `#[repr(C)]` payload shapes
//! below, selected by the tag. The layouts match the SDL3 event union, with
//! implicit padding spelled out so every payload is `Pod`.
//!
//! Nothing outside the platform and decoder modules should look at these
//! bytes; the decoder turns them into [`FramedEvent`](crate::input::FramedEvent).

use bytemuck::{Pod, Zeroable};

/// Size of every native event record in bytes
pub const NATIVE_EVENT_SIZE: usize = 128;

/// Native event type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventType(pub u32);

impl EventType {
    pub const FIRST: Self = Self(0);
    pub const QUIT: Self = Self(0x100);
    pub const TERMINATING: Self = Self(0x101);
    pub const LOW_MEMORY: Self = Self(0x102);
    pub const WILL_ENTER_BACKGROUND: Self = Self(0x103);
    pub const DID_ENTER_BACKGROUND: Self = Self(0x104);
    pub const WILL_ENTER_FOREGROUND: Self = Self(0x105);
    pub const DID_ENTER_FOREGROUND: Self = Self(0x106);
    pub const LOCALE_CHANGED: Self = Self(0x107);
    pub const SYSTEM_THEME_CHANGED: Self = Self(0x108);

    pub const DISPLAY_ORIENTATION: Self = Self(0x151);
    pub const DISPLAY_ADDED: Self = Self(0x152);
    pub const DISPLAY_REMOVED: Self = Self(0x153);
    pub const DISPLAY_MOVED: Self = Self(0x154);
    pub const DISPLAY_DESKTOP_MODE_CHANGED: Self = Self(0x155);
    pub const DISPLAY_CURRENT_MODE_CHANGED: Self = Self(0x156);
    pub const DISPLAY_CONTENT_SCALE_CHANGED: Self = Self(0x157);

    pub const WINDOW_SHOWN: Self = Self(0x202);
    pub const WINDOW_HIDDEN: Self = Self(0x203);
    pub const WINDOW_EXPOSED: Self = Self(0x204);
    pub const WINDOW_MOVED: Self = Self(0x205);
    pub const WINDOW_RESIZED: Self = Self(0x206);
    pub const WINDOW_PIXEL_SIZE_CHANGED: Self = Self(0x207);
    pub const WINDOW_METAL_VIEW_RESIZED: Self = Self(0x208);
    pub const WINDOW_MINIMIZED: Self = Self(0x209);
    pub const WINDOW_MAXIMIZED: Self = Self(0x20A);
    pub const WINDOW_RESTORED: Self = Self(0x20B);
    pub const WINDOW_MOUSE_ENTER: Self = Self(0x20C);
    pub const WINDOW_MOUSE_LEAVE: Self = Self(0x20D);
    pub const WINDOW_FOCUS_GAINED: Self = Self(0x20E);
    pub const WINDOW_FOCUS_LOST: Self = Self(0x20F);
    pub const WINDOW_CLOSE_REQUESTED: Self = Self(0x210);
    pub const WINDOW_HIT_TEST: Self = Self(0x211);
    pub const WINDOW_ICCPROF_CHANGED: Self = Self(0x212);
    pub const WINDOW_DISPLAY_CHANGED: Self = Self(0x213);
    pub const WINDOW_DISPLAY_SCALE_CHANGED: Self = Self(0x214);
    pub const WINDOW_SAFE_AREA_CHANGED: Self = Self(0x215);
    pub const WINDOW_OCCLUDED: Self = Self(0x216);
    pub const WINDOW_ENTER_FULLSCREEN: Self = Self(0x217);
    pub const WINDOW_LEAVE_FULLSCREEN: Self = Self(0x218);
    pub const WINDOW_DESTROYED: Self = Self(0x219);
    pub const WINDOW_PEN_ENTER: Self = Self(0x21A);
    pub const WINDOW_PEN_LEAVE: Self = Self(0x21B);
    pub const WINDOW_HDR_STATE_CHANGED: Self = Self(0x21C);

    pub const KEY_DOWN: Self = Self(0x300);
    pub const KEY_UP: Self = Self(0x301);
    pub const TEXT_EDITING: Self = Self(0x302);
    pub const TEXT_INPUT: Self = Self(0x303);
    pub const KEYMAP_CHANGED: Self = Self(0x304);
    pub const KEYBOARD_ADDED: Self = Self(0x305);
    pub const KEYBOARD_REMOVED: Self = Self(0x306);
    pub const TEXT_EDITING_CANDIDATES: Self = Self(0x307);

    pub const MOUSE_MOTION: Self = Self(0x400);
    pub const MOUSE_BUTTON_DOWN: Self = Self(0x401);
    pub const MOUSE_BUTTON_UP: Self = Self(0x402);
    pub const MOUSE_WHEEL: Self = Self(0x403);
    pub const MOUSE_ADDED: Self = Self(0x404);
    pub const MOUSE_REMOVED: Self = Self(0x405);

    pub const JOYSTICK_AXIS_MOTION: Self = Self(0x600);
    pub const JOYSTICK_BALL_MOTION: Self = Self(0x601);
    pub const JOYSTICK_HAT_MOTION: Self = Self(0x602);
    pub const JOYSTICK_BUTTON_DOWN: Self = Self(0x603);
    pub const JOYSTICK_BUTTON_UP: Self = Self(0x604);
    pub const JOYSTICK_ADDED: Self = Self(0x605);
    pub const JOYSTICK_REMOVED: Self = Self(0x606);
    pub const JOYSTICK_BATTERY_UPDATED: Self = Self(0x607);
    pub const JOYSTICK_UPDATE_COMPLETE: Self = Self(0x608);

    pub const GAMEPAD_AXIS_MOTION: Self = Self(0x650);
    pub const GAMEPAD_BUTTON_DOWN: Self = Self(0x651);
    pub const GAMEPAD_BUTTON_UP: Self = Self(0x652);
    pub const GAMEPAD_ADDED: Self = Self(0x653);
    pub const GAMEPAD_REMOVED: Self = Self(0x654);
    pub const GAMEPAD_REMAPPED: Self = Self(0x655);
    pub const GAMEPAD_TOUCHPAD_DOWN: Self = Self(0x656);
    pub const GAMEPAD_TOUCHPAD_MOTION: Self = Self(0x657);
    pub const GAMEPAD_TOUCHPAD_UP: Self = Self(0x658);
    pub const GAMEPAD_SENSOR_UPDATE: Self = Self(0x659);
    pub const GAMEPAD_UPDATE_COMPLETE: Self = Self(0x65A);
    pub const GAMEPAD_STEAM_HANDLE_UPDATED: Self = Self(0x65B);

    pub const FINGER_DOWN: Self = Self(0x700);
    pub const FINGER_UP: Self = Self(0x701);
    pub const FINGER_MOTION: Self = Self(0x702);

    pub const CLIPBOARD_UPDATE: Self = Self(0x900);

    pub const DROP_FILE: Self = Self(0x1000);
    pub const DROP_TEXT: Self = Self(0x1001);
    pub const DROP_BEGIN: Self = Self(0x1002);
    pub const DROP_COMPLETE: Self = Self(0x1003);
    pub const DROP_POSITION: Self = Self(0x1004);

    pub const RENDER_TARGETS_RESET: Self = Self(0x2000);
    pub const RENDER_DEVICE_RESET: Self = Self(0x2001);

    pub const POLL_SENTINEL: Self = Self(0x7F00);
    pub const USER: Self = Self(0x8000);
    pub const LAST: Self = Self(0xFFFF);
    pub const ENUM_PADDING: Self = Self(0x7FFF_FFFF);

    /// Tags that never carry a decodable payload
    ///
    /// Covers the poll sentinel, the application-defined user range and
    /// everything above [`EventType::LAST`] (the enum padding range).
    pub fn is_reserved(self) -> bool {
        self == Self::POLL_SENTINEL || self.0 >= Self::USER.0
    }
}

/// Header shared by every payload
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CommonPayload {
    pub r#type: u32,
    pub reserved: u32,
    /// Nanoseconds since the native layer started
    pub timestamp: u64,
}

impl CommonPayload {
    pub fn new(tag: EventType, timestamp: u64) -> Self {
        Self {
            r#type: tag.0,
            reserved: 0,
            timestamp,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DisplayPayload {
    pub common: CommonPayload,
    pub display_id: u32,
    pub data1: i32,
    pub data2: i32,
    pub _padding: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct WindowPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub data1: i32,
    pub data2: i32,
    pub _padding: u32,
}

/// Keyboard, mouse, joystick and gamepad attach/detach
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DevicePayload {
    pub common: CommonPayload,
    pub which: u32,
    pub _padding: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct KeyboardPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub which: u32,
    pub scancode: u32,
    pub key: u32,
    pub modifiers: u16,
    pub raw: u16,
    pub down: u8,
    pub repeat: u8,
    pub _padding: [u8; 2],
}

/// IME composition; `text` is a native string handle
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TextEditingPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub _padding: u32,
    pub text: u64,
    pub start: i32,
    pub length: i32,
}

/// Committed text; `text` is a native string handle
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TextInputPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub _padding: u32,
    pub text: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MouseMotionPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub which: u32,
    pub state: u32,
    pub x: f32,
    pub y: f32,
    pub xrel: f32,
    pub yrel: f32,
    pub _padding: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MouseButtonPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub which: u32,
    pub button: u8,
    pub down: u8,
    pub clicks: u8,
    pub _padding1: u8,
    pub x: f32,
    pub y: f32,
    pub _padding2: u32,
}

/// Wheel direction value for flipped ("natural") scrolling
pub const MOUSE_WHEEL_FLIPPED: u32 = 1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct MouseWheelPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub which: u32,
    pub x: f32,
    pub y: f32,
    pub direction: u32,
    pub mouse_x: f32,
    pub mouse_y: f32,
    pub _padding: u32,
}

/// Joystick and gamepad axis motion
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct AxisPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub axis: u8,
    pub _padding1: [u8; 3],
    pub value: i16,
    pub _padding2: u16,
    pub _padding3: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct BallPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub ball: u8,
    pub _padding1: [u8; 3],
    pub xrel: i16,
    pub yrel: i16,
    pub _padding2: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HatPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub hat: u8,
    pub value: u8,
    pub _padding: [u8; 2],
}

/// Joystick and gamepad buttons
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct ButtonPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub button: u8,
    pub down: u8,
    pub _padding: [u8; 2],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TouchpadPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub touchpad: i32,
    pub finger: i32,
    pub x: f32,
    pub y: f32,
    pub pressure: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct SensorPayload {
    pub common: CommonPayload,
    pub which: u32,
    pub sensor: i32,
    pub data: [f32; 3],
    pub _padding: u32,
    pub sensor_timestamp: u64,
}

/// File/text drop; `source` and `data` are native string handles
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct DropPayload {
    pub common: CommonPayload,
    pub window_id: u32,
    pub x: f32,
    pub y: f32,
    pub _padding: u32,
    pub source: u64,
    pub data: u64,
}

/// One opaque native event record
#[repr(C, align(8))]
#[derive(Clone, Copy)]
pub struct NativeEvent {
    bytes: [u8; NATIVE_EVENT_SIZE],
}

impl NativeEvent {
    /// Wraps raw bytes handed over by the OS layer
    pub fn from_bytes(bytes: [u8; NATIVE_EVENT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Builds a record holding `payload`, zero-filling the remainder
    pub fn encode<P: Pod>(payload: &P) -> Self {
        const {
            assert!(std::mem::size_of::<P>() <= NATIVE_EVENT_SIZE);
        }
        let mut bytes = [0u8; NATIVE_EVENT_SIZE];
        bytes[..std::mem::size_of::<P>()].copy_from_slice(bytemuck::bytes_of(payload));
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; NATIVE_EVENT_SIZE] {
        &self.bytes
    }

    pub fn event_type(&self) -> EventType {
        EventType(bytemuck::pod_read_unaligned(&self.bytes[..4]))
    }

    /// Reads the payload shape `P` from the leading `size_of::<P>()` bytes
    ///
    /// Bytes past the payload's own size are never touched.
    pub fn read<P: Pod>(&self) -> P {
        bytemuck::pod_read_unaligned(&self.bytes[..std::mem::size_of::<P>()])
    }
}

impl std::fmt::Debug for NativeEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeEvent")
            .field("type", &format_args!("{:#x}", self.event_type().0))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    #[test]
    fn test_payload_sizes_match_native_layout() {
        assert_eq!(size_of::<CommonPayload>(), 16);
        assert_eq!(size_of::<WindowPayload>(), 32);
        assert_eq!(size_of::<KeyboardPayload>(), 40);
        assert_eq!(size_of::<TextEditingPayload>(), 40);
        assert_eq!(size_of::<TextInputPayload>(), 32);
        assert_eq!(size_of::<MouseMotionPayload>(), 48);
        assert_eq!(size_of::<MouseButtonPayload>(), 40);
        assert_eq!(size_of::<MouseWheelPayload>(), 48);
        assert_eq!(size_of::<SensorPayload>(), 48);
        assert_eq!(size_of::<DropPayload>(), 48);
        assert_eq!(size_of::<NativeEvent>(), NATIVE_EVENT_SIZE);
    }

    #[test]
    fn test_tag_is_first_word() {
        let event = NativeEvent::encode(&CommonPayload::new(EventType::QUIT, 42));
        assert_eq!(event.event_type(), EventType::QUIT);
        assert_eq!(event.read::<CommonPayload>().timestamp, 42);
    }

    #[test]
    fn test_encode_zero_fills_tail() {
        let event = NativeEvent::encode(&CommonPayload::new(EventType::QUIT, 1));
        assert!(event.as_bytes()[16..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_reserved_ranges() {
        assert!(EventType::POLL_SENTINEL.is_reserved());
        assert!(EventType::USER.is_reserved());
        assert!(EventType::LAST.is_reserved());
        assert!(EventType::ENUM_PADDING.is_reserved());
        assert!(!EventType::QUIT.is_reserved());
        assert!(!EventType::RENDER_DEVICE_RESET.is_reserved());
    }
}
