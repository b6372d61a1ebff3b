//! Input: native event decoding, device lifecycle and input state

pub mod decoder;
pub mod devices;
pub mod events;
pub mod keys;
pub mod state;

pub use decoder::decode;
pub use devices::{Capabilities, Device, DeviceInstance, DeviceKind, DeviceRegistry};
pub use events::{
    DeviceChange, DisplayEventKind, DropKind, FramedEvent, GamepadInput, JoystickInput,
    TouchPhase, WindowEventKind,
};
pub use keys::{GamepadAxis, GamepadButton, HatPosition, Key, Keymod, MouseButton, MouseButtons};
pub use state::{ButtonState, GamepadState, InputState};
