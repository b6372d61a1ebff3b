//! Connected input device registry
//!
//! Devices are keyed by kind and native id. Metadata is fetched once when a
//! device is added and cached until it is removed. A native id seen again
//! after removal is a new device and gets a new [`DeviceInstance`].

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info, warn};

use crate::error::{DeviceMetadataUnavailable, NativeError};
use crate::platform::{DeviceHandle, DeviceInfo, NativeDeviceApi};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeviceKind {
    Keyboard,
    Mouse,
    Joystick,
    Gamepad,
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Keyboard => "Keyboard",
            Self::Mouse => "Mouse",
            Self::Joystick => "Joystick",
            Self::Gamepad => "Gamepad",
        })
    }
}

/// Registration generation; unique for the lifetime of a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceInstance(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub buttons: u32,
    pub axes: u32,
    pub is_gamepad: bool,
}

/// A connected device and its cached metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    pub id: u32,
    pub kind: DeviceKind,
    pub instance: DeviceInstance,
    pub name: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub product_version: u16,
    pub capabilities: Capabilities,
    /// Metadata could not be read; name and ids are placeholders
    pub metadata_degraded: bool,
    handle: Option<DeviceHandle>,
}

impl Device {
    /// Native handle held open while the device is registered
    pub fn handle(&self) -> Option<DeviceHandle> {
        self.handle
    }

    fn apply_info(&mut self, info: DeviceInfo) {
        self.name = info.name;
        self.vendor_id = info.vendor_id;
        self.product_id = info.product_id;
        self.product_version = info.product_version;
        self.capabilities.buttons = info.buttons;
        self.capabilities.axes = info.axes;
        self.metadata_degraded = false;
    }

    fn degrade(&mut self) {
        self.name = format!("Unknown {}", self.kind);
        self.vendor_id = 0;
        self.product_id = 0;
        self.product_version = 0;
        self.metadata_degraded = true;
    }
}

#[derive(Debug, Default)]
pub struct DeviceRegistry {
    devices: IndexMap<(DeviceKind, u32), Device>,
    next_instance: u64,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device, or returns the existing record if already present
    pub fn on_device_added(
        &mut self,
        api: &mut (impl NativeDeviceApi + ?Sized),
        kind: DeviceKind,
        id: u32,
    ) -> &Device {
        match self.devices.entry((kind, id)) {
            Entry::Occupied(entry) => {
                debug!(device.kind = %kind, device.id = id, "Device already registered");
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.next_instance += 1;
                let device = attach(api, kind, id, DeviceInstance(self.next_instance));
                info!(
                    device.kind = %kind,
                    device.id = id,
                    device.name = %device.name,
                    device.degraded = device.metadata_degraded,
                    "Device connected"
                );
                entry.insert(device)
            }
        }
    }

    /// Removes a device and closes its handle; unknown ids are ignored
    pub fn on_device_removed(
        &mut self,
        api: &mut (impl NativeDeviceApi + ?Sized),
        kind: DeviceKind,
        id: u32,
    ) -> Option<Device> {
        let Some(device) = self.devices.shift_remove(&(kind, id)) else {
            debug!(device.kind = %kind, device.id = id, "Removal of unknown device ignored");
            return None;
        };
        if let Some(handle) = device.handle {
            api.close(handle);
        }
        info!(
            device.kind = %kind,
            device.id = id,
            device.name = %device.name,
            "Device disconnected"
        );
        Some(device)
    }

    /// Re-reads metadata for a registered device after a remap
    pub fn on_device_remapped(
        &mut self,
        api: &mut (impl NativeDeviceApi + ?Sized),
        kind: DeviceKind,
        id: u32,
    ) -> Option<&Device> {
        let device = self.devices.get_mut(&(kind, id))?;
        if let Some(handle) = device.handle {
            match api.device_info(handle) {
                Ok(info) => device.apply_info(info),
                Err(source) => {
                    let error = DeviceMetadataUnavailable { kind, id, source };
                    warn!(error = %error, "Keeping cached metadata after remap");
                }
            }
        }
        Some(device)
    }

    pub fn get(&self, kind: DeviceKind, id: u32) -> Option<&Device> {
        self.devices.get(&(kind, id))
    }

    pub fn contains(&self, kind: DeviceKind, id: u32) -> bool {
        self.devices.contains_key(&(kind, id))
    }

    /// Connected devices of one kind, in connection order
    pub fn list_connected(&self, kind: DeviceKind) -> impl Iterator<Item = &Device> {
        self.devices
            .values()
            .filter(move |device| device.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.values()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Closes every open handle and forgets all devices
    pub fn clear(&mut self, api: &mut (impl NativeDeviceApi + ?Sized)) {
        for (_, device) in self.devices.drain(..) {
            if let Some(handle) = device.handle {
                api.close(handle);
            }
        }
    }
}

fn attach(
    api: &mut (impl NativeDeviceApi + ?Sized),
    kind: DeviceKind,
    id: u32,
    instance: DeviceInstance,
) -> Device {
    let mut device = Device {
        id,
        kind,
        instance,
        name: String::new(),
        vendor_id: 0,
        product_id: 0,
        product_version: 0,
        capabilities: Capabilities {
            is_gamepad: match kind {
                DeviceKind::Gamepad => true,
                DeviceKind::Joystick => api.is_gamepad(id),
                DeviceKind::Keyboard | DeviceKind::Mouse => false,
            },
            ..Capabilities::default()
        },
        metadata_degraded: false,
        handle: None,
    };

    let result: Result<(), NativeError> = match kind {
        DeviceKind::Keyboard => api.keyboard_name(id).map(|name| device.name = name),
        DeviceKind::Mouse => api.mouse_name(id).map(|name| device.name = name),
        DeviceKind::Joystick | DeviceKind::Gamepad => {
            let opened = if kind == DeviceKind::Gamepad {
                api.open_gamepad(id)
            } else {
                api.open_joystick(id)
            };
            opened.and_then(|handle| {
                device.handle = Some(handle);
                api.device_info(handle).map(|info| device.apply_info(info))
            })
        }
    };

    if let Err(source) = result {
        device.degrade();
        let error = DeviceMetadataUnavailable { kind, id, source };
        warn!(error = %error, "Registering device with placeholder metadata");
    }
    device
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    #[derive(Default)]
    struct FakeDevices {
        infos: HashMap<u32, DeviceInfo>,
        gamepads: HashSet<u32>,
        open: HashMap<DeviceHandle, u32>,
        next_handle: u64,
    }

    impl FakeDevices {
        fn open(&mut self, id: u32) -> Result<DeviceHandle, NativeError> {
            if !self.infos.contains_key(&id) {
                return Err(NativeError::UnknownDevice(id));
            }
            self.next_handle += 1;
            let handle = DeviceHandle(self.next_handle);
            self.open.insert(handle, id);
            Ok(handle)
        }
    }

    impl NativeDeviceApi for FakeDevices {
        fn is_gamepad(&self, id: u32) -> bool {
            self.gamepads.contains(&id)
        }
        fn open_gamepad(&mut self, id: u32) -> Result<DeviceHandle, NativeError> {
            self.open(id)
        }
        fn open_joystick(&mut self, id: u32) -> Result<DeviceHandle, NativeError> {
            self.open(id)
        }
        fn close(&mut self, handle: DeviceHandle) {
            self.open.remove(&handle);
        }
        fn device_info(&self, handle: DeviceHandle) -> Result<DeviceInfo, NativeError> {
            let id = self
                .open
                .get(&handle)
                .ok_or(NativeError::UnknownHandle(handle))?;
            self.infos
                .get(id)
                .cloned()
                .ok_or(NativeError::UnknownDevice(*id))
        }
        fn keyboard_name(&self, id: u32) -> Result<String, NativeError> {
            Ok(format!("Keyboard {id}"))
        }
        fn mouse_name(&self, _id: u32) -> Result<String, NativeError> {
            Err(NativeError::Call("no mouse name".to_string()))
        }
    }

    fn pad_info() -> DeviceInfo {
        DeviceInfo {
            name: "Pad".to_string(),
            vendor_id: 0x045e,
            product_id: 0x02ea,
            product_version: 1,
            buttons: 15,
            axes: 6,
        }
    }

    #[test]
    fn test_add_fetches_metadata_once() {
        let mut api = FakeDevices::default();
        api.infos.insert(3, pad_info());
        let mut registry = DeviceRegistry::new();

        let device = registry.on_device_added(&mut api, DeviceKind::Gamepad, 3);
        assert_eq!(device.name, "Pad");
        assert_eq!(device.vendor_id, 0x045e);
        assert!(device.capabilities.is_gamepad);
        assert_eq!(device.capabilities.axes, 6);
        assert_eq!(api.open.len(), 1);
    }

    #[test]
    fn test_keyboard_sharing_a_gamepad_id_is_not_a_gamepad() {
        let mut api = FakeDevices::default();
        api.infos.insert(1, pad_info());
        api.gamepads.insert(1);
        let mut registry = DeviceRegistry::new();

        registry.on_device_added(&mut api, DeviceKind::Gamepad, 1);
        let keyboard = registry.on_device_added(&mut api, DeviceKind::Keyboard, 1);
        assert!(!keyboard.capabilities.is_gamepad);
        let mouse = registry.on_device_added(&mut api, DeviceKind::Mouse, 1);
        assert!(!mouse.capabilities.is_gamepad);

        let joystick = registry.on_device_added(&mut api, DeviceKind::Joystick, 1);
        assert!(joystick.capabilities.is_gamepad);
        let gamepad = registry.get(DeviceKind::Gamepad, 1).unwrap();
        assert!(gamepad.capabilities.is_gamepad);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut api = FakeDevices::default();
        api.infos.insert(3, pad_info());
        let mut registry = DeviceRegistry::new();

        let first = registry
            .on_device_added(&mut api, DeviceKind::Gamepad, 3)
            .instance;
        let second = registry
            .on_device_added(&mut api, DeviceKind::Gamepad, 3)
            .instance;
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(api.open.len(), 1);
    }

    #[test]
    fn test_remove_closes_handle_and_unknown_is_noop() {
        let mut api = FakeDevices::default();
        api.infos.insert(3, pad_info());
        let mut registry = DeviceRegistry::new();
        registry.on_device_added(&mut api, DeviceKind::Joystick, 3);

        let removed = registry.on_device_removed(&mut api, DeviceKind::Joystick, 3);
        assert!(removed.is_some());
        assert!(api.open.is_empty());

        let again = registry.on_device_removed(&mut api, DeviceKind::Joystick, 3);
        assert!(again.is_none());
        let unknown = registry.on_device_removed(&mut api, DeviceKind::Mouse, 42);
        assert!(unknown.is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_readd_gets_new_instance() {
        let mut api = FakeDevices::default();
        api.infos.insert(3, pad_info());
        let mut registry = DeviceRegistry::new();

        let first = registry
            .on_device_added(&mut api, DeviceKind::Gamepad, 3)
            .instance;
        registry.on_device_removed(&mut api, DeviceKind::Gamepad, 3);
        let second = registry
            .on_device_added(&mut api, DeviceKind::Gamepad, 3)
            .instance;
        assert_ne!(first, second);
    }

    #[test]
    fn test_metadata_failure_degrades() {
        let mut api = FakeDevices::default();
        let mut registry = DeviceRegistry::new();

        let mouse = registry.on_device_added(&mut api, DeviceKind::Mouse, 1);
        assert!(mouse.metadata_degraded);
        assert_eq!(mouse.name, "Unknown Mouse");

        let joystick = registry.on_device_added(&mut api, DeviceKind::Joystick, 8);
        assert!(joystick.metadata_degraded);
        assert_eq!(joystick.name, "Unknown Joystick");
        assert_eq!((joystick.vendor_id, joystick.product_id), (0, 0));
        assert_eq!(joystick.handle(), None);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_list_connected_filters_by_kind() {
        let mut api = FakeDevices::default();
        let mut registry = DeviceRegistry::new();
        registry.on_device_added(&mut api, DeviceKind::Keyboard, 1);
        registry.on_device_added(&mut api, DeviceKind::Keyboard, 2);
        registry.on_device_added(&mut api, DeviceKind::Mouse, 1);

        let ids: Vec<u32> = registry
            .list_connected(DeviceKind::Keyboard)
            .map(|device| device.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
        let second = registry.get(DeviceKind::Keyboard, 2).unwrap();
        assert_eq!(second.name, "Keyboard 2");
    }

    #[test]
    fn test_clear_closes_all_handles() {
        let mut api = FakeDevices::default();
        api.infos.insert(3, pad_info());
        api.infos.insert(4, pad_info());
        let mut registry = DeviceRegistry::new();
        registry.on_device_added(&mut api, DeviceKind::Gamepad, 3);
        registry.on_device_added(&mut api, DeviceKind::Joystick, 4);

        registry.clear(&mut api);
        assert!(registry.is_empty());
        assert!(api.open.is_empty());
    }
}
