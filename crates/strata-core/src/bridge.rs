//! # Bridge Module
//!
//! Remote controls (the abstraction) over devices (the implementation).
//!
//! `Device` declares the primitives. `RemoteControl` expresses every remote
//! operation in terms of those primitives only, so:
//! - a new device works with every remote without touching remote code
//! - a new remote (`AdvancedRemote` adds `mute`) needs no device changes
//!
//! Bounds are a device concern: `Radio` clamps, `Tv` does not.

use crate::primitives::{CHANNEL_STEP, VOLUME_STEP};
use serde::Serialize;

// =============================================================================
// IMPLEMENTATION SIDE
// =============================================================================

/// The primitive operations every device offers.
pub trait Device {
    /// Check whether the device is powered on.
    fn is_enabled(&self) -> bool;

    /// Power on.
    fn enable(&mut self);

    /// Power off.
    fn disable(&mut self);

    /// Current volume.
    fn volume(&self) -> i32;

    /// Set the volume. The device decides how out-of-range values are handled.
    fn set_volume(&mut self, volume: i32);

    /// Current channel.
    fn channel(&self) -> i32;

    /// Set the channel. The device decides how out-of-range values are handled.
    fn set_channel(&mut self, channel: i32);
}

impl<D: Device + ?Sized> Device for &mut D {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn enable(&mut self) {
        (**self).enable();
    }

    fn disable(&mut self) {
        (**self).disable();
    }

    fn volume(&self) -> i32 {
        (**self).volume()
    }

    fn set_volume(&mut self, volume: i32) {
        (**self).set_volume(volume);
    }

    fn channel(&self) -> i32 {
        (**self).channel()
    }

    fn set_channel(&mut self, channel: i32) {
        (**self).set_channel(channel);
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn enable(&mut self) {
        (**self).enable();
    }

    fn disable(&mut self) {
        (**self).disable();
    }

    fn volume(&self) -> i32 {
        (**self).volume()
    }

    fn set_volume(&mut self, volume: i32) {
        (**self).set_volume(volume);
    }

    fn channel(&self) -> i32 {
        (**self).channel()
    }

    fn set_channel(&mut self, channel: i32) {
        (**self).set_channel(channel);
    }
}

/// Snapshot of a device's observable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeviceState {
    /// Powered on.
    pub enabled: bool,
    /// Volume level.
    pub volume: i32,
    /// Channel number.
    pub channel: i32,
}

impl DeviceState {
    /// Read the state of `device`.
    pub fn of<D: Device + ?Sized>(device: &D) -> Self {
        Self {
            enabled: device.is_enabled(),
            volume: device.volume(),
            channel: device.channel(),
        }
    }
}

/// A television. Accepts any volume and channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tv {
    enabled: bool,
    volume: i32,
    channel: i32,
}

impl Tv {
    /// Create a powered-off TV at volume 0, channel 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Device for Tv {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn volume(&self) -> i32 {
        self.volume
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume = volume;
    }

    fn channel(&self) -> i32 {
        self.channel
    }

    fn set_channel(&mut self, channel: i32) {
        self.channel = channel;
    }
}

/// A radio. Volume is clamped to `0..=100`, channels never go below 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Radio {
    enabled: bool,
    volume: i32,
    channel: i32,
}

impl Radio {
    /// Loudest volume the radio accepts.
    pub const MAX_VOLUME: i32 = 100;

    /// Create a powered-off radio at volume 0, channel 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Device for Radio {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn volume(&self) -> i32 {
        self.volume
    }

    fn set_volume(&mut self, volume: i32) {
        self.volume = volume.clamp(0, Self::MAX_VOLUME);
    }

    fn channel(&self) -> i32 {
        self.channel
    }

    fn set_channel(&mut self, channel: i32) {
        self.channel = channel.max(0);
    }
}

// =============================================================================
// ABSTRACTION SIDE
// =============================================================================

/// Remote operations, written against the `Device` primitives only.
///
/// Implementors supply access to their device; every operation is provided.
pub trait RemoteControl {
    /// The device type being controlled.
    type Device: Device;

    /// The controlled device.
    fn device(&self) -> &Self::Device;

    /// The controlled device, mutably.
    fn device_mut(&mut self) -> &mut Self::Device;

    /// Switch the device on if it is off, off if it is on.
    fn toggle_power(&mut self) {
        let device = self.device_mut();
        if device.is_enabled() {
            device.disable();
        } else {
            device.enable();
        }
    }

    /// Raise the volume by one step.
    fn volume_up(&mut self) {
        let device = self.device_mut();
        device.set_volume(device.volume().saturating_add(VOLUME_STEP));
    }

    /// Lower the volume by one step.
    fn volume_down(&mut self) {
        let device = self.device_mut();
        device.set_volume(device.volume().saturating_sub(VOLUME_STEP));
    }

    /// Go to the next channel.
    fn channel_up(&mut self) {
        let device = self.device_mut();
        device.set_channel(device.channel().saturating_add(CHANNEL_STEP));
    }

    /// Go to the previous channel.
    fn channel_down(&mut self) {
        let device = self.device_mut();
        device.set_channel(device.channel().saturating_sub(CHANNEL_STEP));
    }

    /// Snapshot of the controlled device.
    fn state(&self) -> DeviceState {
        DeviceState::of(self.device())
    }
}

/// The basic remote.
#[derive(Debug)]
pub struct Remote<D> {
    device: D,
}

impl<D: Device> Remote<D> {
    /// Control `device`. Pass `&mut device` to keep ownership.
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// Release the device.
    pub fn into_device(self) -> D {
        self.device
    }
}

impl<D: Device> RemoteControl for Remote<D> {
    type Device = D;

    fn device(&self) -> &D {
        &self.device
    }

    fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

/// A remote with a mute button, built on the basic remote.
#[derive(Debug)]
pub struct AdvancedRemote<D> {
    base: Remote<D>,
}

impl<D: Device> AdvancedRemote<D> {
    /// Control `device`.
    pub fn new(device: D) -> Self {
        Self {
            base: Remote::new(device),
        }
    }

    /// Silence the device.
    pub fn mute(&mut self) {
        self.device_mut().set_volume(0);
    }

    /// Release the device.
    pub fn into_device(self) -> D {
        self.base.into_device()
    }
}

impl<D: Device> RemoteControl for AdvancedRemote<D> {
    type Device = D;

    fn device(&self) -> &D {
        self.base.device()
    }

    fn device_mut(&mut self) -> &mut D {
        self.base.device_mut()
    }
}

// =============================================================================
// TESTS
// =============================================================================
