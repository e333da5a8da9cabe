//! Register access for one bound sensor.
//!
//! [`Device`] is the handle the ranging layer talks to. It owns exactly one
//! transport binding and borrows the sensor's own [`InterruptBridge`], so
//! several sensors can be open at once without sharing a readiness flag.

use core::future::Future;

use heapless::String;

use crate::config::DeviceConfig;
use crate::engine;
use crate::error::{CommsError, Interrupted};
use crate::interrupt::InterruptBridge;
use crate::registers::{
    DEVICE_ID, EXPECTED_DEVICE_ID, EXPECTED_REVISION_ID, PAGE_SELECT, REVISION_ID,
};
use crate::transport::Transport;

/// Identity registers read during [`Device::detect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Identity {
    pub device_id: u8,
    pub revision_id: u8,
}

/// Handle to one sensor on one bus.
///
/// Register operations take `&mut self`: a handle runs one transfer at a
/// time, and the chunks of a transfer are issued in address order. The
/// data-ready wait takes `&self` and only touches the interrupt bridge.
///
/// On failure a read leaves the caller's buffer partially filled; nothing
/// is rolled back. Re-establish state (e.g. with a single-byte read) before
/// retrying.
///
/// # Example
///
/// ```ignore
/// use tof_comms::{Device, DeviceConfig, InterruptBridge, SpiTransport, FourWireConfig};
///
/// static SENSOR_READY: InterruptBridge = InterruptBridge::new();
///
/// let transport = SpiTransport::new(spi, FourWireConfig::default())?;
/// let mut sensor = Device::new(transport, &SENSOR_READY, DeviceConfig::with_instance(1));
///
/// sensor.write_byte(0x7FFF, 0x02).await?;
/// let status = sensor.read_byte(0x0006).await?;
/// ```
pub struct Device<'a, T> {
    transport: T,
    ready: &'a InterruptBridge,
    config: DeviceConfig,
}

impl<'a, T> Device<'a, T>
where
    T: Transport,
{
    /// Open a handle over a bound transport.
    ///
    /// No bus traffic is generated. Call [`detect`](Self::detect) to check
    /// that a sensor actually answers.
    ///
    /// # Arguments
    /// * `transport` — the bound backend (takes ownership)
    /// * `ready` — this sensor's interrupt bridge; must not be shared with
    ///   another sensor
    /// * `config` — per-device parameters
    pub fn new(transport: T, ready: &'a InterruptBridge, config: DeviceConfig) -> Self {
        Self {
            transport,
            ready,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Register access
    // -----------------------------------------------------------------------

    /// Read one register byte.
    pub async fn read_byte(&mut self, register: u16) -> Result<u8, CommsError<T::Error>> {
        let mut value = [0u8; 1];
        self.read_multi(register, &mut value).await?;
        Ok(value[0])
    }

    /// Write one register byte.
    pub async fn write_byte(
        &mut self,
        register: u16,
        value: u8,
    ) -> Result<(), CommsError<T::Error>> {
        self.write_multi(register, &[value]).await
    }

    /// Fill `buffer` from consecutive registers starting at `register`.
    ///
    /// # Errors
    /// * [`CommsError::AddressOverflow`] if the span runs past 0xFFFF
    /// * [`CommsError::Transport`] on the first failing chunk
    pub async fn read_multi(
        &mut self,
        register: u16,
        buffer: &mut [u8],
    ) -> Result<(), CommsError<T::Error>> {
        engine::read(&mut self.transport, register, buffer).await
    }

    /// Write `data` to consecutive registers starting at `register`.
    ///
    /// # Errors
    /// * [`CommsError::AddressOverflow`] if the span runs past 0xFFFF
    /// * [`CommsError::Transport`] on the first failing chunk
    pub async fn write_multi(
        &mut self,
        register: u16,
        data: &[u8],
    ) -> Result<(), CommsError<T::Error>> {
        engine::write(&mut self.transport, register, data).await
    }

    /// Check that a VL53L8CX answers on the bound transport.
    ///
    /// Selects register page 0, then reads the device and revision IDs.
    /// Useful as the diagnostic read after a failed transfer, too.
    ///
    /// # Errors
    /// * [`CommsError::Transport`] from the first failing access
    /// * [`CommsError::UnknownDevice`] if the IDs do not match
    pub async fn detect(&mut self) -> Result<Identity, CommsError<T::Error>> {
        self.write_byte(PAGE_SELECT, 0x00).await?;
        let identity = Identity {
            device_id: self.read_byte(DEVICE_ID).await?,
            revision_id: self.read_byte(REVISION_ID).await?,
        };

        if identity.device_id != EXPECTED_DEVICE_ID || identity.revision_id != EXPECTED_REVISION_ID
        {
            #[cfg(feature = "defmt")]
            defmt::error!("{}: could not read device and revision id", self.config.instance);
            return Err(CommsError::UnknownDevice {
                device_id: identity.device_id,
                revision_id: identity.revision_id,
            });
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "device_id: {=u8:#04x}, revision_id: {=u8:#04x}",
            identity.device_id,
            identity.revision_id
        );

        Ok(identity)
    }

    // -----------------------------------------------------------------------
    // Data ready
    // -----------------------------------------------------------------------

    /// Wait until the sensor raises its interrupt, then consume it.
    ///
    /// Returns immediately if an interrupt arrived since the last wait.
    /// Only one task may wait on a given sensor at a time.
    pub async fn wait_for_ready(&self) {
        self.ready.wait().await;
    }

    /// Like [`wait_for_ready`](Self::wait_for_ready), but gives up when
    /// `cancel` completes first.
    ///
    /// # Errors
    /// [`Interrupted`] if cancelled. The readiness flag is left as it was.
    pub async fn wait_for_ready_or<C: Future>(&self, cancel: C) -> Result<(), Interrupted> {
        self.ready.wait_or(cancel).await
    }

    /// Wait at most `timeout_ms` for data ready.
    ///
    /// # Errors
    /// [`Interrupted`] if the timeout elapsed first.
    #[cfg(feature = "time")]
    pub async fn wait_for_ready_timeout(&self, timeout_ms: u64) -> Result<(), Interrupted> {
        let timeout = embassy_time::Timer::after(embassy_time::Duration::from_millis(timeout_ms));
        self.ready.wait_or(timeout).await
    }

    /// Sleep for `ms` milliseconds. The ranging layer uses this between
    /// polls and during boot sequences.
    #[cfg(feature = "time")]
    pub async fn wait_ms(&self, ms: u32) {
        embassy_time::Timer::after(embassy_time::Duration::from_millis(u64::from(ms))).await;
    }

    // -----------------------------------------------------------------------
    // Handle
    // -----------------------------------------------------------------------

    /// External name of this sensor, e.g. `vl53l8cx1`.
    pub fn name(&self) -> String<16> {
        self.config.name()
    }

    /// Size of the register space reachable over the bound transport.
    pub fn address_limit(&self) -> usize {
        self.transport.address_limit()
    }

    /// Per-device configuration.
    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// This sensor's interrupt bridge.
    pub fn interrupt_bridge(&self) -> &'a InterruptBridge {
        self.ready
    }

    /// Mutable access to the bound transport, e.g. to reach the bus.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Close the handle and give the transport back.
    pub fn release(self) -> T {
        self.transport
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
