//! Async register transport for the VL53L8CX time-of-flight sensor.
//!
//! This crate moves bytes between the sensor's 16-bit register space and
//! application buffers over either of the two buses the sensor supports,
//! and delivers the sensor's data-ready interrupt to a waiting consumer.
//! The ranging firmware protocol itself lives above this crate; it only
//! needs the read/write-register and wait-for-ready primitives here.
//!
//! # Architecture
//!
//! The crate is split into four layers:
//!
//! - **Transport backends** — [`I2cTransport`] and [`SpiTransport`] perform
//!   one bus transaction per chunk and never retry.
//! - **`engine`** (crate-private) — splits a logical transfer into chunks
//!   no larger than the backend's limit, advancing the register address.
//! - **[`Device`]** (public) — byte and multi-byte register access, plus
//!   identity detection and the data-ready wait.
//! - **[`InterruptBridge`]** — single-slot readiness flag set from
//!   interrupt context and consumed by exactly one waiter.
//!
//! # Quick start
//!
//! ```ignore
//! use tof_comms::{Device, DeviceConfig, I2cTransport, InterruptBridge, TwoWireConfig};
//!
//! static SENSOR_READY: InterruptBridge = InterruptBridge::new();
//!
//! // `i2c` is any `embedded-hal-async` I2C implementation
//! let transport = I2cTransport::new(i2c, TwoWireConfig::default());
//! let mut sensor = Device::new(transport, &SENSOR_READY, DeviceConfig::default());
//!
//! let identity = sensor.detect().await.unwrap();
//! sensor.wait_for_ready().await;
//! let mut frame = [0u8; 256];
//! sensor.read_multi(0x2C00, &mut frame).await.unwrap();
//! ```
//!
//! # Features
//!
//! - **`defmt`** — structured logging and [`defmt::Format`] implementations
//!   on the error and configuration types.
//! - **`time`** — millisecond delay and timed data-ready wait on [`Device`]
//!   via `embassy-time`.

#![cfg_attr(not(test), no_std)]

pub use config::{DeviceConfig, FourWireConfig, TwoWireConfig};
pub use device::{Device, Identity};
pub use engine::check_span;
pub use error::{BusError, CommsError, ConfigurationError, Interrupted};
pub use i2c::I2cTransport;
pub use interrupt::{forward_interrupts, InterruptBridge};
pub use registers::{DEFAULT_ADDRESS, DEVICE_NAME, I2C_CHUNK_SIZE, SPI_CHUNK_SIZE};
pub use spi::SpiTransport;
pub use transport::{Binding, Direction, Transport};

mod config;
mod device;
mod engine;
mod error;
pub mod fields;
mod i2c;
mod interrupt;
pub mod registers;
mod spi;
mod transport;

#[cfg(test)]
mod mock;
