//! Control boundary for the `tof-comms` register transport.
//!
//! A controlling process (or a host across a link) drives a sensor with
//! two commands: run a register transfer described by a fixed 16-byte
//! [`TransferRequest`], or block until the sensor's data-ready interrupt.
//! [`ControlEndpoint`] serves both on top of a [`tof_comms::Device`].
//!
//! Caller memory is reached only through [`CallerMemory`], which copies
//! whole ranges or fails. Each failure maps onto a negative errno via
//! [`ControlError::errno`].
//!
//! ```ignore
//! use tof_control::{status, ControlEndpoint, MemoryWindow};
//!
//! let mut endpoint = ControlEndpoint::new(sensor);
//! let mut memory = MemoryWindow::new(shared_base, shared_bytes);
//! let result = endpoint.dispatch(code, argument, &mut memory, cancelled()).await;
//! reply(status(&result));
//! ```

#![cfg_attr(not(test), no_std)]

pub use control::{
    ioctl_code, Command, ControlEndpoint, STAGING_SIZE, TRANSFER, WAIT_FOR_INTERRUPT,
};
pub use descriptor::TransferRequest;
pub use error::{status, BoundaryCopyError, ControlError};
pub use memory::{CallerMemory, MemoryWindow};

mod control;
mod descriptor;
mod error;
mod memory;
