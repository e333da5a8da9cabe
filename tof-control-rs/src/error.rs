//! Error types for the control endpoint.

use core::fmt;

use tof_comms::CommsError;

const EINTR: i32 = 4;
const EFAULT: i32 = 14;
const EINVAL: i32 = 22;

/// A range of caller memory could not be copied in full.
///
/// Nothing from the failed copy is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundaryCopyError {
    pub address: u64,
    pub len: usize,
}

impl fmt::Display for BoundaryCopyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "cannot copy {} bytes at caller address 0x{:X}",
            self.len, self.address
        )
    }
}

/// Failure of one control operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlError<E> {
    /// The command code is not a known control operation.
    UnknownCommand(u32),
    /// The transfer descriptor could not be read from the caller.
    Descriptor(BoundaryCopyError),
    /// Transfer data could not be moved to or from the caller's buffer.
    Buffer(BoundaryCopyError),
    /// The register transfer itself failed.
    Comms(CommsError<E>),
    /// The data-ready wait was cancelled.
    Interrupted,
}

impl<E> ControlError<E> {
    /// Negative status code for callers that speak errno.
    pub fn errno(&self) -> i32 {
        match self {
            ControlError::UnknownCommand(_) | ControlError::Descriptor(_) => -EINVAL,
            ControlError::Buffer(_) | ControlError::Comms(_) => -EFAULT,
            ControlError::Interrupted => -EINTR,
        }
    }
}

/// Collapse an operation result into a status code: 0 on success, the
/// negative errno otherwise.
pub fn status<E>(result: &Result<(), ControlError<E>>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.errno(),
    }
}

impl<E> From<CommsError<E>> for ControlError<E> {
    fn from(e: CommsError<E>) -> Self {
        ControlError::Comms(e)
    }
}

impl<E> From<tof_comms::Interrupted> for ControlError<E> {
    fn from(_: tof_comms::Interrupted) -> Self {
        ControlError::Interrupted
    }
}

impl<E: fmt::Debug> fmt::Display for ControlError<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ControlError::UnknownCommand(code) => write!(f, "unknown command 0x{:08X}", code),
            ControlError::Descriptor(e) => write!(f, "transfer descriptor: {}", e),
            ControlError::Buffer(e) => write!(f, "transfer buffer: {}", e),
            ControlError::Comms(e) => write!(f, "{}", e),
            ControlError::Interrupted => write!(f, "interrupted"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for ControlError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ControlError::UnknownCommand(code) => {
                defmt::write!(f, "unknown command {=u32:#010x}", code)
            }
            ControlError::Descriptor(e) => defmt::write!(f, "transfer descriptor: {}", e),
            ControlError::Buffer(e) => defmt::write!(f, "transfer buffer: {}", e),
            ControlError::Comms(e) => defmt::write!(f, "{}", e),
            ControlError::Interrupted => defmt::write!(f, "interrupted"),
        }
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
