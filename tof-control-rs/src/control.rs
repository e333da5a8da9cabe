//! Control operations exposed to the controlling side.
//!
//! Two commands, addressed by their ioctl-style codes:
//!
//! | Command                       | Code          | Argument                       |
//! |-------------------------------|---------------|--------------------------------|
//! | [`Command::Transfer`]         | `0xC010_6101` | caller address of a descriptor |
//! | [`Command::WaitForInterrupt`] | `0x0000_6102` | unused                         |

use core::future::Future;

use tof_comms::{check_span, Device, Direction, Transport};

use crate::descriptor::TransferRequest;
use crate::error::{BoundaryCopyError, ControlError};
use crate::memory::CallerMemory;

/// Caller data is staged through a buffer of this size.
pub const STAGING_SIZE: usize = 1024;

const IOC_NONE: u32 = 0;
const IOC_WRITE: u32 = 1;
const IOC_READ: u32 = 2;

/// Build a command code the way Linux `_IOC` does.
pub const fn ioctl_code(direction: u32, kind: u8, number: u8, size: u16) -> u32 {
    (direction << 30) | ((size as u32) << 16) | ((kind as u32) << 8) | number as u32
}

/// `_IOWR('a', 1, TransferRequest)`
pub const TRANSFER: u32 = ioctl_code(
    IOC_READ | IOC_WRITE,
    b'a',
    1,
    TransferRequest::SIZE as u16,
);

/// `_IO('a', 2)`
pub const WAIT_FOR_INTERRUPT: u32 = ioctl_code(IOC_NONE, b'a', 2, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Run one register transfer described by a [`TransferRequest`].
    Transfer,
    /// Block until the sensor's data-ready interrupt.
    WaitForInterrupt,
}

impl Command {
    pub const fn code(self) -> u32 {
        match self {
            Command::Transfer => TRANSFER,
            Command::WaitForInterrupt => WAIT_FOR_INTERRUPT,
        }
    }
}

impl TryFrom<u32> for Command {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, u32> {
        match code {
            TRANSFER => Ok(Command::Transfer),
            WAIT_FOR_INTERRUPT => Ok(Command::WaitForInterrupt),
            other => Err(other),
        }
    }
}

/// Serves control commands for one sensor.
///
/// Transfers never touch caller memory directly: data moves through a
/// [`STAGING_SIZE`] buffer, one block at a time, copied across the
/// boundary per block. The whole caller buffer is checked before the first
/// bus access, so a short buffer never reaches the sensor. A failed bus
/// access aborts the transfer at that block.
pub struct ControlEndpoint<'a, T> {
    device: Device<'a, T>,
    staging: [u8; STAGING_SIZE],
}

impl<'a, T> ControlEndpoint<'a, T>
where
    T: Transport,
{
    pub fn new(device: Device<'a, T>) -> Self {
        Self {
            device,
            staging: [0; STAGING_SIZE],
        }
    }

    pub fn device(&self) -> &Device<'a, T> {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut Device<'a, T> {
        &mut self.device
    }

    pub fn into_device(self) -> Device<'a, T> {
        self.device
    }

    /// Execute a command by code.
    ///
    /// `argument` is the command's argument word; `cancel` aborts a
    /// data-ready wait and is ignored by other commands.
    pub async fn dispatch<M, C>(
        &mut self,
        code: u32,
        argument: u64,
        memory: &mut M,
        cancel: C,
    ) -> Result<(), ControlError<T::Error>>
    where
        M: CallerMemory,
        C: Future,
    {
        let command = Command::try_from(code).map_err(|code| {
            #[cfg(feature = "defmt")]
            defmt::warn!("unknown command {=u32:#010x}", code);
            ControlError::UnknownCommand(code)
        })?;

        match command {
            Command::Transfer => self.transfer(argument, memory).await,
            Command::WaitForInterrupt => self.wait_for_interrupt(cancel).await,
        }
    }

    /// Read the descriptor at caller address `request_address` and run it.
    ///
    /// # Errors
    /// * [`ControlError::Descriptor`] if the descriptor cannot be copied in
    /// * anything [`execute`](Self::execute) returns
    pub async fn transfer<M: CallerMemory>(
        &mut self,
        request_address: u64,
        memory: &mut M,
    ) -> Result<(), ControlError<T::Error>> {
        let mut raw = [0u8; TransferRequest::SIZE];
        memory
            .copy_in(request_address, &mut raw)
            .map_err(ControlError::Descriptor)?;
        let request = TransferRequest::from_bytes(&raw);
        self.execute(&request, memory).await
    }

    /// Run one decoded transfer request against the caller's buffer.
    ///
    /// # Errors
    /// * [`ControlError::Comms`] if the register span is invalid or a bus
    ///   access fails; transport offsets count from the request's start
    /// * [`ControlError::Buffer`] if the caller buffer does not cover `len`
    ///   bytes, or a block cannot be copied across
    pub async fn execute<M: CallerMemory>(
        &mut self,
        request: &TransferRequest,
        memory: &mut M,
    ) -> Result<(), ControlError<T::Error>> {
        let len = usize::from(request.len);
        check_span::<T::Error>(request.register, len, self.device.address_limit())?;
        if len > 0 {
            // Reject a short caller buffer before anything reaches the bus.
            memory
                .check(request.buffer, len)
                .map_err(ControlError::Buffer)?;
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "{} {} bytes at {=u16:#06x}",
            request.direction,
            len,
            request.register
        );

        let mut done = 0;
        while done < len {
            let block = (len - done).min(STAGING_SIZE);
            // In range: check_span bounds register + done below the limit.
            let register = request.register + done as u16;
            let address = request
                .buffer
                .checked_add(done as u64)
                .ok_or(BoundaryCopyError {
                    address: request.buffer,
                    len,
                })
                .map_err(ControlError::Buffer)?;
            let staging = &mut self.staging[..block];

            match request.direction {
                Direction::Write => {
                    memory
                        .copy_in(address, staging)
                        .map_err(ControlError::Buffer)?;
                    self.device
                        .write_multi(register, staging)
                        .await
                        .map_err(|e| e.offset_by(done))?;
                }
                Direction::Read => {
                    self.device
                        .read_multi(register, staging)
                        .await
                        .map_err(|e| e.offset_by(done))?;
                    memory
                        .copy_out(address, staging)
                        .map_err(ControlError::Buffer)?;
                }
            }

            done += block;
        }

        Ok(())
    }

    /// Block until the data-ready interrupt, then consume it.
    ///
    /// # Errors
    /// [`ControlError::Interrupted`] if `cancel` completes first.
    pub async fn wait_for_interrupt<C: Future>(
        &self,
        cancel: C,
    ) -> Result<(), ControlError<T::Error>> {
        self.device.wait_for_ready_or(cancel).await?;
        Ok(())
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
