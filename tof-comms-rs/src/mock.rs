//! Host-side bus stubs backed by a simulated register space.

use embedded_hal::digital;
use embedded_hal::i2c;
use embedded_hal::spi;
use embedded_hal_async::digital::Wait;
use embedded_hal_async::i2c::I2c;
use embedded_hal_async::spi::SpiDevice;

use crate::registers::{REGISTER_SPACE, SPI_WRITE_BIT};
use crate::transport::{Direction, Transport};

/// Flat 64 KiB register space.
#[derive(Debug, Clone)]
pub struct RegisterSpace {
    bytes: Vec<u8>,
}

impl RegisterSpace {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; REGISTER_SPACE],
        }
    }

    pub fn load(&mut self, address: u16, data: &[u8]) {
        let start = usize::from(address);
        self.bytes[start..start + data.len()].copy_from_slice(data);
    }

    pub fn slice(&self, address: u16, len: usize) -> &[u8] {
        let start = usize::from(address);
        &self.bytes[start..start + len]
    }

    fn read_into(&self, address: u16, buffer: &mut [u8]) {
        buffer.copy_from_slice(self.slice(address, buffer.len()));
    }
}

// ── Recording transport ──────────────────────────────────────────────

/// One chunk call as seen by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub direction: Direction,
    pub address: u16,
    pub len: usize,
}

impl Chunk {
    pub fn read(address: u16, len: usize) -> Self {
        Self {
            direction: Direction::Read,
            address,
            len,
        }
    }

    pub fn write(address: u16, len: usize) -> Self {
        Self {
            direction: Direction::Write,
            address,
            len,
        }
    }
}

/// Transport with a configurable chunk limit that logs every chunk call.
pub struct RecordingTransport {
    limit: usize,
    fail_on: Option<usize>,
    pub space: RegisterSpace,
    pub chunks: Vec<Chunk>,
}

impl RecordingTransport {
    pub fn new(limit: usize) -> Self {
        Self::with_space(limit, RegisterSpace::new())
    }

    pub fn with_space(limit: usize, space: RegisterSpace) -> Self {
        Self {
            limit,
            fail_on: None,
            space,
            chunks: Vec::new(),
        }
    }

    /// Fail the `index`-th chunk call (counting from 0).
    pub fn fail_on_chunk(&mut self, index: usize) {
        self.fail_on = Some(index);
    }

    fn record(&mut self, chunk: Chunk) -> Result<(), ()> {
        assert!(chunk.len <= self.limit, "chunk over limit: {:?}", chunk);
        let index = self.chunks.len();
        self.chunks.push(chunk);
        if self.fail_on == Some(index) {
            Err(())
        } else {
            Ok(())
        }
    }
}

impl Transport for RecordingTransport {
    type Error = ();

    fn chunk_size(&self) -> usize {
        self.limit
    }

    async fn read_chunk(&mut self, address: u16, buffer: &mut [u8]) -> Result<(), ()> {
        self.record(Chunk::read(address, buffer.len()))?;
        self.space.read_into(address, buffer);
        Ok(())
    }

    async fn write_chunk(&mut self, address: u16, data: &[u8]) -> Result<(), ()> {
        self.record(Chunk::write(address, data.len()))?;
        self.space.load(address, data);
        Ok(())
    }
}

// ── I2C ──────────────────────────────────────────────────────────────

/// One I2C transaction as seen on the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum I2cMessage {
    Write { address: u8, bytes: Vec<u8> },
    Read { address: u8, len: usize },
    WriteRead { address: u8, header: Vec<u8>, len: usize },
}

/// I2C target that answers like the sensor: a 2-byte address sets the
/// register pointer, following bytes are stored, reads stream from the
/// pointer.
pub struct MockI2c {
    pointer: u16,
    fail_after: Option<usize>,
    pub space: RegisterSpace,
    pub log: Vec<I2cMessage>,
    pub attempts: usize,
}

impl MockI2c {
    pub fn new(space: RegisterSpace) -> Self {
        Self {
            pointer: 0,
            fail_after: None,
            space,
            log: Vec::new(),
            attempts: 0,
        }
    }

    /// Let `count` transactions succeed, then fail every one after.
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(count);
    }

    fn set_pointer(&mut self, bytes: &[u8]) {
        self.pointer = u16::from_be_bytes([bytes[0], bytes[1]]);
    }
}

impl i2c::ErrorType for MockI2c {
    type Error = i2c::ErrorKind;
}

impl I2c for MockI2c {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [i2c::Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.attempts += 1;
        if self.fail_after.is_some_and(|count| self.attempts > count) {
            return Err(i2c::ErrorKind::Other);
        }

        match operations {
            [i2c::Operation::Write(bytes), i2c::Operation::Read(buffer)] => {
                self.log.push(I2cMessage::WriteRead {
                    address,
                    header: bytes.to_vec(),
                    len: buffer.len(),
                });
                self.set_pointer(bytes);
                self.space.read_into(self.pointer, buffer);
            }
            [i2c::Operation::Write(bytes)] => {
                self.log.push(I2cMessage::Write {
                    address,
                    bytes: bytes.to_vec(),
                });
                self.set_pointer(bytes);
                self.space.load(self.pointer, &bytes[2..]);
            }
            [i2c::Operation::Read(buffer)] => {
                self.log.push(I2cMessage::Read {
                    address,
                    len: buffer.len(),
                });
                self.space.read_into(self.pointer, buffer);
            }
            _ => return Err(i2c::ErrorKind::Other),
        }

        Ok(())
    }
}

// ── SPI ──────────────────────────────────────────────────────────────

/// SPI device that answers like the sensor: bit 15 of the 2-byte header
/// selects write (set) or read (clear).
pub struct MockSpi {
    fail_after: Option<usize>,
    pub space: RegisterSpace,
    /// Bytes clocked out per exchange, as sent.
    pub exchanges: Vec<Vec<u8>>,
}

impl MockSpi {
    pub fn new(space: RegisterSpace) -> Self {
        Self {
            fail_after: None,
            space,
            exchanges: Vec::new(),
        }
    }

    /// Let `count` exchanges succeed, then fail every one after.
    pub fn fail_after(&mut self, count: usize) {
        self.fail_after = Some(count);
    }

    fn exchange(&mut self, buffer: &mut [u8]) -> Result<(), spi::ErrorKind> {
        self.exchanges.push(buffer.to_vec());
        if self.fail_after.is_some_and(|count| self.exchanges.len() > count) {
            return Err(spi::ErrorKind::Other);
        }

        let header = u16::from_be_bytes([buffer[0], buffer[1]]);
        let address = header & !SPI_WRITE_BIT;
        if header & SPI_WRITE_BIT != 0 {
            self.space.load(address, &buffer[2..]);
        } else {
            self.space.read_into(address, &mut buffer[2..]);
        }
        buffer[..2].fill(0xFF);
        Ok(())
    }
}

impl spi::ErrorType for MockSpi {
    type Error = spi::ErrorKind;
}

impl SpiDevice for MockSpi {
    async fn transaction(
        &mut self,
        operations: &mut [spi::Operation<'_, u8>],
    ) -> Result<(), Self::Error> {
        for operation in operations.iter_mut() {
            match operation {
                spi::Operation::TransferInPlace(buffer) => self.exchange(buffer)?,
                _ => return Err(spi::ErrorKind::Other),
            }
        }
        Ok(())
    }
}

// ── INT pin ──────────────────────────────────────────────────────────

/// INT pin that produces a fixed number of falling edges, then errors.
pub struct MockPin {
    remaining: usize,
    pub edges_seen: usize,
}

impl MockPin {
    pub fn with_edges(count: usize) -> Self {
        Self {
            remaining: count,
            edges_seen: 0,
        }
    }

    fn edge(&mut self) -> Result<(), digital::ErrorKind> {
        if self.remaining == 0 {
            return Err(digital::ErrorKind::Other);
        }
        self.remaining -= 1;
        self.edges_seen += 1;
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl Wait for MockPin {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        self.edge()
    }
}
