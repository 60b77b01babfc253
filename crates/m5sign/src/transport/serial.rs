use std::io::{self, Read, Write};
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use super::{Transport, decode_signature_payload};
use crate::codec::RawSignature;
use crate::config::SerialConfig;
use crate::digest::digest_hex;
use crate::error::{Error, Result, TransportError};

pub const PUBKEY_COMMAND: &[u8] = b"PUBKEY";
const TERMINATOR: u8 = b'\r';

/// The byte-level view of a serial line the transport needs.
pub trait ByteStream: Send {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Number of received bytes waiting to be read.
    fn bytes_available(&mut self) -> io::Result<usize>;

    /// Reads every byte currently buffered.
    fn read_available(&mut self) -> io::Result<Vec<u8>>;

    /// Drops anything left in the input and output buffers.
    fn discard_buffers(&mut self) -> io::Result<()>;
}

/// A physical serial port.
pub struct SerialDevice {
    port: Box<dyn SerialPort>,
}

impl SerialDevice {
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| TransportError::Connection(format!("opening {}: {e}", config.port)))?;
        Ok(Self { port })
    }
}

impl ByteStream for SerialDevice {
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn bytes_available(&mut self) -> io::Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_available(&mut self) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; self.bytes_available()?];
        self.port.read_exact(&mut buf)?;
        Ok(buf)
    }

    fn discard_buffers(&mut self) -> io::Result<()> {
        Ok(self.port.clear(ClearBuffer::All)?)
    }
}

/// Talks to the authority with carriage-return terminated commands.
pub struct SerialTransport<S = SerialDevice> {
    stream: S,
    poll_interval: Duration,
    response_deadline: Duration,
}

impl SerialTransport<SerialDevice> {
    pub fn open(config: &SerialConfig) -> Result<Self> {
        let device = SerialDevice::open(config)?;
        info!(port = %config.port, baud_rate = config.baud_rate, "opened serial port");
        Self::with_stream(device, config)
    }
}

impl<S: ByteStream> SerialTransport<S> {
    /// Wraps an already open stream, discarding any stale buffered bytes.
    pub fn with_stream(mut stream: S, config: &SerialConfig) -> Result<Self> {
        stream.discard_buffers()?;
        Ok(Self {
            stream,
            poll_interval: config.poll_interval,
            response_deadline: config.response_deadline,
        })
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    async fn exchange(&mut self, command: &[u8]) -> Result<Vec<u8>> {
        let mut line = Vec::with_capacity(command.len() + 1);
        line.extend_from_slice(command);
        line.push(TERMINATOR);
        self.stream.write_all(&line)?;
        self.read_response().await
    }

    /// Polls until bytes arrive, then takes whatever is buffered in one read.
    async fn read_response(&mut self) -> Result<Vec<u8>> {
        let started = Instant::now();
        let mut empty_polls: u32 = 0;
        loop {
            if self.stream.bytes_available()? > 0 {
                let response = self.stream.read_available()?;
                debug!(empty_polls, len = response.len(), "serial response received");
                return Ok(response.trim_ascii().to_vec());
            }
            if started.elapsed() >= self.response_deadline {
                return Err(Error::TransportTimeout(self.response_deadline));
            }
            empty_polls += 1;
            sleep(self.poll_interval).await;
        }
    }
}

impl<S: ByteStream> Transport for SerialTransport<S> {
    async fn get_public_key(&mut self) -> Result<String> {
        let response = self.exchange(PUBKEY_COMMAND).await?;
        String::from_utf8(response)
            .map_err(|e| TransportError::Protocol(format!("public key is not UTF-8: {e}")).into())
    }

    async fn request_signature(&mut self, message: &[u8]) -> Result<RawSignature> {
        let hex_digest = digest_hex(message);
        debug!(digest = %hex_digest, "requesting signature over serial");
        let response = self.exchange(hex_digest.as_bytes()).await?;
        decode_signature_payload(&response)
    }
}
