//! Network datagram sink

use std::io;
use std::net::UdpSocket;

use parking_lot::RwLock;

use crate::core::{LogError, LogResult};
use crate::record::Record;

use super::Sink;

/// Sends every line as one UDP datagram
///
/// Delivery is fire-and-forget: a lost datagram is not retried.
#[derive(Debug)]
pub struct DatagramSink {
    host: String,
    port: u16,
    socket: RwLock<Option<UdpSocket>>,
}

impl DatagramSink {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::sink::DatagramSink";
    /// Configuration alias
    pub const ALIAS: &'static str = "DatagramSink";
    /// Destination host when none is configured
    pub const DEFAULT_HOST: &'static str = "127.0.0.1";
    /// Destination port when none is configured
    pub const DEFAULT_PORT: u16 = 5514;

    const PROPERTY_NAMES: &'static [&'static str] = &["host", "port"];

    /// Sink sending to `host:port`
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            socket: RwLock::new(None),
        }
    }

    /// Destination host
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Destination port
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl Default for DatagramSink {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST, Self::DEFAULT_PORT)
    }
}

impl Sink for DatagramSink {
    fn name(&self) -> &'static str {
        Self::ALIAS
    }

    fn open(&self) -> io::Result<()> {
        let mut socket = self.socket.write();
        if socket.is_some() {
            return Ok(());
        }
        let bound = UdpSocket::bind(("0.0.0.0", 0))?;
        bound.connect((self.host.as_str(), self.port))?;
        *socket = Some(bound);
        Ok(())
    }

    fn close(&self) -> io::Result<()> {
        self.socket.write().take();
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.socket.read().is_some()
    }

    fn log(&self, _record: &Record<'_>, line: &str) -> io::Result<()> {
        match self.socket.read().as_ref() {
            Some(socket) => socket.send(line.as_bytes()).map(|_| ()),
            None => Ok(()),
        }
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "host" => {
                self.host = value.trim().to_string();
                Ok(())
            }
            "port" => {
                self.port = value
                    .trim()
                    .parse()
                    .map_err(|e| LogError::invalid_property(name, value, format!("{e}")))?;
                Ok(())
            }
            _ => Err(LogError::invalid_property(name, value, "unknown property")),
        }
    }
}
