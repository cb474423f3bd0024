use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::{debug, info};

use crate::error::{Result, TransportError};

/// Configuration for opening a serial link.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Line speed in baud. XBee modules ship configured for 9600.
    pub baud: u32,
    /// Read timeout on the device. Kept short: the engine polls, so a read
    /// with no data must return control quickly.
    pub timeout: Duration,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            baud: 9600,
            timeout: Duration::from_millis(50),
        }
    }
}

/// An open serial connection to a radio module — implements Read + Write.
///
/// The device is closed when the link is dropped.
pub struct SerialLink {
    inner: Box<dyn SerialPort>,
    port: String,
}

impl SerialLink {
    /// Open a serial device with the default timeout.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        Self::open_with_config(
            port,
            LinkConfig {
                baud,
                ..LinkConfig::default()
            },
        )
    }

    /// Open a serial device with explicit configuration.
    pub fn open_with_config(port: &str, config: LinkConfig) -> Result<Self> {
        let inner = serialport::new(port, config.baud)
            .timeout(config.timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;

        info!(port, baud = config.baud, "opened serial link");

        Ok(Self {
            inner,
            port: port.to_string(),
        })
    }

    /// Device path this link was opened on.
    pub fn port_name(&self) -> &str {
        &self.port
    }

    /// Number of bytes already buffered by the driver.
    pub fn bytes_to_read(&self) -> Result<u32> {
        self.inner
            .bytes_to_read()
            .map_err(|err| TransportError::Io(err.into()))
    }

    /// Update the read timeout on the open device.
    pub fn set_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.inner
            .set_timeout(timeout)
            .map_err(|err| TransportError::Io(err.into()))
    }

    /// Try to clone this link (a second handle to the same device), so one
    /// handle can read while another writes.
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self
            .inner
            .try_clone()
            .map_err(|err| TransportError::Io(err.into()))?;
        debug!(port = %self.port, "cloned serial link");
        Ok(Self {
            inner: cloned,
            port: self.port.clone(),
        })
    }
}

impl Read for SerialLink {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialLink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port", &self.port)
            .finish()
    }
}

/// Enumerate serial devices visible to the process.
pub fn available_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    Ok(ports.into_iter().map(|info| info.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_module_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.baud, 9600);
        assert_eq!(config.timeout, Duration::from_millis(50));
    }

    #[test]
    fn open_missing_device_reports_port() {
        let err = SerialLink::open("/dev/xbeelink-test-nonexistent", 9600).unwrap_err();
        match err {
            TransportError::Open { port, .. } => {
                assert_eq!(port, "/dev/xbeelink-test-nonexistent");
            }
            other => panic!("expected Open error, got {other:?}"),
        }
    }

    #[test]
    fn open_error_display_includes_port() {
        let err = SerialLink::open("/dev/xbeelink-test-nonexistent", 9600).unwrap_err();
        assert!(err.to_string().contains("/dev/xbeelink-test-nonexistent"));
    }

    #[test]
    fn available_ports_does_not_fail() {
        // Port lists vary by machine; enumeration itself must succeed.
        let ports = available_ports();
        assert!(ports.is_ok());
    }
}
