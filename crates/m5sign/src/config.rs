use std::time::Duration;

pub const DEFAULT_BAUD_RATE: u32 = 115_200;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for a signing authority attached to a serial port.
#[derive(Debug, Clone)]
pub struct SerialConfig {
    /// Device name, e.g. `/dev/ttyUSB0` or `COM5`.
    pub port: String,
    pub baud_rate: u32,
    /// Timeout applied to each individual read or write on the port.
    pub read_timeout: Duration,
    /// Delay between two checks for buffered response bytes.
    pub poll_interval: Duration,
    /// Overall budget for a response to start arriving.
    pub response_deadline: Duration,
}

impl SerialConfig {
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            ..Self::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(100),
            response_deadline: Duration::from_secs(10),
        }
    }
}

/// Settings for a signing authority reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the authority; `publickey` is resolved relative to it.
    pub base_url: String,
    pub request_timeout: Duration,
}

impl HttpConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}
