use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use bytes::BytesMut;
use tracing::{debug, warn};

use xbeelink_frame::encode::{encode_at_command, encode_transmit, FrameIdSequence};
use xbeelink_frame::sync::next_frame;
use xbeelink_frame::writer::write_raw;
use xbeelink_frame::{Address16, ApiFrame, FrameError, FrameKind};
use xbeelink_transport::SerialLink;

use crate::error::Result;
use crate::registry::HandlerRegistry;

/// Tuning knobs for the processing loop.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Idle sleep between cycles when no bytes moved. A latency/CPU
    /// trade-off, not a protocol requirement.
    pub poll_interval: Duration,
    /// Read chunk size per cycle.
    pub read_chunk: usize,
    /// Initial inbound buffer capacity.
    pub inbound_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
            read_chunk: 64,
            inbound_capacity: 256,
        }
    }
}

/// Outbound state shared between caller threads and the worker.
struct Outbound {
    ids: FrameIdSequence,
    queue: BytesMut,
}

/// Cheap, cloneable handle for queueing sends from any thread.
///
/// The outbound buffer and the frame-id sequence are the only state shared
/// across threads, and every access goes through one mutex.
#[derive(Clone)]
pub struct EngineHandle {
    outbound: Arc<Mutex<Outbound>>,
}

impl EngineHandle {
    /// Encode a transmit request and queue it for the next outbound drain.
    pub fn queue_transmit(
        &self,
        destination: &[u8],
        network: Option<Address16>,
        options: u8,
        payload: &[u8],
    ) -> Result<()> {
        let frame = encode_transmit(destination, network, options, payload)?;
        let mut outbound = self.outbound.lock().unwrap_or_else(PoisonError::into_inner);
        outbound.queue.extend_from_slice(&frame);
        Ok(())
    }

    /// Encode an AT command, queue it, and return the assigned frame id.
    pub fn queue_at_command(&self, command: &[u8], parameter: &[u8]) -> Result<u8> {
        let mut outbound = self.outbound.lock().unwrap_or_else(PoisonError::into_inner);
        let frame_id = outbound.ids.peek();
        let frame = encode_at_command(&mut outbound.ids, command, parameter)?;
        outbound.queue.extend_from_slice(&frame);
        Ok(frame_id)
    }
}

/// Drives one API-mode link.
///
/// Owns the inbound/outbound buffers, runs the synchronizer on a background
/// worker thread, routes decoded frames to registered handlers, and drains
/// queued sends to the link. One engine per radio link; independent links
/// get independent engines.
///
/// Handlers run synchronously on the worker thread: a blocking handler
/// stalls subsequent dispatch and outbound draining for that cycle, so
/// handlers must be quick or hand work off elsewhere.
pub struct Engine<T> {
    link: Option<T>,
    registry: Option<HandlerRegistry>,
    outbound: Arc<Mutex<Outbound>>,
    config: EngineConfig,
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Engine<SerialLink> {
    /// Open a serial device and build an engine on it.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        Ok(Self::new(SerialLink::open(port, baud)?))
    }
}

impl<T: Read + Write + Send + 'static> Engine<T> {
    /// Build an engine over any byte stream. Does not start processing.
    pub fn new(link: T) -> Self {
        Self::with_config(link, EngineConfig::default())
    }

    /// Build an engine with explicit loop configuration.
    pub fn with_config(link: T, config: EngineConfig) -> Self {
        Self {
            link: Some(link),
            registry: Some(HandlerRegistry::new()),
            outbound: Arc::new(Mutex::new(Outbound {
                ids: FrameIdSequence::new(),
                queue: BytesMut::with_capacity(config.inbound_capacity),
            })),
            config,
            stop: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Register a handler for a frame kind.
    ///
    /// Handlers for the same kind coexist; the first registered one fires.
    /// Build the registry before `begin` — the registry moves into the
    /// worker, so later registrations are ignored with a diagnostic.
    pub fn add_handler(&mut self, kind: FrameKind, handler: impl FnMut(ApiFrame) + Send + 'static) {
        match &mut self.registry {
            Some(registry) => registry.add(kind, handler),
            None => debug!(kind = kind.name(), "handler registered after begin; ignored"),
        }
    }

    /// Replace the error handler.
    pub fn set_error_handler(&mut self, handler: impl FnMut(FrameError) + Send + 'static) {
        match &mut self.registry {
            Some(registry) => registry.set_error_handler(handler),
            None => debug!("error handler registered after begin; ignored"),
        }
    }

    /// Handle for queueing sends from other threads.
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            outbound: Arc::clone(&self.outbound),
        }
    }

    /// Encode a transmit request and queue it for the next outbound drain.
    pub fn queue_transmit(
        &self,
        destination: &[u8],
        network: Option<Address16>,
        options: u8,
        payload: &[u8],
    ) -> Result<()> {
        self.handle()
            .queue_transmit(destination, network, options, payload)
    }

    /// Encode an AT command, queue it, and return the assigned frame id.
    pub fn queue_at_command(&self, command: &[u8], parameter: &[u8]) -> Result<u8> {
        self.handle().queue_at_command(command, parameter)
    }

    /// Start the background worker. No-op with a diagnostic when the engine
    /// is already running or was already shut down.
    pub fn begin(&mut self) {
        let (link, registry) = match (self.link.take(), self.registry.take()) {
            (Some(link), Some(registry)) => (link, registry),
            _ => {
                debug!("begin called without a usable link; ignored");
                return;
            }
        };

        self.stop.store(false, Ordering::Release);
        let stop = Arc::clone(&self.stop);
        let outbound = Arc::clone(&self.outbound);
        let config = self.config.clone();
        self.worker = Some(thread::spawn(move || {
            run_loop(link, registry, outbound, stop, config);
        }));
    }

    /// Request the worker to stop and wait for it to exit.
    ///
    /// Idempotent, and safe to call without a prior `begin`. Returns only
    /// after the worker has observably stopped, so the link is never
    /// touched after this returns. The wait is bounded by the link's read
    /// timeout plus the poll interval.
    pub fn end(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("engine worker panicked");
            }
        }
    }

    /// True while the worker thread is running.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }
}

impl<T> Drop for Engine<T> {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_loop<T: Read + Write>(
    mut link: T,
    mut registry: HandlerRegistry,
    outbound: Arc<Mutex<Outbound>>,
    stop: Arc<AtomicBool>,
    config: EngineConfig,
) {
    let mut inbound = BytesMut::with_capacity(config.inbound_capacity);
    let mut chunk = vec![0u8; config.read_chunk];
    debug!("engine worker started");

    while !stop.load(Ordering::Acquire) {
        let mut active = false;

        match link.read(&mut chunk) {
            Ok(0) => {
                if !registry.report(FrameError::ConnectionClosed) {
                    warn!("link closed with no error handler registered");
                }
                break;
            }
            Ok(n) => {
                inbound.extend_from_slice(&chunk[..n]);
                active = true;
            }
            Err(err)
                if matches!(
                    err.kind(),
                    ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                ) => {}
            Err(err) => {
                if !registry.report(FrameError::Io(err)) {
                    warn!("read failed with no error handler registered");
                }
                break;
            }
        }

        // All currently-decodable frames, in arrival order. A decode error
        // consumes only the faulty frame and never stops the loop.
        while let Some(result) = next_frame(&mut inbound) {
            match result {
                Ok(frame) => {
                    if !registry.dispatch(frame) {
                        debug!("no handler registered for decoded frame");
                    }
                }
                Err(err) => {
                    if !registry.report(err) {
                        warn!("decode error dropped: no error handler registered");
                    }
                }
            }
        }

        let pending = {
            let mut outbound = outbound.lock().unwrap_or_else(PoisonError::into_inner);
            if outbound.queue.is_empty() {
                None
            } else {
                Some(outbound.queue.split())
            }
        };
        if let Some(pending) = pending {
            active = true;
            if let Err(err) = write_raw(&mut link, &pending) {
                if !registry.report(err) {
                    warn!("write failed with no error handler registered");
                }
                break;
            }
        }

        if !active {
            thread::sleep(config.poll_interval);
        }
    }

    debug!("engine worker stopped");
}
