use xbeelink_frame::{ApiFrame, FrameError, FrameKind};

/// Callback invoked with each decoded frame of a registered kind.
pub type FrameHandler = Box<dyn FnMut(ApiFrame) + Send>;

/// Callback invoked with decode errors from the processing loop.
pub type ErrorHandler = Box<dyn FnMut(FrameError) + Send>;

/// Ordered frame-kind → callback table.
///
/// Registration order is preserved and lookup is first-match: a later
/// registration for an already-registered kind coexists but never fires,
/// so callers should avoid re-registering a kind when only one callback
/// should run. One replaceable error-handler slot, not a list.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<(FrameKind, FrameHandler)>,
    error_handler: Option<ErrorHandler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler for a frame kind.
    pub fn add(&mut self, kind: FrameKind, handler: impl FnMut(ApiFrame) + Send + 'static) {
        self.handlers.push((kind, Box::new(handler)));
    }

    /// Replace the error handler.
    pub fn set_error_handler(&mut self, handler: impl FnMut(FrameError) + Send + 'static) {
        self.error_handler = Some(Box::new(handler));
    }

    /// Route a decoded frame to the first handler registered for its kind.
    /// Returns false when no handler matched.
    pub fn dispatch(&mut self, frame: ApiFrame) -> bool {
        let kind = frame.kind();
        match self.handlers.iter_mut().find(|(k, _)| *k == kind) {
            Some((_, handler)) => {
                handler(frame);
                true
            }
            None => false,
        }
    }

    /// Route a decode error to the error handler. Returns false when none
    /// is registered.
    pub fn report(&mut self, err: FrameError) -> bool {
        match &mut self.error_handler {
            Some(handler) => {
                handler(err);
                true
            }
            None => false,
        }
    }

    /// Number of registered frame handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
