// capture.rs
use thiserror::Error;
use tracing::debug;

/// Recoverable camera failure. Surfaced inline; the user retries manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("无法访问摄像头: {reason}")]
pub struct CaptureError {
    pub reason: String,
}

impl CaptureError {
    pub fn new(reason: impl Into<String>) -> Self { Self { reason: reason.into() } }
}

/// Live video-only stream handle. There is at most one of these per adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CameraStream {
    pub id: u64,
    pub width: u32,
    pub height: u32,
}

/// Seam for the actual capture device. The shipped backend is simulated; a
/// real device driver would implement the same two calls.
pub trait CaptureBackend {
    fn open(&mut self) -> Result<CameraStream, CaptureError>;
    fn close(&mut self, stream: &CameraStream);
}

/// Stand-in camera. `deny` reproduces the permission-denied path.
pub struct SimulatedCamera {
    deny: bool,
    next_id: u64,
    open_count: usize,
}

impl SimulatedCamera {
    pub fn new(deny: bool) -> Self { Self { deny, next_id: 1, open_count: 0 } }

    pub fn open_count(&self) -> usize { self.open_count }
}

impl CaptureBackend for SimulatedCamera {
    fn open(&mut self) -> Result<CameraStream, CaptureError> {
        if self.deny {
            return Err(CaptureError::new("permission denied"));
        }
        let stream = CameraStream { id: self.next_id, width: 1280, height: 720 };
        self.next_id += 1;
        self.open_count += 1;
        Ok(stream)
    }

    fn close(&mut self, _stream: &CameraStream) {
        self.open_count = self.open_count.saturating_sub(1);
    }
}

/// Owns the single active camera stream. Consumers read the stream handle;
/// only the adapter acquires and releases it.
pub struct CameraAdapter {
    backend: Box<dyn CaptureBackend>,
    stream: Option<CameraStream>,
}

impl CameraAdapter {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self { Self { backend, stream: None } }

    pub fn simulated(deny: bool) -> Self { Self::new(Box::new(SimulatedCamera::new(deny))) }

    /// Opens the stream, or returns the existing handle when already active.
    pub fn start(&mut self) -> Result<CameraStream, CaptureError> {
        if let Some(stream) = &self.stream {
            return Ok(stream.clone());
        }
        let stream = self.backend.open()?;
        debug!(stream = stream.id, "camera stream opened");
        self.stream = Some(stream.clone());
        Ok(stream)
    }

    /// Releases the stream synchronously. Safe to call when already inactive.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            self.backend.close(&stream);
            debug!(stream = stream.id, "camera stream released");
        }
    }

    pub fn is_active(&self) -> bool { self.stream.is_some() }

    pub fn stream(&self) -> Option<&CameraStream> { self.stream.as_ref() }
}
