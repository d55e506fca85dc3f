//! Camera capture lifecycle.
//!
//! A [`CameraSession`] owns the live media stream while the camera view is
//! open. Every way of leaving the view goes through [`CameraSession::close`],
//! and dropping the session releases the stream as well.

pub const CAPTURE_MIME: &str = "image/jpeg";
pub const CAPTURE_QUALITY: f64 = 0.9;

pub trait MediaSource {
    fn stop_all_tracks(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Captured,
    Closed,
    BackdropDismissed,
}

pub struct CameraSession<S: MediaSource> {
    stream: Option<S>,
}

impl<S: MediaSource> CameraSession<S> {
    pub fn open(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Stops every track of the stream. Closing twice is a no-op.
    pub fn close(&mut self, reason: CloseReason) -> CloseReason {
        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
        reason
    }
}

impl<S: MediaSource> Drop for CameraSession<S> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
    }
}

pub fn capture_file_name(timestamp_millis: u64) -> String {
    format!("camera-capture-{}.jpg", timestamp_millis)
}
