//! Observer trait for form transitions.
//!
//! Inject an [`Arc<dyn SubmissionObserver>`] into
//! [`crate::controller::FormController::with_observer`] to redraw a front end
//! after every event. The CLI uses it to drive a spinner while the upload is
//! in flight.
//!
//! # Example
//!
//! ```rust
//! use model_upload::{FormView, SubmissionObserver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct Redraws(AtomicUsize);
//!
//! impl SubmissionObserver for Redraws {
//!     fn on_state_change(&self, _view: &FormView) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//! ```

use crate::form::FormView;
use crate::payload::MultipartPayload;
use std::sync::Arc;

/// Called by the controller as the form changes.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait SubmissionObserver: Send + Sync {
    /// Called after every event, with the freshly rendered form.
    fn on_state_change(&self, view: &FormView) {
        let _ = view;
    }

    /// Called just before the request is sent.
    ///
    /// # Arguments
    /// * `file_name`  — name of the file being uploaded
    /// * `file_len`   — size in bytes
    /// * `output`     — value of the checked format
    fn on_upload_start(&self, file_name: &str, file_len: usize, output: &str) {
        let _ = (file_name, file_len, output);
    }

    /// Called when the request resolved, before the outcome is applied.
    ///
    /// # Arguments
    /// * `success`    — whether the server accepted the upload
    /// * `elapsed_ms` — wall-clock time of the request
    fn on_upload_complete(&self, success: bool, elapsed_ms: u64) {
        let _ = (success, elapsed_ms);
    }
}

/// A no-op implementation for callers that don't need events.
pub struct NoopObserver;

impl SubmissionObserver for NoopObserver {}

/// Convenience alias for the type stored in the controller.
pub type Observer = Arc<dyn SubmissionObserver>;

pub(crate) fn notify_upload_start(observer: &Observer, payload: &MultipartPayload) {
    observer.on_upload_start(&payload.file.name, payload.file.len(), &payload.output);
}
