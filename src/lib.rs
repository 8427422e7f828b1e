//! # model-upload
//!
//! Submit a data file for model generation: pick a file, choose an output
//! format, give an email address, and POST the three as a multipart form to
//! the upload service. A status modal reports loading, success and failure.
//!
//! ## Architecture
//!
//! ```text
//! intake events ──▶ FormState::update ──▶ Command::Upload(payload)
//! (drop / picker /     (pure)                     │
//!  email / format /                               ▼
//!  submit / close)                     UploadTransport::send
//!        ▲                                        │
//!        └──────── FormEvent::UploadFinished ◀────┘
//!                          │
//!                          ▼
//!                 FormState::render → FormView / ModalView
//! ```
//!
//! * [`form`]       — the state machine and its render step
//! * [`intake`]     — drag-and-drop and file-picker selection
//! * [`modal`]      — status modal state and view
//! * [`http`]       — request helper that classifies non-2xx bodies
//! * [`transport`]  — `UploadTransport` trait and the reqwest implementation
//! * [`controller`] — runtime that executes uploads and feeds results back
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use model_upload::{FormController, UploadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UploadConfig::default();
//!     let mut form = FormController::from_config(&config)?;
//!     form.pick_path("casos.csv").await?;
//!     form.set_email("ana@example.com").await;
//!     form.choose_format("jupyter").await;
//!     let view = form.submit().await;
//!     println!("{}", view.modal.message);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `model-upload` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod controller;
pub mod error;
pub mod form;
pub mod http;
pub mod intake;
pub mod messages;
pub mod modal;
pub mod observer;
pub mod payload;
pub mod transport;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FormatOption, UploadConfig, UploadConfigBuilder, DEFAULT_ENDPOINT};
pub use controller::{upload_file, FormController};
pub use error::{ErrorBody, FieldError, SubmitError, UploadError, ValidationError};
pub use form::{Command, FileLabel, FormEvent, FormState, FormView, FormatSelector};
pub use http::{send_request, UploadResponse};
pub use intake::{DragEvent, FileSlot, SelectedFile};
pub use messages::{Locale, Messages};
pub use modal::{Icon, ModalState, ModalView};
pub use observer::{NoopObserver, Observer, SubmissionObserver};
pub use payload::{MultipartPayload, RequestPayload};
pub use transport::{HttpTransport, UploadTransport};
