//! Runtime driving the form state machine.
//!
//! [`FormController`] owns a [`FormState`], applies events to it and runs
//! the [`Command`]s it emits through an [`UploadTransport`]. Only one
//! upload can be in flight at a time: [`FormController::dispatch`] takes
//! `&mut self` and awaits the request before returning.

use crate::config::UploadConfig;
use crate::error::UploadError;
use crate::form::{Command, FormEvent, FormState, FormView};
use crate::intake::{DragEvent, SelectedFile};
use crate::observer::{notify_upload_start, NoopObserver, Observer};
use crate::transport::{HttpTransport, UploadTransport};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Form state plus the transport that executes its uploads.
pub struct FormController<T: UploadTransport> {
    state: FormState,
    transport: T,
    observer: Observer,
}

impl FormController<HttpTransport> {
    /// Controller posting to `config.endpoint` over HTTP.
    pub fn from_config(config: &UploadConfig) -> Result<Self, UploadError> {
        Ok(Self::new(config, HttpTransport::new(config)?))
    }
}

impl<T: UploadTransport> FormController<T> {
    pub fn new(config: &UploadConfig, transport: T) -> Self {
        Self {
            state: FormState::new(config),
            transport,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Observer) -> Self {
        self.observer = observer;
        self
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut FormState {
        &mut self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn view(&self) -> FormView {
        self.state.render()
    }

    /// Apply an event and run whatever it triggers, to completion.
    pub async fn dispatch(&mut self, event: FormEvent) -> FormView {
        let mut next = Some(event);
        while let Some(event) = next.take() {
            let command = self.state.update(event);
            self.observer.on_state_change(&self.state.render());

            if let Some(Command::Upload(payload)) = command {
                notify_upload_start(&self.observer, &payload);
                let start = Instant::now();
                let result = self.transport.send(payload).await;
                let elapsed_ms = start.elapsed().as_millis() as u64;
                info!(
                    "Upload {} in {}ms",
                    if result.is_ok() { "accepted" } else { "failed" },
                    elapsed_ms
                );
                self.observer.on_upload_complete(result.is_ok(), elapsed_ms);
                next = Some(FormEvent::UploadFinished(result));
            }
        }
        self.state.render()
    }

    // ── Convenience wrappers for the common events ───────────────────────

    /// Drop `files` onto the dropzone (enter, over, drop).
    pub async fn drop_files(&mut self, files: Vec<SelectedFile>) -> FormView {
        self.dispatch(FormEvent::Drag(DragEvent::Enter)).await;
        self.dispatch(FormEvent::Drag(DragEvent::Over)).await;
        self.dispatch(FormEvent::Drag(DragEvent::Drop(files))).await
    }

    /// Pick a single file from disk, as the file input would.
    pub async fn pick_path(&mut self, path: impl AsRef<Path>) -> Result<FormView, UploadError> {
        let file = SelectedFile::from_path(path).await?;
        Ok(self.dispatch(FormEvent::PickerChanged(vec![file])).await)
    }

    pub async fn set_email(&mut self, email: impl Into<String>) -> FormView {
        self.dispatch(FormEvent::EmailInput(email.into())).await
    }

    /// Check the format whose value is `value`. Returns false if unknown.
    pub async fn choose_format(&mut self, value: &str) -> bool {
        let index = self
            .state
            .formats()
            .options()
            .iter()
            .position(|o| o.value == value);
        match index {
            Some(i) => {
                self.dispatch(FormEvent::FormatChecked(i)).await;
                true
            }
            None => false,
        }
    }

    pub async fn submit(&mut self) -> FormView {
        self.dispatch(FormEvent::Submit).await
    }

    pub async fn close_modal(&mut self) -> FormView {
        self.dispatch(FormEvent::Close).await
    }
}

/// Pick `path`, fill in `email` and `output`, submit once over HTTP.
///
/// Returns the final rendered form; inspect `view.modal` for the outcome.
///
/// # Example
/// ```rust,no_run
/// use model_upload::{upload_file, Icon, UploadConfig};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let view = upload_file("casos.csv", "ana@example.com", "pdf", &UploadConfig::default()).await?;
/// if view.modal.icon == Icon::Cross {
///     eprintln!("{}", view.modal.message);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn upload_file(
    path: impl AsRef<Path>,
    email: &str,
    output: &str,
    config: &UploadConfig,
) -> Result<FormView, UploadError> {
    let mut controller = FormController::from_config(config)?;
    controller.pick_path(path).await?;
    controller.set_email(email).await;
    if !controller.choose_format(output).await {
        return Err(UploadError::InvalidConfig(format!(
            "unknown output format '{output}'"
        )));
    }
    Ok(controller.submit().await)
}
