//! Form state machine.
//!
//! [`FormState::update`] is a pure transition: it takes one [`FormEvent`],
//! mutates the state and optionally returns a [`Command`] for the runtime to
//! execute. The only command is an upload; its result comes back as
//! [`FormEvent::UploadFinished`].
//!
//! ```text
//!            Submit (valid)              UploadFinished(Ok)
//!  Hidden ───────────────▶ RaisedLoading ───────────────▶ RaisedSuccess
//!    ▲  │ Submit (invalid)       │ UploadFinished(Err)        │
//!    │  └──────────▶ RaisedFail ◀┘                            │
//!    └──────────────── Close ◀────────────────────────────────┘
//! ```

use crate::config::{FormatOption, UploadConfig};
use crate::error::{FieldError, SubmitError, ValidationError};
use crate::http::UploadResponse;
use crate::intake::{DragEvent, FileSlot, SelectedFile};
use crate::messages::Messages;
use crate::modal::{ModalState, ModalView};
use crate::payload::MultipartPayload;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, error, warn};

/// Address shape accepted by the upload service.
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9]+[._]?[a-z0-9]+@\w+\.\w+(\.\w+)*$").expect("valid email regex")
});

/// Whether `email` has the shape the service accepts (case-insensitive).
pub fn email_looks_valid(email: &str) -> bool {
    EMAIL_RE.is_match(&email.to_lowercase())
}

/// Mutually exclusive output-format options with at most one checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSelector {
    options: Vec<FormatOption>,
    checked: Option<usize>,
}

impl FormatSelector {
    /// A selector with the first option checked, as the page loads.
    pub fn new(options: Vec<FormatOption>) -> Self {
        let checked = if options.is_empty() { None } else { Some(0) };
        Self { options, checked }
    }

    pub fn options(&self) -> &[FormatOption] {
        &self.options
    }

    /// Check option `index`, unchecking the others. Out-of-range is ignored.
    pub fn check(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.checked = Some(index);
            true
        } else {
            false
        }
    }

    /// Check the option whose value is `value`.
    pub fn check_value(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(i) => self.check(i),
            None => false,
        }
    }

    pub fn uncheck_all(&mut self) {
        self.checked = None;
    }

    pub fn checked(&self) -> Option<&FormatOption> {
        self.checked.and_then(|i| self.options.get(i))
    }

    pub fn checked_index(&self) -> Option<usize> {
        self.checked
    }

    /// Check the first option again.
    pub fn reset(&mut self) {
        self.checked = if self.options.is_empty() { None } else { Some(0) };
    }
}

/// Everything that can happen to the form.
#[derive(Debug, Clone)]
pub enum FormEvent {
    Drag(DragEvent),
    PickerChanged(Vec<SelectedFile>),
    EmailInput(String),
    FormatChecked(usize),
    Submit,
    UploadFinished(Result<UploadResponse, SubmitError>),
    Close,
}

/// Side effect requested by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload(MultipartPayload),
}

/// Filename label under the dropzone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileLabel {
    pub text: String,
    pub visible: bool,
}

/// Rendered form: what the inputs and labels show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub dropzone_highlighted: bool,
    pub file_label: FileLabel,
    pub email: String,
    pub checked_format: Option<String>,
    pub modal: ModalView,
}

/// The whole form: inputs, selection and modal.
#[derive(Debug, Clone)]
pub struct FormState {
    messages: &'static Messages,
    strict_email: bool,
    file: FileSlot,
    email: String,
    formats: FormatSelector,
    highlighted: bool,
    label: FileLabel,
    modal: ModalState,
    in_flight: bool,
}

impl FormState {
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            messages: Messages::for_locale(config.locale),
            strict_email: config.strict_email,
            file: FileSlot::default(),
            email: String::new(),
            formats: FormatSelector::new(config.formats.clone()),
            highlighted: false,
            label: FileLabel::default(),
            modal: ModalState::Hidden,
            in_flight: false,
        }
    }

    pub fn file(&self) -> &FileSlot {
        &self.file
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn formats(&self) -> &FormatSelector {
        &self.formats
    }

    pub fn formats_mut(&mut self) -> &mut FormatSelector {
        &mut self.formats
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Apply one event. Returns the upload to perform, if any.
    pub fn update(&mut self, event: FormEvent) -> Option<Command> {
        match event {
            FormEvent::Drag(drag) => {
                self.highlighted = drag.highlights();
                if let DragEvent::Drop(files) = drag {
                    self.select(files);
                }
                None
            }
            FormEvent::PickerChanged(files) => {
                self.select(files);
                None
            }
            FormEvent::EmailInput(email) => {
                self.email = email;
                None
            }
            FormEvent::FormatChecked(index) => {
                if !self.formats.check(index) {
                    warn!("Ignoring out-of-range format index {}", index);
                }
                None
            }
            FormEvent::Submit => self.submit(),
            FormEvent::UploadFinished(result) => {
                self.finish(result);
                None
            }
            FormEvent::Close => {
                debug!("Modal closed");
                self.modal.close();
                None
            }
        }
    }

    fn select(&mut self, files: Vec<SelectedFile>) {
        match self.file.take_first(files) {
            Some(file) => {
                debug!("Selected {:?}", file);
                self.label = FileLabel {
                    text: self.messages.file_selected(&file.name),
                    visible: true,
                };
            }
            None => {
                debug!("Selection cleared");
                self.label = FileLabel::default();
            }
        }
    }

    /// Submit-time checks. Every failing field is reported.
    pub fn validate(&self) -> Result<MultipartPayload, ValidationError> {
        let mut fields = Vec::new();
        if !self.file.is_selected() {
            fields.push(FieldError::MissingFile);
        }
        if self.email.is_empty() {
            fields.push(FieldError::EmptyEmail);
        } else if self.strict_email && !email_looks_valid(&self.email) {
            fields.push(FieldError::MalformedEmail);
        }
        let format = self.formats.checked();
        if format.is_none() {
            fields.push(FieldError::MissingFormat);
        }

        match (self.file.file(), format) {
            (Some(file), Some(format)) if fields.is_empty() => Ok(MultipartPayload {
                file: file.clone(),
                email: self.email.clone(),
                output: format.value.clone(),
            }),
            _ => Err(ValidationError { fields }),
        }
    }

    fn submit(&mut self) -> Option<Command> {
        if self.in_flight {
            warn!("Submit ignored: {}", SubmitError::Busy);
            return None;
        }
        match self.validate() {
            Ok(payload) => {
                debug!("Submitting {:?} as '{}'", payload.file, payload.output);
                self.in_flight = true;
                self.modal = ModalState::RaisedLoading;
                Some(Command::Upload(payload))
            }
            Err(e) => {
                debug!("Validation failed: {}", e);
                self.modal = ModalState::RaisedFail {
                    message: self.messages.fill_all_fields.to_string(),
                };
                None
            }
        }
    }

    fn finish(&mut self, result: Result<UploadResponse, SubmitError>) {
        self.in_flight = false;
        match result {
            Ok(response) => {
                debug!("Upload accepted with HTTP {}", response.status);
                self.modal = ModalState::RaisedSuccess {
                    message: self.messages.success.to_string(),
                };
                self.email.clear();
                self.file.clear();
                self.label = FileLabel::default();
                self.formats.reset();
            }
            Err(e) => {
                match &e {
                    SubmitError::Http { body, .. } => error!(
                        "Upload rejected: {} (detail: {:?})",
                        e,
                        body.detail.as_deref().or(body.details.as_deref())
                    ),
                    _ => error!("Upload failed: {}", e),
                }
                self.modal = ModalState::RaisedFail {
                    message: self.messages.request_failed(e.server_message()),
                };
            }
        }
    }

    /// Translate the state into what the page shows.
    pub fn render(&self) -> FormView {
        FormView {
            dropzone_highlighted: self.highlighted,
            file_label: self.label.clone(),
            email: self.email.clone(),
            checked_format: self.formats.checked().map(|f| f.value.clone()),
            modal: self.modal.render(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use crate::messages::Locale;
    use crate::modal::Icon;

    fn state() -> FormState {
        FormState::new(&UploadConfig::builder().locale(Locale::En).build().unwrap())
    }

    fn csv(name: &str) -> SelectedFile {
        SelectedFile::new(name, b"index,date\n".to_vec())
    }

    fn filled() -> FormState {
        let mut s = state();
        s.update(FormEvent::PickerChanged(vec![csv("dados.csv")]));
        s.update(FormEvent::EmailInput("ana@example.com".into()));
        s.update(FormEvent::FormatChecked(1));
        s
    }

    #[test]
    fn email_regex_matches_service_rules() {
        assert!(email_looks_valid("ana.souza@example.com"));
        assert!(email_looks_valid("Ana@Example.com.br"));
        assert!(!email_looks_valid("ana"));
        assert!(!email_looks_valid("ana@example"));
        assert!(!email_looks_valid("a@example.com"));
    }

    #[test]
    fn selector_starts_on_first_and_resets() {
        let mut sel = FormatSelector::new(FormatOption::defaults());
        assert_eq!(sel.checked_index(), Some(0));
        assert!(sel.check_value("report"));
        assert_eq!(sel.checked().map(|f| f.value.as_str()), Some("report"));
        assert!(!sel.check(7));
        assert_eq!(sel.checked_index(), Some(2));
        sel.reset();
        assert_eq!(sel.checked_index(), Some(0));
    }

    #[test]
    fn empty_form_fails_validation_without_command() {
        let mut s = state();
        s.formats_mut().uncheck_all();
        let err = s.validate().unwrap_err();
        assert_eq!(
            err.fields,
            vec![
                FieldError::MissingFile,
                FieldError::EmptyEmail,
                FieldError::MissingFormat
            ]
        );

        assert_eq!(s.update(FormEvent::Submit), None);
        let view = s.render();
        assert!(view.modal.raised);
        assert_eq!(view.modal.icon, Icon::Cross);
        assert_eq!(view.modal.message, "Fill in all fields before submitting.");
        assert!(!s.is_in_flight());
    }

    #[test]
    fn strict_email_rejects_malformed() {
        let config = UploadConfig::builder().strict_email(true).build().unwrap();
        let mut s = FormState::new(&config);
        s.update(FormEvent::PickerChanged(vec![csv("a.csv")]));
        s.update(FormEvent::EmailInput("not-an-email".into()));
        assert_eq!(
            s.validate().unwrap_err().fields,
            vec![FieldError::MalformedEmail]
        );
    }

    #[test]
    fn drag_toggles_highlight() {
        let mut s = state();
        s.update(FormEvent::Drag(DragEvent::Enter));
        assert!(s.render().dropzone_highlighted);
        s.update(FormEvent::Drag(DragEvent::Over));
        assert!(s.render().dropzone_highlighted);
        s.update(FormEvent::Drag(DragEvent::Leave));
        assert!(!s.render().dropzone_highlighted);
        s.update(FormEvent::Drag(DragEvent::Enter));
        s.update(FormEvent::Drag(DragEvent::Drop(vec![csv("a.csv")])));
        assert!(!s.render().dropzone_highlighted);
    }

    #[test]
    fn drop_then_picker_last_writer_wins() {
        let mut s = state();
        s.update(FormEvent::Drag(DragEvent::Drop(vec![csv("dropped.csv")])));
        s.update(FormEvent::PickerChanged(vec![csv("picked.csv")]));
        s.update(FormEvent::EmailInput("ana@example.com".into()));
        match s.update(FormEvent::Submit) {
            Some(Command::Upload(p)) => assert_eq!(p.file.name, "picked.csv"),
            other => panic!("expected upload, got {other:?}"),
        }
    }

    #[test]
    fn empty_selection_hides_label() {
        let mut s = state();
        s.update(FormEvent::PickerChanged(vec![csv("a.csv")]));
        let label = s.render().file_label;
        assert!(label.visible);
        assert_eq!(label.text, "File selected: a.csv");

        s.update(FormEvent::Drag(DragEvent::Drop(vec![])));
        assert_eq!(s.render().file_label, FileLabel::default());
        assert_eq!(s.file(), &FileSlot::Idle);
    }

    #[test]
    fn valid_submit_raises_loader_and_emits_payload() {
        let mut s = filled();
        let cmd = s.update(FormEvent::Submit);
        assert_eq!(
            cmd,
            Some(Command::Upload(MultipartPayload {
                file: csv("dados.csv"),
                email: "ana@example.com".into(),
                output: "pdf".into(),
            }))
        );
        let view = s.render();
        assert!(view.modal.raised);
        assert!(view.modal.loader_visible);
        assert!(s.is_in_flight());
    }

    #[test]
    fn second_submit_while_loading_is_ignored() {
        let mut s = filled();
        assert!(s.update(FormEvent::Submit).is_some());
        assert!(s.update(FormEvent::Submit).is_none());
        assert!(s.modal().is_loading());
    }

    #[test]
    fn success_resets_inputs() {
        let mut s = filled();
        s.update(FormEvent::Submit);
        s.update(FormEvent::UploadFinished(Ok(UploadResponse {
            status: 200,
            body: r#"{"OK": true}"#.into(),
        })));

        let view = s.render();
        assert_eq!(view.modal.icon, Icon::Check);
        assert!(!view.modal.loader_visible);
        assert!(view.email.is_empty());
        assert_eq!(view.file_label, FileLabel::default());
        assert_eq!(view.checked_format.as_deref(), Some("jupyter"));
        assert!(!s.file().is_selected());
        assert!(!s.is_in_flight());
    }

    #[test]
    fn http_error_shows_server_message() {
        let mut s = filled();
        s.update(FormEvent::Submit);
        s.update(FormEvent::UploadFinished(Err(SubmitError::Http {
            status: 400,
            body: ErrorBody::from_value(serde_json::json!({ "erro": "X" })),
        })));
        let view = s.render();
        assert_eq!(view.modal.icon, Icon::Cross);
        assert!(!view.modal.loader_visible);
        assert_eq!(
            view.modal.message,
            "Oops! The following error occurred during the request: X"
        );
        // inputs survive a failure so the user can resubmit
        assert_eq!(view.email, "ana@example.com");
        assert!(s.file().is_selected());
    }

    #[test]
    fn unparseable_body_shows_fallback() {
        let mut s = filled();
        s.update(FormEvent::Submit);
        s.update(FormEvent::UploadFinished(Err(SubmitError::Parse {
            status: 502,
            detail: "EOF".into(),
            raw: String::new(),
        })));
        let view = s.render();
        assert!(!view.modal.loader_visible);
        assert!(view.modal.message.ends_with("Error not informed."));
    }

    #[test]
    fn close_from_any_state_clears_modal() {
        let mut s = state();
        for modal in [
            ModalState::RaisedIdle,
            ModalState::RaisedLoading,
            ModalState::RaisedSuccess {
                message: "ok".into(),
            },
            ModalState::RaisedFail {
                message: "no".into(),
            },
            ModalState::Hidden,
        ] {
            s.modal = modal;
            s.update(FormEvent::Close);
            let view = s.render().modal;
            assert!(!view.raised);
            assert_eq!(view.icon, Icon::None);
            assert_eq!(view.icon_class(), None);
            assert!(view.message.is_empty());
        }
    }

    #[test]
    fn outcome_after_close_raises_modal_again() {
        let mut s = filled();
        s.update(FormEvent::Submit);
        s.update(FormEvent::Close);
        assert!(!s.modal().is_raised());
        s.update(FormEvent::UploadFinished(Err(SubmitError::Transport {
            reason: "connection reset".into(),
            timed_out: false,
        })));
        assert!(s.modal().is_raised());
    }
}
