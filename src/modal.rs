//! Status modal: state and its rendered view.

use serde::Serialize;

/// CSS class put on the icon after a successful upload.
pub const ICON_SUCCESS_CLASS: &str = "modal__icon--success";
/// CSS class put on the icon after any failure.
pub const ICON_FAIL_CLASS: &str = "modal__icon--fail";

/// Where the modal is in its lifecycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ModalState {
    #[default]
    Hidden,
    RaisedIdle,
    RaisedLoading,
    RaisedSuccess { message: String },
    RaisedFail { message: String },
}

impl ModalState {
    pub fn is_raised(&self) -> bool {
        !matches!(self, ModalState::Hidden)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ModalState::RaisedLoading)
    }

    pub fn close(&mut self) {
        *self = ModalState::Hidden;
    }

    /// Translate the state into what the overlay shows.
    pub fn render(&self) -> ModalView {
        match self {
            ModalState::Hidden => ModalView::default(),
            ModalState::RaisedIdle => ModalView {
                raised: true,
                ..ModalView::default()
            },
            ModalState::RaisedLoading => ModalView {
                raised: true,
                loader_visible: true,
                ..ModalView::default()
            },
            ModalState::RaisedSuccess { message } => ModalView {
                raised: true,
                icon: Icon::Check,
                message: message.clone(),
                ..ModalView::default()
            },
            ModalState::RaisedFail { message } => ModalView {
                raised: true,
                icon: Icon::Cross,
                message: message.clone(),
                ..ModalView::default()
            },
        }
    }
}

/// Glyph shown at the top of the modal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    #[default]
    None,
    Check,
    Cross,
}

impl Icon {
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::None => "",
            Icon::Check => "\u{2713}",
            Icon::Cross => "\u{2717}",
        }
    }

    pub fn class(self) -> Option<&'static str> {
        match self {
            Icon::None => None,
            Icon::Check => Some(ICON_SUCCESS_CLASS),
            Icon::Cross => Some(ICON_FAIL_CLASS),
        }
    }
}

/// Rendered modal: everything a front end needs to draw it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub raised: bool,
    pub icon: Icon,
    pub message: String,
    pub loader_visible: bool,
}

impl ModalView {
    pub fn icon_class(&self) -> Option<&'static str> {
        self.icon.class()
    }
}
