use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::cv::UiLanguage;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl From<UiLanguage> for TextDirection {
    fn from(language: UiLanguage) -> Self {
        match language {
            UiLanguage::Ar => TextDirection::Rtl,
            UiLanguage::En => TextDirection::Ltr,
        }
    }
}

/// Receives the document direction whenever the interface language changes.
///
/// The store holds an `Arc<dyn DirectionListener>`; front ends plug in
/// whatever flips their layout.
pub trait DirectionListener: Send + Sync {
    fn direction_changed(&self, language: UiLanguage, direction: TextDirection);
}

/// Default listener: records the change in the log and nothing else.
pub struct LogDirectionListener;

impl DirectionListener for LogDirectionListener {
    fn direction_changed(&self, language: UiLanguage, direction: TextDirection) {
        info!(
            "Document language set to {} ({:?})",
            language.code(),
            direction
        );
    }
}
