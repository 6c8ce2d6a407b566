use std::path::Path;

use distframe_core::config::{EmbedConfig, EmbedMode};

use crate::error::EmbedError;
use crate::page::HostPage;

/// The confirmed thing to show: a ready URL, or the entry file's markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedSource {
    Url(String),
    Markup(String),
}

impl EmbedSource {
    pub fn mode(&self) -> EmbedMode {
        match self {
            Self::Url(_) => EmbedMode::Iframe,
            Self::Markup(_) => EmbedMode::RawHtml,
        }
    }
}

pub fn load_entry_markup(path: &Path) -> Result<EmbedSource, EmbedError> {
    let markup = std::fs::read_to_string(path).map_err(|source| EmbedError::EntryUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = markup.len(), "Loaded entry markup");
    Ok(EmbedSource::Markup(markup))
}

/// Render `source` into the page with the configured viewport.
pub fn embed(page: &mut dyn HostPage, source: &EmbedSource, config: &EmbedConfig) {
    match source {
        EmbedSource::Url(url) => page.iframe(url, config.frame_height, config.scrolling),
        EmbedSource::Markup(markup) => {
            page.raw_html(markup, config.frame_height, config.scrolling)
        }
    }
}
