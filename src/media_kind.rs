// src/media_kind.rs

use std::path::Path;

/// The two media categories shown on the landing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// URL prefix of the delivery route for this category.
    pub fn route_prefix(self) -> &'static str {
        match self {
            MediaKind::Video => "/static/video",
            MediaKind::Audio => "/static/audio",
        }
    }

    /// `id` of the HTML element embedding this category on the landing page.
    pub fn element_id(self) -> &'static str {
        match self {
            MediaKind::Video => "background-video",
            MediaKind::Audio => "background-audio",
        }
    }

    /// Top-level MIME type a delivered file must carry.
    pub fn top_level_type(self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Content type used when the file name does not map to this category.
    pub fn fallback_mime(self) -> mime_guess::Mime {
        let essence = match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/mpeg",
        };
        essence
            .parse()
            .unwrap_or(mime_guess::mime::APPLICATION_OCTET_STREAM)
    }

    /// Content type for a delivered file.
    ///
    /// The guess from the file name is kept when its top-level type matches
    /// the category; `.ogg` under the video route becomes `video/ogg`.
    /// Anything else gets the category fallback.
    pub fn content_type_for(self, path: &Path) -> mime_guess::Mime {
        let Some(guess) = mime_guess::from_path(path).first() else {
            return self.fallback_mime();
        };
        if guess.type_().as_str() == self.top_level_type() {
            return guess;
        }
        if guess.subtype() == "ogg" {
            if let Ok(mime) = format!("{}/ogg", self.top_level_type()).parse() {
                return mime;
            }
        }
        self.fallback_mime()
    }
}
