// src/page.rs

use crate::media_kind::MediaKind;
use std::path::Path;

/// Route prefix for the logo image.
pub const LOGO_ROUTE_PREFIX: &str = "/static/logo";

/// What the landing page shows for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandingPage {
    pub video: Option<String>,
    pub audio: Option<String>,
    /// File name of the configured logo, if the file exists.
    pub logo: Option<String>,
}

fn html_escape(s: &str) -> String {
    htmlescape::encode_minimal(s)
}

/// URL of a delivered file. Each path segment is percent-encoded on its own
/// so nested names keep their slashes.
pub fn media_url(prefix: &str, name: &str) -> String {
    let encoded: Vec<String> = name
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", prefix, encoded.join("/"))
}

fn media_source(kind: MediaKind, name: &str) -> String {
    let url = media_url(kind.route_prefix(), name);
    format!(
        r#"<source src="{}" type="{}">"#,
        html_escape(&url),
        kind.content_type_for(Path::new(name)).essence_str()
    )
}

/// Renders the landing page. A missing selection omits its element.
pub fn render_landing(page: &LandingPage) -> String {
    let mut body = String::new();

    if let Some(logo) = &page.logo {
        body.push_str(&format!(
            "  <img class=\"logo\" src=\"{}\" alt=\"logo\">\n",
            html_escape(&media_url(LOGO_ROUTE_PREFIX, logo))
        ));
    }

    if let Some(video) = &page.video {
        body.push_str(&format!(
            "  <video id=\"{}\" autoplay muted loop playsinline>\n    {}\n  </video>\n",
            MediaKind::Video.element_id(),
            media_source(MediaKind::Video, video)
        ));
    }

    if let Some(audio) = &page.audio {
        body.push_str(&format!(
            "  <audio id=\"{}\" autoplay loop>\n    {}\n  </audio>\n",
            MediaKind::Audio.element_id(),
            media_source(MediaKind::Audio, audio)
        ));
    }

    if page.video.is_none() && page.audio.is_none() {
        body.push_str("  <p class=\"empty\">No media available yet.</p>\n");
    }

    format!(
        r#"<!doctype html>
<html lang="en"><head>
  <meta charset="utf-8"><title>Backdrop</title>
  <meta name="viewport" content="width=device-width,initial-scale=1">
  <style>
    body{{margin:0;background:#000;color:#eee;font-family:system-ui,-apple-system,Segoe UI,Roboto,Arial}}
    video{{position:fixed;inset:0;width:100%;height:100%;object-fit:cover;z-index:-1}}
    .logo{{position:fixed;top:24px;left:24px;max-width:200px}}
    .empty{{padding:24px}}
  </style>
</head><body>
{}</body></html>"#,
        body
    )
}
