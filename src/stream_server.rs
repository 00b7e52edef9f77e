// src/stream_server.rs

use crate::config::ServerConfig;
use crate::error::MediaError;
use crate::file_utils::resolve_within;
use crate::media_kind::MediaKind;
use crate::page::{render_landing, LandingPage};
use crate::picker::pick;
use actix_files::NamedFile;
use actix_web::{middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use log::{error, warn};
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

/// Runs both pickers and checks for the logo. Blocking: call through `web::block`.
fn build_landing(config: &ServerConfig) -> Result<LandingPage, MediaError> {
    let mut page = LandingPage::default();
    for kind in [MediaKind::Video, MediaKind::Audio] {
        let selection = pick(config.media_dir(kind), config.suffixes(kind)).inspect_err(|e| {
            error!("Cannot pick {:?} media: {}", kind, e);
        })?;
        match kind {
            MediaKind::Video => page.video = selection,
            MediaKind::Audio => page.audio = selection,
        }
    }

    // The logo is advisory; a missing file just leaves it off the page.
    page.logo = config
        .logo_file
        .as_deref()
        .filter(|logo| logo.is_file())
        .and_then(|logo| logo.file_name())
        .map(|name| name.to_string_lossy().into_owned());

    Ok(page)
}

/// HTTP handler for `/`. Picks a fresh video and audio track per request.
async fn index(config: web::Data<ServerConfig>) -> Result<HttpResponse, MediaError> {
    let config = config.into_inner();
    let page = web::block(move || build_landing(&config))
        .await
        .map_err(|_| MediaError::Blocking)??;

    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(render_landing(&page)))
}

/// Streams an already resolved file. `NamedFile` handles Range and HEAD requests.
async fn send_file(
    req: &HttpRequest,
    path: &Path,
    name: &str,
    mime: mime_guess::Mime,
) -> Result<HttpResponse, MediaError> {
    let named_file = NamedFile::open_async(path).await.map_err(|e| {
        // The file can disappear between resolution and open.
        if e.kind() == IoErrorKind::NotFound {
            MediaError::NotFound(name.to_string())
        } else {
            MediaError::Io(e)
        }
    })?;
    Ok(named_file.set_content_type(mime).into_response(req))
}

/// Resolves `name` under `base_dir` and streams it with the given content type.
async fn deliver(
    req: &HttpRequest,
    base_dir: &Path,
    name: &str,
    content_type: impl FnOnce(&Path) -> mime_guess::Mime,
) -> Result<HttpResponse, MediaError> {
    let path = resolve_within(base_dir, name).inspect_err(|e| {
        if let MediaError::PathEscape(_) = e {
            warn!(
                "Rejected request for '{}' outside '{}'",
                name,
                base_dir.display()
            );
        }
    })?;

    let mime = content_type(&path);
    send_file(req, &path, name, mime).await
}

async fn serve_media(
    req: HttpRequest,
    kind: MediaKind,
    name: web::Path<String>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, MediaError> {
    deliver(&req, config.media_dir(kind), &name, |path| {
        kind.content_type_for(path)
    })
    .await
}

async fn serve_video(
    req: HttpRequest,
    name: web::Path<String>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, MediaError> {
    serve_media(req, MediaKind::Video, name, config).await
}

async fn serve_audio(
    req: HttpRequest,
    name: web::Path<String>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, MediaError> {
    serve_media(req, MediaKind::Audio, name, config).await
}

async fn serve_logo(
    req: HttpRequest,
    name: web::Path<String>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, MediaError> {
    // Only the configured logo is served, never its neighbours.
    let logo = config
        .logo_matching(&name)
        .filter(|logo| logo.is_file())
        .ok_or_else(|| MediaError::NotFound(name.to_string()))?;
    let mime = mime_guess::from_path(logo).first_or_octet_stream();
    send_file(&req, logo, &name, mime).await
}

/// Registers the landing page and the delivery routes.
/// Expects a `web::Data<ServerConfig>` in the app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .service(
            web::resource("/static/video/{name:.*}")
                .route(web::get().to(serve_video))
                .route(web::head().to(serve_video)),
        )
        .service(
            web::resource("/static/audio/{name:.*}")
                .route(web::get().to(serve_audio))
                .route(web::head().to(serve_audio)),
        )
        .service(
            web::resource("/static/logo/{name:.*}")
                .route(web::get().to(serve_logo))
                .route(web::head().to(serve_logo)),
        );
}

/// Configures and starts the Actix web server.
///
/// # Returns
///
/// A `std::io::Result` containing the Actix server instance if binding is successful.
pub fn run_server(config: ServerConfig) -> std::io::Result<actix_web::dev::Server> {
    let bind_addr = (config.host.clone(), config.port);
    let app_config = web::Data::new(config);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_config.clone())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{header, Method, StatusCode};
    use actix_web::test;
    use std::fs;
    use std::path::PathBuf;

    fn media_dirs() -> (tempfile::TempDir, tempfile::TempDir) {
        (tempfile::tempdir().unwrap(), tempfile::tempdir().unwrap())
    }

    #[actix_web::test]
    async fn test_index_renders_with_empty_directories() {
        let (video, audio) = media_dirs();
        let config = ServerConfig::new(video.path(), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(!html.contains("<video"));
        assert!(!html.contains("<audio"));
        assert!(!html.contains("<img"));
    }

    #[actix_web::test]
    async fn test_index_embeds_picked_media() {
        let (video, audio) = media_dirs();
        fs::write(video.path().join("background.mp4"), b"v").unwrap();
        fs::write(video.path().join("ignored.txt"), b"t").unwrap();
        fs::write(audio.path().join("background.mp3"), b"a").unwrap();
        let config = ServerConfig::new(video.path(), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("/static/video/background.mp4"));
        assert!(html.contains("/static/audio/background.mp3"));
        assert!(!html.contains("ignored.txt"));
    }

    #[actix_web::test]
    async fn test_index_with_missing_directory_is_server_error() {
        let (video, audio) = media_dirs();
        let config = ServerConfig::new(video.path().join("missing"), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn test_logo_shown_only_when_present() {
        let (video, audio) = media_dirs();
        let logo_dir = tempfile::tempdir().unwrap();
        let logo_file = logo_dir.path().join("example_logo.png");
        let mut config = ServerConfig::new(video.path(), audio.path());
        config.logo_file = Some(logo_file.clone());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(!String::from_utf8(body.to_vec()).unwrap().contains("<img"));

        fs::write(&logo_file, b"\x89PNG").unwrap();
        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(String::from_utf8(body.to_vec())
            .unwrap()
            .contains("/static/logo/example_logo.png"));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/static/logo/example_logo.png")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "image/png"
        );
    }

    #[actix_web::test]
    async fn test_logo_route_does_not_serve_neighbours() {
        let (video, audio) = media_dirs();
        let logo_dir = tempfile::tempdir().unwrap();
        fs::write(logo_dir.path().join("logo.png"), b"\x89PNG").unwrap();
        fs::write(logo_dir.path().join(".env"), b"SECRET=1").unwrap();
        fs::write(logo_dir.path().join("other.png"), b"\x89PNG").unwrap();
        let mut config = ServerConfig::new(video.path(), audio.path());
        config.logo_file = Some(logo_dir.path().join("logo.png"));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        for uri in ["/static/logo/.env", "/static/logo/other.png", "/static/logo/"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
        }

        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get().uri("/static/logo/logo.png").to_request(),
        )
        .await;
        assert_eq!(body.as_ref(), b"\x89PNG");
    }

    #[actix_web::test]
    async fn test_bare_logo_name_missing_is_not_found() {
        let (video, audio) = media_dirs();
        let mut config = ServerConfig::new(video.path(), audio.path());
        config.logo_file = Some(PathBuf::from("backdrop_absent_logo.png"));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let body =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert!(!String::from_utf8(body.to_vec()).unwrap().contains("<img"));

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/static/logo/backdrop_absent_logo.png")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_bare_logo_name_is_served_from_working_directory() {
        let (video, audio) = media_dirs();
        let work_dir = tempfile::tempdir().unwrap();
        fs::write(work_dir.path().join("bare_logo.png"), b"\x89PNG").unwrap();
        let previous_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(work_dir.path()).unwrap();

        let mut config = ServerConfig::new(video.path(), audio.path());
        config.logo_file = Some(PathBuf::from("bare_logo.png"));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let page =
            test::call_and_read_body(&app, test::TestRequest::get().uri("/").to_request()).await;
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/static/logo/bare_logo.png")
                .to_request(),
        )
        .await;
        let status = resp.status();
        std::env::set_current_dir(previous_dir).unwrap();

        assert!(String::from_utf8(page.to_vec())
            .unwrap()
            .contains("/static/logo/bare_logo.png"));
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_video_delivery_matches_disk_bytes() {
        let (video, audio) = media_dirs();
        let contents: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        fs::write(video.path().join("background.mp4"), &contents).unwrap();
        let config = ServerConfig::new(video.path(), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/static/video/background.mp4")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "video/mp4"
        );
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), contents.as_slice());
    }

    #[actix_web::test]
    async fn test_audio_delivery_nested_and_head() {
        let (video, audio) = media_dirs();
        fs::create_dir(audio.path().join("set")).unwrap();
        fs::write(audio.path().join("set").join("track.mp3"), b"ID3").unwrap();
        let config = ServerConfig::new(video.path(), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let body = test::call_and_read_body(
            &app,
            test::TestRequest::get()
                .uri("/static/audio/set/track.mp3")
                .to_request(),
        )
        .await;
        assert_eq!(body.as_ref(), b"ID3");

        let resp = test::call_service(
            &app,
            test::TestRequest::default()
                .method(Method::HEAD)
                .uri("/static/audio/set/track.mp3")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/mpeg"
        );
    }

    #[actix_web::test]
    async fn test_missing_file_is_not_found() {
        let (video, audio) = media_dirs();
        let config = ServerConfig::new(video.path(), audio.path());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/static/video/nothing.mp4")
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_traversal_is_rejected() {
        let root = tempfile::tempdir().unwrap();
        let video = root.path().join("video");
        let audio = root.path().join("audio");
        fs::create_dir(&video).unwrap();
        fs::create_dir(&audio).unwrap();
        fs::write(root.path().join("secret.txt"), b"top secret").unwrap();
        let config = ServerConfig::new(&video, &audio);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(config))
                .configure(configure),
        )
        .await;

        for uri in [
            "/static/video/../secret.txt",
            "/static/video/..%2Fsecret.txt",
            "/static/audio/../../etc/passwd",
        ] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            let status = resp.status();
            assert!(
                status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND,
                "{} returned {}",
                uri,
                status
            );
            let body = test::read_body(resp).await;
            assert!(!body.as_ref().starts_with(b"top secret"));
        }
    }
}
