//! services/client/src/extract.rs
//!
//! Pulls the plain text and the embedded images out of a rich note document
//! (an HTML fragment, as exported by a rich editor). Built on `lol_html`
//! streaming handlers.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine as _;
use lol_html::{doc_text, element, HtmlRewriter, Settings};
use meeting_comic_core::domain::{ImageAttachment, NoteContent};
use tracing::{debug, warn};

/// Elements that terminate a visual line in the rendered note.
const BLOCK_TAGS: [&str; 10] = [
    "p", "div", "li", "h1", "h2", "h3", "h4", "blockquote", "pre", "tr",
];

/// Extracts the note's rendered text and its embedded images.
///
/// Text keeps embedded line breaks and is trimmed at both ends. Images come
/// back in document order; `data:` payloads are decoded in place, local file
/// references are read from disk relative to `base_dir`, and remote sources
/// are skipped — there is no way to fetch them reliably from here. A failure
/// on one image is logged and never aborts the text or the remaining images.
pub async fn extract_content(note_html: &str, base_dir: &Path) -> NoteContent {
    let (raw_text, sources) = scan_note(note_html);
    let text = tidy_text(&raw_text);

    let mut images = Vec::new();
    for src in &sources {
        match materialize_image(src, base_dir, images.len()).await {
            Ok(Some(attachment)) => images.push(attachment),
            Ok(None) => debug!("skipping remote image source"),
            Err(e) => warn!("could not extract an embedded image: {e}"),
        }
    }

    NoteContent { text, images }
}

/// One streaming pass over the markup: accumulates text (with newline
/// markers at `<br>` and block boundaries) and collects `img` sources in
/// document order.
fn scan_note(note_html: &str) -> (String, Vec<String>) {
    let text: Arc<Mutex<String>> = Arc::new(Mutex::new(String::new()));
    let sources: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let mut handlers = Vec::new();

    let breaks = Arc::clone(&text);
    handlers.push(element!("br", move |_| {
        breaks.lock().unwrap().push('\n');
        Ok(())
    }));

    for tag in BLOCK_TAGS {
        let blocks = Arc::clone(&text);
        handlers.push(element!(tag, move |_| {
            blocks.lock().unwrap().push('\n');
            Ok(())
        }));
    }

    let sources_handle = Arc::clone(&sources);
    handlers.push(element!("img[src]", move |el| {
        if let Some(src) = el.get_attribute("src") {
            sources_handle.lock().unwrap().push(src);
        }
        Ok(())
    }));

    let chunks = Arc::clone(&text);
    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: handlers,
            document_content_handlers: vec![doc_text!(move |chunk| {
                chunks.lock().unwrap().push_str(chunk.as_str());
                Ok(())
            })],
            ..Settings::default()
        },
        |_: &[u8]| {},
    );

    let result = match rewriter.write(note_html.as_bytes()) {
        Ok(()) => rewriter.end(),
        Err(e) => Err(e),
    };
    if let Err(e) = result {
        // Whatever was scanned before the malformed spot still counts.
        warn!("note markup scan stopped early: {e}");
    }

    let raw_text = text.lock().unwrap().clone();
    let image_sources = sources.lock().unwrap().clone();
    (raw_text, image_sources)
}

/// Trims every line, collapses runs of blank lines, and strips the ends —
/// the "rendered plain text" shape of the note.
fn tidy_text(raw: &str) -> String {
    let decoded = decode_entities(raw);
    let mut lines: Vec<&str> = Vec::new();
    for line in decoded.lines() {
        let line = line.trim();
        if line.is_empty() {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push("");
            }
        } else {
            lines.push(line);
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Minimal entity decoding for text lifted out of markup: the named basics
/// plus numeric references. Anything unrecognized stays literal.
fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];

        let entity_end = rest[1..].find(';').map(|i| i + 1);
        let Some(end) = entity_end.filter(|&e| e <= 10) else {
            out.push('&');
            rest = &rest[1..];
            continue;
        };

        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some(' '),
            _ => numeric_entity(entity),
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn numeric_entity(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = match digits.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => digits.parse().ok()?,
    };
    char::from_u32(code)
}

//=========================================================================================
// Image Materialization
//=========================================================================================

#[derive(Debug, thiserror::Error)]
enum ImageSourceError {
    #[error("malformed data uri")]
    MalformedDataUri,
    #[error("bad base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

enum ImageSource {
    DataUri(String),
    LocalFile(PathBuf),
    /// Remote or otherwise unfetchable; produces no binary and no error.
    Skipped,
}

fn classify_source(src: &str, base_dir: &Path) -> ImageSource {
    if let Some(rest) = src.strip_prefix("data:") {
        return ImageSource::DataUri(rest.to_string());
    }
    if src.starts_with("http://") || src.starts_with("https://") || src.starts_with("//") {
        return ImageSource::Skipped;
    }
    if let Some(rest) = src.strip_prefix("file://") {
        return ImageSource::LocalFile(PathBuf::from(rest));
    }
    // Any other scheme (javascript:, cid:, ...) is equally unfetchable.
    let head = src.split(['/', '?', '#']).next().unwrap_or("");
    if head.contains(':') {
        return ImageSource::Skipped;
    }
    let path = Path::new(src);
    if path.is_absolute() {
        ImageSource::LocalFile(path.to_path_buf())
    } else {
        ImageSource::LocalFile(base_dir.join(path))
    }
}

async fn materialize_image(
    src: &str,
    base_dir: &Path,
    position: usize,
) -> Result<Option<ImageAttachment>, ImageSourceError> {
    match classify_source(src, base_dir) {
        ImageSource::Skipped => Ok(None),
        ImageSource::DataUri(rest) => {
            let (media_type, bytes) = decode_data_uri(&rest)?;
            Ok(Some(ImageAttachment {
                file_name: attachment_name(position, &media_type),
                media_type,
                bytes,
            }))
        }
        ImageSource::LocalFile(path) => {
            let bytes = tokio::fs::read(&path).await?;
            let media_type = media_type_for_path(&path);
            Ok(Some(ImageAttachment {
                file_name: attachment_name(position, &media_type),
                media_type,
                bytes,
            }))
        }
    }
}

/// `data:` URI body (everything after the scheme): `[mime][;base64],payload`.
fn decode_data_uri(rest: &str) -> Result<(String, Vec<u8>), ImageSourceError> {
    let (header, payload) = rest
        .split_once(',')
        .ok_or(ImageSourceError::MalformedDataUri)?;
    let (mime, is_base64) = match header.strip_suffix(";base64") {
        Some(mime) => (mime, true),
        None => (header, false),
    };
    let media_type = if mime.is_empty() {
        "application/octet-stream".to_string()
    } else {
        mime.to_string()
    };
    let bytes = if is_base64 {
        BASE64_STANDARD.decode(payload.trim())?
    } else {
        percent_decode(payload)
    };
    Ok((media_type, bytes))
}

/// Percent-decoding for non-base64 data URIs. Malformed escapes pass through
/// literally.
fn percent_decode(payload: &str) -> Vec<u8> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let Ok(value) = u8::from_str_radix(
                std::str::from_utf8(&bytes[i + 1..i + 3]).unwrap_or(""),
                16,
            ) {
                out.push(value);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn media_type_for_path(path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    }
    .to_string()
}

fn attachment_name(position: usize, media_type: &str) -> String {
    let ext = match media_type {
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => "png",
    };
    format!("image_{position}.{ext}")
}
