//! File extension to content type lookup.

/// Content type sent when the extension is unknown.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the content type for `file_name`, judged by its extension.
///
/// The lookup is case-insensitive. A name without a dot, or whose only dot is the
/// leading one (`.bashrc`), has no extension and maps to [`OCTET_STREAM`].
///
/// ```
/// use seekserve::mime::mime_type;
///
/// assert_eq!(mime_type("index.HTML"), "text/html");
/// assert_eq!(mime_type("movie.mp4"), "video/mp4");
/// assert_eq!(mime_type("README"), "application/octet-stream");
/// ```
pub fn mime_type(file_name: &str) -> &'static str {
    let Some((stem, extension)) = file_name.rsplit_once('.') else {
        return OCTET_STREAM;
    };
    if stem.is_empty() {
        return OCTET_STREAM;
    }

    match extension.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "xml" => "application/xml",

        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        "mp3" => "audio/mpeg",
        "ogg" => "audio/ogg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "m4a" => "audio/mp4",
        "m3u" | "m3u8" => "audio/x-mpegurl",

        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "mov" => "video/quicktime",

        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",

        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(mime_type("index.html"), "text/html");
        assert_eq!(mime_type("page.htm"), "text/html");
        assert_eq!(mime_type("app.js"), "application/javascript");
        assert_eq!(mime_type("logo.svg"), "image/svg+xml");
        assert_eq!(mime_type("font.eot"), "application/vnd.ms-fontobject");
        assert_eq!(mime_type("clip.webm"), "video/webm");
    }

    #[test]
    fn extension_case_is_ignored() {
        assert_eq!(mime_type("PHOTO.JPG"), "image/jpeg");
        assert_eq!(mime_type("Song.Mp3"), "audio/mpeg");
    }

    #[test]
    fn only_last_extension_counts() {
        assert_eq!(mime_type("archive.tar.zip"), "application/zip");
        assert_eq!(mime_type("notes.txt.bak"), OCTET_STREAM);
    }

    #[test]
    fn unknown_or_missing_extension() {
        assert_eq!(mime_type("data.xyz"), OCTET_STREAM);
        assert_eq!(mime_type("Makefile"), OCTET_STREAM);
        assert_eq!(mime_type(".html"), OCTET_STREAM);
        assert_eq!(mime_type("trailing."), OCTET_STREAM);
        assert_eq!(mime_type(""), OCTET_STREAM);
    }
}
