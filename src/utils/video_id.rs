//! Video identifier extraction for the segment lookup service

use url::Url;

/// Length of a YouTube video identifier
pub const VIDEO_ID_LEN: usize = 11;

/// Whether `candidate` looks like an 11-character video id
pub fn is_valid_video_id(candidate: &str) -> bool {
    candidate.len() == VIDEO_ID_LEN
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_youtube_host(host: &str) -> bool {
    host == "youtube.com"
        || host.ends_with(".youtube.com")
        || host == "youtu.be"
        || host.ends_with(".youtu.be")
}

/// Extract the video id from any YouTube URL shape.
///
/// Handles `youtu.be/<id>`, `watch?v=<id>`, `/shorts/<id>`, `/embed/<id>` and
/// `/v/<id>`. Anything that is not a YouTube URL yields `None`.
pub fn video_id_from_url(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_lowercase();
    if !is_youtube_host(&host) {
        return None;
    }

    if host.ends_with("youtu.be") {
        let id = url.path().trim_start_matches('/');
        return is_valid_video_id(id).then(|| id.to_string());
    }

    if let Some((_, v)) = url.query_pairs().find(|(key, _)| key == "v") {
        if is_valid_video_id(&v) {
            return Some(v.into_owned());
        }
    }

    url.path_segments()?
        .filter(|part| !part.is_empty() && *part != "watch" && *part != "shorts")
        .last()
        .filter(|id| is_valid_video_id(id))
        .map(str::to_string)
}

/// Resolve either a bare id or a URL to a video id
pub fn resolve_video_id(url_or_id: &str) -> Option<String> {
    let trimmed = url_or_id.trim();
    if is_valid_video_id(trimmed) {
        return Some(trimmed.to_string());
    }
    video_id_from_url(trimmed)
}

/// Trim the URL, drop a `t=` start offset and add `https://` when the scheme is missing
pub fn sanitize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let trimmed = trimmed.split("&t=").next().unwrap_or(trimmed);
    let trimmed = trimmed.split("?t=").next().unwrap_or(trimmed);
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_link_and_shorts() {
        assert_eq!(
            video_id_from_url("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id_from_url("https://youtube.com/shorts/abcDEF12_-9"),
            Some("abcDEF12_-9".to_string())
        );
        assert_eq!(
            video_id_from_url("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_rejects_other_hosts_and_bad_ids() {
        assert_eq!(video_id_from_url("https://vimeo.com/123456789"), None);
        assert_eq!(video_id_from_url("https://youtu.be/short"), None);
        assert_eq!(video_id_from_url("not a url"), None);
        assert_eq!(video_id_from_url(""), None);
    }

    #[test]
    fn test_watch_query_checks_characters() {
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9WgX!Q"),
            None
        );
        assert_eq!(
            video_id_from_url("https://www.youtube.com/watch?v=dQw4w9W%20XcQ"),
            None
        );
    }

    #[test]
    fn test_resolve_bare_id() {
        assert_eq!(resolve_video_id("dQw4w9WgXcQ"), Some("dQw4w9WgXcQ".to_string()));
        assert_eq!(resolve_video_id("dQw4w9WgX!Q"), None);
    }

    #[test]
    fn test_sanitize_url() {
        assert_eq!(
            sanitize_url("  youtu.be/dQw4w9WgXcQ "),
            "https://youtu.be/dQw4w9WgXcQ"
        );
        assert_eq!(sanitize_url("http://example.com"), "http://example.com");
        assert_eq!(
            sanitize_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            sanitize_url("https://youtu.be/dQw4w9WgXcQ?t=10"),
            "https://youtu.be/dQw4w9WgXcQ"
        );
        assert_eq!(sanitize_url("   "), "");
    }
}
