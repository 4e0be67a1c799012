pub mod config;
pub mod handler;
pub mod output;
pub mod server;
pub mod summarize;
pub mod transcript;
pub mod youtube;

#[cfg(test)]
pub(crate) mod mock;

use std::sync::LazyLock;

use log::warn;
use regex::Regex;
use serde::Serialize;

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

// Both patterns require the token to end at a non-id character (or end of input),
// so a capture is always exactly 11 characters.
static QUERY_OR_PATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:v=|/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap());

static EMBED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:embed/|v/|youtu\.be/)([0-9A-Za-z_-]{11})(?:[^0-9A-Za-z_-]|$)").unwrap());

fn capture_id(re: &Regex, input: &str) -> Option<String> {
    re.captures(input).map(|caps| caps[1].to_string())
}

/// Extract video ID from various YouTube URL formats
///
/// Tries `v=ID` / `/ID` first, then `embed/ID`, `v/ID` and `youtu.be/ID`.
/// Purely syntactic: the returned token is not checked against YouTube.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let primary = capture_id(&QUERY_OR_PATH_RE, input);
    let secondary = capture_id(&EMBED_RE, input);

    if let (Some(p), Some(s)) = (&primary, &secondary) {
        if p != s {
            warn!("Ambiguous video URL {input:?}: query/path pattern gave {p}, embed pattern gave {s}; using {p}");
        }
    }

    primary.or(secondary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_with_extra_params() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=120"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_watch_url_v_not_first_param() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_short_url_with_timestamp() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?t=42"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_embed_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_v_path_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ?version=3"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_shorts_url() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn test_id_chars_dash_underscore() {
        assert_eq!(extract_video_id("youtu.be/a-b_c-d_e-f"), Some("a-b_c-d_e-f".to_string()));
    }

    #[test]
    fn test_twelve_char_token_rejected() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQX"), None);
    }

    #[test]
    fn test_ten_char_token_rejected() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXc"), None);
    }

    #[test]
    fn test_patterns_disagree_prefers_first() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/abcdefghijk/embed/dQw4w9WgXcQ"),
            Some("abcdefghijk".to_string())
        );
    }

    #[test]
    fn test_bare_video_id_not_accepted() {
        assert_eq!(extract_video_id("dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_invalid_url() {
        assert_eq!(extract_video_id("not a url"), None);
        assert_eq!(extract_video_id("https://example.com/"), None);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(extract_video_id(""), None);
        assert_eq!(extract_video_id("   "), None);
    }

    #[test]
    fn test_whitespace_trimming() {
        assert_eq!(
            extract_video_id("  https://youtu.be/dQw4w9WgXcQ  "),
            Some("dQw4w9WgXcQ".to_string())
        );
    }
}
