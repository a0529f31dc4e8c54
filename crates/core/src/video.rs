//! Turns lesson video links into URLs an embedded player can load.
//!
//! Only YouTube and Vimeo links are rewritten. Anything else, including links
//! whose video id cannot be found, is returned unchanged.

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed/";
const VIMEO_EMBED: &str = "https://player.vimeo.com/video/";

/// Map a raw lesson URL to an embeddable player URL.
#[must_use]
pub fn embed_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if raw.contains("youtube.com") || raw.contains("youtu.be") {
        return match youtube_id(raw) {
            Some(id) => format!("{YOUTUBE_EMBED}{id}"),
            None => raw.to_owned(),
        };
    }

    if raw.contains("vimeo.com") {
        return match segment_after(raw, "vimeo.com/") {
            Some(id) => format!("{VIMEO_EMBED}{id}"),
            None => raw.to_owned(),
        };
    }

    raw.to_owned()
}

fn youtube_id(raw: &str) -> Option<&str> {
    let id = if raw.contains("v=") {
        segment_after(raw, "v=").map(|id| cut_at(id, '&'))
    } else if raw.contains("youtu.be/") {
        segment_after(raw, "youtu.be/").map(|id| cut_at(id, '?'))
    } else {
        None
    };
    id.filter(|id| !id.is_empty())
}

/// Text between the first and second occurrence of `marker`.
fn segment_after<'a>(raw: &'a str, marker: &str) -> Option<&'a str> {
    raw.split(marker).nth(1).filter(|s| !s.is_empty())
}

fn cut_at(s: &str, stop: char) -> &str {
    s.split(stop).next().unwrap_or(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn youtube_watch_url_drops_extra_params() {
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=abc123&t=30"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn youtu_be_short_link_drops_query() {
        assert_eq!(
            embed_url("https://youtu.be/xyz789?t=5"),
            "https://www.youtube.com/embed/xyz789"
        );
    }

    #[test]
    fn vimeo_link_uses_player_host() {
        assert_eq!(
            embed_url("https://vimeo.com/555444"),
            "https://player.vimeo.com/video/555444"
        );
    }

    #[test]
    fn other_urls_pass_through() {
        assert_eq!(
            embed_url("https://example.com/video.mp4"),
            "https://example.com/video.mp4"
        );
        assert_eq!(embed_url(""), "");
    }

    #[test]
    fn unparseable_youtube_link_falls_back() {
        assert_eq!(
            embed_url("https://www.youtube.com/channel/UC123"),
            "https://www.youtube.com/channel/UC123"
        );
        assert_eq!(
            embed_url("https://www.youtube.com/watch?v=&t=3"),
            "https://www.youtube.com/watch?v=&t=3"
        );
    }

    #[test]
    fn vimeo_without_path_falls_back() {
        assert_eq!(embed_url("https://vimeo.com"), "https://vimeo.com");
        assert_eq!(embed_url("https://vimeo.com/"), "https://vimeo.com/");
    }

    #[test]
    fn already_embedded_youtube_url_is_kept() {
        // no `v=` and no `youtu.be/`
        assert_eq!(
            embed_url("https://www.youtube.com/embed/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
    }
}
