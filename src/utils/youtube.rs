//! YouTube video id extraction.

use edutrack_core::AppError;

const HOSTS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
    "www.youtu.be",
];

fn is_video_id(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Accepts `watch?v=`, `youtu.be/`, `/embed/` and `/shorts/` URLs or a bare id.
pub fn extract_youtube_id(input: &str) -> Result<String, AppError> {
    let input = input.trim();
    if is_video_id(input) {
        return Ok(input.to_string());
    }

    let invalid = || AppError::unprocessable(anyhow::anyhow!("Invalid YouTube URL or ID"));

    let without_scheme = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
        .unwrap_or(input);

    let (host, rest) = without_scheme.split_once('/').ok_or_else(invalid)?;
    if !HOSTS.contains(&host.to_lowercase().as_str()) {
        return Err(invalid());
    }

    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    let path = path.split('#').next().unwrap_or_default();

    let candidate = if host.to_lowercase().ends_with("youtu.be") {
        Some(path)
    } else if path == "watch" {
        query.and_then(|q| {
            q.split('&')
                .filter_map(|pair| pair.split_once('='))
                .find(|(key, _)| *key == "v")
                .map(|(_, value)| value)
        })
    } else {
        path.strip_prefix("embed/")
            .or_else(|| path.strip_prefix("shorts/"))
            .or_else(|| path.strip_prefix("v/"))
    };

    candidate
        .map(|id| id.trim_end_matches('/'))
        .filter(|id| is_video_id(id))
        .map(str::to_string)
        .ok_or_else(invalid)
}
