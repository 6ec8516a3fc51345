use edutrack::utils::youtube::extract_youtube_id;

#[test]
fn test_watch_urls() {
    for url in [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtube.com/watch?v=dQw4w9WgXcQ",
        "http://m.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=42",
    ] {
        assert_eq!(extract_youtube_id(url).unwrap(), "dQw4w9WgXcQ", "{}", url);
    }
}

#[test]
fn test_short_embed_and_shorts_urls() {
    assert_eq!(
        extract_youtube_id("https://youtu.be/dQw4w9WgXcQ?t=10").unwrap(),
        "dQw4w9WgXcQ"
    );
    assert_eq!(
        extract_youtube_id("https://www.youtube.com/embed/dQw4w9WgXcQ").unwrap(),
        "dQw4w9WgXcQ"
    );
    assert_eq!(
        extract_youtube_id("https://www.youtube.com/shorts/abc_DEF-123").unwrap(),
        "abc_DEF-123"
    );
}

#[test]
fn test_raw_id() {
    assert_eq!(extract_youtube_id("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
    assert_eq!(extract_youtube_id("  a-b_c  ").unwrap(), "a-b_c");
}

#[test]
fn test_rejects_other_input() {
    for input in [
        "",
        "https://vimeo.com/12345",
        "https://www.youtube.com/watch?list=PL123",
        "https://www.youtube.com/",
        "not a video id",
        "https://youtu.be/",
    ] {
        let err = extract_youtube_id(input).unwrap_err();
        assert_eq!(err.status.as_u16(), 422, "{}", input);
        assert_eq!(err.error.to_string(), "Invalid YouTube URL or ID");
    }
}
