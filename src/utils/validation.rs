use crate::error::FetchError;
use url::Url;

/// Parses the source locator and derives the object key from its final
/// non-empty path segment. Query and fragment never reach the key.
pub fn parse_image_url(raw: &str) -> Result<(Url, String), FetchError> {
    let invalid = |reason: &str| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw).map_err(|e| invalid(&e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(invalid("only http and https are supported"));
    }

    let basename = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .map(str::to_string)
        .ok_or_else(|| invalid("URL has no file name"))?;

    Ok((url, basename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basename_is_last_segment() {
        let (_, name) = parse_image_url("https://cdn.example.com/photos/2024/cat.jpg").unwrap();
        assert_eq!(name, "cat.jpg");
    }

    #[test]
    fn test_basename_ignores_query_and_trailing_slash() {
        let (_, name) = parse_image_url("http://example.com/a/b.png?size=large#top").unwrap();
        assert_eq!(name, "b.png");

        let (_, name) = parse_image_url("http://example.com/images/").unwrap();
        assert_eq!(name, "images");
    }

    #[test]
    fn test_dot_segments_are_normalized() {
        let (_, name) = parse_image_url("http://example.com/a/../b/c.jpg").unwrap();
        assert_eq!(name, "c.jpg");
    }

    #[test]
    fn test_rejects_unusable_urls() {
        assert!(parse_image_url("not a url").is_err());
        assert!(parse_image_url("ftp://example.com/a.jpg").is_err());
        assert!(parse_image_url("https://example.com/").is_err());
        assert!(parse_image_url("https://example.com").is_err());
    }
}
