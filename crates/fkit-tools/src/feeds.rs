//! Vulnerability feed sources

use serde::Serialize;

/// A downloadable feed and the content type it is published as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeedSource {
    pub url: &'static str,
    pub mime: &'static str,
}

const OVAL_SOURCES: &[FeedSource] = &[FeedSource {
    url: "https://security-metadata.canonical.com/oval/com.ubuntu.jammy.usn.oval.xml.bz2",
    mime: "application/x-bzip2",
}];

/// OVAL definition feeds to hand to the feed fetcher
pub fn oval_sources() -> &'static [FeedSource] {
    OVAL_SOURCES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oval_sources() {
        let sources = oval_sources();
        assert_eq!(sources.len(), 1);
        assert!(sources[0].url.starts_with("https://"));
        assert!(sources[0].url.ends_with(".oval.xml.bz2"));
        assert_eq!(sources[0].mime, "application/x-bzip2");
    }
}
