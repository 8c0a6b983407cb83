use docimg_common::local_prefix;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::model::ImageReference;

/// Extensions (lowercase) a remote target must end with to be localized.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]*)\)").expect("valid image regex"));

/// Every `![alt](target)` in `text`, in order of appearance.
pub fn extract_references(text: &str) -> Vec<ImageReference> {
    MARKDOWN_IMAGE_RE
        .captures_iter(text)
        .map(|caps| ImageReference {
            alt: caps[1].to_string(),
            url: caps[2].trim().to_string(),
            raw: caps[0].to_string(),
        })
        .collect()
}

/// Whether a reference points at a remote image that has not been localized yet.
pub fn is_qualifying(reference: &ImageReference) -> bool {
    if reference.url.starts_with(&local_prefix()) {
        debug!("Skipping already localized target {}", reference.url);
        return false;
    }

    let Ok(parsed) = Url::parse(&reference.url) else {
        debug!("Skipping non-URL target {}", reference.url);
        return false;
    };
    if !matches!(parsed.scheme(), "http" | "https") {
        debug!("Skipping non-remote target {}", reference.url);
        return false;
    }

    let has_image_extension = parsed
        .path()
        .rsplit_once('.')
        .filter(|(_, ext)| !ext.contains('/'))
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
    if !has_image_extension {
        debug!("Skipping target without image extension {}", reference.url);
    }
    has_image_extension
}

/// Qualifying references with duplicate reference text removed, first occurrence wins.
pub fn qualifying_references(text: &str) -> Vec<ImageReference> {
    let mut seen = Vec::<String>::new();
    extract_references(text)
        .into_iter()
        .filter(is_qualifying)
        .filter(|reference| {
            if seen.contains(&reference.raw) {
                false
            } else {
                seen.push(reference.raw.clone());
                true
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(url: &str) -> ImageReference {
        ImageReference {
            alt: "alt".to_string(),
            url: url.to_string(),
            raw: format!("![alt]({url})"),
        }
    }

    #[test]
    fn extracts_in_order_of_appearance() {
        let text = "intro ![one](http://a/1.png) middle ![](http://b/2.gif)\n![three](./images/x.webp)";
        let refs = extract_references(text);
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].alt, "one");
        assert_eq!(refs[0].url, "http://a/1.png");
        assert_eq!(refs[0].raw, "![one](http://a/1.png)");
        assert_eq!(refs[1].alt, "");
        assert_eq!(refs[1].url, "http://b/2.gif");
        assert_eq!(refs[2].url, "./images/x.webp");
    }

    #[test]
    fn ignores_plain_links() {
        assert!(extract_references("see [docs](http://a/1.png)").is_empty());
        assert!(extract_references("no references at all").is_empty());
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for url in [
            "http://x/y.png",
            "https://x/y.JPG",
            "https://x/a/b.jpeg?width=200",
            "https://x/anim.Gif#frame",
            "https://x/pic.webp",
        ] {
            assert!(is_qualifying(&reference(url)), "{url} should qualify");
        }
    }

    #[test]
    fn rejects_non_image_extensions() {
        for url in [
            "https://x/diagram.svg",
            "https://x/page",
            "https://x/archive.png.zip",
            "https://x.png/page",
            "https://x/file?name=a.png",
        ] {
            assert!(!is_qualifying(&reference(url)), "{url} should not qualify");
        }
    }

    #[test]
    fn rejects_localized_and_non_remote_targets() {
        assert!(!is_qualifying(&reference("./images/0123abcd.webp")));
        assert!(!is_qualifying(&reference("img/local.png")));
        assert!(!is_qualifying(&reference("ftp://host/pic.png")));
        assert!(!is_qualifying(&reference("data:image/png;base64,AAAA")));
    }

    #[test]
    fn qualifying_references_dedupes_identical_text() {
        let text = "![a](http://x/y.png) ![a](http://x/y.png) ![b](http://x/y.png)";
        let refs = qualifying_references(text);
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].alt, "a");
        assert_eq!(refs[1].alt, "b");
    }
}
