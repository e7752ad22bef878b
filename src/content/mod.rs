//! Message content pipeline: pick the content field, sanitize rich text,
//! then resolve its image references

pub mod fragment;
pub mod markup;
pub mod resolver;
pub mod sanitizer;

pub use resolver::{
    FsResourceStore, IMAGE_NOT_FOUND_PLACEHOLDER, ResolveReport, ResourceResolver, ResourceStore,
};
pub use sanitizer::sanitize;

use crate::models::{ContentSource, Message};

/// Content ready for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedContent {
    /// Sanitized markup, emitted as-is
    Markup(String),
    /// Plain text, escaped by the renderer
    Plain(String),
}

impl RenderedContent {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Markup(s) | Self::Plain(s) => s,
        }
    }
}

/// Produce the displayed content of a message
///
/// Rich text takes precedence over legacy text, which takes precedence over
/// supplemental text. Rich text is always sanitized and resolved, even when
/// that leaves nothing.
pub fn resolve_content<S: ResourceStore>(
    message: &Message,
    resolver: &ResourceResolver<S>,
) -> (RenderedContent, ResolveReport) {
    match message.content_source() {
        ContentSource::Rich(html) => {
            let body = sanitize(Some(html)).unwrap_or_default();
            let (resolved, report) = resolver.resolve(&body);
            (RenderedContent::Markup(resolved), report)
        }
        ContentSource::Legacy(text) | ContentSource::Supplemental(text) => {
            (RenderedContent::Plain(text.to_string()), ResolveReport::default())
        }
        ContentSource::Empty => (RenderedContent::Plain(String::new()), ResolveReport::default()),
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::Path;

    use super::*;

    struct NoResources;

    impl ResourceStore for NoResources {
        fn exists(&self, _relative: &Path) -> bool {
            false
        }

        fn copy_to_output(&self, _relative: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    fn message(legacy: Option<&str>, rich: Option<&str>, supplemental: Option<&str>) -> Message {
        Message {
            legacy_text: legacy.map(String::from),
            rich_text: rich.map(String::from),
            supplemental_text: supplemental.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_rich_text_is_sanitized_and_resolved() {
        let resolver = ResourceResolver::new(NoResources);
        let rich = r#"<html><p style="x">hi <img src="/ressources/a.png" width="1" height="1" /></p></html>"#;
        let (content, report) = resolve_content(&message(Some("legacy"), Some(rich), None), &resolver);

        assert_eq!(
            content,
            RenderedContent::Markup(format!("hi {}", IMAGE_NOT_FOUND_PLACEHOLDER))
        );
        assert_eq!(report.missing, 1);
    }

    #[test]
    fn test_rich_text_reducing_to_nothing_does_not_fall_back() {
        let resolver = ResourceResolver::new(NoResources);
        let (content, _) =
            resolve_content(&message(Some("legacy"), Some("<p></p>"), None), &resolver);
        assert_eq!(content, RenderedContent::Markup(String::new()));
    }

    #[test]
    fn test_plain_fallbacks() {
        let resolver = ResourceResolver::new(NoResources);
        let (legacy, _) = resolve_content(&message(Some("a < b"), Some(""), None), &resolver);
        assert_eq!(legacy, RenderedContent::Plain("a < b".to_string()));

        let (supplemental, _) = resolve_content(&message(None, None, Some("invite")), &resolver);
        assert_eq!(supplemental.as_str(), "invite");

        let (empty, _) = resolve_content(&message(None, None, None), &resolver);
        assert_eq!(empty.as_str(), "");
    }
}
