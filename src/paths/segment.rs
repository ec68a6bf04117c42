//! Leaf-level segment resolution: one page in, one cleaned path component out.
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::{config::SlugCase, config::SlugOptions, properties::PageNode};

/// Normalizes arbitrary text into a URL-safe path segment.
pub trait SlugCleaner: Sync {
    fn clean(&self, text: &str, options: &SlugOptions) -> String;
}

/// Default [SlugCleaner].
///
/// Words are runs of alphanumeric characters; everything between words collapses into a single
/// separator, and the result never starts or ends with one.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorCleaner;

impl SlugCleaner for AnchorCleaner {
    fn clean(&self, text: &str, options: &SlugOptions) -> String {
        let mut working = text.to_string();
        if !options.strip_chars.is_empty() {
            working.retain(|c| !options.strip_chars.contains(c));
        }

        if options.transliterate {
            working = working
                .nfkd()
                .filter(|c| !is_combining_mark(*c))
                .filter_map(|c| match c {
                    c if c.is_ascii() => Some(c),
                    c if c.is_alphanumeric() => None,
                    _ => Some(' '),
                })
                .collect();
        }

        match options.ignore_words_regex() {
            Ok(Some(re)) => working = re.replace_all(&working, " ").into_owned(),
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring invalid ignore_words pattern: {e}"),
        }

        let cased = match options.case {
            SlugCase::Lower => working.to_lowercase(),
            SlugCase::Upper => working.to_uppercase(),
            SlugCase::Title => titlecase::titlecase(&working),
            SlugCase::Preserve => working,
        };

        let separator = options.separator.to_string();
        let slug = cased
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(&separator);

        truncate_at_boundary(slug, options.max_length, options.separator)
    }
}

/// Cut `slug` to at most `max` characters, backing up to the last separator when the cut would
/// split a word. A single over-long word is cut hard.
fn truncate_at_boundary(slug: String, max: usize, separator: char) -> String {
    if max == 0 || slug.chars().count() <= max {
        return slug;
    }
    let head: String = slug.chars().take(max).collect();
    let cut = if slug.chars().nth(max) == Some(separator) {
        head
    } else {
        match head.rfind(separator) {
            Some(idx) if idx > 0 => head[..idx].to_string(),
            _ => head,
        }
    };
    cut.trim_end_matches(separator).to_string()
}

/// Produces the path segment for a single page, with no knowledge of its ancestors.
#[derive(Clone, Copy)]
pub struct SegmentResolver<'a> {
    cleaner: &'a dyn SlugCleaner,
}

impl<'a> SegmentResolver<'a> {
    pub fn new(cleaner: &'a dyn SlugCleaner) -> Self {
        SegmentResolver { cleaner }
    }

    /// The cleaned segment override when the page carries a non-blank one, otherwise the cleaned
    /// title. An absent page yields the empty segment.
    pub fn resolve_segment(&self, node: Option<&PageNode>, options: &SlugOptions) -> String {
        let Some(node) = node else {
            return String::new();
        };
        let text = node.effective_override().unwrap_or(&node.title);
        self.cleaner.clean(text, options)
    }
}
