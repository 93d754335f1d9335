use regex::{Captures, Regex};
use std::ops::Range;
use std::path::Path;
use std::sync::LazyLock;

static IMAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image regex"));

static MEDIA_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<(audio|video)([^>]*)src=["'](.*?)["']([^>]*)>"#).expect("media tag regex")
});

static TITLE_ATTR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(^|\s)title=(?:"([^"]*)"|'([^']*)')"#).expect("title attr regex")
});

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "data:", "file://"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Video => "video",
        }
    }

    fn parse(tag: &str) -> Self {
        if tag.eq_ignore_ascii_case("audio") {
            Self::Audio
        } else {
            Self::Video
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OccurrenceKind {
    Image,
    MediaTag {
        kind: MediaKind,
        title: Option<String>,
    },
}

/// One embedded media reference, borrowed from the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence<'a> {
    pub kind: OccurrenceKind,
    pub label: String,
    pub raw_path: &'a str,
    pub span: Range<usize>,
    pub text: &'a str,
}

impl Occurrence<'_> {
    pub fn is_remote(&self) -> bool {
        is_remote(self.raw_path)
    }

    /// Stem used when the label sanitizes to nothing.
    pub fn fallback_stem(&self) -> &'static str {
        self.kind_name()
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            OccurrenceKind::Image => "image",
            OccurrenceKind::MediaTag { kind, .. } => kind.as_str(),
        }
    }
}

pub fn is_remote(raw_path: &str) -> bool {
    let trimmed = raw_path
        .trim()
        .trim_start_matches('<')
        .trim_start()
        .to_ascii_lowercase();
    REMOTE_PREFIXES
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}

pub fn title_attribute(attrs: &str) -> Option<String> {
    TITLE_ATTR_REGEX
        .captures(attrs)
        .and_then(|cap| cap.get(2).or_else(|| cap.get(3)))
        .map(|m| m.as_str().to_string())
}

fn stem_of(raw_path: &str) -> String {
    let normalized = raw_path.trim().replace('\\', "/");
    let normalized = normalized.trim_matches(|c| c == '<' || c == '>');
    Path::new(normalized)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

fn image_from_captures<'a>(text: &'a str, cap: Captures<'a>) -> Option<Occurrence<'a>> {
    let whole = cap.get(0)?;
    let label = cap.get(1)?.as_str().to_string();
    let raw_path = cap.get(2)?.as_str();
    Some(Occurrence {
        kind: OccurrenceKind::Image,
        label,
        raw_path,
        span: whole.range(),
        text: &text[whole.range()],
    })
}

fn media_tag_from_captures<'a>(text: &'a str, cap: Captures<'a>) -> Option<Occurrence<'a>> {
    let whole = cap.get(0)?;
    let kind = MediaKind::parse(cap.get(1)?.as_str());
    let before = cap.get(2).map_or("", |m| m.as_str());
    let raw_path = cap.get(3)?.as_str();
    let after = cap.get(4).map_or("", |m| m.as_str());
    let title = title_attribute(&format!("{before}{after}"));
    let label = title.clone().unwrap_or_else(|| stem_of(raw_path));
    Some(Occurrence {
        kind: OccurrenceKind::MediaTag { kind, title },
        label,
        raw_path,
        span: whole.range(),
        text: &text[whole.range()],
    })
}

/// Pieces of a matched media tag around its `src` attribute: tag name, text before, text after.
pub fn media_tag_parts(tag_text: &str) -> Option<(&str, &str, &str)> {
    let cap = MEDIA_TAG_REGEX.captures(tag_text)?;
    let name = cap.get(1)?.as_str();
    let before = cap.get(2).map_or("", |m| m.as_str());
    let after = cap.get(4).map_or("", |m| m.as_str());
    Some((name, before, after))
}

pub fn replace_title(tag_text: &str, title_attr: &str) -> Option<String> {
    if !TITLE_ATTR_REGEX.is_match(tag_text) {
        return None;
    }
    Some(
        TITLE_ATTR_REGEX
            .replace_all(tag_text, |cap: &Captures<'_>| format!("{}{title_attr}", &cap[1]))
            .into_owned(),
    )
}

pub fn scan_images(text: &str) -> impl Iterator<Item = Occurrence<'_>> + '_ {
    IMAGE_REGEX
        .captures_iter(text)
        .filter_map(move |cap| image_from_captures(text, cap))
}

pub fn scan_media_tags(text: &str) -> impl Iterator<Item = Occurrence<'_>> + '_ {
    MEDIA_TAG_REGEX
        .captures_iter(text)
        .filter_map(move |cap| media_tag_from_captures(text, cap))
}

/// Both syntaxes merged in document order; a match overlapping an earlier one is dropped.
pub fn scan(text: &str) -> Vec<Occurrence<'_>> {
    let mut all: Vec<Occurrence<'_>> = scan_images(text).chain(scan_media_tags(text)).collect();
    all.sort_by_key(|occ| occ.span.start);

    let mut out: Vec<Occurrence<'_>> = Vec::with_capacity(all.len());
    for occ in all {
        if out.last().is_some_and(|prev| occ.span.start < prev.span.end) {
            continue;
        }
        out.push(occ);
    }
    out
}

/// Rebuilds `text` with each occurrence span replaced by `replace(occ)`, when it returns `Some`.
pub fn substitute<'a, F>(text: &'a str, occurrences: &[Occurrence<'a>], mut replace: F) -> String
where
    F: FnMut(&Occurrence<'a>) -> Option<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for occ in occurrences {
        out.push_str(&text[cursor..occ.span.start]);
        match replace(occ) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push_str(occ.text),
        }
        cursor = occ.span.end;
    }
    out.push_str(&text[cursor..]);
    out
}
