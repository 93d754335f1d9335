use crate::media::scanner::{Occurrence, OccurrenceKind, media_tag_parts, replace_title};

fn title_attribute(label: &str) -> String {
    if label.contains('"') {
        format!("title='{label}'")
    } else {
        format!("title=\"{label}\"")
    }
}

fn insert_title(tag: &str, title_attr: &str) -> String {
    let body = tag.strip_suffix('>').unwrap_or(tag);
    match body.strip_suffix('/') {
        Some(open) => format!("{} {title_attr} />", open.trim_end()),
        None => format!("{body} {title_attr}>"),
    }
}

fn rewrite_media_tag(occ: &Occurrence<'_>, path: &str, label: &str) -> String {
    let Some((name, before, after)) = media_tag_parts(occ.text) else {
        return occ.text.to_string();
    };
    let tag = format!("<{name}{before}src=\"{path}\"{after}>");
    let title_attr = title_attribute(label);
    replace_title(&tag, &title_attr).unwrap_or_else(|| insert_title(&tag, &title_attr))
}

/// Canonical text for an occurrence pointing at `path` with display `label`.
pub fn render(occ: &Occurrence<'_>, path: &str, label: &str) -> String {
    match &occ.kind {
        OccurrenceKind::Image => format!("![{label}]({path})"),
        OccurrenceKind::MediaTag { .. } => rewrite_media_tag(occ, path, label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::scanner::scan;

    fn render_first(text: &str, path: &str, label: &str) -> String {
        let occurrences = scan(text);
        render(&occurrences[0], path, label)
    }

    #[test]
    fn image_is_rendered_with_label_and_path() {
        assert_eq!(
            render_first("![Old](<a b.png>)", "media/New.png", "New"),
            "![New](media/New.png)"
        );
    }

    #[test]
    fn media_tag_src_and_title_are_replaced() {
        let out = render_first(
            r#"<video controls src='clips/a.mp4' TITLE="Intro">"#,
            "media/Intro.mp4",
            "Intro",
        );
        assert_eq!(out, r#"<video controls src="media/Intro.mp4" title="Intro">"#);
    }

    #[test]
    fn media_tag_without_title_gains_one() {
        let out = render_first(r#"<audio src="bell.mp3">"#, "media/bell.mp3", "bell");
        assert_eq!(out, r#"<audio src="media/bell.mp3" title="bell">"#);

        let out = render_first(r#"<audio src="bell.mp3" />"#, "media/bell.mp3", "bell");
        assert_eq!(out, r#"<audio src="media/bell.mp3" title="bell" />"#);
    }

    #[test]
    fn label_with_double_quote_uses_single_quotes() {
        let out = render_first(r#"<audio src="a.mp3">"#, "media/a.mp3", r#"say "hi""#);
        assert_eq!(out, r#"<audio src="media/a.mp3" title='say "hi"'>"#);
    }

    #[test]
    fn mixed_quote_title_is_replaced_whole() {
        let text = r#"<audio src="a.mp3" title='say "it"'>"#;
        let occurrences = scan(text);
        let label = occurrences[0].label.clone();
        let out = render(&occurrences[0], "media/say_it.mp3", &label);
        assert_eq!(out, r#"<audio src="media/say_it.mp3" title='say "it"'>"#);
        assert_eq!(render_first(&out, "media/say_it.mp3", &label), out);
    }

    #[test]
    fn rendering_canonical_text_is_stable() {
        let canonical = r#"<audio src="media/bell.mp3" title="bell">"#;
        assert_eq!(render_first(canonical, "media/bell.mp3", "bell"), canonical);
        assert_eq!(
            render_first("![Cat](media/Cat.png)", "media/Cat.png", "Cat"),
            "![Cat](media/Cat.png)"
        );
    }
}
