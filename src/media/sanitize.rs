pub fn sanitize_stem(label: &str, fallback: &str) -> String {
    let kept: String = label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ' '))
        .collect();
    let stem = kept.trim_matches(' ').replace(' ', "_");
    if stem.is_empty() {
        fallback.to_string()
    } else {
        stem
    }
}
