use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn init(verbose_flag: bool) {
    let from_env = matches!(
        env::var("MEW_VERBOSE").as_deref().map(str::trim),
        Ok("1" | "true" | "TRUE" | "yes" | "on")
    );
    VERBOSE.store(verbose_flag || from_env, Ordering::Relaxed);
}

pub fn verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

pub(crate) fn sanitize_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_sep = false;
    for ch in value.chars() {
        if ch.is_whitespace() {
            if !out.is_empty() && !prev_sep {
                out.push('_');
                prev_sep = true;
            }
        } else if !ch.is_control() {
            out.push(ch);
            prev_sep = false;
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        "na".to_string()
    } else {
        trimmed.to_string()
    }
}

pub(crate) fn format_record(tag: &str, fields: &[(&str, &str)]) -> String {
    let mut line = String::from(tag);
    for (key, value) in fields {
        line.push(' ');
        line.push_str(key);
        line.push('=');
        line.push_str(&sanitize_value(value));
    }
    line
}

pub fn info(event: &str, fields: &[(&str, &str)]) {
    if !verbose() {
        return;
    }
    let mut all = Vec::with_capacity(fields.len() + 1);
    all.push(("event", event));
    all.extend_from_slice(fields);
    eprintln!("{}", format_record("MEW_INFO", &all));
}
