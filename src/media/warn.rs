use crate::error::WarnCode;
use crate::logging::format_record;

#[derive(Debug, Clone, Copy)]
pub struct WarnEvent<'a> {
    pub code: WarnCode,
    pub stage: &'a str,
    pub action: &'a str,
    pub document: &'a str,
    pub reference: &'a str,
    pub reason: &'a str,
    pub err: &'a str,
}

pub fn render(event: &WarnEvent<'_>) -> String {
    format_record(
        "MEW_WARN",
        &[
            ("code", event.code.as_str()),
            ("stage", event.stage),
            ("action", event.action),
            ("document", event.document),
            ("reference", event.reference),
            ("reason", event.reason),
            ("err", event.err),
        ],
    )
}

pub fn emit(event: WarnEvent<'_>) {
    eprintln!("{}", render(&event));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_uses_stable_code_and_sanitized_values() {
        let line = render(&WarnEvent {
            code: WarnCode::W001SourceMissing,
            stage: "first-pass",
            action: "resolve",
            document: "notes.md",
            reference: "my pic.png",
            reason: "not-found",
            err: "",
        });
        assert_eq!(
            line,
            "MEW_WARN code=W001_SOURCE_MISSING stage=first-pass action=resolve document=notes.md reference=my_pic.png reason=not-found err=na"
        );
    }
}
