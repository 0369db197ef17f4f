use std::fmt::Write;

use crate::{Annotation, CharClass};

/// Render the text the `qieyun` binary prints to stdout.
///
/// Verbose mode echoes the raw input and adds one line per character; both
/// modes end with the `IPA:` line.
pub fn render_report(
    raw: &str,
    converted: &str,
    annotation: &Annotation,
    verbose: bool,
) -> String {
    let mut out = String::new();

    if verbose {
        push_line(&mut out, "输入: ", raw);
        push_line(&mut out, "繁体: ", converted);
        out.push_str("\n逐字对照:\n");
        for entry in &annotation.entries {
            let label = match &entry.class {
                CharClass::Han { display } => display.as_str(),
                CharClass::Punctuation => "[标点]",
                CharClass::Other => "[非汉字]",
            };
            let _ = writeln!(out, "  {}   -> {}", entry.ch, label);
        }
    } else {
        push_line(&mut out, "繁体: ", converted);
    }
    let _ = writeln!(out, "IPA:  {}", annotation.ipa);

    out
}

/// `label` + `text`, adding a newline only if `text` lacks one.
fn push_line(out: &mut String, label: &str, text: &str) {
    out.push_str(label);
    out.push_str(text);
    if !text.ends_with('\n') {
        out.push('\n');
    }
}
