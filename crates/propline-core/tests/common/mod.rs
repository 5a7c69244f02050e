use propline_core::Document;

/// Build a document from unescaped target and reference lines
#[allow(dead_code)]
pub fn document(target: &[&str], reference: &[&str]) -> Document {
    Document::from_texts(&join(target), &join(reference))
}

/// Join lines into newline-terminated text
#[allow(dead_code)]
pub fn join(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}
