use crate::model::EtymologyBlock;

/// Characters that open a list line in generated etymology text.
pub const LIST_MARKERS: &[char] = &['-', '\u{2022}', '*'];

/// Splits freeform etymology text into paragraph and list-item blocks.
///
/// Blank lines are dropped, every other line becomes exactly one block in
/// input order. A trimmed line starting with one of [`LIST_MARKERS`] becomes a
/// list item with the marker and the whitespace after it removed.
pub fn format_etymology(text: &str) -> Vec<EtymologyBlock> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(classify_line)
        .collect()
}

fn classify_line(line: &str) -> EtymologyBlock {
    match line.strip_prefix(LIST_MARKERS) {
        Some(rest) => EtymologyBlock::ListItem(rest.trim_start().to_string()),
        None => EtymologyBlock::Paragraph(line.to_string()),
    }
}

/// Renders blocks back into a markdown-flavoured string for terminal output.
pub fn blocks_to_markdown(blocks: &[EtymologyBlock]) -> String {
    let mut out = String::new();
    let mut previous_was_item = false;
    for block in blocks {
        match block {
            EtymologyBlock::Paragraph(text) => {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(text);
                out.push('\n');
                previous_was_item = false;
            }
            EtymologyBlock::ListItem(text) => {
                if !out.is_empty() && !previous_was_item {
                    out.push('\n');
                }
                out.push_str("* ");
                out.push_str(text);
                out.push('\n');
                previous_was_item = true;
            }
        }
    }
    out
}
