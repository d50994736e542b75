//! Markdown-subset renderer for analysis report text.
//!
//! Stateless, pure transform from the constrained dialect the analysis
//! collaborator emits into structured [`MarkupNode`]s. Constructs are applied
//! in a fixed precedence order: `***…***` highlight callouts first, then
//! `**…**` bold, then `- ` list items, then leading `N. ` numbered blocks;
//! every remaining newline becomes a line break. Input is trusted local or
//! collaborator text; escaping happens only at HTML serialization.

use shared::{InlineNode, MarkupNode, RenderedDocument};

/// Render constrained markdown into a structured document.
pub fn render(text: &str) -> RenderedDocument {
    let mut nodes = Vec::new();
    for (i, segment) in text.split("***").enumerate() {
        if i % 2 == 1 {
            // Odd segments sit between triple-asterisk markers. An
            // unterminated marker highlights the remainder of the text.
            let callout = segment.trim();
            if !callout.is_empty() {
                nodes.push(MarkupNode::Callout(callout.to_string()));
            }
        } else {
            render_flow(segment, &mut nodes);
        }
    }
    RenderedDocument { nodes }
}

fn render_flow(segment: &str, nodes: &mut Vec<MarkupNode>) {
    for line in segment.lines() {
        if let Some(rest) = line.strip_prefix("- ") {
            nodes.push(MarkupNode::ListItem(parse_inlines(rest)));
        } else if let Some((number, rest)) = parse_numbered(line) {
            nodes.push(MarkupNode::NumberedItem {
                number,
                content: parse_inlines(rest),
            });
        } else {
            nodes.push(MarkupNode::Line(parse_inlines(line)));
        }
    }
}

/// Leading `N. ` pattern: one or more digits, a dot, a space.
fn parse_numbered(line: &str) -> Option<(u32, &str)> {
    let digits_end = line.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let rest = line[digits_end..].strip_prefix(". ")?;
    let number = line[..digits_end].parse().ok()?;
    Some((number, rest))
}

/// Split a line on `**` markers: odd segments are bold, even are plain text.
fn parse_inlines(line: &str) -> Vec<InlineNode> {
    let mut inlines = Vec::new();
    for (i, part) in line.split("**").enumerate() {
        if part.is_empty() {
            continue;
        }
        if i % 2 == 1 {
            inlines.push(InlineNode::Bold(part.to_string()));
        } else {
            inlines.push(InlineNode::Text(part.to_string()));
        }
    }
    inlines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> InlineNode {
        InlineNode::Text(s.to_string())
    }

    fn bold(s: &str) -> InlineNode {
        InlineNode::Bold(s.to_string())
    }

    #[test]
    fn plain_lines_become_line_nodes() {
        let doc = render("first\nsecond");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::Line(vec![text("first")]),
                MarkupNode::Line(vec![text("second")]),
            ]
        );
    }

    #[test]
    fn bold_spans_inside_a_line() {
        let doc = render("take **two** tablets");
        assert_eq!(
            doc.nodes,
            vec![MarkupNode::Line(vec![
                text("take "),
                bold("two"),
                text(" tablets"),
            ])]
        );
    }

    #[test]
    fn dash_lines_become_list_items() {
        let doc = render("- iron **low**\n- vitamin D normal");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::ListItem(vec![text("iron "), bold("low")]),
                MarkupNode::ListItem(vec![text("vitamin D normal")]),
            ]
        );
    }

    #[test]
    fn numbered_prefix_starts_an_emphasized_block() {
        let doc = render("1. Summary of findings\n12. Later point");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::NumberedItem { number: 1, content: vec![text("Summary of findings")] },
                MarkupNode::NumberedItem { number: 12, content: vec![text("Later point")] },
            ]
        );
    }

    #[test]
    fn number_without_dot_space_is_a_plain_line() {
        let doc = render("1.Summary\n2021 was fine");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::Line(vec![text("1.Summary")]),
                MarkupNode::Line(vec![text("2021 was fine")]),
            ]
        );
    }

    #[test]
    fn triple_asterisks_take_precedence_over_bold() {
        let doc = render("before ***Needs review*** after **soon**");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::Line(vec![text("before ")]),
                MarkupNode::Callout("Needs review".to_string()),
                MarkupNode::Line(vec![text(" after "), bold("soon")]),
            ]
        );
    }

    #[test]
    fn unterminated_callout_highlights_the_remainder() {
        let doc = render("note ***everything after");
        assert_eq!(
            doc.nodes,
            vec![
                MarkupNode::Line(vec![text("note ")]),
                MarkupNode::Callout("everything after".to_string()),
            ]
        );
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("").nodes.is_empty());
    }

    #[test]
    fn renders_to_html_end_to_end() {
        let doc = render("***Alert***\n- **fever** noted");
        // The newline after the callout survives as a line break.
        assert_eq!(
            doc.to_html(),
            "<div class=\"callout\">Alert</div><br><ul><li><strong>fever</strong> noted</li></ul>"
        );
    }
}
