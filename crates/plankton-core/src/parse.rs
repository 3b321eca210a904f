use crate::error::{Error, Result};
use crate::expr;
use crate::node::PlanNode;
use crate::ParseOptions;

/// Parses indented physical-plan text into an operator tree.
///
/// One operator per line, `OperatorName` or `OperatorName: annotation`,
/// nested two spaces per level. Returns `Ok(None)` for blank input. Lenient
/// mode attaches over-indented lines to the deepest open node and ignores
/// anything after the first root-level tree; strict mode rejects both, plus
/// tab indentation.
pub fn parse_plan(text: &str, options: ParseOptions) -> Result<Option<PlanNode>> {
    let mut stack: Vec<PlanNode> = Vec::new();
    let mut root: Option<PlanNode> = None;
    // In lenient mode, depth below which dangling content is being skipped.
    let mut skipping_at: Option<usize> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let (depth, rest) = indentation(raw, line_no, options.strict)?;
        let Some(node) = parse_line(rest) else {
            continue;
        };

        if let Some(limit) = skipping_at {
            if depth >= limit {
                continue;
            }
            skipping_at = None;
        }

        let depth = if depth > stack.len() {
            if options.strict {
                return Err(Error::IndentationJump {
                    line: line_no,
                    indent: depth,
                    open: stack.len(),
                });
            }
            stack.len()
        } else {
            depth
        };

        while stack.len() > depth {
            if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => parent.children.push(done),
                    None => root = Some(done),
                }
            }
        }

        if stack.is_empty() && root.is_some() {
            if options.strict {
                return Err(Error::DanglingLine { line: line_no });
            }
            tracing::debug!(line = line_no, "ignoring content after first plan tree");
            skipping_at = Some(depth);
            continue;
        }

        stack.push(node);
    }

    while let Some(done) = stack.pop() {
        match stack.last_mut() {
            Some(parent) => parent.children.push(done),
            None => root = Some(done),
        }
    }

    Ok(root)
}

/// Leading-whitespace depth, two spaces per level. Tabs count as one level in
/// lenient mode and are rejected in strict mode.
fn indentation(line: &str, line_no: usize, strict: bool) -> Result<(usize, &str)> {
    let mut spaces = 0usize;
    let mut offset = 0usize;
    for c in line.chars() {
        match c {
            ' ' => spaces += 1,
            '\t' => {
                if strict {
                    return Err(Error::TabIndent { line: line_no });
                }
                spaces += 2;
            }
            _ => break,
        }
        offset += c.len_utf8();
    }
    Ok((spaces / 2, &line[offset..]))
}

fn parse_line(rest: &str) -> Option<PlanNode> {
    let rest = rest.trim_end();
    let (head, annotation) = match rest.split_once(':') {
        Some((head, annotation)) => (head.trim(), annotation.trim()),
        None => (rest.trim(), ""),
    };
    if head.is_empty() {
        return None;
    }

    let mut node = PlanNode::new(head);
    for fragment in expr::split_top_level(annotation, ',') {
        match expr::key_value(fragment) {
            Some((key, value)) => {
                node.properties.insert(key.to_string(), value.to_string());
            }
            None => {
                node.properties.insert(fragment.to_string(), String::new());
            }
        }
    }
    Some(node)
}
