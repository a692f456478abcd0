//! Rich-text description trees as delivered by the tracker, and their
//! flattening into plain text.
//!
//! Flattening walks the tree depth-first in document order with an explicit
//! stack. A `text` node contributes its literal text, a `paragraph` node
//! contributes its children followed by a newline, and every other node type
//! contributes only its children. Nothing in here fails: shapes that do not
//! match are skipped and the rest of the tree is still read.

use serde::Deserialize;
use serde_json::Value;

/// Nodes nested deeper than this are skipped along with their subtrees.
pub const MAX_DEPTH: usize = 512;

/// Raw trees whose JSON nesting exceeds this are not parsed. Every node
/// within `MAX_DEPTH` sits inside an object and a `content` array per level,
/// plus room for `marks`/`attrs` on the innermost node.
pub const MAX_JSON_DEPTH: usize = 2 * MAX_DEPTH + 8;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RichDocumentNode {
    #[serde(rename = "type", default)]
    pub node_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub content: Option<Vec<RichDocumentNode>>,
}

impl RichDocumentNode {
    pub fn new(node_type: &str, content: Vec<RichDocumentNode>) -> Self {
        Self {
            node_type: node_type.to_string(),
            text: None,
            content: Some(content),
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            node_type: "text".to_string(),
            text: Some(text.to_string()),
            content: None,
        }
    }

    pub fn paragraph(content: Vec<RichDocumentNode>) -> Self {
        Self::new("paragraph", content)
    }

    pub fn document(content: Vec<RichDocumentNode>) -> Self {
        Self::new("doc", content)
    }
}

trait DocumentTree: Sized {
    fn node_type(&self) -> Option<&str>;
    fn literal(&self) -> Option<&str>;
    fn children(&self) -> Option<&[Self]>;
}

impl DocumentTree for RichDocumentNode {
    fn node_type(&self) -> Option<&str> {
        Some(self.node_type.as_str())
    }

    fn literal(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn children(&self) -> Option<&[Self]> {
        self.content.as_deref()
    }
}

impl DocumentTree for Value {
    fn node_type(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    fn literal(&self) -> Option<&str> {
        self.get("text").and_then(Value::as_str)
    }

    fn children(&self) -> Option<&[Self]> {
        self.get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }
}

/// Flattens a typed document tree. An absent tree flattens to `""`.
pub fn flatten(node: Option<&RichDocumentNode>) -> String {
    node.map(walk).unwrap_or_default()
}

/// Flattens a raw JSON document tree without requiring it to match the
/// typed schema. `null` and non-object values flatten to `""`.
pub fn flatten_value(value: &Value) -> String {
    walk(value)
}

/// Parses raw document JSON without serde_json's recursion limit.
/// Returns `Ok(None)` when the nesting is deeper than [`MAX_JSON_DEPTH`].
pub fn parse_tree(raw: &str) -> serde_json::Result<Option<Value>> {
    if json_depth(raw) > MAX_JSON_DEPTH {
        return Ok(None);
    }

    let mut deserializer = serde_json::Deserializer::from_str(raw);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
    deserializer.end()?;
    Ok(Some(value))
}

/// Deepest bracket nesting in `raw`, ignoring brackets inside strings.
fn json_depth(raw: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in raw.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

enum Step<'a, N> {
    Visit(&'a N, usize),
    Newline,
}

fn walk<N: DocumentTree>(root: &N) -> String {
    let mut output = String::new();
    let mut stack = vec![Step::Visit(root, 0)];

    while let Some(step) = stack.pop() {
        let (node, depth) = match step {
            Step::Newline => {
                output.push('\n');
                continue;
            }
            Step::Visit(node, depth) => (node, depth),
        };

        if depth > MAX_DEPTH {
            continue;
        }

        match node.node_type() {
            Some("text") => {
                if let Some(text) = node.literal() {
                    output.push_str(text);
                }
                continue;
            }
            Some("paragraph") => stack.push(Step::Newline),
            _ => {}
        }

        // Pushed in reverse so the leftmost child is popped first.
        if let Some(children) = node.children() {
            for child in children.iter().rev() {
                stack.push(Step::Visit(child, depth + 1));
            }
        }
    }

    output
}
