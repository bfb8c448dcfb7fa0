//! Drawing operations and their TikZ serialization.

use super::number::format_number;
use crate::domain::{OptionValue, StyleOptions};

/// Page corner an overlay is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// TikZ anchor name, used both for the node anchor and the page anchor.
    pub fn anchor(self) -> &'static str {
        match self {
            Corner::TopLeft => "north west",
            Corner::TopRight => "north east",
            Corner::BottomLeft => "south west",
            Corner::BottomRight => "south east",
        }
    }
}

/// One drawing instruction.
///
/// `Point`, `PathLine`, `PathLineLabeled` and `Node` are path elements and
/// belong inside a `PathBlock`; `PathBlock` and `Overlay` are complete
/// statements.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawingOp {
    /// A coordinate on the current path.
    Point { x: f64, y: f64 },
    /// A straight segment to the next point.
    PathLine,
    /// A segment to the next point carrying a label.
    PathLineLabeled { text: String, options: StyleOptions },
    /// A label at the previous point.
    Node { text: String, options: StyleOptions },
    /// A `\draw` statement over the given path elements.
    PathBlock {
        ops: Vec<DrawingOp>,
        options: StyleOptions,
    },
    /// Text pinned to a corner of the physical page.
    Overlay {
        text: String,
        corner: Corner,
        options: StyleOptions,
    },
}

impl DrawingOp {
    pub fn point(x: f64, y: f64) -> Self {
        DrawingOp::Point { x, y }
    }

    pub fn node(text: impl Into<String>, options: StyleOptions) -> Self {
        DrawingOp::Node {
            text: text.into(),
            options,
        }
    }

    pub fn labeled_line(text: impl Into<String>, options: StyleOptions) -> Self {
        DrawingOp::PathLineLabeled {
            text: text.into(),
            options,
        }
    }

    pub fn block(ops: Vec<DrawingOp>, options: StyleOptions) -> Self {
        DrawingOp::PathBlock { ops, options }
    }
}

/// Serialize a sequence of operations.
///
/// # Examples
///
/// ```
/// use bildfahrplan::domain::StyleOptions;
/// use bildfahrplan::tikz::{DrawingOp, render};
///
/// let line = DrawingOp::block(
///     vec![DrawingOp::point(0.0, 0.0), DrawingOp::PathLine, DrawingOp::point(1.0, -2.0)],
///     StyleOptions::new().flag("gray"),
/// );
/// assert_eq!(
///     render(&[line]),
///     "\\draw[gray]\n(0.00000,0.00000)\n--\n(1.00000,-2.00000)\n;\n\n"
/// );
/// ```
pub fn render(ops: &[DrawingOp]) -> String {
    let mut out = String::new();
    for op in ops {
        write_op(&mut out, op);
    }
    out
}

/// Serialize the operations of one page as a self-contained picture.
pub fn render_page(ops: &[DrawingOp]) -> String {
    format!(
        "\\noindent\n\\begin{{tikzpicture}}[remember picture]\n\
         {}\\end{{tikzpicture}}\n\\clearpage\n\n",
        render(ops)
    )
}

fn write_op(out: &mut String, op: &DrawingOp) {
    match op {
        DrawingOp::Point { x, y } => {
            out.push_str(&format!("({},{})\n", format_number(*x), format_number(*y)));
        }
        DrawingOp::PathLine => out.push_str("--\n"),
        DrawingOp::PathLineLabeled { text, options } => {
            out.push_str("to ");
            write_node(out, text, options);
        }
        DrawingOp::Node { text, options } => write_node(out, text, options),
        DrawingOp::PathBlock { ops, options } => {
            out.push_str(&format!("\\draw[{}]\n", option_list(options)));
            for inner in ops {
                write_op(out, inner);
            }
            out.push_str(";\n\n");
        }
        DrawingOp::Overlay {
            text,
            corner,
            options,
        } => {
            let anchor = corner.anchor();
            let base = StyleOptions::new()
                .flag("overlay")
                .value("anchor", anchor);
            out.push_str(&format!(
                "\\node[{}] at (current page.{anchor}) {{{}}};\n\n",
                option_list(&base.merged(options)),
                escape(text)
            ));
        }
    }
}

fn write_node(out: &mut String, text: &str, options: &StyleOptions) {
    out.push_str(&format!("node[{}]{{{}}}\n", option_list(options), escape(text)));
}

/// Comma-separated option list; switched-off options are left out.
fn option_list(options: &StyleOptions) -> String {
    options
        .iter()
        .filter_map(|(key, value)| match value {
            OptionValue::Flag => Some(key.to_string()),
            OptionValue::Value(v) => Some(format!("{key}={v}")),
            OptionValue::Off => None,
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Escape characters with a special meaning in TeX text.
///
/// # Examples
///
/// ```
/// use bildfahrplan::tikz::escape;
///
/// assert_eq!(escape("S 1 & S 2"), "S 1 \\& S 2");
/// assert_eq!(escape("50%"), "50\\%");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' | '}' | '$' | '&' | '#' | '%' | '_' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}
