//! Lightweight message markup.
//!
//! Not a markdown parser: four regex passes applied in a fixed order over the
//! whole message. Line breaks first, then `**bold**`, then `*italic*`, then
//! `` `code` ``. Every match of a pass is substituted. Text that an earlier
//! pass already styled is not scanned again, so nested or overlapping markers
//! come out best-effort.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\*\*(.*?)\*\*").expect("bold regex"));
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\*(.*?)\*").expect("italic regex"));
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)`(.*?)`").expect("code regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Bold,
    Italic,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub emphasis: Emphasis,
    pub text: String,
}

impl Fragment {
    pub fn new(emphasis: Emphasis, text: impl Into<String>) -> Self {
        Self {
            emphasis,
            text: text.into(),
        }
    }
}

/// One rendered line: fragments laid out left to right.
pub type FormattedLine = Vec<Fragment>;

/// Format message text into styled lines.
pub fn format(text: &str) -> Vec<FormattedLine> {
    let mut fragments = vec![Fragment::new(Emphasis::Plain, text)];
    for (pattern, emphasis) in [
        (&*BOLD, Emphasis::Bold),
        (&*ITALIC, Emphasis::Italic),
        (&*CODE, Emphasis::Code),
    ] {
        fragments = substitute(fragments, pattern, emphasis);
    }
    break_lines(fragments)
}

/// Concatenate the visible text of formatted lines, markers removed.
pub fn plain_text(lines: &[FormattedLine]) -> String {
    lines
        .iter()
        .map(|line| line.iter().map(|f| f.text.as_str()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split every plain fragment on `pattern`, styling the first capture group.
fn substitute(fragments: Vec<Fragment>, pattern: &Regex, emphasis: Emphasis) -> Vec<Fragment> {
    let mut out = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        if fragment.emphasis != Emphasis::Plain {
            out.push(fragment);
            continue;
        }

        let mut last = 0;
        for caps in pattern.captures_iter(&fragment.text) {
            let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            push_nonempty(&mut out, Emphasis::Plain, &fragment.text[last..whole.start()]);
            push_nonempty(&mut out, emphasis, inner.as_str());
            last = whole.end();
        }
        push_nonempty(&mut out, Emphasis::Plain, &fragment.text[last..]);
    }
    out
}

fn push_nonempty(out: &mut Vec<Fragment>, emphasis: Emphasis, text: &str) {
    if !text.is_empty() {
        out.push(Fragment::new(emphasis, text));
    }
}

/// Newline → line break. A styled span that crosses a newline keeps its
/// emphasis on both lines.
fn break_lines(fragments: Vec<Fragment>) -> Vec<FormattedLine> {
    let mut lines: Vec<FormattedLine> = vec![Vec::new()];
    for fragment in fragments {
        for (i, piece) in fragment.text.split('\n').enumerate() {
            if i > 0 {
                lines.push(Vec::new());
            }
            if !piece.is_empty()
                && let Some(line) = lines.last_mut()
            {
                line.push(Fragment::new(fragment.emphasis, piece));
            }
        }
    }
    lines
}
