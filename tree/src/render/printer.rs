use chrono::{DateTime, Utc};
use std::convert::Infallible;
use std::io::{self, Write};

use super::walk;
use crate::core::{Node, Tree};

/// Writes a [`Tree`] as connector-drawn text, one line per branch
pub struct Printer<W: Write> {
    output: W,
    now: DateTime<Utc>,
}

impl<W: Write> Printer<W> {
    pub fn new(output: W) -> Self {
        Self {
            output,
            now: Utc::now(),
        }
    }

    /// Reference time for relative ages
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Print the forest. An empty tree prints nothing.
    pub fn print(&mut self, tree: &Tree) -> io::Result<()> {
        let output = &mut self.output;
        walk(tree, self.now, &mut |_: &Node, line: String| writeln!(output, "{line}"))
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

/// Render a tree into a single text block
pub fn render_to_string(tree: &Tree, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let result: Result<(), Infallible> = walk(tree, now, &mut |_: &Node, line: String| {
        out.push_str(&line);
        out.push('\n');
        Ok(())
    });
    match result {
        Ok(()) => out,
        Err(never) => match never {},
    }
}
