use std::io::Write;

use anyhow::{Context, Result};
use colored::{Color, Colorize};

use crate::core::VerifierOptions;

/// Severity class of a summary block; picks its color.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryClass {
    Clean,
    Warnings,
    Failures,
}

/// Renders report lines into the injected sink, styling each line by
/// its role when color is enabled. One formatter serves the whole run;
/// deciding *whether* a line appears is the reporter's job.
pub struct Formatter<W: Write> {
    options: VerifierOptions,
    out: W,
}

impl<W: Write> Formatter<W> {
    pub fn new(options: VerifierOptions, out: W) -> Self {
        Self { options, out }
    }

    /// Structural lines: path headers and fingerprint names.
    pub fn status(&mut self, text: &str) -> Result<()> {
        let line = if self.options.color {
            text.bold().to_string()
        } else {
            text.to_string()
        };
        self.line(&line)
    }

    pub fn success(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Green);
        self.line(&line)
    }

    pub fn warning(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Yellow);
        self.line(&line)
    }

    pub fn failure(&mut self, text: &str) -> Result<()> {
        let line = self.paint(text, Color::Red);
        self.line(&line)
    }

    pub fn summary(&mut self, text: &str, class: SummaryClass) -> Result<()> {
        let color = match class {
            SummaryClass::Clean => Color::Green,
            SummaryClass::Warnings => Color::Yellow,
            SummaryClass::Failures => Color::Red,
        };
        let line = self.paint(text, color);
        self.line(&line)
    }

    /// Blank separator line.
    pub fn blank(&mut self) -> Result<()> {
        self.line("")
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.options.color {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn line(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{text}").context("writing report line")
    }
}
