//! Single-line progress bar for the batch.
//!
//! Drawn in place with carriage returns, one advance per document. The bar
//! is only drawn when enabled (stdout is a terminal), so piped output stays
//! clean, and it is blanked before any code frame is printed.

use std::io::{self, Write};

const BAR_WIDTH: usize = 20;

pub struct ProgressBar<W: Write> {
    out: W,
    total: usize,
    current: usize,
    enabled: bool,
    drawn_width: usize,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W, total: usize, enabled: bool) -> Self {
        Self {
            out,
            total,
            current: 0,
            enabled,
            drawn_width: 0,
        }
    }

    /// Advances by one document and redraws.
    pub fn tick(&mut self) -> io::Result<()> {
        self.current = (self.current + 1).min(self.total);
        self.draw()
    }

    pub fn draw(&mut self) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let filled = if self.total == 0 {
            BAR_WIDTH
        } else {
            self.current * BAR_WIDTH / self.total
        };
        let line = format!(
            "checking [{}{}] {}/{}",
            "=".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            self.current,
            self.total
        );
        self.drawn_width = line.len();
        write!(self.out, "\r{line}")?;
        self.out.flush()
    }

    /// Blanks the bar line so regular output can be printed.
    pub fn clear(&mut self) -> io::Result<()> {
        if !self.enabled || self.drawn_width == 0 {
            return Ok(());
        }
        write!(self.out, "\r{}\r", " ".repeat(self.drawn_width))?;
        self.drawn_width = 0;
        self.out.flush()
    }

    /// Erases the bar once the batch completes.
    pub fn finish(&mut self) -> io::Result<()> {
        self.clear()
    }
}
