//! Report output: report lines, channels, and the sinks they go to.
//!
//! [`ConsoleSink`] writes the normal channel to stdout and the attention
//! channel to stderr, coloring the markers when enabled. [`OutputBuffer`]
//! collects lines for programmatic capture.

use std::fmt;
use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

pub const PASS_MARKER: &str = "✓";
pub const FAIL_MARKER: &str = "✗";

/// Where a report line goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Normal,
    Attention,
}

/// One line of the textual report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLine<'a> {
    Passed(&'a str),
    Failed(&'a str),
    Detail(&'a str),
    Blank,
    Summary {
        total: usize,
        passed: usize,
        failed: usize,
    },
}

impl fmt::Display for ReportLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportLine::Passed(path) => write!(f, "{} {}", PASS_MARKER, path),
            ReportLine::Failed(path) => write!(f, "{} {}", FAIL_MARKER, path),
            ReportLine::Detail(detail) => write!(f, "    {}", detail),
            ReportLine::Blank => Ok(()),
            ReportLine::Summary {
                total,
                passed,
                failed,
            } => write!(f, "Total: {}, Passed: {}, Failed: {}", total, passed, failed),
        }
    }
}

/// Receives report lines from the execution engine.
pub trait ReportSink {
    fn emit(&mut self, channel: Channel, line: &ReportLine<'_>);
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Configuration for report output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub use_colors: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

// ============================================================================
// SINKS
// ============================================================================

/// Writes the report to the terminal.
pub struct ConsoleSink {
    stdout: StandardStream,
    stderr: StandardStream,
}

impl ConsoleSink {
    pub fn new(config: &ReportConfig) -> Self {
        let choice = if config.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        Self {
            stdout: StandardStream::stdout(choice),
            stderr: StandardStream::stderr(choice),
        }
    }
}

impl ReportSink for ConsoleSink {
    fn emit(&mut self, channel: Channel, line: &ReportLine<'_>) {
        let stream = match channel {
            Channel::Normal => &mut self.stdout,
            Channel::Attention => &mut self.stderr,
        };
        // A closed terminal must not fail the run.
        let _ = write_line(stream, line);
    }
}

fn write_line(stream: &mut StandardStream, line: &ReportLine<'_>) -> io::Result<()> {
    match line {
        ReportLine::Passed(path) => write_marked(stream, PASS_MARKER, Color::Green, path),
        ReportLine::Failed(path) => write_marked(stream, FAIL_MARKER, Color::Red, path),
        ReportLine::Summary { failed, .. } => {
            let color = if *failed == 0 { Color::Green } else { Color::Red };
            stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
            write!(stream, "{}", line)?;
            stream.reset()?;
            writeln!(stream)
        }
        _ => writeln!(stream, "{}", line),
    }
}

fn write_marked(
    stream: &mut StandardStream,
    marker: &str,
    color: Color,
    path: &str,
) -> io::Result<()> {
    stream.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(stream, "{}", marker)?;
    stream.reset()?;
    writeln!(stream, " {}", path)
}

/// Collects report lines in memory.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    pub lines: Vec<(Channel, String)>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines joined with newlines, regardless of channel.
    pub fn as_text(&self) -> String {
        self.lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lines written to one channel, in order.
    pub fn on(&self, channel: Channel) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(c, _)| *c == channel)
            .map(|(_, line)| line.as_str())
            .collect()
    }
}

impl ReportSink for OutputBuffer {
    fn emit(&mut self, channel: Channel, line: &ReportLine<'_>) {
        self.lines.push((channel, line.to_string()));
    }
}
