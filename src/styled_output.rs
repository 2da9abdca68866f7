//! Styled console output for scan progress and results.
//!
//! Uses the anstyle crate for cross-platform color support. The engine
//! itself never prints; [`ConsoleObserver`] adapts the engine's observer
//! events to the console with the classic severity markers (`[*]` info,
//! `[!]` warning, `[-]` trace, `[$]` finding), gated by the CLI's numeric
//! verbosity.

use anstyle::{AnsiColor, Color, Style};

use crate::scanner::{CompletionMode, ScanObserver, ScanReport};

/// Style definitions for the severity markers and summary elements.
pub struct Styles {
    pub info: Style,
    pub warning: Style,
    pub trace: Style,
    pub finding: Style,
    pub muted: Style,
    pub bold: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            info: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Cyan))),
            warning: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Yellow))),
            trace: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Blue))),
            finding: Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Green))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
            bold: Style::new().bold(),
        }
    }
}

impl Styles {
    /// All-default styles for --no-color / non-tty use.
    fn plain() -> Self {
        Self {
            info: Style::new(),
            warning: Style::new(),
            trace: Style::new(),
            finding: Style::new(),
            muted: Style::new(),
            bold: Style::new(),
        }
    }
}

/// Formatter owning the style set.
pub struct StyledFormatter {
    styles: Styles,
}

impl StyledFormatter {
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
        }
    }

    pub fn without_colors() -> Self {
        Self {
            styles: Styles::plain(),
        }
    }

    fn paint(&self, style: &Style, text: &str) -> String {
        format!("{}{}{}", style.render(), text, style.render_reset())
    }

    /// End-of-run summary: numbered wildcard and expired listings, or a
    /// "nothing found" note. Mirrors the report file's content.
    pub fn print_summary(&self, report: &ScanReport) {
        let results = &report.results;
        println!();
        if report.completion == CompletionMode::Cancelled {
            println!(
                "{}",
                self.paint(
                    &self.styles.warning,
                    &format!(
                        "Scan cancelled after {}/{} domains; partial results follow.",
                        report.scanned, report.total
                    ),
                )
            );
        }

        if results.is_empty() {
            println!(
                "{}",
                self.paint(&self.styles.muted, "No wildcard or expired-domain findings.")
            );
            return;
        }

        println!(
            "{}",
            self.paint(
                &self.styles.bold,
                &format!(
                    "{} crossdomain.xml(s) with wildcards",
                    results.wildcards.len()
                ),
            )
        );
        for (index, domain) in results.wildcards.iter().enumerate() {
            println!("\t{}. {}", index + 1, domain);
        }

        println!(
            "{}",
            self.paint(
                &self.styles.bold,
                &format!(
                    "{} crossdomain.xml(s) with expired domains",
                    results.expired.len()
                ),
            )
        );
        for (index, (domain, targets)) in results.expired.iter().enumerate() {
            println!("\t{}. {}: {}", index + 1, domain, targets.join(", "));
        }
    }
}

impl Default for StyledFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Console adapter for engine progress events.
///
/// Verbosity levels follow the CLI contract:
/// 0 - findings only, 1 - progress (default), 2 - warnings, 5 - trace.
pub struct ConsoleObserver {
    formatter: StyledFormatter,
    verbosity: u8,
}

impl ConsoleObserver {
    pub fn new(verbosity: u8, no_color: bool) -> Self {
        let formatter = if no_color {
            StyledFormatter::without_colors()
        } else {
            StyledFormatter::new()
        };
        Self {
            formatter,
            verbosity,
        }
    }

    pub fn formatter(&self) -> &StyledFormatter {
        &self.formatter
    }
}

impl ScanObserver for ConsoleObserver {
    fn fetching(&self, domain: &str) {
        if self.verbosity >= 5 {
            eprintln!(
                "{} Requesting: https://{domain}/crossdomain.xml",
                self.formatter.paint(&self.formatter.styles.trace, "[-]")
            );
        }
    }

    fn warning(&self, domain: &str, message: &str) {
        if self.verbosity >= 2 {
            eprintln!(
                "{} {domain}: {message}",
                self.formatter.paint(&self.formatter.styles.warning, "[!]")
            );
        }
    }

    fn wildcard_found(&self, domain: &str) {
        println!(
            "{} {domain}'s crossdomain.xml contains a root wildcard",
            self.formatter.paint(&self.formatter.styles.finding, "[$]")
        );
    }

    fn expired_found(&self, domain: &str, target: &str) {
        println!(
            "{} {domain}'s crossdomain.xml contains expired domain {target}",
            self.formatter.paint(&self.formatter.styles.finding, "[$]")
        );
    }

    fn domain_finished(&self, domain: &str, completed: usize, total: usize) {
        if self.verbosity >= 1 {
            println!(
                "{} [{completed}/{total}] {domain}",
                self.formatter.paint(&self.formatter.styles.info, "[*]")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_formatter_renders_bare_text() {
        let formatter = StyledFormatter::without_colors();
        assert_eq!(formatter.paint(&formatter.styles.info, "[*]"), "[*]");
    }

    #[test]
    fn colored_formatter_wraps_with_escapes() {
        let formatter = StyledFormatter::new();
        let painted = formatter.paint(&formatter.styles.finding, "[$]");
        assert!(painted.contains("[$]"));
        assert_ne!(painted, "[$]");
    }
}
