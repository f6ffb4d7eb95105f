//! Command output in text or JSON-lines form.
//!
//! A command describes its result as a [`View`] and hands it to [`emit`].
//! With `--json` each view becomes one stdout line
//! `{"type": <kind>, "payload": <view>}`; otherwise the view renders itself
//! through [`Text`]. Warnings, hints and progress steps follow the same mode
//! so scripts only ever see JSON lines.

use std::fmt::Display;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::{json, Value};
use tabled::{Table, Tabled};
use tracing::warn;

/// Output flags taken from the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    /// One JSON object per line instead of text.
    pub json: bool,
    /// Only warnings and errors in text mode.
    pub quiet: bool,
}

static MODE: OnceLock<OutputMode> = OnceLock::new();

/// Fix the output mode for the process. Only the first call has effect.
pub fn configure(mode: OutputMode) {
    let _ = MODE.set(mode);
}

fn mode() -> OutputMode {
    MODE.get().copied().unwrap_or_default()
}

/// A command result printable as text or as a JSON payload.
pub trait View: Serialize {
    /// `type` of the JSON line.
    const KIND: &'static str;

    fn render(&self, text: &mut Text);
}

/// Print `view` in the configured mode.
pub fn emit<V: View>(view: &V) {
    let mode = mode();
    if mode.json {
        match serde_json::to_value(view) {
            Ok(payload) => json_line(V::KIND, &payload),
            Err(err) => warn!(kind = V::KIND, error = %err, "Could not serialize command output"),
        }
        return;
    }
    if mode.quiet {
        return;
    }
    print!("{}", render_text(view));
}

fn render_text<V: View>(view: &V) -> String {
    let mut text = Text::default();
    view.render(&mut text);
    text.buffer
}

fn json_line(kind: &str, payload: &Value) {
    println!("{}", json!({ "type": kind, "payload": payload }));
}

/// Text form of a view, built line by line.
#[derive(Debug, Default)]
pub struct Text {
    buffer: String,
}

impl Text {
    pub fn title(&mut self, title: &str) {
        self.buffer.push('\n');
        self.push(&title.if_supports_color(Stream::Stdout, |t| t.bold()).to_string());
    }

    /// A labeled value; labels are padded to one column.
    pub fn field(&mut self, label: &str, value: impl Display) {
        let label = format!("{label:<12}");
        self.push(&format!(
            "  {} {value}",
            label.if_supports_color(Stream::Stdout, |l| l.dimmed())
        ));
    }

    pub fn success(&mut self, message: &str) {
        self.push(&format!("  {} {message}", "✓".if_supports_color(Stream::Stdout, |c| c.green())));
    }

    pub fn warning(&mut self, message: &str) {
        self.push(&format!("  {} {message}", "⚠".if_supports_color(Stream::Stdout, |c| c.yellow())));
    }

    pub fn hint(&mut self, message: &str) {
        self.push(&format!("  {}: {message}", "hint".if_supports_color(Stream::Stdout, |h| h.cyan())));
    }

    pub fn table<T: Tabled>(&mut self, rows: &[T]) {
        for line in Table::new(rows).to_string().lines() {
            self.push(&format!("  {line}"));
        }
    }

    fn push(&mut self, line: &str) {
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }
}

/// Value in green.
pub fn positive(value: impl Display) -> String {
    value
        .to_string()
        .if_supports_color(Stream::Stdout, |v| v.green())
        .to_string()
}

/// Value in cyan.
pub fn highlight(value: impl Display) -> String {
    value
        .to_string()
        .if_supports_color(Stream::Stdout, |v| v.cyan())
        .to_string()
}

pub fn muted(value: impl Display) -> String {
    value
        .to_string()
        .if_supports_color(Stream::Stdout, |v| v.dimmed())
        .to_string()
}

/// Warning line. Shown even in quiet mode.
pub fn warning(message: &str) {
    if mode().json {
        json_line("warning", &json!({ "message": message }));
        return;
    }
    let mut text = Text::default();
    text.warning(message);
    print!("{}", text.buffer);
}

pub fn hint(message: &str) {
    let mode = mode();
    if mode.json {
        json_line("hint", &json!({ "message": message }));
        return;
    }
    if mode.quiet {
        return;
    }
    let mut text = Text::default();
    text.hint(message);
    print!("{}", text.buffer);
}

/// Error line on stderr.
pub fn error(message: &str) {
    if mode().json {
        eprintln!("{}", json!({ "type": "error", "payload": { "message": message } }));
        return;
    }
    eprintln!("  {} {message}", "×".if_supports_color(Stream::Stderr, |c| c.red()));
}

const BRAILLE_SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A network round trip shown as a spinner on stderr.
///
/// Hidden in JSON and quiet mode; in JSON mode the outcome is reported as a
/// `step` line.
pub struct Step {
    bar: ProgressBar,
}

impl Step {
    pub fn start(message: &str) -> Self {
        let mode = mode();
        let bar = if mode.json || mode.quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner()
                .tick_strings(BRAILLE_SPINNER)
                .template("  {spinner:.cyan} {msg}")
            {
                bar.set_style(style);
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        };
        bar.set_message(message.to_string());
        Self { bar }
    }

    pub fn done(self, message: &str) {
        self.finish(true, message);
    }

    pub fn failed(self, message: &str) {
        self.finish(false, message);
    }

    fn finish(self, ok: bool, message: &str) {
        let mode = mode();
        if mode.json {
            json_line("step", &json!({ "ok": ok, "message": message }));
            self.bar.finish_and_clear();
        } else if mode.quiet && ok {
            self.bar.finish_and_clear();
        } else if ok {
            self.bar.finish_with_message(format!(
                "{} {message}",
                "✓".if_supports_color(Stream::Stderr, |c| c.green())
            ));
        } else {
            self.bar.finish_with_message(format!(
                "{} {message}",
                "×".if_supports_color(Stream::Stderr, |c| c.red())
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        coin: &'static str,
        amount: &'static str,
    }

    impl View for Sample {
        const KIND: &'static str = "sample";

        fn render(&self, text: &mut Text) {
            text.title("Sample");
            text.field("Amount", format!("{} {}", self.amount, self.coin));
            text.hint("nothing to do");
        }
    }

    #[test]
    fn text_pads_labels_and_keeps_order() {
        owo_colors::set_override(false);
        let rendered = render_text(&Sample {
            coin: "ETH",
            amount: "0.5",
        });
        assert_eq!(
            rendered,
            "\nSample\n  Amount       0.5 ETH\n  hint: nothing to do\n"
        );
    }

    #[test]
    fn payload_is_the_serialized_view() {
        let payload = serde_json::to_value(Sample {
            coin: "ETH",
            amount: "0.5",
        })
        .expect("serialize");
        assert_eq!(payload, json!({"coin": "ETH", "amount": "0.5"}));
        assert_eq!(Sample::KIND, "sample");
    }
}
