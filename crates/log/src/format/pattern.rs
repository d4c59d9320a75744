//! `%`-pattern formatter
//!
//! | Conversion  | Output |
//! |-------------|--------|
//! | `%c`        | logger name, `%c{n}` keeps the last `n` segments |
//! | `%d`        | UTC timestamp, `%d{ABSOLUTE}` / `%d{DATE}` / `%d{ISO8601}` |
//! | `%i`        | client id |
//! | `%m`        | message |
//! | `%P`        | level |
//! | `%r`        | milliseconds since the formatter was created |
//! | `%t`        | current thread name |
//! | `%T`        | attached error and its causes |
//! | `%%`        | a literal `%` |
//!
//! A width may sit between `%` and the conversion character: `%5P` pads on
//! the left, `%-5P` pads on the right. Unknown conversions are copied
//! through verbatim.

use std::thread;

use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;

use crate::core::{LogError, LogResult};
use crate::record::{Record, now_millis};

use super::Formatter;

const ISO8601: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second],[subsecond digits:3]"
);
const ABSOLUTE: &[FormatItem<'static>] =
    format_description!("[hour]:[minute]:[second],[subsecond digits:3]");
const DATE: &[FormatItem<'static>] = format_description!(
    "[day] [month repr:short] [year] [hour]:[minute]:[second],[subsecond digits:3]"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateStyle {
    Iso8601,
    Absolute,
    Date,
}

impl DateStyle {
    fn parse(option: Option<&str>) -> Self {
        match option.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("ABSOLUTE") => Self::Absolute,
            Some(s) if s.eq_ignore_ascii_case("DATE") => Self::Date,
            _ => Self::Iso8601,
        }
    }

    fn items(self) -> &'static [FormatItem<'static>] {
        match self {
            Self::Iso8601 => ISO8601,
            Self::Absolute => ABSOLUTE,
            Self::Date => DATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Conversion {
    Logger { depth: Option<usize> },
    Date(DateStyle),
    ClientId,
    Message,
    Level,
    Relative,
    Thread,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Width {
    min: usize,
    left_align: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Convert(Conversion, Width),
}

fn compile(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let mut width = Width::default();
        if chars.next_if(|&(_, c)| c == '-').is_some() {
            width.left_align = true;
        }
        while let Some((_, digit)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
            width.min = width.min.saturating_mul(10).saturating_add(digit.to_digit(10).unwrap_or(0) as usize);
        }

        let Some((at, conversion)) = chars.next() else {
            literal.push_str(&pattern[start..]);
            break;
        };

        let mut option = None;
        if matches!(conversion, 'c' | 'd') && chars.next_if(|&(_, c)| c == '{').is_some() {
            let open = at + 2;
            let mut close = None;
            for (i, c) in chars.by_ref() {
                if c == '}' {
                    close = Some(i);
                    break;
                }
            }
            match close {
                Some(close) => option = Some(&pattern[open..close]),
                None => {
                    literal.push_str(&pattern[start..]);
                    break;
                }
            }
        }

        let converted = match conversion {
            '%' => {
                literal.push('%');
                continue;
            }
            'c' => Conversion::Logger {
                depth: option.and_then(|o| o.trim().parse().ok()).filter(|&n| n > 0),
            },
            'd' => Conversion::Date(DateStyle::parse(option)),
            'i' => Conversion::ClientId,
            'm' => Conversion::Message,
            'P' => Conversion::Level,
            'r' => Conversion::Relative,
            't' => Conversion::Thread,
            'T' => Conversion::Error,
            _ => {
                let end = at + conversion.len_utf8();
                literal.push_str(&pattern[start..end]);
                continue;
            }
        };

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Convert(converted, width));
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

fn last_segments(name: &str, depth: Option<usize>) -> &str {
    let Some(depth) = depth else {
        return name;
    };
    name.rmatch_indices('.')
        .nth(depth - 1)
        .map_or(name, |(i, _)| &name[i + 1..])
}

fn push_padded(out: &mut String, value: &str, width: Width) {
    let len = value.chars().count();
    let pad = width.min.saturating_sub(len);
    if !width.left_align {
        out.extend(std::iter::repeat_n(' ', pad));
    }
    out.push_str(value);
    if width.left_align {
        out.extend(std::iter::repeat_n(' ', pad));
    }
}

/// Formatter driven by a `%`-conversion pattern
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    pattern: String,
    segments: Vec<Segment>,
    created_millis: u64,
}

impl PatternFormatter {
    /// Canonical identifier
    pub const ID: &'static str = "arbor_log::format::PatternFormatter";
    /// Configuration alias
    pub const ALIAS: &'static str = "PatternFormatter";
    /// Pattern used until one is configured
    pub const DEFAULT_PATTERN: &'static str = "%r %c{1} [%P] %m %T";

    const PROPERTY_NAMES: &'static [&'static str] = &["pattern"];

    /// Formatter for `pattern`
    pub fn new(pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        Self {
            segments: compile(&pattern),
            pattern,
            created_millis: now_millis(),
        }
    }

    /// Pattern in use
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn render(&self, out: &mut String, conversion: &Conversion, width: Width, record: &Record<'_>) {
        match conversion {
            Conversion::Logger { depth } => {
                push_padded(out, last_segments(record.logger_name, *depth), width);
            }
            Conversion::Date(style) => {
                let nanos = i128::from(record.timestamp_millis) * 1_000_000;
                let rendered = OffsetDateTime::from_unix_timestamp_nanos(nanos)
                    .ok()
                    .and_then(|at| at.format(style.items()).ok())
                    .unwrap_or_default();
                push_padded(out, &rendered, width);
            }
            Conversion::ClientId => push_padded(out, record.client_id, width),
            Conversion::Message => push_padded(out, record.message, width),
            Conversion::Level => push_padded(out, record.level.as_str(), width),
            Conversion::Relative => {
                let elapsed = record.timestamp_millis.saturating_sub(self.created_millis);
                push_padded(out, &elapsed.to_string(), width);
            }
            Conversion::Thread => {
                let current = thread::current();
                push_padded(out, current.name().unwrap_or("unnamed"), width);
            }
            Conversion::Error => {
                if let Some(chain) = record.error_chain() {
                    push_padded(out, &chain, width);
                }
            }
        }
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PATTERN)
    }
}

impl Formatter for PatternFormatter {
    fn format(&self, record: &Record<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + record.message.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Convert(conversion, width) => {
                    self.render(&mut out, conversion, *width, record);
                }
            }
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out
    }

    fn property_names(&self) -> &'static [&'static str] {
        Self::PROPERTY_NAMES
    }

    fn set_property(&mut self, name: &str, value: &str) -> LogResult<()> {
        match name {
            "pattern" => {
                self.segments = compile(value);
                self.pattern = value.to_string();
                Ok(())
            }
            _ => Err(LogError::invalid_property(name, value, "unknown property")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::Level;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::io;

    fn record<'a>(name: &'a str, message: &'a str) -> Record<'a> {
        Record {
            client_id: "svc",
            logger_name: name,
            // 2024-03-05 14:07:09.042 UTC
            timestamp_millis: 1_709_647_629_042,
            level: Level::Warn,
            message,
            error: None,
        }
    }

    #[rstest]
    #[case("%c", "com.acme.db.Pool")]
    #[case("%c{1}", "Pool")]
    #[case("%c{2}", "db.Pool")]
    #[case("%c{9}", "com.acme.db.Pool")]
    #[case("%i/%P: %m", "svc/WARN: slow")]
    #[case("[%-5P]", "[WARN ]")]
    #[case("[%5P]", "[ WARN]")]
    #[case("100%%", "100%")]
    #[case("%q %m", "%q slow")]
    #[case("%d", "2024-03-05 14:07:09,042")]
    #[case("%d{ABSOLUTE}", "14:07:09,042")]
    #[case("%d{DATE}", "05 Mar 2024 14:07:09,042")]
    fn conversions(#[case] pattern: &str, #[case] expected: &str) {
        let formatter = PatternFormatter::new(pattern);
        assert_eq!(formatter.format(&record("com.acme.db.Pool", "slow")), expected);
    }

    #[test]
    fn trailing_percent_is_literal() {
        let formatter = PatternFormatter::new("%m %");
        assert_eq!(formatter.format(&record("a", "x")), "x %");
    }

    #[test]
    fn unterminated_option_is_literal() {
        let formatter = PatternFormatter::new("%m %c{2");
        assert_eq!(formatter.format(&record("a.b", "x")), "x %c{2");
    }

    #[test]
    fn default_pattern_appends_error_chain() {
        let formatter = PatternFormatter::default();
        let error = io::Error::other("refused");
        let mut rec = record("net.Client", "connect failed");
        rec.error = Some(&error);
        let line = formatter.format(&rec);
        assert!(line.ends_with(" Client [WARN] connect failed refused"), "{line}");
    }

    #[test]
    fn default_pattern_without_error_has_no_trailing_space() {
        let line = PatternFormatter::default().format(&record("x", "done"));
        assert!(line.ends_with("x [WARN] done"), "{line}");
    }

    #[test]
    fn pattern_property_recompiles() {
        let mut formatter = PatternFormatter::default();
        formatter.set_property("pattern", "%P|%m").unwrap();
        assert_eq!(formatter.pattern(), "%P|%m");
        assert_eq!(formatter.format(&record("x", "hi")), "WARN|hi");
        assert!(formatter.set_property("colour", "red").is_err());
    }
}
