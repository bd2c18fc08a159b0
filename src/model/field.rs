//! Column definitions for data tables
//!
//! A `FieldSpec` describes one column: its title, a layout hint, how the raw
//! value is pulled out of a row, and the formatter/shortener strategies used
//! to turn that value into display text. The old class family (Fill, Date,
//! Epoch, ID, DID) is expressed through constructors that pick a strategy.

use chrono::{DateTime, SecondsFormat};
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Prefix stripped from decentralized identifiers
pub const DID_HEADER: &str = "did:dad:";

/// Extracts the raw column value from a row
pub type Accessor = Rc<dyn Fn(&Value) -> Value>;

/// How a column wants to be laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidthHint {
    /// Narrow column of the preferred width
    Fixed,
    /// Column that takes a share of the remaining space
    Fill,
}

/// Converts a raw value into display text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Formatter {
    /// Strings as-is, null as empty, everything else as compact JSON
    Plain,
    /// Microseconds since the epoch rendered as an ISO-8601 UTC timestamp
    Epoch,
    /// Drops a literal prefix from string values
    StripPrefix(String),
}

impl Formatter {
    pub fn format(&self, value: &Value) -> String {
        match self {
            Formatter::Plain => stringify(value),
            Formatter::Epoch => {
                let micros = value
                    .as_i64()
                    .or_else(|| value.as_f64().map(|f| f as i64));
                match micros.and_then(DateTime::from_timestamp_micros) {
                    Some(ts) => ts.to_rfc3339_opts(SecondsFormat::Millis, true),
                    None => stringify(value),
                }
            }
            Formatter::StripPrefix(header) => match value.as_str() {
                Some(s) => s.strip_prefix(header.as_str()).unwrap_or(s).to_string(),
                None => stringify(value),
            },
        }
    }
}

/// Compacts formatted text for narrow display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shortener {
    #[default]
    Identity,
    /// Keep at most this many characters, ending in an ellipsis when cut
    Elide(usize),
}

impl Shortener {
    pub fn shorten(&self, text: &str) -> String {
        match *self {
            Shortener::Identity => text.to_string(),
            Shortener::Elide(max) => {
                if text.chars().count() <= max {
                    text.to_string()
                } else {
                    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
                    out.push('…');
                    out
                }
            }
        }
    }
}

/// Formatted text for one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Full formatted value
    pub full: String,
    /// Value after the column's shortener
    pub short: String,
}

/// Definition of one table column
#[derive(Clone)]
pub struct FieldSpec {
    pub title: String,
    /// Lower-cased title, the stable column key
    pub name: String,
    pub width: WidthHint,
    /// Preferred width in terminal columns
    pub length: u16,
    pub formatter: Formatter,
    pub shortener: Shortener,
    accessor: Accessor,
}

impl fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("title", &self.title)
            .field("name", &self.name)
            .field("width", &self.width)
            .field("length", &self.length)
            .field("formatter", &self.formatter)
            .field("shortener", &self.shortener)
            .finish_non_exhaustive()
    }
}

impl FieldSpec {
    /// Create a column whose value is the row's top-level key equal to `name`
    pub fn new(title: impl Into<String>, width: WidthHint, length: u16) -> Self {
        let title = title.into();
        let name = title.to_lowercase();
        let key = name.clone();
        Self {
            title,
            name,
            width,
            length,
            formatter: Formatter::Plain,
            shortener: Shortener::Identity,
            accessor: Rc::new(move |row: &Value| row.get(&key).cloned().unwrap_or(Value::Null)),
        }
    }

    pub fn fixed(title: impl Into<String>) -> Self {
        Self::new(title, WidthHint::Fixed, 4)
    }

    pub fn fill(title: impl Into<String>) -> Self {
        Self::new(title, WidthHint::Fill, 100)
    }

    /// Date column; the value is shown as the backend sent it
    pub fn date(title: impl Into<String>) -> Self {
        Self::new(title, WidthHint::Fixed, 12)
    }

    pub fn epoch(title: impl Into<String>) -> Self {
        Self::date(title).with_formatter(Formatter::Epoch)
    }

    pub fn id(title: impl Into<String>, header: impl Into<String>) -> Self {
        Self::fixed(title).with_formatter(Formatter::StripPrefix(header.into()))
    }

    pub fn did() -> Self {
        Self::id("DID", DID_HEADER)
    }

    /// Read the value at a JSON pointer such as `/otp_data/id`
    pub fn at(self, pointer: impl Into<String>) -> Self {
        let pointer = pointer.into();
        self.with_accessor(move |row| row.pointer(&pointer).cloned().unwrap_or(Value::Null))
    }

    pub fn with_accessor<F>(mut self, accessor: F) -> Self
    where
        F: Fn(&Value) -> Value + 'static,
    {
        self.accessor = Rc::new(accessor);
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_shortener(mut self, shortener: Shortener) -> Self {
        self.shortener = shortener;
        self
    }

    /// Raw value of this column for `row`, used for sorting
    pub fn value(&self, row: &Value) -> Value {
        (self.accessor)(row)
    }

    pub fn format(&self, value: &Value) -> String {
        self.formatter.format(value)
    }

    pub fn shorten(&self, text: &str) -> String {
        self.shortener.shorten(text)
    }

    pub fn cell(&self, row: &Value) -> Cell {
        let full = self.format(&self.value(row));
        let short = self.shorten(&full);
        Cell { full, short }
    }
}

/// Generic display conversion shared by every formatter
fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_is_lowercased_title() {
        let field = FieldSpec::fill("Message");
        assert_eq!(field.title, "Message");
        assert_eq!(field.name, "message");
        assert_eq!(field.width, WidthHint::Fill);
        assert_eq!(field.length, 100);
    }

    #[test]
    fn test_default_accessor_reads_name_key() {
        let field = FieldSpec::fixed("Port");
        let row = json!({"port": 7541, "name": "alpha"});
        assert_eq!(field.value(&row), json!(7541));
        assert_eq!(field.cell(&row).full, "7541");
    }

    #[test]
    fn test_missing_value_formats_empty() {
        let field = FieldSpec::fill("Status");
        let cell = field.cell(&json!({"other": 1}));
        assert_eq!(cell.full, "");
        assert_eq!(cell.short, "");
    }

    #[test]
    fn test_plain_formatting() {
        let f = Formatter::Plain;
        assert_eq!(f.format(&json!("text")), "text");
        assert_eq!(f.format(&json!(true)), "true");
        assert_eq!(f.format(&json!(null)), "");
        assert_eq!(f.format(&json!([1, "a"])), "[1,\"a\"]");
    }

    #[test]
    fn test_epoch_formats_microseconds() {
        let field = FieldSpec::epoch("Created");
        assert_eq!(field.width, WidthHint::Fixed);
        assert_eq!(field.length, 12);
        assert_eq!(
            field.format(&json!(1_525_737_600_000_000i64)),
            "2018-05-08T00:00:00.000Z"
        );
    }

    #[test]
    fn test_epoch_degrades_on_non_numeric() {
        let field = FieldSpec::epoch("Created");
        assert_eq!(field.format(&json!("yesterday")), "yesterday");
        assert_eq!(field.format(&json!(null)), "");
    }

    #[test]
    fn test_date_keeps_literal_value() {
        let field = FieldSpec::date("Changed");
        assert_eq!(
            field.format(&json!("2000-01-01T00:00:00+00:00")),
            "2000-01-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_id_strips_header() {
        let field = FieldSpec::id("Key", "key:");
        assert_eq!(field.format(&json!("key:abc")), "abc");
        assert_eq!(field.format(&json!("other:abc")), "other:abc");
        assert_eq!(field.format(&json!(12)), "12");
    }

    #[test]
    fn test_did_field() {
        let field = FieldSpec::did();
        assert_eq!(field.title, "DID");
        assert_eq!(field.name, "did");
        assert_eq!(
            field.format(&json!("did:dad:Qt27fThWoNZsa88VrTkep6H-4HA8tr54sHON1vWl6FE=")),
            "Qt27fThWoNZsa88VrTkep6H-4HA8tr54sHON1vWl6FE="
        );
        assert_eq!(field.format(&json!("did:igo:abc")), "did:igo:abc");
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let plain = FieldSpec::id("UID", "");
        let did = FieldSpec::did();
        let renamed = FieldSpec::fixed("Other").with_shortener(Shortener::Elide(3));

        assert_eq!(plain.format(&json!("did:dad:x")), "did:dad:x");
        assert_eq!(did.format(&json!("did:dad:x")), "x");
        assert_eq!(FieldSpec::fixed("Port").shortener, Shortener::Identity);
        assert_eq!(renamed.shorten("abcdef"), "ab…");
    }

    #[test]
    fn test_elide_shortener() {
        let s = Shortener::Elide(5);
        assert_eq!(s.shorten("abc"), "abc");
        assert_eq!(s.shorten("abcde"), "abcde");
        assert_eq!(s.shorten("abcdefgh"), "abcd…");
        assert_eq!(Shortener::Identity.shorten("abcdefgh"), "abcdefgh");
    }

    #[test]
    fn test_pointer_accessor() {
        let field = FieldSpec::fill("Blob").at("/otp_data/blob");
        let row = json!({"otp_data": {"id": "did:dad:x", "blob": "AeYb"}});
        assert_eq!(field.cell(&row).full, "AeYb");
        assert_eq!(field.value(&json!({})), Value::Null);
    }

    #[test]
    fn test_custom_accessor() {
        let field = FieldSpec::fill("Count").with_accessor(|row| {
            json!(row.as_object().map(|o| o.len()).unwrap_or(0))
        });
        assert_eq!(field.cell(&json!({"a": 1, "b": 2})).full, "2");
    }
}
