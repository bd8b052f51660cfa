// Normalization of human-formatted number strings ("$1,234.56", "(500)",
// "1.234.567,89", "150%") into integers used for chart values and labels.
//
// Every input maps to an integer: absent or unparseable values become 0,
// so a chart never fails on a malformed cell.
use serde_json::Value;

const CURRENCY_SYMBOLS: &[char] = &[
    '$', '€', '£', '¥', '₹', '₽', '₿', '₩', '₴', '₸', '₺', '₼', '₮', '₨', '₦', '₡', '₱',
];

/// A value of unknown shape coming from a data cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Absent,
    Number(f64),
    /// Already an integer; passed through without a float round-trip.
    Integer(i64),
    Text(&'a str),
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(text: &'a str) -> Self {
        NumericInput::Text(text)
    }
}

impl<'a> From<&'a String> for NumericInput<'a> {
    fn from(text: &'a String) -> Self {
        NumericInput::Text(text.as_str())
    }
}

impl From<f64> for NumericInput<'_> {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

impl From<i64> for NumericInput<'_> {
    fn from(value: i64) -> Self {
        NumericInput::Integer(value)
    }
}

impl<'a, T: Into<NumericInput<'a>>> From<Option<T>> for NumericInput<'a> {
    fn from(value: Option<T>) -> Self {
        value.map_or(NumericInput::Absent, Into::into)
    }
}

impl<'a> From<&'a Value> for NumericInput<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Null => NumericInput::Absent,
            Value::Number(n) => match n.as_i64() {
                Some(i) => NumericInput::Integer(i),
                None => n.as_f64().map_or(NumericInput::Absent, NumericInput::Number),
            },
            Value::String(s) => NumericInput::Text(s),
            // Booleans, arrays and objects have no numeric text form.
            Value::Bool(_) | Value::Array(_) | Value::Object(_) => NumericInput::Absent,
        }
    }
}

/// How a comma-bearing string is resolved into a plain decimal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupingShape {
    /// `1,234,567.89`: comma thousands in groups of three, dot decimal.
    Standard,
    /// `57,4050` or `1,00,000`: any comma-separated digit runs, dot decimal.
    Flexible,
    /// `1.234.567,89`: dot thousands in groups of three, comma decimal.
    European,
    Unrecognized,
}

struct Shape {
    separator: u8,
    decimal: u8,
    max_lead: Option<usize>,
    group_len: Option<usize>,
}

const STANDARD: Shape = Shape { separator: b',', decimal: b'.', max_lead: Some(3), group_len: Some(3) };
const FLEXIBLE: Shape = Shape { separator: b',', decimal: b'.', max_lead: None, group_len: None };
const EUROPEAN: Shape = Shape { separator: b'.', decimal: b',', max_lead: Some(3), group_len: Some(3) };

/// Converts a human-formatted number into an integer, truncating toward zero.
///
/// Currency symbols are dropped wherever they appear, a trailing `%` divides
/// by 100, `(x)` reads as `-x`, and comma/dot grouping is resolved by
/// [`classify_grouping`]. Absent or unparseable input yields 0.
///
/// A lone comma followed by a digit run that is not a thousands group is
/// still read as a thousands separator: `"1,5"` is 15, not 1.5.
pub fn normalize<'a>(value: impl Into<NumericInput<'a>>) -> i64 {
    match value.into() {
        NumericInput::Absent => 0,
        NumericInput::Number(n) => truncate(n),
        NumericInput::Integer(n) => n,
        NumericInput::Text(text) => normalize_text(text),
    }
}

fn normalize_text(text: &str) -> i64 {
    if text.is_empty() {
        return 0;
    }

    let mut working: String = text
        .trim_matches(is_js_whitespace)
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .collect();

    if let Some(percent) = working.strip_suffix('%') {
        let value = parse_float_prefix(percent).unwrap_or(0.0);
        return truncate(value / 100.0);
    }

    if working.len() >= 2 && working.starts_with('(') && working.ends_with(')') {
        working = format!("-{}", &working[1..working.len() - 1]);
    }

    if working.contains(',') {
        working = match classify_grouping(&working) {
            GroupingShape::Standard | GroupingShape::Flexible => working.replace(',', ""),
            GroupingShape::European => working.replace('.', "").replacen(',', ".", 1),
            GroupingShape::Unrecognized => working.replace(',', ""),
        };
    }

    parse_float_prefix(&working).map_or(0, truncate)
}

/// Classifies a string against the grouping shapes, in the order standard,
/// flexible, European. The first match wins.
pub fn classify_grouping(s: &str) -> GroupingShape {
    if matches_shape(s, &STANDARD) {
        GroupingShape::Standard
    } else if matches_shape(s, &FLEXIBLE) {
        GroupingShape::Flexible
    } else if matches_shape(s, &EUROPEAN) {
        GroupingShape::European
    } else {
        GroupingShape::Unrecognized
    }
}

// Scans `-?D{lead}(SEP D{group})*(DEC D+)?` over the whole string.
fn matches_shape(s: &str, shape: &Shape) -> bool {
    let bytes = s.as_bytes();
    let mut pos = usize::from(bytes.first() == Some(&b'-'));

    let lead = digit_run(&bytes[pos..]);
    if lead == 0 || shape.max_lead.is_some_and(|max| lead > max) {
        return false;
    }
    pos += lead;

    while bytes.get(pos) == Some(&shape.separator) {
        let group = digit_run(&bytes[pos + 1..]);
        if group == 0 || shape.group_len.is_some_and(|len| group != len) {
            return false;
        }
        pos += 1 + group;
    }

    if bytes.get(pos) == Some(&shape.decimal) {
        let fraction = digit_run(&bytes[pos + 1..]);
        if fraction == 0 {
            return false;
        }
        pos += 1 + fraction;
    }

    pos == bytes.len()
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// Unicode White_Space plus the byte order mark, minus NEL (U+0085), which
// is not a separator in float-literal parsing.
fn is_js_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

// Reads the longest leading decimal literal and ignores whatever follows it,
// so "12abc" is 12 and "1.2.3" is 1.2. `None` when there is no literal at all.
fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start_matches(is_js_whitespace);
    let bytes = s.as_bytes();
    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    if s[end..].starts_with("Infinity") {
        let infinity = if bytes[0] == b'-' { f64::NEG_INFINITY } else { f64::INFINITY };
        return Some(infinity);
    }

    let int_digits = digit_run(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digit_run(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digit_run(&bytes[exp..]);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse::<f64>().ok()
}

// Non-finite values degrade to 0; finite values beyond i64 saturate.
fn truncate(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// Formats an integer with comma thousands separators, e.g. `-1,234,567`.
pub fn format_grouped(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
