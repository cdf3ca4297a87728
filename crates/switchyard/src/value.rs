//! Declared parameter types, runtime values and text coercion.
//!
//! [`coerce`] is the single conversion primitive. The lenient store lookup
//! ([`ArgumentStore::get`](crate::ArgumentStore::get)) swallows its errors
//! and falls back to a default; the dispatch binder reports them. The
//! [`FromValue`] trait takes a coerced [`Value`] back to a concrete Rust type.
//!
//! # Example
//!
//! ```
//! use switchyard::{coerce, Value, ValueKind};
//!
//! assert_eq!(coerce("42", &ValueKind::U8).unwrap(), Value::UInt(42));
//! assert!(coerce("420", &ValueKind::U8).is_err());
//! ```

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::error::CoercionError;

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// An enumerated type a parameter can be declared as.
///
/// Values parse by member name (ignoring case) or by numeric value. Flag
/// enums also accept comma separated member names and any numeric
/// combination of defined bits.
///
/// ```
/// use switchyard::EnumType;
///
/// let colors = EnumType::new("Color")
///     .member("Red", 1)
///     .member("Green", 2)
///     .member("Blue", 4)
///     .flags();
///
/// assert_eq!(colors.parse("red, blue").unwrap(), 5);
/// assert_eq!(colors.parse("6").unwrap(), 6);
/// assert!(colors.parse("8").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumType {
    name: String,
    members: Vec<(String, i64)>,
    flags: bool,
}

impl EnumType {
    /// Creates an enum type with no members.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
            flags: false,
        }
    }

    /// Adds a member.
    pub fn member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.members.push((name.into(), value));
        self
    }

    /// Marks the type as a set of combinable flags.
    pub fn flags(mut self) -> Self {
        self.flags = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[(String, i64)] {
        &self.members
    }

    pub fn is_flags(&self) -> bool {
        self.flags
    }

    /// Returns the member name for a value, if one matches exactly.
    pub fn member_name(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(n, _)| n.as_str())
    }

    /// Returns true if `value` is a member, or for flag enums a combination of members.
    pub fn is_defined(&self, value: i64) -> bool {
        if self.flags {
            let all = self.members.iter().fold(0, |acc, (_, v)| acc | v);
            value >= 0 && value & !all == 0
        } else {
            self.members.iter().any(|(_, v)| *v == value)
        }
    }

    /// Parses member names or a numeric value.
    pub fn parse(&self, raw: &str) -> Result<i64, CoercionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(CoercionError::format(format!(
                "an empty value is not a member of {}",
                self.name
            )));
        }

        if let Ok(number) = text.parse::<i64>() {
            return if self.is_defined(number) {
                Ok(number)
            } else {
                Err(CoercionError::invalid_cast(format!(
                    "{} is not a defined value of {}",
                    number, self.name
                )))
            };
        }

        if self.flags {
            text.split(',')
                .map(|part| self.lookup(part.trim()))
                .try_fold(0, |acc, v| v.map(|v| acc | v))
        } else {
            self.lookup(text)
        }
    }

    fn lookup(&self, name: &str) -> Result<i64, CoercionError> {
        self.members
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                CoercionError::invalid_cast(format!("'{}' is not a member of {}", name, self.name))
            })
    }
}

/// The declared type of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// 128-bit identifier.
    Guid,
    DateTime,
    Date,
    Enum(EnumType),
}

impl ValueKind {
    /// Type name used in error messages and help.
    pub fn type_name(&self) -> &str {
        match self {
            ValueKind::Text => "string",
            ValueKind::Bool => "bool",
            ValueKind::Char => "char",
            ValueKind::I8 => "i8",
            ValueKind::I16 => "i16",
            ValueKind::I32 => "i32",
            ValueKind::I64 => "i64",
            ValueKind::U8 => "u8",
            ValueKind::U16 => "u16",
            ValueKind::U32 => "u32",
            ValueKind::U64 => "u64",
            ValueKind::F32 => "f32",
            ValueKind::F64 => "f64",
            ValueKind::Guid => "guid",
            ValueKind::DateTime => "datetime",
            ValueKind::Date => "date",
            ValueKind::Enum(e) => e.name(),
        }
    }

    /// Inclusive range of an integer kind.
    fn integer_range(&self) -> Option<(i128, i128)> {
        let range = match self {
            ValueKind::I8 => (i128::from(i8::MIN), i128::from(i8::MAX)),
            ValueKind::I16 => (i128::from(i16::MIN), i128::from(i16::MAX)),
            ValueKind::I32 => (i128::from(i32::MIN), i128::from(i32::MAX)),
            ValueKind::I64 => (i128::from(i64::MIN), i128::from(i64::MAX)),
            ValueKind::U8 => (0, i128::from(u8::MAX)),
            ValueKind::U16 => (0, i128::from(u16::MAX)),
            ValueKind::U32 => (0, i128::from(u32::MAX)),
            ValueKind::U64 => (0, i128::from(u64::MAX)),
            _ => return None,
        };
        Some(range)
    }

    fn is_signed(&self) -> bool {
        matches!(
            self,
            ValueKind::I8 | ValueKind::I16 | ValueKind::I32 | ValueKind::I64
        )
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A coerced argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Char(char),
    /// Any signed integer kind.
    Int(i64),
    /// Any unsigned integer kind.
    UInt(u64),
    Float(f64),
    Guid(Uuid),
    DateTime(NaiveDateTime),
    Date(NaiveDate),
    Enum {
        type_name: String,
        value: i64,
    },
}

impl Value {
    /// Returns true if this value can be bound to a parameter of `kind`.
    pub fn fits(&self, kind: &ValueKind) -> bool {
        match (self, kind) {
            (Value::Text(_), ValueKind::Text)
            | (Value::Bool(_), ValueKind::Bool)
            | (Value::Char(_), ValueKind::Char)
            | (Value::Guid(_), ValueKind::Guid)
            | (Value::DateTime(_), ValueKind::DateTime)
            | (Value::Date(_), ValueKind::Date) => true,
            (Value::Float(v), ValueKind::F32) => !v.is_finite() || v.abs() <= f64::from(f32::MAX),
            (Value::Float(_), ValueKind::F64) => true,
            (Value::Int(n), kind) => within(kind, i128::from(*n)),
            (Value::UInt(n), kind) => within(kind, i128::from(*n)),
            (Value::Enum { type_name, value }, ValueKind::Enum(e)) => {
                type_name == e.name() && e.is_defined(*value)
            }
            _ => false,
        }
    }
}

fn within(kind: &ValueKind, n: i128) -> bool {
    kind.integer_range()
        .map(|(min, max)| n >= min && n <= max)
        .unwrap_or(false)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Char(c) => write!(f, "{}", c),
            Value::Int(n) => write!(f, "{}", n),
            Value::UInt(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Guid(g) => write!(f, "{}", g.hyphenated()),
            Value::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Value::Enum { value, .. } => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

macro_rules! value_from_int {
    ($variant:ident: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(n: $t) -> Self {
                    Value::$variant(n.into())
                }
            }
        )*
    };
}

value_from_int!(Int: i8, i16, i32, i64);
value_from_int!(UInt: u8, u16, u32, u64);

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<Uuid> for Value {
    fn from(g: Uuid) -> Self {
        Value::Guid(g)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

/// Converts raw argument text into a value of the declared kind.
pub fn coerce(raw: &str, kind: &ValueKind) -> Result<Value, CoercionError> {
    match kind {
        ValueKind::Text => Ok(Value::Text(raw.to_string())),
        ValueKind::Bool => parse_bool(raw),
        ValueKind::Char => parse_char(raw),
        ValueKind::F32 | ValueKind::F64 => parse_float(raw, kind),
        ValueKind::Guid => parse_guid(raw),
        ValueKind::DateTime => parse_date_time(raw).map(Value::DateTime),
        ValueKind::Date => parse_date(raw),
        ValueKind::Enum(e) => e.parse(raw).map(|value| Value::Enum {
            type_name: e.name().to_string(),
            value,
        }),
        integer => parse_integer(raw, integer),
    }
}

fn parse_bool(raw: &str) -> Result<Value, CoercionError> {
    let text = raw.trim();
    // A bare switch (`-force`) carries no text and means "on".
    if text.is_empty() || text.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if text.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err(CoercionError::format(format!(
            "string '{}' was not recognized as a valid bool",
            raw
        )))
    }
}

fn parse_char(raw: &str) -> Result<Value, CoercionError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Char(c)),
        _ => Err(CoercionError::format(
            "string must be exactly one character long",
        )),
    }
}

fn parse_integer(raw: &str, kind: &ValueKind) -> Result<Value, CoercionError> {
    use std::num::IntErrorKind;

    let Some((min, max)) = kind.integer_range() else {
        return Err(CoercionError::invalid_cast(format!(
            "{} is not an integer type",
            kind
        )));
    };

    let text = raw.trim();
    let parsed = text.parse::<i128>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            CoercionError::Overflow(kind.to_string())
        }
        _ => CoercionError::format(format!("'{}' is not a valid {}", raw, kind)),
    })?;

    if parsed < min || parsed > max {
        return Err(CoercionError::Overflow(kind.to_string()));
    }

    let overflow = |_| CoercionError::Overflow(kind.to_string());
    if kind.is_signed() {
        i64::try_from(parsed).map(Value::Int).map_err(overflow)
    } else {
        u64::try_from(parsed).map(Value::UInt).map_err(overflow)
    }
}

fn parse_float(raw: &str, kind: &ValueKind) -> Result<Value, CoercionError> {
    let text = raw.trim();
    let parsed = text
        .parse::<f64>()
        .map_err(|_| CoercionError::format(format!("'{}' is not a valid {}", raw, kind)))?;

    let explicit_infinity = text.to_ascii_lowercase().contains("inf");
    let limit = match kind {
        ValueKind::F32 => f64::from(f32::MAX),
        _ => f64::MAX,
    };
    if !explicit_infinity && (parsed.is_infinite() || parsed.abs() > limit) {
        return Err(CoercionError::Overflow(kind.to_string()));
    }
    Ok(Value::Float(parsed))
}

fn parse_guid(raw: &str) -> Result<Value, CoercionError> {
    Uuid::parse_str(raw.trim())
        .map(Value::Guid)
        .map_err(|e| CoercionError::format(format!("'{}' is not a valid guid: {}", raw, e)))
}

fn parse_date_time(raw: &str) -> Result<NaiveDateTime, CoercionError> {
    let text = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            CoercionError::format(format!("string '{}' is not a valid datetime", raw))
        })
}

fn parse_date(raw: &str) -> Result<Value, CoercionError> {
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(d) => Ok(Value::Date(d)),
        Err(_) => parse_date_time(raw)
            .map(|dt| Value::Date(dt.date()))
            .map_err(|_| CoercionError::format(format!("string '{}' is not a valid date", raw))),
    }
}

/// Types that can be read back out of a coerced [`Value`].
///
/// Implement this for your own types to use them with
/// [`ArgumentStore::get`](crate::ArgumentStore::get) and
/// [`BoundArguments::get`](crate::BoundArguments::get). An enum usually
/// declares `ValueKind::Enum(..)` as its kind and maps the numeric value.
pub trait FromValue: Sized {
    /// The kind raw text is coerced to before conversion.
    fn kind() -> ValueKind;

    /// Converts a coerced value, returning `None` if it doesn't fit.
    fn from_value(value: Value) -> Option<Self>;
}

impl FromValue for String {
    fn kind() -> ValueKind {
        ValueKind::Text
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl FromValue for bool {
    fn kind() -> ValueKind {
        ValueKind::Bool
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FromValue for char {
    fn kind() -> ValueKind {
        ValueKind::Char
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Char(c) => Some(c),
            _ => None,
        }
    }
}

macro_rules! integer_from_value {
    ($($t:ty => $kind:ident),*) => {
        $(
            impl FromValue for $t {
                fn kind() -> ValueKind {
                    ValueKind::$kind
                }

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::Int(n) => <$t>::try_from(n).ok(),
                        Value::UInt(n) => <$t>::try_from(n).ok(),
                        Value::Enum { value, .. } => <$t>::try_from(value).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

integer_from_value!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64
);

impl FromValue for f64 {
    fn kind() -> ValueKind {
        ValueKind::F64
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(n),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn kind() -> ValueKind {
        ValueKind::F32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(n) => Some(n as f32),
            _ => None,
        }
    }
}

impl FromValue for Uuid {
    fn kind() -> ValueKind {
        ValueKind::Guid
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Guid(g) => Some(g),
            _ => None,
        }
    }
}

impl FromValue for NaiveDateTime {
    fn kind() -> ValueKind {
        ValueKind::DateTime
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::DateTime(dt) => Some(dt),
            Value::Date(d) => d.and_hms_opt(0, 0, 0),
            _ => None,
        }
    }
}

impl FromValue for NaiveDate {
    fn kind() -> ValueKind {
        ValueKind::Date
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Date(d) => Some(d),
            Value::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }
}
