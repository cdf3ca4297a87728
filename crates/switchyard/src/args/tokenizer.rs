//! Single-pass tokenizer for raw argument vectors.
//!
//! The raw tokens are joined with single spaces and scanned left to right.
//! The first two bare words become the primary option (group) and sub option
//! (action); everything after the first option marker is a sequence of named
//! arguments.
//!
//! ```text
//! Plugin Add --name:"my plugin" -force /level=3
//! ^^^^^^ ^^^ ^^^^^^^^^^^^^^^^^^ ^^^^^^ ^^^^^^^^
//! primary sub  name = my plugin  force=  level=3
//! ```
//!
//! Accepted markers are `/`, `--` and `-`. A name ends at a space, `:` or
//! `=`. Double quotes protect markers and separators inside a value, and an
//! unterminated quote still commits what was collected. The scan never fails.

use std::collections::BTreeMap;

use tracing::trace;

use crate::options::CaseMode;

const QUOTE: char = '"';
const SLASH: char = '/';
const DASH: char = '-';

/// Structured form of one invocation's arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedArguments {
    primary_option: String,
    sub_option: String,
    values: BTreeMap<String, String>,
}

impl ParsedArguments {
    /// The group selector; empty when none was given.
    pub fn primary_option(&self) -> &str {
        &self.primary_option
    }

    /// The action selector; empty when none was given.
    pub fn sub_option(&self) -> &str {
        &self.sub_option
    }

    /// Named values keyed by their folded name.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    PrimaryOption,
    SubOption,
    /// Positions are closed and no argument is open.
    Between,
    ArgumentName,
    AwaitingValueStart,
    ArgumentValue,
    QuotedValue,
}

struct Scanner {
    chars: Vec<char>,
    case: CaseMode,
    state: State,
    word: String,
    name: String,
    value: String,
    quoted: bool,
    parsed: ParsedArguments,
}

/// Tokenizes raw arguments, folding argument names with `case`.
///
/// ```
/// use switchyard::{tokenize, CaseMode};
///
/// let parsed = tokenize(["Plugin", "Add", "--Name:sample"], CaseMode::Insensitive);
/// assert_eq!(parsed.primary_option(), "Plugin");
/// assert_eq!(parsed.sub_option(), "Add");
/// assert_eq!(parsed.values()["name"], "sample");
/// ```
pub fn tokenize<I, S>(tokens: I, case: CaseMode) -> ParsedArguments
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = tokens
        .into_iter()
        .map(|t| t.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(" ");

    let parsed = Scanner::new(&joined, case).run();
    trace!(
        primary = parsed.primary_option(),
        sub = parsed.sub_option(),
        count = parsed.values.len(),
        "tokenized arguments"
    );
    parsed
}

impl Scanner {
    fn new(input: &str, case: CaseMode) -> Self {
        Self {
            chars: input.chars().collect(),
            case,
            state: State::PrimaryOption,
            word: String::new(),
            name: String::new(),
            value: String::new(),
            quoted: false,
            parsed: ParsedArguments::default(),
        }
    }

    fn run(mut self) -> ParsedArguments {
        let mut i = 0;
        while i < self.chars.len() {
            i = self.step(i);
        }
        self.finish();
        self.parsed
    }

    /// Length of the option marker at `i`, if one starts there.
    ///
    /// A marker must be followed by at least one character; a trailing
    /// marker opens nothing.
    fn marker_len(&self, i: usize) -> Option<usize> {
        let next = self.chars.get(i + 1).copied();
        match (self.chars[i], next) {
            (SLASH, Some(_)) => Some(1),
            (DASH, Some(DASH)) => self.chars.get(i + 2).map(|_| 2),
            (DASH, Some(_)) => Some(1),
            _ => None,
        }
    }

    fn next_is_digit(&self, i: usize) -> bool {
        self.chars
            .get(i + 1)
            .map(|c| c.is_ascii_digit())
            .unwrap_or(false)
    }

    /// Processes the character at `i` and returns the next index.
    fn step(&mut self, i: usize) -> usize {
        let c = self.chars[i];
        match self.state {
            State::PrimaryOption | State::SubOption => match c {
                QUOTE => i + 1,
                ' ' if self.word.is_empty() => i + 1,
                ' ' => {
                    self.close_position();
                    i + 1
                }
                SLASH | DASH => match self.marker_len(i) {
                    Some(len) => {
                        self.close_position();
                        self.open_argument();
                        i + len
                    }
                    None => i + 1,
                },
                _ => {
                    self.word.push(c);
                    i + 1
                }
            },

            State::Between => match c {
                SLASH | DASH => match self.marker_len(i) {
                    Some(len) => {
                        self.open_argument();
                        i + len
                    }
                    None => i + 1,
                },
                _ => i + 1,
            },

            State::ArgumentName => match c {
                ' ' | ':' | '=' => {
                    self.state = State::AwaitingValueStart;
                    i + 1
                }
                QUOTE => {
                    self.state = State::QuotedValue;
                    self.quoted = true;
                    i + 1
                }
                SLASH | DASH => {
                    let is_dash_pair = c == DASH && self.chars.get(i + 1) == Some(&DASH);
                    if c == DASH && !is_dash_pair && self.chars.get(i + 1).is_some() {
                        // kebab-case names
                        self.name.push(c);
                        return i + 1;
                    }
                    match self.marker_len(i) {
                        Some(len) => {
                            self.commit();
                            self.open_argument();
                            i + len
                        }
                        None => i + 1,
                    }
                }
                _ => {
                    self.name.push(c);
                    i + 1
                }
            },

            State::AwaitingValueStart => match c {
                ' ' => i + 1,
                QUOTE => {
                    self.state = State::QuotedValue;
                    self.quoted = true;
                    i + 1
                }
                DASH if self.next_is_digit(i) => {
                    self.value.push(c);
                    self.state = State::ArgumentValue;
                    i + 1
                }
                SLASH | DASH => match self.marker_len(i) {
                    Some(len) => {
                        self.commit();
                        self.open_argument();
                        i + len
                    }
                    None => i + 1,
                },
                _ => {
                    self.value.push(c);
                    self.state = State::ArgumentValue;
                    i + 1
                }
            },

            State::ArgumentValue => match c {
                QUOTE => {
                    self.state = State::QuotedValue;
                    self.quoted = true;
                    i + 1
                }
                SLASH | DASH if self.value_marker(i) => match self.marker_len(i) {
                    Some(len) => {
                        self.commit();
                        self.open_argument();
                        i + len
                    }
                    None => {
                        self.value.push(c);
                        i + 1
                    }
                },
                _ => {
                    self.value.push(c);
                    i + 1
                }
            },

            State::QuotedValue => {
                if c == QUOTE {
                    self.commit();
                    self.state = State::Between;
                } else {
                    self.value.push(c);
                }
                i + 1
            }
        }
    }

    /// Decides whether a marker character inside an open value starts the
    /// next argument.
    ///
    /// `/` and `--` always do. A single `-` does only at a word boundary and
    /// when it doesn't start a negative number, so `a-b` and `x -5` stay
    /// literal.
    fn value_marker(&self, i: usize) -> bool {
        let c = self.chars[i];
        if c == SLASH || self.chars.get(i + 1) == Some(&DASH) {
            return true;
        }
        let at_boundary = self.value.ends_with(char::is_whitespace);
        at_boundary && !self.next_is_digit(i)
    }

    fn close_position(&mut self) {
        let word = std::mem::take(&mut self.word);
        match self.state {
            State::PrimaryOption => {
                self.parsed.primary_option = word;
                self.state = State::SubOption;
            }
            State::SubOption => {
                self.parsed.sub_option = word;
                self.state = State::Between;
            }
            _ => {}
        }
    }

    fn open_argument(&mut self) {
        self.name.clear();
        self.value.clear();
        self.quoted = false;
        self.state = State::ArgumentName;
    }

    fn commit(&mut self) {
        let name = std::mem::take(&mut self.name);
        let value = std::mem::take(&mut self.value);
        let quoted = std::mem::replace(&mut self.quoted, false);

        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let value = if quoted {
            value
        } else {
            value.trim().to_string()
        };
        self.parsed.values.insert(self.case.fold(name), value);
    }

    fn finish(&mut self) {
        match self.state {
            State::PrimaryOption | State::SubOption => {
                if !self.word.is_empty() {
                    self.close_position();
                }
            }
            State::Between => {}
            State::ArgumentName
            | State::AwaitingValueStart
            | State::ArgumentValue
            | State::QuotedValue => self.commit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> ParsedArguments {
        tokenize([input], CaseMode::Insensitive)
    }

    #[test]
    fn test_empty_input() {
        let parsed = tokenize(Vec::<String>::new(), CaseMode::Insensitive);
        assert_eq!(parsed, ParsedArguments::default());
    }

    #[test]
    fn test_primary_and_sub_option() {
        let parsed = tokenize(["Plugin", "Add"], CaseMode::Insensitive);
        assert_eq!(parsed.primary_option(), "Plugin");
        assert_eq!(parsed.sub_option(), "Add");
        assert!(parsed.values().is_empty());
    }

    #[test]
    fn test_primary_only() {
        let parsed = parse("Plugin");
        assert_eq!(parsed.primary_option(), "Plugin");
        assert_eq!(parsed.sub_option(), "");
    }

    #[test]
    fn test_marker_closes_positions() {
        let parsed = tokenize(["Plugin", "--q:name"], CaseMode::Insensitive);
        assert_eq!(parsed.primary_option(), "Plugin");
        assert_eq!(parsed.sub_option(), "");
        assert_eq!(parsed.values()["q"], "name");
    }

    #[test]
    fn test_marker_directly_after_word() {
        let parsed = parse("Plugin/name:x");
        assert_eq!(parsed.primary_option(), "Plugin");
        assert_eq!(parsed.values()["name"], "x");
    }

    #[test]
    fn test_mixed_markers_and_separators() {
        let parsed = parse("--test1 test1 value--test2=test2V=alue/test3:test3va:lUE--test-");
        let values = parsed.values();
        assert_eq!(values.len(), 4);
        assert_eq!(values["test1"], "test1 value");
        assert_eq!(values["test2"], "test2V=alue");
        assert_eq!(values["test3"], "test3va:lUE");
        assert_eq!(values["test"], "");
    }

    #[test]
    fn test_negative_value() {
        let parsed = parse("--nv -100");
        assert_eq!(parsed.values()["nv"], "-100");
    }

    #[test]
    fn test_single_dash_arguments() {
        let parsed = parse("-a x -b y");
        assert_eq!(parsed.values()["a"], "x");
        assert_eq!(parsed.values()["b"], "y");
    }

    #[test]
    fn test_flag_followed_by_flag_is_empty() {
        let parsed = parse("-force -name:x");
        assert_eq!(parsed.values()["force"], "");
        assert_eq!(parsed.values()["name"], "x");
    }

    #[test]
    fn test_kebab_name_and_hyphenated_value() {
        let parsed = parse("--dry-run:yes -range 1-5");
        assert_eq!(parsed.values()["dry-run"], "yes");
        assert_eq!(parsed.values()["range"], "1-5");
    }

    #[test]
    fn test_quoted_value_keeps_markers() {
        let parsed = parse(r#"-name:"a -b /c:d=e" -next:1"#);
        assert_eq!(parsed.values()["name"], "a -b /c:d=e");
        assert_eq!(parsed.values()["next"], "1");
    }

    #[test]
    fn test_unterminated_quote_commits() {
        let parsed = parse(r#"-name "open ended -value"#);
        assert_eq!(parsed.values()["name"], "open ended -value");
    }

    #[test]
    fn test_quoted_value_not_trimmed() {
        let parsed = parse(r#"-pad:"  x  ""#);
        assert_eq!(parsed.values()["pad"], "  x  ");
    }

    #[test]
    fn test_trailing_marker_ignored() {
        let parsed = parse("Plugin Add -");
        assert_eq!(parsed.sub_option(), "Add");
        assert!(parsed.values().is_empty());

        let parsed = parse("Plugin Add /");
        assert!(parsed.values().is_empty());
    }

    #[test]
    fn test_keys_folded_by_case_mode() {
        let parsed = tokenize(["-Name:X"], CaseMode::Insensitive);
        assert_eq!(parsed.values()["name"], "X");

        let parsed = tokenize(["-Name:X"], CaseMode::Sensitive);
        assert_eq!(parsed.values()["Name"], "X");
        assert!(!parsed.values().contains_key("name"));
    }

    #[test]
    fn test_last_duplicate_wins() {
        let parsed = parse("-a:1 -a:2");
        assert_eq!(parsed.values()["a"], "2");
    }

    #[test]
    fn test_help_switch() {
        let parsed = parse("Plugin -?");
        assert_eq!(parsed.primary_option(), "Plugin");
        assert_eq!(parsed.values()["?"], "");
    }

    #[test]
    fn test_quotes_split_across_tokens() {
        let parsed = tokenize(["-name", "\"two", "words\""], CaseMode::Insensitive);
        assert_eq!(parsed.values()["name"], "two words");
    }
}
