use crate::HasArg;
use crate::parser::TableEntry;

/// Position of the scanner in an argument vector.
///
/// The cursor outlives a single [`crate::process_options`] call: passing the
/// same cursor again resumes scanning where the previous call stopped,
/// including in the middle of a cluster of short options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Index of the argument being scanned (`optind`)
    index: usize,
    /// Byte offset into a short option cluster, 0 when between arguments
    offset: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursor {
    /// A cursor positioned after the program name
    pub fn new() -> Self {
        Self::at(1)
    }

    /// A cursor positioned at the given argument
    pub fn at(index: usize) -> Self {
        Self { index, offset: 0 }
    }

    /// Index of the next argument to scan
    pub fn index(&self) -> usize {
        self.index
    }

    /// Restart scanning after the program name
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn advance(&mut self) {
        self.index += 1;
        self.offset = 0;
    }
}

/// One step of the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scan<'a> {
    /// No more options; the cursor points at the first residual argument
    End,
    /// A long option, identified by its table index
    Long { index: usize, value: Option<&'a str> },
    /// A short option, identified only by its dispatch key
    Short { key: char, value: Option<&'a str> },
    Unknown { option: String },
    MissingValue { option: String },
    UnexpectedValue { option: String, value: String },
    Ambiguous { option: String, candidates: Vec<String> },
}

/// Scan the next option from `args`.
///
/// `shortopts` is a getopt option string (`"es:p::"`) and `longopts` the
/// long option table. Scanning stops at the first non-option argument.
pub(crate) fn next<'a, S: AsRef<str>>(
    cursor: &mut Cursor,
    args: &'a [S],
    shortopts: &str,
    longopts: &[TableEntry],
) -> Scan<'a> {
    if cursor.offset > 0 {
        let in_cluster = args
            .get(cursor.index)
            .and_then(|arg| arg.as_ref().get(cursor.offset..))
            .is_some_and(|rest| !rest.is_empty());
        if in_cluster {
            return short(cursor, args, shortopts);
        }
        cursor.advance();
    }

    let Some(arg) = args.get(cursor.index).map(|arg| arg.as_ref()) else {
        return Scan::End;
    };

    if arg == "--" {
        cursor.advance();
        return Scan::End;
    }
    if arg == "-" || !arg.starts_with('-') {
        return Scan::End;
    }

    if let Some(rest) = arg.strip_prefix("--") {
        cursor.advance();
        return long(cursor, args, rest, longopts);
    }

    cursor.offset = 1;
    short(cursor, args, shortopts)
}

fn long<'a, S: AsRef<str>>(
    cursor: &mut Cursor,
    args: &'a [S],
    rest: &'a str,
    longopts: &[TableEntry],
) -> Scan<'a> {
    let (name, inline) = match rest.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (rest, None),
    };

    let index = match resolve_long(name, longopts) {
        Ok(index) => index,
        Err(scan) => return scan,
    };
    let entry = &longopts[index];

    match (entry.has_arg, inline) {
        (HasArg::No, Some(value)) => Scan::UnexpectedValue {
            option: format!("--{}", entry.name),
            value: value.to_string(),
        },
        (HasArg::No, None) => Scan::Long { index, value: None },
        (HasArg::Optional, value) => Scan::Long { index, value },
        (HasArg::Required, Some(value)) => Scan::Long {
            index,
            value: Some(value),
        },
        (HasArg::Required, None) => match args.get(cursor.index) {
            Some(value) => {
                cursor.advance();
                Scan::Long {
                    index,
                    value: Some(value.as_ref()),
                }
            }
            None => Scan::MissingValue {
                option: format!("--{}", entry.name),
            },
        },
    }
}

/// Find a long option by exact name or unique prefix
fn resolve_long<'a>(name: &str, longopts: &[TableEntry]) -> Result<usize, Scan<'a>> {
    if let Some(index) = longopts.iter().position(|e| e.name == name) {
        return Ok(index);
    }

    let candidates: Vec<usize> = if name.is_empty() {
        Vec::new()
    } else {
        longopts
            .iter()
            .enumerate()
            .filter(|(_, e)| e.name.starts_with(name))
            .map(|(i, _)| i)
            .collect()
    };

    match candidates.as_slice() {
        [] => Err(Scan::Unknown {
            option: format!("--{}", name),
        }),
        [index] => Ok(*index),
        _ => Err(Scan::Ambiguous {
            option: format!("--{}", name),
            candidates: candidates
                .iter()
                .map(|&i| longopts[i].name.clone())
                .collect(),
        }),
    }
}

fn short<'a, S: AsRef<str>>(cursor: &mut Cursor, args: &'a [S], shortopts: &str) -> Scan<'a> {
    let arg: &'a str = args[cursor.index].as_ref();
    let Some(key) = arg[cursor.offset..].chars().next() else {
        cursor.advance();
        return Scan::End;
    };
    cursor.offset += key.len_utf8();

    let tail = &arg[cursor.offset..];
    let last_in_cluster = tail.is_empty();

    let Some(has_arg) = short_policy(shortopts, key) else {
        if last_in_cluster {
            cursor.advance();
        }
        return Scan::Unknown {
            option: format!("-{}", key),
        };
    };

    match has_arg {
        HasArg::No => {
            if last_in_cluster {
                cursor.advance();
            }
            Scan::Short { key, value: None }
        }
        HasArg::Optional => {
            cursor.advance();
            Scan::Short {
                key,
                value: (!last_in_cluster).then_some(tail),
            }
        }
        HasArg::Required if !last_in_cluster => {
            cursor.advance();
            Scan::Short {
                key,
                value: Some(tail),
            }
        }
        HasArg::Required => {
            cursor.advance();
            match args.get(cursor.index) {
                Some(value) => {
                    cursor.advance();
                    Scan::Short {
                        key,
                        value: Some(value.as_ref()),
                    }
                }
                None => Scan::MissingValue {
                    option: format!("-{}", key),
                },
            }
        }
    }
}

/// Look up a key in a getopt option string.
///
/// One trailing colon marks a required value, two an optional one.
pub(crate) fn short_policy(shortopts: &str, key: char) -> Option<HasArg> {
    if key == ':' {
        return None;
    }

    let mut chars = shortopts.chars().peekable();
    while let Some(c) = chars.next() {
        let mut colons = 0;
        while colons < 2 && chars.next_if_eq(&':').is_some() {
            colons += 1;
        }
        if c == key {
            return Some(match colons {
                0 => HasArg::No,
                1 => HasArg::Required,
                _ => HasArg::Optional,
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Vec<TableEntry> {
        vec![
            TableEntry::new("enable", HasArg::No, 'e'),
            TableEntry::new("start", HasArg::Required, 's'),
            TableEntry::new("level", HasArg::Optional, 'l'),
            TableEntry::new("stop", HasArg::No, 'x'),
        ]
    }

    const SHORTOPTS: &str = "es:l::x";

    fn scan_all<'a>(cursor: &mut Cursor, args: &'a [&'a str]) -> Vec<Scan<'a>> {
        let longopts = table();
        let mut out = Vec::new();
        loop {
            let scan = next(cursor, args, SHORTOPTS, &longopts);
            let done = scan == Scan::End;
            out.push(scan);
            if done {
                return out;
            }
        }
    }

    #[test]
    fn option_string_policies() {
        assert_eq!(short_policy(SHORTOPTS, 'e'), Some(HasArg::No));
        assert_eq!(short_policy(SHORTOPTS, 's'), Some(HasArg::Required));
        assert_eq!(short_policy(SHORTOPTS, 'l'), Some(HasArg::Optional));
        assert_eq!(short_policy(SHORTOPTS, 'x'), Some(HasArg::No));
        assert_eq!(short_policy(SHORTOPTS, 'q'), None);
        assert_eq!(short_policy(SHORTOPTS, ':'), None);
    }

    #[test]
    fn short_cluster_with_attached_value() {
        let args = ["prog", "-es42", "rest"];
        let mut cursor = Cursor::new();
        let scans = scan_all(&mut cursor, &args);

        assert_eq!(
            scans,
            vec![
                Scan::Short { key: 'e', value: None },
                Scan::Short { key: 's', value: Some("42") },
                Scan::End,
            ]
        );
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn short_value_in_next_argument() {
        let args = ["prog", "-s", "-7", "-l", "-l3"];
        let mut cursor = Cursor::new();
        let scans = scan_all(&mut cursor, &args);

        assert_eq!(
            scans,
            vec![
                Scan::Short { key: 's', value: Some("-7") },
                Scan::Short { key: 'l', value: None },
                Scan::Short { key: 'l', value: Some("3") },
                Scan::End,
            ]
        );
        assert_eq!(cursor.index(), 5);
    }

    #[test]
    fn long_forms() {
        let args = ["prog", "--start=1", "--start", "2", "--level", "--level=9", "--ena"];
        let mut cursor = Cursor::new();
        let scans = scan_all(&mut cursor, &args);

        assert_eq!(
            scans,
            vec![
                Scan::Long { index: 1, value: Some("1") },
                Scan::Long { index: 1, value: Some("2") },
                Scan::Long { index: 2, value: None },
                Scan::Long { index: 2, value: Some("9") },
                Scan::Long { index: 0, value: None },
                Scan::End,
            ]
        );
    }

    #[test]
    fn ambiguous_prefix() {
        let args = ["prog", "--st"];
        let mut cursor = Cursor::new();

        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &table()),
            Scan::Ambiguous {
                option: "--st".into(),
                candidates: vec!["start".into(), "stop".into()],
            }
        );
    }

    #[test]
    fn long_errors() {
        let longopts = table();
        let mut cursor = Cursor::new();

        let args = ["prog", "--enable=yes", "--bogus", "--start"];
        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &longopts),
            Scan::UnexpectedValue {
                option: "--enable".into(),
                value: "yes".into(),
            }
        );
        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &longopts),
            Scan::Unknown {
                option: "--bogus".into(),
            }
        );
        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &longopts),
            Scan::MissingValue {
                option: "--start".into(),
            }
        );
    }

    #[test]
    fn unknown_short_in_cluster_keeps_scanning() {
        let args = ["prog", "-qe"];
        let mut cursor = Cursor::new();

        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &table()),
            Scan::Unknown {
                option: "-q".into(),
            }
        );
        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &table()),
            Scan::Short { key: 'e', value: None }
        );
    }

    #[test]
    fn terminators() {
        let mut cursor = Cursor::new();
        assert_eq!(scan_all(&mut cursor, &["prog", "-", "-e"]), vec![Scan::End]);
        assert_eq!(cursor.index(), 1);

        let mut cursor = Cursor::new();
        assert_eq!(scan_all(&mut cursor, &["prog", "--", "-e"]), vec![Scan::End]);
        assert_eq!(cursor.index(), 2);

        let mut cursor = Cursor::new();
        assert_eq!(scan_all(&mut cursor, &["prog", "file", "-e"]), vec![Scan::End]);
        assert_eq!(cursor.index(), 1);

        let mut cursor = Cursor::new();
        assert_eq!(scan_all(&mut cursor, &["prog"]), vec![Scan::End]);
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn resumes_inside_cluster() {
        let args = ["prog", "-ex"];
        let longopts = table();
        let mut cursor = Cursor::new();

        assert_eq!(
            next(&mut cursor, &args, SHORTOPTS, &longopts),
            Scan::Short { key: 'e', value: None }
        );
        let mut resumed = cursor;
        assert_eq!(
            next(&mut resumed, &args, SHORTOPTS, &longopts),
            Scan::Short { key: 'x', value: None }
        );
        assert_eq!(resumed.index(), 2);
    }

    #[test]
    fn stale_offset_is_dropped() {
        let longopts = table();
        let mut cursor = Cursor::new();
        let long_cluster = ["prog", "-exe"];
        next(&mut cursor, &long_cluster, SHORTOPTS, &longopts);
        next(&mut cursor, &long_cluster, SHORTOPTS, &longopts);

        let shorter = ["prog", "-e", "-x"];
        assert_eq!(
            next(&mut cursor, &shorter, SHORTOPTS, &longopts),
            Scan::Short { key: 'x', value: None }
        );
    }
}
