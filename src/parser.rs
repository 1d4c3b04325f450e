use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::scanner::{self, Cursor, Scan};
use crate::{AnyOpt, HasArg, ScanResult};

/// One long option as handed to the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEntry {
    /// Long spelling, without the leading `--`
    pub name: String,
    /// Whether the option takes a value
    pub has_arg: HasArg,
    /// Short spelling, also the key short matches are reported by
    pub key: char,
}

impl TableEntry {
    pub fn new(name: impl Into<String>, has_arg: HasArg, key: char) -> Self {
        Self {
            name: name.into(),
            has_arg,
            key,
        }
    }
}

/// Scanner tables built from a list of options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionTable {
    /// Long option table, in declaration order
    entries: Vec<TableEntry>,
    /// Short code of each option, in declaration order
    short_index: Vec<char>,
    /// getopt option string, e.g. `"es:p::"`
    shortopts: String,
}

impl OptionTable {
    /// Build the tables, rejecting options that can't be told apart
    pub fn new(opts: &[AnyOpt]) -> Result<Self> {
        let mut entries: Vec<TableEntry> = Vec::with_capacity(opts.len());
        let mut short_index = Vec::with_capacity(opts.len());
        let mut shortopts = String::new();

        for opt in opts {
            let name = opt.name();
            let short = opt.short();

            if !valid_name(name) {
                return Err(Error::InvalidName {
                    name: name.to_string(),
                });
            }
            if !valid_short(short) {
                return Err(Error::InvalidShort {
                    name: name.to_string(),
                    short,
                });
            }
            if entries.iter().any(|e| e.name == name) {
                return Err(Error::DuplicateName {
                    name: name.to_string(),
                });
            }
            if let Some(first) = short_index.iter().position(|&k| k == short) {
                return Err(Error::DuplicateShort {
                    short,
                    first: entries[first].name.clone(),
                    second: name.to_string(),
                });
            }

            entries.push(TableEntry::new(name, opt.has_arg(), short));
            short_index.push(short);

            shortopts.push(short);
            match opt.has_arg() {
                HasArg::No => {}
                HasArg::Required => shortopts.push(':'),
                HasArg::Optional => shortopts.push_str("::"),
            }
        }

        trace!(%shortopts, options = entries.len(), "built option table");

        Ok(Self {
            entries,
            short_index,
            shortopts,
        })
    }

    /// The long option table
    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    /// The getopt option string
    pub fn shortopts(&self) -> &str {
        &self.shortopts
    }

    /// Position of the option owning a short code
    pub fn resolve_key(&self, key: char) -> Option<usize> {
        self.short_index.iter().position(|&k| k == key)
    }
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii() && !c.is_ascii_whitespace() && !c.is_ascii_control() && c != '=')
}

fn valid_short(short: char) -> bool {
    short.is_ascii_graphic() && !matches!(short, '-' | ':' | '?' | '=')
}

/// Scan options from `args` into `opts`.
///
/// Scanning starts at `cursor` and leaves it at the first residual argument,
/// so a second call with the same cursor continues where this one stopped.
/// Every option matched before an error stays applied; the option that
/// failed to convert is left untouched.
pub fn process_options<S: AsRef<str>>(
    cursor: &mut Cursor,
    args: &[S],
    opts: &mut [AnyOpt],
) -> Result<ScanResult> {
    let table = OptionTable::new(opts)?;

    loop {
        let (index, value) = match scanner::next(cursor, args, &table.shortopts, &table.entries) {
            Scan::End => {
                debug!(residual = cursor.index(), "no more options");
                return Ok(ScanResult::NoMoreArgs(cursor.index()));
            }
            Scan::Long { index, value } => (index, value),
            Scan::Short { key, value } => {
                let index = table
                    .resolve_key(key)
                    .ok_or(Error::UnregisteredKey { key })?;
                (index, value)
            }
            Scan::Unknown { option } => return Err(Error::UnknownOption { option }),
            Scan::MissingValue { option } => return Err(Error::MissingValue { name: option }),
            Scan::UnexpectedValue { option, value } => {
                return Err(Error::UnexpectedValue {
                    name: option,
                    value,
                });
            }
            Scan::Ambiguous { option, candidates } => {
                return Err(Error::AmbiguousOption { option, candidates });
            }
        };

        let opt = &mut opts[index];
        let text = match opt.has_arg() {
            HasArg::No => None,
            HasArg::Optional | HasArg::Required => value,
        };
        opt.apply(text)?;

        debug!(option = opt.name(), seen = opt.seen(), value = %opt, "matched option");
    }
}
