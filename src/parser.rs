use std::any::Any;
use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::rc::Rc;

use crate::cmd::SubCommand;
use crate::error::ParseError;
use crate::option::{OptionDef, OptionHelp, OptionKind, SetCallback, ValidityFn};
use crate::result::{ParseResult, Resolved};

type ErasedConvert = Rc<dyn Fn(&str) -> Option<Box<dyn Any>>>;

/// One registered option with its value machinery type-erased, so options of
/// different value types share one table.
pub(crate) struct Registered {
    pub(crate) name: String,
    pub(crate) shorthand: char,
    pub(crate) help: OptionHelp,
    on_set: Option<SetCallback>,
    valid_for: ValidityFn,
    /// `Some` for value-taking options: converts the raw text and fires the
    /// per-value callback. `None` from the call means conversion failed.
    convert: Option<ErasedConvert>,
}

impl Registered {
    pub(crate) fn takes_value(&self) -> bool {
        self.convert.is_some()
    }

    fn from_def<E: 'static>(option: &OptionDef<E>) -> Registered {
        let convert = match &option.kind {
            OptionKind::Flag => None,
            OptionKind::Value { converter, on_value } => {
                let converter = Rc::clone(converter);
                let on_value = on_value.clone();
                let erased: ErasedConvert = Rc::new(move |raw| {
                    let value = converter(raw)?;
                    if let Some(callback) = &on_value {
                        callback(&value);
                    }
                    Some(Box::new(value) as Box<dyn Any>)
                });
                Some(erased)
            }
        };
        Registered {
            name: option.name.clone(),
            shorthand: option.shorthand,
            help: option.help.clone(),
            on_set: option.on_set.clone(),
            valid_for: Rc::clone(&option.valid_for),
            convert,
        }
    }
}

/// The parser engine: registered option definitions plus an optional
/// subcommand table, fixed at construction.
///
/// Options are registered with [`OptionParser::add_option`], any number of
/// times, before the first parse. Parsing consumes an argument vector token
/// by token and produces an immutable [`ParseResult`] or a [`ParseError`].
///
/// # Examples
///
/// ```
/// use cliopt::{ConverterRegistry, OptionDef, OptionParser};
///
/// let converters = ConverterRegistry::standard();
/// let verbose = OptionDef::flag("verbose").build().unwrap();
/// let depth = OptionDef::<i32>::with_value("max-depth", &converters)
///     .shorthand('d')
///     .build()
///     .unwrap();
///
/// let mut parser = OptionParser::new();
/// parser.add_option(&verbose);
/// parser.add_option(&depth);
///
/// let result = parser.parse(&["-vd", "3", "src", "doc"]).unwrap();
/// assert_eq!(result.is_set(&verbose), Ok(true));
/// assert_eq!(result.value_of(&depth), Ok(&3));
/// assert_eq!(result.remainder(), ["src", "doc"]);
/// ```
pub struct OptionParser {
    options: Vec<Registered>,
    subcommands: Vec<SubCommand>,
}

impl OptionParser {
    /// Create a parser without a subcommand table: the first non-option token
    /// starts the remainder.
    pub fn new() -> OptionParser {
        OptionParser { options: Vec::new(), subcommands: Vec::new() }
    }

    /// Create a parser that validates the first non-option token against the
    /// given subcommands. An empty table behaves like [`OptionParser::new`].
    pub fn with_subcommands(subcommands: impl IntoIterator<Item = SubCommand>) -> OptionParser {
        OptionParser {
            options: Vec::new(),
            subcommands: subcommands.into_iter().collect(),
        }
    }

    /// Register an option definition.
    ///
    /// Identity is by name: if an option of the same name is already
    /// registered, the first registration stays in place. Registration order
    /// is also the long-option prefix matching order.
    pub fn add_option<E: 'static>(&mut self, option: &OptionDef<E>) {
        if self.options.iter().any(|o| o.name == option.name) {
            return;
        }
        self.options.push(Registered::from_def(option));
    }

    /// The configured subcommand table, in declaration order.
    pub fn subcommands(&self) -> &[SubCommand] {
        &self.subcommands
    }

    pub(crate) fn registered(&self) -> &[Registered] {
        &self.options
    }

    /// Parse the process argument vector, skipping the executable name.
    /// Diagnostics go to stdout.
    pub fn parse_env(&self) -> Result<ParseResult, ParseError> {
        let args: Vec<String> = env::args().skip(1).collect();
        self.parse(&args)
    }

    /// Parse `args`, writing non-fatal diagnostics (unknown options, dropped
    /// values) to stdout.
    pub fn parse<S: AsRef<str>>(&self, args: &[S]) -> Result<ParseResult, ParseError> {
        self.parse_with_diagnostics(args, &mut io::stdout())
    }

    /// Parse `args`, writing non-fatal diagnostics to `diagnostics`.
    ///
    /// Tokens are consumed left to right. `--name` and `--name=value` match
    /// long options by prefix; `-abc` names a chain of shorthands of which at
    /// most one may consume a value, taken from the next token. The first
    /// token that is neither ends option scanning: with a non-empty
    /// subcommand table it must name a subcommand, and everything after it is
    /// passed through verbatim as the remainder. Nothing past that point is
    /// re-interpreted as an option.
    ///
    /// # Error
    ///
    /// See [`ParseError`] for the conditions that abort parsing. Unknown
    /// options are not among them: they produce a diagnostic line and the
    /// scan continues.
    pub fn parse_with_diagnostics<S, W>(
        &self,
        args: &[S],
        diagnostics: &mut W,
    ) -> Result<ParseResult, ParseError>
    where
        S: AsRef<str>,
        W: Write,
    {
        let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
        let mut values: HashMap<String, Resolved> = HashMap::new();
        let mut subcommand: Option<String> = None;
        let mut remainder: Vec<String> = Vec::new();

        let mut i = 0;
        while i < args.len() {
            let arg = args[i];
            if let Some(body) = arg.strip_prefix("--") {
                self.scan_long_option(body, &mut values, diagnostics)?;
            } else if let Some(chain) = arg.strip_prefix('-') {
                i = self.scan_short_chain(arg, chain, &args, i, &mut values, diagnostics)?;
            } else {
                if !self.subcommands.is_empty() {
                    if !self.subcommands.iter().any(|s| s.name() == arg) {
                        return Err(ParseError::NoMatchingSubcommand(arg.to_owned()));
                    }
                    subcommand = Some(arg.to_owned());
                }
                // The remainder is contiguous from here on.
                let first = if self.subcommands.is_empty() { i } else { i + 1 };
                remainder.extend(args[first..].iter().map(|s| (*s).to_owned()));
                break;
            }
            i += 1;
        }

        let matched = subcommand.as_deref();
        for option in &self.options {
            if values.contains_key(&option.name) && !(option.valid_for)(matched) {
                values.remove(&option.name);
                let _ = match matched {
                    Some(sub) => writeln!(
                        diagnostics,
                        "Option '--{}' is not valid for subcommand '{}', ignoring it",
                        option.name, sub
                    ),
                    None => writeln!(
                        diagnostics,
                        "Option '--{}' is not valid here, ignoring it",
                        option.name
                    ),
                };
            }
        }

        let registered = self.options.iter().map(|o| o.name.clone()).collect();
        Ok(ParseResult::new(values, subcommand, remainder, registered))
    }

    /// Handle one `--body` token. The first registered option whose name is a
    /// prefix of `body` is the candidate; flags additionally require an exact
    /// match, letting a longer-named option still claim the token.
    fn scan_long_option<W: Write>(
        &self,
        body: &str,
        values: &mut HashMap<String, Resolved>,
        diagnostics: &mut W,
    ) -> Result<(), ParseError> {
        for option in &self.options {
            if !body.starts_with(option.name.as_str()) {
                continue;
            }
            if let Some(convert) = &option.convert {
                let rest = &body[option.name.len()..];
                let raw = match rest.strip_prefix('=') {
                    Some(raw) if !raw.is_empty() => raw,
                    _ => return Err(ParseError::MissingValue(option.name.clone())),
                };
                if values.contains_key(&option.name) {
                    return Err(ParseError::DuplicateOption(option.name.clone()));
                }
                convert_and_record(option, convert, raw, values, diagnostics);
            } else {
                if option.name != body {
                    continue;
                }
                if values.contains_key(&option.name) {
                    return Err(ParseError::DuplicateOption(option.name.clone()));
                }
                if let Some(callback) = &option.on_set {
                    callback();
                }
                values.insert(option.name.clone(), Resolved::Flag);
            }
            return Ok(());
        }
        let _ = writeln!(diagnostics, "Unknown long option supplied: '--{body}'");
        Ok(())
    }

    /// Handle one `-chain` token, resolving each character against the
    /// registered shorthands. Returns the cursor, advanced past any token
    /// consumed as a value.
    fn scan_short_chain<W: Write>(
        &self,
        token: &str,
        chain: &str,
        args: &[&str],
        mut i: usize,
        values: &mut HashMap<String, Resolved>,
        diagnostics: &mut W,
    ) -> Result<usize, ParseError> {
        let mut value_consumed = false;
        'chars: for c in chain.chars() {
            for option in &self.options {
                if option.shorthand != c {
                    continue;
                }
                if values.contains_key(&option.name) {
                    return Err(ParseError::DuplicateOption(option.name.clone()));
                }
                if let Some(convert) = &option.convert {
                    if value_consumed {
                        return Err(ParseError::ArgGroupingConflict(token.to_owned()));
                    }
                    let Some(raw) = args.get(i + 1) else {
                        return Err(ParseError::MissingValue(option.name.clone()));
                    };
                    i += 1;
                    convert_and_record(option, convert, raw, values, diagnostics);
                    value_consumed = true;
                } else {
                    if let Some(callback) = &option.on_set {
                        callback();
                    }
                    values.insert(option.name.clone(), Resolved::Flag);
                }
                continue 'chars;
            }
            let _ = writeln!(diagnostics, "Unknown short option supplied: '-{c}'");
        }
        Ok(i)
    }
}

impl Default for OptionParser {
    fn default() -> Self {
        OptionParser::new()
    }
}

/// Convert `raw` and record the result. A failed conversion drops the option
/// with a diagnostic instead of aborting the parse; callbacks only fire for
/// values that actually converted.
fn convert_and_record<W: Write>(
    option: &Registered,
    convert: &ErasedConvert,
    raw: &str,
    values: &mut HashMap<String, Resolved>,
    diagnostics: &mut W,
) {
    match convert(raw) {
        Some(value) => {
            if let Some(callback) = &option.on_set {
                callback();
            }
            values.insert(option.name.clone(), Resolved::Value(value));
        }
        None => {
            let _ = writeln!(
                diagnostics,
                "Value '{}' for option '--{}' could not be converted, ignoring it",
                raw, option.name
            );
        }
    }
}
