use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt::{self, Debug, Formatter};

use crate::error::UsageError;
use crate::option::OptionDef;

/// How one option ended up in the result: a bare flag presence, or a
/// converted value with its concrete type erased.
pub(crate) enum Resolved {
    Flag,
    Value(Box<dyn Any>),
}

/// The immutable outcome of one parse call.
///
/// Holds the resolved options with their converted values, the matched
/// subcommand (if a subcommand table was configured and matched) and the
/// remainder tokens that followed the point where option scanning stopped.
/// Results are snapshots; they are never merged across parse calls.
///
/// Queries go through the same [`OptionDef`] values that were registered with
/// the parser. Querying with a descriptor the parser never saw is a
/// [`UsageError`], not a silent miss.
pub struct ParseResult {
    values: HashMap<String, Resolved>,
    subcommand: Option<String>,
    remainder: Vec<String>,
    registered: HashSet<String>,
}

impl ParseResult {
    pub(crate) fn new(
        values: HashMap<String, Resolved>,
        subcommand: Option<String>,
        remainder: Vec<String>,
        registered: HashSet<String>,
    ) -> ParseResult {
        ParseResult { values, subcommand, remainder, registered }
    }

    /// Whether `option` was recognized during the parse, regardless of
    /// whether it carries a value.
    ///
    /// # Error
    ///
    /// Fails with [`UsageError::UnknownOption`] if `option` was never
    /// registered with the parser that produced this result.
    pub fn is_set<E>(&self, option: &OptionDef<E>) -> Result<bool, UsageError> {
        if !self.registered.contains(option.name()) {
            return Err(UsageError::UnknownOption(option.name().to_owned()));
        }
        Ok(self.values.contains_key(option.name()))
    }

    /// The converted value of a value-taking option.
    ///
    /// # Error
    ///
    /// Fails if `option` was never registered, takes no value, was not set in
    /// this parse call, or declares a different value type than the
    /// registered descriptor of the same name.
    pub fn value_of<E: 'static>(&self, option: &OptionDef<E>) -> Result<&E, UsageError> {
        if !self.registered.contains(option.name()) {
            return Err(UsageError::UnknownOption(option.name().to_owned()));
        }
        if !option.takes_value() {
            return Err(UsageError::TakesNoValue(option.name().to_owned()));
        }
        match self.values.get(option.name()) {
            Some(Resolved::Value(value)) => value
                .downcast_ref::<E>()
                .ok_or_else(|| UsageError::ValueTypeMismatch(option.name().to_owned())),
            Some(Resolved::Flag) => Err(UsageError::ValueTypeMismatch(option.name().to_owned())),
            None => Err(UsageError::NotSet(option.name().to_owned())),
        }
    }

    /// The matched subcommand name, if a subcommand table was configured and
    /// the command line named one.
    pub fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    /// The tokens following the point where option scanning stopped, in
    /// their original order.
    pub fn remainder(&self) -> &[String] {
        &self.remainder
    }
}

impl Debug for ParseResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut set: Vec<&str> = self.values.keys().map(String::as_str).collect();
        set.sort_unstable();
        f.debug_struct("ParseResult")
            .field("set_options", &set)
            .field("subcommand", &self.subcommand)
            .field("remainder", &self.remainder)
            .finish()
    }
}

#[cfg(test)]
mod test {
    use crate::convert::ConverterRegistry;
    use crate::error::UsageError;
    use crate::option::OptionDef;
    use crate::parser::OptionParser;

    #[test]
    fn test_query_with_unregistered_descriptor_is_a_usage_error() {
        let verbose = OptionDef::flag("verbose").build().unwrap();
        let stranger = OptionDef::flag("stranger").build().unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&verbose);
        let result = parser.parse(&["--verbose"]).unwrap();

        assert_eq!(result.is_set(&verbose), Ok(true));
        assert_eq!(
            result.is_set(&stranger),
            Err(UsageError::UnknownOption("stranger".to_string()))
        );
    }

    #[test]
    fn test_value_of_flag_is_a_usage_error() {
        let verbose = OptionDef::flag("verbose").build().unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&verbose);
        let result = parser.parse(&["--verbose"]).unwrap();

        assert_eq!(
            result.value_of(&verbose),
            Err(UsageError::TakesNoValue("verbose".to_string()))
        );
    }

    #[test]
    fn test_value_of_unset_option_is_a_usage_error() {
        let converters = ConverterRegistry::standard();
        let depth = OptionDef::<i32>::with_value("depth", &converters).build().unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&depth);
        let result = parser.parse::<&str>(&[]).unwrap();

        assert_eq!(result.is_set(&depth), Ok(false));
        assert_eq!(result.value_of(&depth), Err(UsageError::NotSet("depth".to_string())));
    }

    #[test]
    fn test_value_of_with_wrong_type_is_a_usage_error() {
        let converters = ConverterRegistry::standard();
        let depth = OptionDef::<i32>::with_value("depth", &converters).build().unwrap();
        let imposter = OptionDef::<i64>::with_value("depth", &converters).build().unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&depth);
        let result = parser.parse(&["--depth=3"]).unwrap();

        assert_eq!(result.value_of(&depth), Ok(&3));
        assert_eq!(
            result.value_of(&imposter),
            Err(UsageError::ValueTypeMismatch("depth".to_string()))
        );
    }
}
