use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::convert::{ConvertFn, ConverterRegistry};
use crate::error::UsageError;

pub(crate) type SetCallback = Rc<dyn Fn()>;
pub(crate) type ValueCallback<E> = Rc<dyn Fn(&E)>;
pub(crate) type ValidityFn = Rc<dyn Fn(Option<&str>) -> bool>;

/// Display metadata for one option: the help text plus the placeholder name
/// shown for its value, e.g. `FILE` in `--output=FILE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionHelp {
    pub(crate) text: String,
    pub(crate) value_name: String,
}

impl OptionHelp {
    /// The human readable description of the option.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The placeholder name for the option value. Empty for flags.
    pub fn value_name(&self) -> &str {
        &self.value_name
    }
}

/// What an option does when it is recognized: either it is a bare flag, or it
/// consumes a value that runs through its converter.
pub(crate) enum OptionKind<E> {
    Flag,
    Value {
        converter: ConvertFn<E>,
        on_value: Option<ValueCallback<E>>,
    },
}

impl<E> Clone for OptionKind<E> {
    fn clone(&self) -> Self {
        match self {
            OptionKind::Flag => OptionKind::Flag,
            OptionKind::Value { converter, on_value } => OptionKind::Value {
                converter: Rc::clone(converter),
                on_value: on_value.clone(),
            },
        }
    }
}

/// The immutable declaration of one command line option.
///
/// An `OptionDef` carries the option's identity (long name and one-character
/// shorthand), whether it takes a value, the converter and callbacks for that
/// value, display metadata and an optional subcommand validity restriction.
/// `E` is the type of the option value; flags use `OptionDef<()>`.
///
/// Definitions are created through [`OptionDef::flag`] and
/// [`OptionDef::with_value`] and never mutated afterwards. Two definitions
/// with the same name are the same option, regardless of every other field.
///
/// # Examples
///
/// ```
/// use cliopt::{ConverterRegistry, OptionDef};
///
/// let converters = ConverterRegistry::standard();
///
/// let verbose = OptionDef::flag("verbose")
///     .description("print more output")
///     .build()
///     .unwrap();
///
/// let depth = OptionDef::<i32>::with_value("max-depth", &converters)
///     .shorthand('d')
///     .description_with_value_name("descend at most this deep", "N")
///     .build()
///     .unwrap();
///
/// assert_eq!(verbose.shorthand(), 'v');
/// assert!(depth.takes_value());
/// ```
pub struct OptionDef<E = ()> {
    pub(crate) name: String,
    pub(crate) shorthand: char,
    pub(crate) help: OptionHelp,
    pub(crate) on_set: Option<SetCallback>,
    pub(crate) valid_for: ValidityFn,
    pub(crate) kind: OptionKind<E>,
}

impl OptionDef<()> {
    /// Start building an option that takes no value.
    pub fn flag(name: &str) -> FlagOptionBuilder {
        FlagOptionBuilder {
            name: name.to_owned(),
            shorthand: None,
            help_text: String::new(),
            on_set: None,
            valid_for: None,
        }
    }
}

impl<E: 'static> OptionDef<E> {
    /// Start building an option that takes a value of type `E`.
    ///
    /// The default converter for `E` is resolved from `converters` at this
    /// point; [`ValueOptionBuilder::converter`] overrides it. If the registry
    /// has no converter for `E` and none is supplied, `build()` fails with
    /// [`UsageError::MissingConverter`].
    pub fn with_value(name: &str, converters: &ConverterRegistry) -> ValueOptionBuilder<E> {
        ValueOptionBuilder {
            name: name.to_owned(),
            shorthand: None,
            help_text: String::new(),
            value_name: "VALUE".to_owned(),
            converter: converters.converter_for::<E>(),
            on_value: None,
            on_set: None,
            valid_for: None,
        }
    }
}

impl<E> OptionDef<E> {
    /// The long name, as matched in `--name` form.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The one-character shorthand, as matched in `-n` chains.
    pub fn shorthand(&self) -> char {
        self.shorthand
    }

    /// Whether the option consumes a value.
    pub fn takes_value(&self) -> bool {
        matches!(self.kind, OptionKind::Value { .. })
    }

    /// The display metadata for help output.
    pub fn help(&self) -> &OptionHelp {
        &self.help
    }
}

impl<E> Clone for OptionDef<E> {
    fn clone(&self) -> Self {
        OptionDef {
            name: self.name.clone(),
            shorthand: self.shorthand,
            help: self.help.clone(),
            on_set: self.on_set.clone(),
            valid_for: Rc::clone(&self.valid_for),
            kind: self.kind.clone(),
        }
    }
}

impl<E> PartialEq for OptionDef<E> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E> Eq for OptionDef<E> {}

impl<E> Hash for OptionDef<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl<E> Debug for OptionDef<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("name", &self.name)
            .field("shorthand", &self.shorthand)
            .field("takes_value", &self.takes_value())
            .finish()
    }
}

/// A builder struct for flag options, created by [`OptionDef::flag`].
pub struct FlagOptionBuilder {
    name: String,
    shorthand: Option<char>,
    help_text: String,
    on_set: Option<SetCallback>,
    valid_for: Option<Vec<String>>,
}

impl FlagOptionBuilder {
    /// Set the shorthand character. Defaults to the first character of the
    /// long name.
    pub fn shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Set the help text.
    pub fn description(mut self, text: &str) -> Self {
        self.help_text = text.to_owned();
        self
    }

    /// Set the callback run whenever the option is recognized.
    pub fn when_set(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_set = Some(Rc::new(callback));
        self
    }

    /// Restrict the option to the given subcommands. An absent subcommand
    /// always passes the restriction.
    pub fn valid_for(mut self, subcommands: &[&str]) -> Self {
        self.valid_for = Some(subcommands.iter().map(|s| (*s).to_owned()).collect());
        self
    }

    /// Materialize the immutable [`OptionDef`].
    ///
    /// # Error
    ///
    /// Fails if the name is empty or contains a space, or the shorthand is a
    /// space.
    pub fn build(self) -> Result<OptionDef<()>, UsageError> {
        let (name, shorthand) = validate_identity(self.name, self.shorthand)?;
        Ok(OptionDef {
            name,
            shorthand,
            help: OptionHelp { text: self.help_text, value_name: String::new() },
            on_set: self.on_set,
            valid_for: validity(self.valid_for),
            kind: OptionKind::Flag,
        })
    }
}

/// A builder struct for value-taking options, created by
/// [`OptionDef::with_value`].
pub struct ValueOptionBuilder<E> {
    name: String,
    shorthand: Option<char>,
    help_text: String,
    value_name: String,
    converter: Option<ConvertFn<E>>,
    on_value: Option<ValueCallback<E>>,
    on_set: Option<SetCallback>,
    valid_for: Option<Vec<String>>,
}

impl<E: 'static> ValueOptionBuilder<E> {
    /// Set the shorthand character. Defaults to the first character of the
    /// long name.
    pub fn shorthand(mut self, shorthand: char) -> Self {
        self.shorthand = Some(shorthand);
        self
    }

    /// Set the help text. The value placeholder stays at its default,
    /// `"VALUE"`.
    pub fn description(mut self, text: &str) -> Self {
        self.help_text = text.to_owned();
        self
    }

    /// Set the help text together with the placeholder name shown for the
    /// value, e.g. `FILE` in `--output=FILE`.
    pub fn description_with_value_name(mut self, text: &str, value_name: &str) -> Self {
        self.help_text = text.to_owned();
        self.value_name = value_name.to_owned();
        self
    }

    /// Replace the converter resolved from the registry.
    pub fn converter(mut self, convert: impl Fn(&str) -> Option<E> + 'static) -> Self {
        self.converter = Some(Rc::new(convert));
        self
    }

    /// Set the callback run with each converted value.
    pub fn on_value(mut self, callback: impl Fn(&E) + 'static) -> Self {
        self.on_value = Some(Rc::new(callback));
        self
    }

    /// Set the callback run whenever the option is recognized, after any
    /// value callback.
    pub fn when_set(mut self, callback: impl Fn() + 'static) -> Self {
        self.on_set = Some(Rc::new(callback));
        self
    }

    /// Restrict the option to the given subcommands. An absent subcommand
    /// always passes the restriction.
    pub fn valid_for(mut self, subcommands: &[&str]) -> Self {
        self.valid_for = Some(subcommands.iter().map(|s| (*s).to_owned()).collect());
        self
    }

    /// Materialize the immutable [`OptionDef`].
    ///
    /// # Error
    ///
    /// Fails if the name is empty or contains a space, the shorthand is a
    /// space, or no converter is available for `E`.
    pub fn build(self) -> Result<OptionDef<E>, UsageError> {
        let (name, shorthand) = validate_identity(self.name, self.shorthand)?;
        let Some(converter) = self.converter else {
            return Err(UsageError::MissingConverter(name));
        };
        Ok(OptionDef {
            name,
            shorthand,
            help: OptionHelp { text: self.help_text, value_name: self.value_name },
            on_set: self.on_set,
            valid_for: validity(self.valid_for),
            kind: OptionKind::Value { converter, on_value: self.on_value },
        })
    }
}

fn validate_identity(name: String, shorthand: Option<char>) -> Result<(String, char), UsageError> {
    let Some(first) = name.chars().next() else {
        return Err(UsageError::EmptyName);
    };
    if name.contains(' ') {
        return Err(UsageError::NameContainsSpace(name));
    }
    let shorthand = shorthand.unwrap_or(first);
    if shorthand == ' ' {
        return Err(UsageError::SpaceShorthand);
    }
    Ok((name, shorthand))
}

fn validity(subcommands: Option<Vec<String>>) -> ValidityFn {
    match subcommands {
        None => Rc::new(|_| true),
        Some(set) => Rc::new(move |subcommand| {
            subcommand.map_or(true, |name| set.iter().any(|s| s == name))
        }),
    }
}

#[cfg(test)]
mod test {
    use crate::convert::ConverterRegistry;
    use crate::error::UsageError;
    use crate::option::OptionDef;

    #[test]
    fn test_name_validation() {
        assert!(OptionDef::flag("verbose").build().is_ok());
        assert!(OptionDef::flag("x").build().is_ok());
        assert_eq!(OptionDef::flag("").build(), Err(UsageError::EmptyName));
        assert_eq!(
            OptionDef::flag("two words").build(),
            Err(UsageError::NameContainsSpace("two words".to_string()))
        );

        let converters = ConverterRegistry::standard();
        assert_eq!(
            OptionDef::<i32>::with_value("", &converters).build(),
            Err(UsageError::EmptyName)
        );
        assert_eq!(
            OptionDef::<i32>::with_value("a b", &converters).build(),
            Err(UsageError::NameContainsSpace("a b".to_string()))
        );
    }

    #[test]
    fn test_shorthand_defaults_to_first_char() {
        let verbose = OptionDef::flag("verbose").build().unwrap();
        assert_eq!(verbose.shorthand(), 'v');

        let quiet = OptionDef::flag("quiet").shorthand('s').build().unwrap();
        assert_eq!(quiet.shorthand(), 's');

        assert_eq!(
            OptionDef::flag("quiet").shorthand(' ').build(),
            Err(UsageError::SpaceShorthand)
        );
    }

    #[test]
    fn test_value_option_requires_converter() {
        struct Custom;

        let converters = ConverterRegistry::standard();
        assert_eq!(
            OptionDef::<Custom>::with_value("custom", &converters)
                .build()
                .err(),
            Some(UsageError::MissingConverter("custom".to_string()))
        );

        let built = OptionDef::<Custom>::with_value("custom", &converters)
            .converter(|_| Some(Custom))
            .build();
        assert!(built.is_ok());

        assert!(OptionDef::<i32>::with_value("depth", &ConverterRegistry::empty())
            .build()
            .is_err());
    }

    #[test]
    fn test_description_metadata() {
        let converters = ConverterRegistry::standard();
        let output = OptionDef::<String>::with_value("output", &converters)
            .description("where to write")
            .build()
            .unwrap();
        assert_eq!(output.help().text(), "where to write");
        assert_eq!(output.help().value_name(), "VALUE");

        let named = OptionDef::<String>::with_value("output", &converters)
            .description_with_value_name("where to write", "FILE")
            .build()
            .unwrap();
        assert_eq!(named.help().value_name(), "FILE");

        let flag = OptionDef::flag("quiet").build().unwrap();
        assert_eq!(flag.help().value_name(), "");
    }

    #[test]
    fn test_identity_is_by_name_alone() {
        let plain = OptionDef::flag("verbose").build().unwrap();
        let decorated = OptionDef::flag("verbose")
            .shorthand('V')
            .description("differs in every other field")
            .build()
            .unwrap();
        let other = OptionDef::flag("quiet").build().unwrap();

        assert_eq!(plain, decorated);
        assert_ne!(plain, other);
    }
}
