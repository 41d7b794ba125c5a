use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::str::FromStr;

/// A conversion from the raw command line text to a typed value.
///
/// Returning `None` means the text did not convert to anything, for example a
/// non-numeric string offered to an integer option or an unknown enumeration
/// member. Converters never panic on bad input; how a failed conversion
/// propagates is decided by whoever invokes the converter.
pub type ConvertFn<E> = Rc<dyn Fn(&str) -> Option<E>>;

/// A collection of string-to-value converters keyed by target type.
///
/// The registry is a plain value passed into option builders, not a global
/// table: tests and embedders can substitute their own converter sets without
/// touching shared state.
///
/// # Examples
///
/// ```
/// use cliopt::ConverterRegistry;
///
/// let converters = ConverterRegistry::standard();
/// let to_int = converters.converter_for::<i32>().unwrap();
/// assert_eq!(to_int("42"), Some(42));
/// assert_eq!(to_int("forty-two"), None);
/// ```
pub struct ConverterRegistry {
    converters: HashMap<TypeId, Box<dyn Any>>,
}

impl ConverterRegistry {
    /// Create a registry without any converters.
    pub fn empty() -> ConverterRegistry {
        ConverterRegistry { converters: HashMap::new() }
    }

    /// Create a registry with the built-in converters: `bool`, `i8`, `i32`,
    /// `i64`, `f32`, `f64`, `String` (identity) and `PathBuf`.
    pub fn standard() -> ConverterRegistry {
        let mut registry = ConverterRegistry::empty();
        registry.register_parsed::<bool>();
        registry.register_parsed::<i8>();
        registry.register_parsed::<i32>();
        registry.register_parsed::<i64>();
        registry.register_parsed::<f32>();
        registry.register_parsed::<f64>();
        registry.register(|raw| Some(raw.to_owned()));
        registry.register(|raw| Some(PathBuf::from(raw)));
        registry
    }

    /// Register a converter for `E`, replacing any existing one.
    pub fn register<E: 'static>(&mut self, convert: impl Fn(&str) -> Option<E> + 'static) {
        self.converters
            .insert(TypeId::of::<E>(), Box::new(Rc::new(convert) as ConvertFn<E>));
    }

    /// Register a converter for `E` backed by its [`FromStr`] implementation.
    /// Parse failures become `None`.
    pub fn register_parsed<E: FromStr + 'static>(&mut self) {
        self.register(|raw| raw.parse::<E>().ok());
    }

    /// Look up the converter for `E`, if one is registered.
    pub fn converter_for<E: 'static>(&self) -> Option<ConvertFn<E>> {
        self.converters
            .get(&TypeId::of::<E>())
            .and_then(|converter| converter.downcast_ref::<ConvertFn<E>>())
            .map(Rc::clone)
    }
}

/// Build a converter for an enumeration from its `(display name, value)`
/// pairs. Input is matched against the names case-insensitively; no match
/// yields `None`, never an error.
///
/// # Examples
///
/// ```
/// use cliopt::enum_converter;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum Color { Red, Green, Blue }
///
/// let convert = enum_converter(&[
///     ("red", Color::Red),
///     ("green", Color::Green),
///     ("blue", Color::Blue),
/// ]);
/// assert_eq!(convert("RED"), Some(Color::Red));
/// assert_eq!(convert("purple"), None);
/// ```
pub fn enum_converter<E: Clone>(members: &[(&str, E)]) -> impl Fn(&str) -> Option<E> {
    let members: Vec<(String, E)> = members
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect();
    move |raw: &str| {
        members
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(raw))
            .map(|(_, value)| value.clone())
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use crate::convert::{enum_converter, ConverterRegistry};

    #[derive(Clone, Debug, PartialEq)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    fn colors() -> Vec<(&'static str, Color)> {
        vec![("RED", Color::Red), ("GREEN", Color::Green), ("BLUE", Color::Blue)]
    }

    #[test]
    fn test_standard_scalars() {
        let converters = ConverterRegistry::standard();

        assert_eq!(converters.converter_for::<bool>().unwrap()("true"), Some(true));
        assert_eq!(converters.converter_for::<i8>().unwrap()("-3"), Some(-3));
        assert_eq!(converters.converter_for::<i32>().unwrap()("42"), Some(42));
        assert_eq!(converters.converter_for::<i64>().unwrap()("-9000000000"), Some(-9000000000));
        assert_eq!(converters.converter_for::<f32>().unwrap()("1.5"), Some(1.5));
        assert_eq!(converters.converter_for::<f64>().unwrap()("2.25"), Some(2.25));
        assert_eq!(
            converters.converter_for::<String>().unwrap()("as-is"),
            Some("as-is".to_string())
        );
        assert_eq!(
            converters.converter_for::<PathBuf>().unwrap()("a/b.txt"),
            Some(PathBuf::from("a/b.txt"))
        );
    }

    #[test]
    fn test_failed_conversion_is_none() {
        let converters = ConverterRegistry::standard();
        assert_eq!(converters.converter_for::<i32>().unwrap()("forty-two"), None);
        assert_eq!(converters.converter_for::<bool>().unwrap()("yes"), None);
        assert_eq!(converters.converter_for::<i8>().unwrap()("300"), None);
    }

    #[test]
    fn test_unregistered_type_has_no_converter() {
        struct Custom;
        let converters = ConverterRegistry::standard();
        assert!(converters.converter_for::<Custom>().is_none());
        assert!(ConverterRegistry::empty().converter_for::<i32>().is_none());
    }

    #[test]
    fn test_register_replaces() {
        let mut converters = ConverterRegistry::standard();
        converters.register(|raw: &str| Some(raw.len() as i32));
        assert_eq!(converters.converter_for::<i32>().unwrap()("abc"), Some(3));
    }

    #[test]
    fn test_enum_converter_matches_case_insensitively() {
        let colors = colors();
        let convert = enum_converter(&colors);
        assert_eq!(convert("red"), Some(Color::Red));
        assert_eq!(convert("Red"), Some(Color::Red));
        assert_eq!(convert("RED"), Some(Color::Red));
        assert_eq!(convert("blue"), Some(Color::Blue));
        assert_eq!(convert("purple"), None);
        assert_eq!(convert(""), None);
    }
}
