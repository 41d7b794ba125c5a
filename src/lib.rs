//! # The cliopt Library
//!
//! The cliopt library parses command line options against a set of immutable
//! option definitions. It supports GNU style long options (`--verbose`,
//! `--block-size=512`), chained short options (`-avz`, where at most one
//! option in the chain may consume the following token as its value), typed
//! value conversion, callbacks fired on recognition, one level of
//! subcommands, and aligned help output.
//!
//! Usage follows a two step protocol: declare the options and register them
//! with a parser, then hand the parser an argument vector. Parsing either
//! produces an immutable [`ParseResult`] or fails with a [`ParseError`]
//! carrying the reason and the offending token. Unknown options are
//! deliberately not fatal; they are reported as one-line diagnostics and
//! skipped, so arguments meant for another consumer pass through.
//!
//! # Examples
//!
//! A simple example.
//!
//! ```
//! use cliopt::{ConverterRegistry, OptionDef, OptionParser};
//!
//! let converters = ConverterRegistry::standard();
//!
//! let verbose = OptionDef::flag("verbose")
//!     .description("print more output")
//!     .build().unwrap();
//! let depth = OptionDef::<i32>::with_value("max-depth", &converters)
//!     .shorthand('d')
//!     .description_with_value_name("descend at most this deep", "N")
//!     .build().unwrap();
//!
//! let mut parser = OptionParser::new();
//! parser.add_option(&verbose);
//! parser.add_option(&depth);
//!
//! let result = parser.parse(&["--verbose", "--max-depth=2", "src"]).unwrap();
//! assert_eq!(result.is_set(&verbose), Ok(true));
//! assert_eq!(result.value_of(&depth), Ok(&2));
//! assert_eq!(result.remainder(), ["src"]);
//! ```
//!
//! An example with subcommands, callbacks and an enum-valued option.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use cliopt::{enum_converter, ConverterRegistry, HelpFormatter, OptionDef,
//!              OptionParser, SubCommand};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! enum Target { Debug, Release }
//!
//! let converters = ConverterRegistry::standard();
//!
//! let verbosity = Rc::new(Cell::new(0u32));
//! let level = Rc::clone(&verbosity);
//! let verbose = OptionDef::flag("verbose")
//!     .when_set(move || level.set(level.get() + 1))
//!     .description("print more output")
//!     .build().unwrap();
//!
//! let target = OptionDef::<Target>::with_value("target", &converters)
//!     .converter(enum_converter(&[
//!         ("debug", Target::Debug),
//!         ("release", Target::Release),
//!     ]))
//!     .valid_for(&["build"])
//!     .description_with_value_name("what to build for", "TARGET")
//!     .build().unwrap();
//!
//! let mut parser = OptionParser::with_subcommands([
//!     SubCommand::new("build", "compile the project").unwrap(),
//!     SubCommand::new("clean", "remove build artifacts").unwrap(),
//! ]);
//! parser.add_option(&verbose);
//! parser.add_option(&target);
//!
//! let result = parser.parse(&["--verbose", "--target=Release", "build", "lib"]).unwrap();
//! assert_eq!(verbosity.get(), 1);
//! assert_eq!(result.subcommand(), Some("build"));
//! assert_eq!(result.value_of(&target), Ok(&Target::Release));
//! assert_eq!(result.remainder(), ["lib"]);
//!
//! let help = HelpFormatter::new().render(&parser, Some("A build tool."));
//! assert!(help.contains("--target=TARGET"));
//! ```

pub use cmd::SubCommand;
pub use convert::{enum_converter, ConvertFn, ConverterRegistry};
pub use error::{ParseError, UsageError};
pub use format::HelpFormatter;
pub use option::{FlagOptionBuilder, OptionDef, OptionHelp, ValueOptionBuilder};
pub use parser::OptionParser;
pub use result::ParseResult;

mod cmd;
mod convert;
mod error;
mod format;
mod option;
mod parser;
mod result;
