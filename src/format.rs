use std::io::{self, Write};

use crate::parser::{OptionParser, Registered};

pub const DEFAULT_LINE_SEPARATOR: &str = if cfg!(windows) { "\r\n" } else { "\n" };

const DEFAULT_WIDTH: usize = 74;
const DEFAULT_COLUMN_PAD: usize = 2;
const LONG_HEADING: &str = "Option";
const SHORT_HEADING: &str = "Shorthand";
const DESC_HEADING: &str = "Description";

/// `HelpFormatter` renders the options and subcommands registered with an
/// [`OptionParser`] into aligned, word-wrapped help text.
///
/// The output format is like:
/// ```txt
/// <header>
/// Available subcommands:
///   <name>:
///     <description>
/// Options:
/// Option            Shorthand  Description
/// --all             -a         <description>
/// --block-size=SIZE -b SIZE    <description>
/// ```
pub struct HelpFormatter {
    width: usize,
    column_pad: usize,
    newline: String,
}

impl HelpFormatter {
    /// Create a `HelpFormatter` with default configuration.
    pub fn new() -> HelpFormatter {
        HelpFormatter {
            width: DEFAULT_WIDTH,
            column_pad: DEFAULT_COLUMN_PAD,
            newline: DEFAULT_LINE_SEPARATOR.to_string(),
        }
    }

    /// Get the max width of the output message.
    pub fn get_width(&self) -> usize {
        self.width
    }

    /// Set the maximum width of the display message, which defaults to 74.
    pub fn set_width(&mut self, width: usize) {
        self.width = width.max(2);
    }

    /// Set the newline characters.
    /// For windows, the default is `\r\n`, otherwise `\n`.
    pub fn set_newline(&mut self, newline: &str) {
        self.newline = newline.to_string();
    }

    /// Set the number of padding spaces between columns.
    pub fn set_column_padding(&mut self, padding: usize) {
        self.column_pad = padding;
    }

    /// Render the help text for `parser`, preceded by `header` if given.
    ///
    /// Options are listed sorted by name. The subcommand section only exists
    /// when the parser's subcommand table is non-empty.
    pub fn render(&self, parser: &OptionParser, header: Option<&str>) -> String {
        let mut out = String::new();

        if let Some(header) = header {
            self.append_wrapped(&mut out, header, 0);
            out.push_str(&self.newline);
        }

        let subcommands = parser.subcommands();
        if !subcommands.is_empty() {
            out.push_str("Available subcommands:");
            out.push_str(&self.newline);
            for subcommand in subcommands {
                out.push_str("  ");
                out.push_str(subcommand.name());
                out.push(':');
                out.push_str(&self.newline);
                out.push_str("    ");
                self.append_wrapped(&mut out, subcommand.description(), 4);
                out.push_str(&self.newline);
            }
        }

        out.push_str("Options:");
        out.push_str(&self.newline);

        let mut options: Vec<&Registered> = parser.registered().iter().collect();
        options.sort_by(|a, b| a.name.cmp(&b.name));

        let cells: Vec<(String, String)> = options
            .iter()
            .map(|option| (long_cell(option), short_cell(option)))
            .collect();
        let long_width = cells
            .iter()
            .map(|(long, _)| long.len())
            .max()
            .unwrap_or(0)
            .max(LONG_HEADING.len());
        let short_width = cells
            .iter()
            .map(|(_, short)| short.len())
            .max()
            .unwrap_or(0)
            .max(SHORT_HEADING.len());

        out.push_str(LONG_HEADING);
        pad_to(&mut out, LONG_HEADING.len(), long_width + self.column_pad);
        out.push_str(SHORT_HEADING);
        pad_to(&mut out, SHORT_HEADING.len(), short_width + self.column_pad);
        out.push_str(DESC_HEADING);
        out.push_str(&self.newline);

        let desc_column = long_width + self.column_pad + short_width + self.column_pad;
        for (option, (long, short)) in options.iter().zip(&cells) {
            out.push_str(long);
            pad_to(&mut out, long.len(), long_width + self.column_pad);
            out.push_str(short);
            pad_to(&mut out, short.len(), short_width + self.column_pad);
            self.append_wrapped(&mut out, option.help.text(), desc_column);
            out.push_str(&self.newline);
        }

        out
    }

    /// Render the help text for `parser` and write it to `out`.
    pub fn print_help<W: Write>(
        &self,
        out: &mut W,
        parser: &OptionParser,
        header: Option<&str>,
    ) -> io::Result<()> {
        write!(out, "{}", self.render(parser, header))
    }

    /// Append `text` word-wrapped at the configured width; continuation
    /// lines are indented to `indent`.
    fn append_wrapped(&self, buffer: &mut String, text: &str, indent: usize) {
        let available = if indent + 8 >= self.width { 8 } else { self.width - indent };
        let mut used = 0;
        for word in text.split_whitespace() {
            if used == 0 {
                buffer.push_str(word);
                used = word.len();
            } else if used + 1 + word.len() > available {
                buffer.push_str(&self.newline);
                for _ in 0..indent {
                    buffer.push(' ');
                }
                buffer.push_str(word);
                used = word.len();
            } else {
                buffer.push(' ');
                buffer.push_str(word);
                used += 1 + word.len();
            }
        }
    }
}

impl Default for HelpFormatter {
    fn default() -> Self {
        HelpFormatter::new()
    }
}

fn long_cell(option: &Registered) -> String {
    if option.takes_value() {
        format!("--{}={}", option.name, option.help.value_name())
    } else {
        format!("--{}", option.name)
    }
}

fn short_cell(option: &Registered) -> String {
    if option.takes_value() {
        format!("-{} {}", option.shorthand, option.help.value_name())
    } else {
        format!("-{}", option.shorthand)
    }
}

fn pad_to(buffer: &mut String, current: usize, target: usize) {
    for _ in current..target {
        buffer.push(' ');
    }
}

#[cfg(test)]
mod test {
    use crate::cmd::SubCommand;
    use crate::convert::ConverterRegistry;
    use crate::format::HelpFormatter;
    use crate::option::OptionDef;
    use crate::parser::OptionParser;

    fn sample_parser() -> OptionParser {
        let converters = ConverterRegistry::standard();
        let verbose = OptionDef::flag("verbose")
            .description("print more output")
            .build()
            .unwrap();
        let block = OptionDef::<i32>::with_value("block-size", &converters)
            .shorthand('b')
            .description_with_value_name("use SIZE-byte blocks", "SIZE")
            .build()
            .unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&verbose);
        parser.add_option(&block);
        parser
    }

    #[test]
    fn test_options_are_sorted_and_aligned() {
        let mut formatter = HelpFormatter::new();
        formatter.set_newline("\n");
        let help = formatter.render(&sample_parser(), None);

        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines[0], "Options:");
        assert!(lines[1].starts_with("Option"));
        assert!(lines[2].starts_with("--block-size=SIZE"));
        assert!(lines[3].starts_with("--verbose"));

        // The description column starts at the same offset in every row.
        let column = lines[1].find("Description").unwrap();
        assert_eq!(lines[2].find("use SIZE-byte blocks"), Some(column));
        assert_eq!(lines[3].find("print more output"), Some(column));
        assert!(lines[2].contains("-b SIZE"));
        assert!(lines[3].contains("-v"));
    }

    #[test]
    fn test_subcommand_section_exists_only_with_subcommands() {
        let mut formatter = HelpFormatter::new();
        formatter.set_newline("\n");

        let without = formatter.render(&sample_parser(), None);
        assert!(!without.contains("Available subcommands:"));

        let parser = OptionParser::with_subcommands([
            SubCommand::new("build", "compile the project").unwrap(),
            SubCommand::new("clean", "remove build artifacts").unwrap(),
        ]);
        let with = formatter.render(&parser, Some("A build tool."));
        assert!(with.starts_with("A build tool.\n"));
        assert!(with.contains("Available subcommands:\n  build:\n    compile the project"));
        assert!(with.contains("  clean:\n    remove build artifacts"));
    }

    #[test]
    fn test_long_descriptions_wrap_with_indent() {
        let long_text = "with -lt sort by and show ctime which is the time of last \
                         modification of file status information otherwise sort by ctime";
        let wordy = OptionDef::flag("ctime")
            .description(long_text)
            .build()
            .unwrap();

        let mut parser = OptionParser::new();
        parser.add_option(&wordy);

        let mut formatter = HelpFormatter::new();
        formatter.set_newline("\n");
        let help = formatter.render(&parser, None);

        let lines: Vec<&str> = help.lines().collect();
        // Row plus at least one continuation line, indented to the column.
        assert!(lines.len() > 3);
        let column = lines[1].find("Description").unwrap();
        for line in &lines[3..] {
            if !line.is_empty() {
                assert!(line.starts_with(&" ".repeat(column)));
                assert!(line.len() <= formatter.get_width() + 1);
            }
        }
    }
}
