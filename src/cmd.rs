use std::hash::{Hash, Hasher};

use crate::error::UsageError;

/// A recognized subcommand: the first non-option token of the command line
/// may name one of these.
///
/// Equality and hashing are by name alone; the description is display
/// metadata for help output.
///
/// # Examples
///
/// ```
/// use cliopt::SubCommand;
///
/// let build = SubCommand::new("build", "compile the project").unwrap();
/// assert_eq!(build.name(), "build");
/// ```
#[derive(Clone, Debug)]
pub struct SubCommand {
    name: String,
    description: String,
}

impl SubCommand {
    /// Create a subcommand.
    ///
    /// # Error
    ///
    /// Fails if the name is empty.
    pub fn new(name: &str, description: &str) -> Result<SubCommand, UsageError> {
        if name.is_empty() {
            return Err(UsageError::EmptySubcommandName);
        }
        Ok(SubCommand {
            name: name.to_owned(),
            description: description.to_owned(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for SubCommand {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for SubCommand {}

impl Hash for SubCommand {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[cfg(test)]
mod test {
    use crate::cmd::SubCommand;
    use crate::error::UsageError;

    #[test]
    fn test_name_must_not_be_empty() {
        assert_eq!(SubCommand::new("", "whatever"), Err(UsageError::EmptySubcommandName));
        assert!(SubCommand::new("build", "").is_ok());
    }

    #[test]
    fn test_equality_is_by_name() {
        let a = SubCommand::new("build", "compile the project").unwrap();
        let b = SubCommand::new("build", "a different description").unwrap();
        let c = SubCommand::new("clean", "remove artifacts").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
