//! Command definitions
//!
//! Represents commands from clients.

/// Command types, identified on the wire by their tag string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    Get,
    Put,
    Delete,
    Quit,
}

impl CommandType {
    /// The tag string sent as the first field of a request
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::Get => "GET",
            CommandType::Put => "PUT",
            CommandType::Delete => "DELETE",
            CommandType::Quit => "QUIT",
        }
    }

    /// Parse a tag. Matching is case-sensitive.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "GET" => Some(CommandType::Get),
            "PUT" => Some(CommandType::Put),
            "DELETE" => Some(CommandType::Delete),
            "QUIT" => Some(CommandType::Quit),
            _ => None,
        }
    }

    /// Number of operand fields following the tag
    pub fn arity(&self) -> usize {
        match self {
            CommandType::Get | CommandType::Delete => 1,
            CommandType::Put => 2,
            CommandType::Quit => 0,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Get a value by key
    Get { key: String },

    /// Put a key-value pair
    Put { key: String, value: String },

    /// Delete a key
    Delete { key: String },

    /// End the session
    Quit,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::Get { .. } => CommandType::Get,
            Command::Put { .. } => CommandType::Put,
            Command::Delete { .. } => CommandType::Delete,
            Command::Quit => CommandType::Quit,
        }
    }

    /// All wire fields of this command, tag first
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Command::Get { key } => vec![CommandType::Get.as_str(), key.as_str()],
            Command::Put { key, value } => vec![CommandType::Put.as_str(), key.as_str(), value.as_str()],
            Command::Delete { key } => vec![CommandType::Delete.as_str(), key.as_str()],
            Command::Quit => vec![CommandType::Quit.as_str()],
        }
    }

    /// Build a command from its type and operands.
    ///
    /// `operands` must hold exactly `kind.arity()` entries.
    pub(crate) fn from_parts(kind: CommandType, mut operands: Vec<String>) -> Self {
        debug_assert_eq!(operands.len(), kind.arity());
        match kind {
            CommandType::Get => Command::Get { key: operands.remove(0) },
            CommandType::Delete => Command::Delete { key: operands.remove(0) },
            CommandType::Put => {
                let value = operands.remove(1);
                let key = operands.remove(0);
                Command::Put { key, value }
            }
            CommandType::Quit => Command::Quit,
        }
    }
}

/// What a server decodes off the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// A recognised command with all its operands
    Command(Command),

    /// Any other tag, kept verbatim for the error response
    Invalid(String),
}
