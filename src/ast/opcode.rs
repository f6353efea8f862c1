use std::fmt;

/// Operation carried by an [`Expression`](super::Expression) node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Smallest integer of an array (`min(...)`)
    Min,
    /// Largest integer of an array (`max(...)`)
    Max,
    /// Element count of an array (`size(...)`)
    Size,
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mult,
    /// Integer division (`/`)
    Div,
    /// Array index (`[n]`); the literal holds the index
    Subscript,
    /// Nested lookup (`a.rest`); the literal holds the field name
    Get,
    /// Direct lookup of a top-level field, or an integer constant
    Default,
    /// Placeholder for a node that must not be evaluated
    Invalid,
}

impl Opcode {
    /// Maps a function keyword (case-insensitive) to its opcode.
    pub fn from_keyword(word: &str) -> Option<Opcode> {
        match word.to_ascii_lowercase().as_str() {
            "min" => Some(Opcode::Min),
            "max" => Some(Opcode::Max),
            "size" => Some(Opcode::Size),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Min => "MIN",
            Opcode::Max => "MAX",
            Opcode::Size => "SIZE",
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mult => "MULT",
            Opcode::Div => "DIV",
            Opcode::Subscript => "SUBSCRIPT",
            Opcode::Get => "GET",
            Opcode::Default => "DEFAULT",
            Opcode::Invalid => "INVALID",
        }
    }

    /// Whether a node with this opcode is meaningless without a literal.
    pub fn requires_literal(self) -> bool {
        matches!(self, Opcode::Get | Opcode::Default | Opcode::Subscript)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
