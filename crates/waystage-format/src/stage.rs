use std::fmt;

/// Where in a file a read or write is happening, for error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fingerprint,
    /// A top-level field such as `"segment_data.nodes"`.
    Field(&'static str),
    Restriction {
        index: u64,
        field: &'static str,
    },
    Condition {
        restriction: u64,
        condition: u64,
        field: &'static str,
    },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fingerprint => f.write_str("fingerprint"),
            Self::Field(name) => f.write_str(name),
            Self::Restriction { index, field } => write!(f, "restriction {index} {field}"),
            Self::Condition {
                restriction,
                condition,
                field,
            } => write!(f, "restriction {restriction} condition {condition} {field}"),
        }
    }
}
