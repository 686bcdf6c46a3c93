use std::fmt;

/// Machine-readable error codes for CLI output and scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigParseError,
    TableParseError,
    NonSquareMatrix,
    DuplicateLabel,
    CyclePersists,
    NoTrunk,
    DegenerateGraph,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigParseError => "E1001",
            Self::TableParseError => "E2001",
            Self::NonSquareMatrix => "E2002",
            Self::DuplicateLabel => "E2003",
            Self::CyclePersists => "E3001",
            Self::NoTrunk => "E3002",
            Self::DegenerateGraph => "E3003",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigParseError => "Config file parse error",
            Self::TableParseError => "Input coefficient table parse error",
            Self::NonSquareMatrix => "Coefficient matrix is not square",
            Self::DuplicateLabel => "Duplicate sector label",
            Self::CyclePersists => "Dependency cycle persists after resolution",
            Self::NoTrunk => "No source-to-sink path exists",
            Self::DegenerateGraph => "Node is both a source and a sink",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigParseError => Some("Fix syntax in the TOML config and retry."),
            Self::TableParseError => {
                Some("Re-export the table without annotation options from e-stat.")
            }
            Self::NonSquareMatrix => Some("Verify the export covers every sector row exactly once."),
            Self::DuplicateLabel => Some("Sector code names must be unique within one table."),
            Self::CyclePersists => {
                Some("Configure a cycle policy: `policy = \"lightest\"` or named_removals.")
            }
            Self::NoTrunk => Some("Lower the edge threshold so the graph connects."),
            Self::DegenerateGraph => Some("Raise the edge threshold or inspect the removed edges."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::ConfigParseError,
            ErrorCode::TableParseError,
            ErrorCode::NonSquareMatrix,
            ErrorCode::DuplicateLabel,
            ErrorCode::CyclePersists,
            ErrorCode::NoTrunk,
            ErrorCode::DegenerateGraph,
            ErrorCode::InternalUnexpected,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::CyclePersists.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
    }
}
