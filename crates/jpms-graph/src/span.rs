use serde::{Deserialize, Serialize};

/// Location of a construct inside a source file, 1-based like compiler
/// diagnostics. A zero span means "no position known".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceSpan {
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
    #[serde(default)]
    pub length: u32,
}

impl SourceSpan {
    pub fn new(line: u32, column: u32, length: u32) -> Self {
        Self {
            line,
            column,
            length,
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}
