use std::fmt::{Debug, Display, Formatter, Result as FormatResult};
use std::sync::Arc;

/// A unique token. Two symbols are equal only if they are the same token,
/// regardless of description.
#[derive(Clone)]
pub struct Symbol(Arc<SymbolInner>);

struct SymbolInner {
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: Option<String>) -> Self {
        Self(Arc::new(SymbolInner { description }))
    }

    pub fn labeled(description: impl Into<String>) -> Self {
        Self::new(Some(description.into()))
    }

    pub fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Symbol {}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        Display::fmt(self, f)
    }
}
