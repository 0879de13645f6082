use std::{fmt::Display, num::NonZeroI32, ops::Neg};

/// A variable of the formula, identified by its 1-based index.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Variable(u32);

impl Variable {
    /// Create a variable from its index. The index must be at least 1.
    pub fn from_index(index: usize) -> Self {
        assert!(index > 0, "variables are numbered from 1");
        Variable(u32::try_from(index).expect("variable index exceeds u32"))
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The literal asserting this variable to be `value`.
    pub fn literal(self, value: bool) -> Literal {
        let raw = self.0 as i32;
        Literal::from(if value { raw } else { -raw })
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A literal represented by an integer
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Literal {
    // We choose a nonzeroi32 to optimize nullable data structures
    inner: NonZeroI32,
}

impl Literal {
    /// Like `From<i32>` but returns None for 0 instead of panicking.
    pub fn new_checked(value: i32) -> Option<Self> {
        NonZeroI32::new(value).map(|inner| Literal { inner })
    }

    pub fn variable(self) -> Variable {
        Variable(self.inner.unsigned_abs().get())
    }

    /// Positive literals assert their variable to be true.
    pub fn is_positive(self) -> bool {
        self.inner.is_positive()
    }

    pub fn raw(&self) -> i32 {
        i32::from(self.inner)
    }
}

impl Neg for Literal {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        self.inner = -self.inner;
        self
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal {
            inner: NonZeroI32::new(value).expect("cannot create literal with id 0"),
        }
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
