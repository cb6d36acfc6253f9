use std::cmp::Ordering;
use std::fmt;

/// One element of a parsed version.
///
/// Numeric runs compare numerically, text runs lexicographically, and any
/// number ranks above any text (`1.0` > `1.0rc1`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Number(u64),
    Text(String),
}

impl Component {
    /// Returns the numeric value, if this is a numeric component.
    pub fn as_number(&self) -> Option<u64> {
        match self {
            Component::Number(n) => Some(*n),
            Component::Text(_) => None,
        }
    }

    /// Compare this component against a missing one in a shorter version.
    ///
    /// A missing component behaves as `0` against numbers and ranks above
    /// text, so `1.0` equals `1.0.0` component-wise and `1.0rc1` sorts before
    /// `1.0`.
    pub(crate) fn cmp_missing(&self) -> Ordering {
        match self {
            Component::Number(n) => n.cmp(&0),
            Component::Text(_) => Ordering::Less,
        }
    }
}

impl Ord for Component {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Component::Number(a), Component::Number(b)) => a.cmp(b),
            (Component::Text(a), Component::Text(b)) => a.cmp(b),
            (Component::Number(_), Component::Text(_)) => Ordering::Greater,
            (Component::Text(_), Component::Number(_)) => Ordering::Less,
        }
    }
}

impl PartialOrd for Component {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Number(n) => write!(f, "{n}"),
            Component::Text(s) => f.write_str(s),
        }
    }
}
