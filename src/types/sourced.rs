//! Live-versus-synthetic provenance tag

use serde::{Deserialize, Serialize};

/// An adapter result tagged with where it came from
///
/// Live and synthetic records share one shape. The tag is the only way to tell
/// a real but small value apart from a fabricated placeholder, so it is kept
/// even though most display paths call [`Sourced::into_inner`].
///
/// # Examples
///
/// ```
/// use sbtcscan::Sourced;
///
/// let live = Sourced::Live(5u64);
/// assert!(!live.is_synthetic());
/// assert_eq!(live.map(|v| v * 2).into_inner(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "record", rename_all = "lowercase")]
pub enum Sourced<T> {
    /// Fetched from a provider and validated
    Live(T),
    /// Produced by the fallback synthesizer after every provider failed
    Synthetic(T),
}

impl<T> Sourced<T> {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Sourced::Synthetic(_))
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Sourced::Live(_))
    }

    pub fn as_inner(&self) -> &T {
        match self {
            Sourced::Live(value) | Sourced::Synthetic(value) => value,
        }
    }

    /// Drop the provenance tag
    pub fn into_inner(self) -> T {
        match self {
            Sourced::Live(value) | Sourced::Synthetic(value) => value,
        }
    }

    /// Transform the record while keeping its provenance
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Live(value) => Sourced::Live(f(value)),
            Sourced::Synthetic(value) => Sourced::Synthetic(f(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_tag() {
        let synthetic = Sourced::Synthetic(2).map(|v| v + 1);
        assert_eq!(synthetic, Sourced::Synthetic(3));
        assert!(synthetic.is_synthetic());
    }

    #[test]
    fn test_serialized_tag() {
        let json = serde_json::to_value(Sourced::Live("x")).unwrap();
        assert_eq!(json["source"], "live");
        assert_eq!(json["record"], "x");
    }
}
