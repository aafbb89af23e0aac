use serde::{Deserialize, Deserializer};

/// A field in a partial update.
///
/// `Unchanged` leaves the stored value alone. `Set` replaces it; for nullable
/// columns `T` is an `Option`, so `Set(None)` clears the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Unchanged,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }

    /// Overwrite `target` if a value was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Self::Set(v) = self {
            *target = v;
        }
    }
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Unchanged
    }
}

/// `None` means "not supplied", which is how clap hands us optional flags.
impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Set(v),
            None => Self::Unchanged,
        }
    }
}

// Absent keys fall back to `Unchanged` through `#[serde(default)]` on the
// containing struct; a present key (even `null`) is always `Set`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self::Set)
    }
}
