//! Leaf values that may still be waiting for input.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A leaf of the configuration tree that the user may not have filled in yet.
///
/// `Unset` is what an emptied text box or a "choose..." select leaves
/// behind. It is distinct from zero: `Value(0.0)` is a legitimate entry,
/// `Unset` can never be submitted.
///
/// Serialized as the inner value, or `null` when unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<T> {
    Unset,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Field::Value(_))
    }

    pub fn is_unset(&self) -> bool {
        !self.is_set()
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Unset => Field::Unset,
            Field::Value(v) => Field::Value(v),
        }
    }

    /// Convert into an `Option`, dropping the unset marker.
    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Unset => None,
            Field::Value(v) => Some(v),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Field::Unset => Field::Unset,
            Field::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<T: Copy> Field<T> {
    pub fn get(&self) -> Option<T> {
        self.into_option()
    }
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Unset
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Field::Value(v),
            None => Field::Unset,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_ref().into_option().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Field::from)
    }
}
