//! Records mirroring GitHub's JSON. Scalar fields are optional so a missing
//! or renamed upstream field never fails a decode.

use serde::{Deserialize, Deserializer};

mod gists;
mod issues;
mod pulls;
mod repos;
mod search;
mod users;

pub use gists::*;
pub use issues::*;
pub use pulls::*;
pub use repos::*;
pub use search::*;
pub use users::*;

/// GitHub sometimes sends `null` where a list or map is expected; read it as
/// empty. Pair with `#[serde(default)]` to also cover a missing key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

pub(crate) fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}
