/* ************************************************************************ **
** This file is part of mmdiff, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Serializable description of a force field.
//!
//! All serde_yaml code for the workspace is monomorphized here, behind the
//! [`YamlRead`] trait, which also uses `serde_ignored` to warn about keys
//! that were not recognized (usually typos).

#![allow(non_snake_case)]

#[macro_use] extern crate serde_derive;
#[macro_use] extern crate log;

use std::io::Read;

mod force_field;

pub use crate::force_field::*;

pub type FailResult<T> = Result<T, failure::Error>;

/// Deserialize from YAML, warning on unused keys.
pub trait YamlRead: for<'de> serde::Deserialize<'de> {
    fn from_reader(mut r: impl Read) -> FailResult<Self>
    { Self::from_dyn_reader(&mut r) }

    fn from_dyn_reader(r: &mut dyn Read) -> FailResult<Self> {
        let mut s = String::new();
        r.read_to_string(&mut s)?;
        Self::from_yaml_str(&s)
    }

    fn from_yaml_str(s: &str) -> FailResult<Self> {
        // serde_ignored needs a Deserializer, which serde_yaml only offers
        // through Value.
        let value: serde_yaml::Value = serde_yaml::from_str(s)?;
        match Self::__serde_ignored__from_value(value) {
            Ok(out) => Ok(out),
            // errors through Value lose their line numbers; parse the
            // string again for a useful message.
            Err(e) => match Self::__serde_yaml__from_str(s) {
                Err(better) => Err(better),
                Ok(_) => Err(e),
            },
        }
    }

    #[doc(hidden)]
    fn __serde_ignored__from_value(value: serde_yaml::Value) -> FailResult<Self>;
    #[doc(hidden)]
    fn __serde_yaml__from_str(s: &str) -> FailResult<Self>;
}

macro_rules! derive_yaml_read {
    ($Type:ty) => {
        impl YamlRead for $Type {
            fn __serde_ignored__from_value(value: serde_yaml::Value) -> FailResult<$Type> {
                serde_ignored::deserialize(
                    value,
                    |path| warn!("Unused config item (possible typo?): {}", path),
                ).map_err(Into::into)
            }

            fn __serde_yaml__from_str(s: &str) -> FailResult<$Type> {
                serde_yaml::from_str(s).map_err(Into::into)
            }
        }
    };
}

derive_yaml_read!{ForceField}
