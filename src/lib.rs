#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A string-keyed hash map with a key-based and an index-based API tier.
///
/// This module provides [`StrMap`], the primary interface of the crate,
/// built on top of the low-level [`Table`].
pub mod str_map;

/// A string set built on the same open-addressing table as [`StrMap`].
pub mod str_set;

pub mod table;

pub use str_map::StrMap;
pub use str_set::StrSet;
pub use table::AllocError;
pub use table::Table;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The default hash builder used by [`StrMap`] and [`StrSet`].
        ///
        /// `foldhash`'s fast hasher: high throughput on short string keys
        /// with per-instance random seeding.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The default hash builder used by [`StrMap`] and [`StrSet`].
        ///
        /// Falls back to the standard library's `RandomState` when the
        /// `foldhash` feature is disabled.
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Placeholder hash builder used when no default hasher is available.
        ///
        /// With both the `foldhash` and `std` features disabled this type
        /// does not implement `BuildHasher`; construct maps and sets with
        /// `with_hasher` and a hasher of your choice instead.
        #[derive(Clone, Copy, Debug, Default)]
        pub struct DefaultHashBuilder(());
    }
}
