// anvil/src/core/merge.rs

//! The value-level merge capability consumed by [`Container`] and
//! [`ContainerProxy`] when two artifact trees are combined.
//!
//! [`Container`]: crate::Container
//! [`ContainerProxy`]: crate::ContainerProxy

/// Capability contract allowing a value to absorb another value of its kind.
///
/// Returning `true` means `self` mutated itself and the caller keeps it in
/// place. Returning `false` asks the caller to replace `self` with `other`;
/// the container swaps the incoming value in. Note that `false` always
/// means "overwrite me", even when the two values happened to be equal --
/// which of two conflicting values survives a merge depends on it.
pub trait Merge {
  /// Try to absorb `other` into `self`.
  fn merge(&mut self, other: &mut Self) -> bool;
}

/// Implements overwrite-only [`Merge`] (always `false`) for plain value
/// types that have no notion of combining with another instance.
#[macro_export]
macro_rules! merge_by_overwrite {
  ($($ty:ty),* $(,)?) => {
    $(
      impl $crate::Merge for $ty {
        fn merge(&mut self, _other: &mut Self) -> bool {
          false
        }
      }
    )*
  };
}

merge_by_overwrite!(bool, char, i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, isize, usize, f32, f64, String);
