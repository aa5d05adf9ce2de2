//! Zero-copy reinterpretation of wrapper slices, used by generated code.
//!
//! Aliased slice fields (`Vec<UserId>` where `UserId` wraps an `i32`) are
//! handed to the coder as the base slice type instead of being copied through
//! a temporary. The reinterpretation is only available for types that opt in
//! by implementing the unsafe [`SliceAlias`] trait:
//!
//! ```
//! use bincodegen::alias::{self, SliceAlias};
//!
//! #[repr(transparent)]
//! struct UserId(i32);
//!
//! // SAFETY: UserId is a transparent wrapper over i32 with no invariants.
//! unsafe impl SliceAlias for UserId {
//!     type Base = i32;
//! }
//!
//! let mut ids = vec![UserId(1), UserId(2)];
//! assert_eq!(alias::as_base_slice(&ids), &[1, 2]);
//!
//! alias::with_base_vec(&mut ids, |base| base.push(3));
//! assert_eq!(ids.len(), 3);
//! ```

use std::mem::{align_of, size_of, ManuallyDrop};

/// SliceAlias marks `Self` as layout compatible with `Self::Base`.
///
/// # Safety
///
/// Implementors must be `#[repr(transparent)]` wrappers over `Base` (or
/// otherwise guarantee identical size, alignment and validity), and every
/// `Base` value must be a valid `Self`. Size and alignment are also checked at
/// compile time.
pub unsafe trait SliceAlias: Sized {
    type Base;
}

/// Views `v` as a slice of its base type.
pub fn as_base_slice<T: SliceAlias>(v: &[T]) -> &[T::Base] {
    const {
        assert!(size_of::<T>() == size_of::<T::Base>());
        assert!(align_of::<T>() == align_of::<T::Base>());
    }

    // SAFETY: T and T::Base share a layout per the SliceAlias contract, and
    // the returned slice borrows from v.
    unsafe { std::slice::from_raw_parts(v.as_ptr().cast::<T::Base>(), v.len()) }
}

/// Hands the allocation of `v` to `f` as a `Vec` of the base type, then takes
/// it back.
///
/// No element is copied or reallocated unless `f` grows the vector. If `f`
/// panics, `v` is left empty.
pub fn with_base_vec<T, F, R>(v: &mut Vec<T>, f: F) -> R
where
    T: SliceAlias,
    F: FnOnce(&mut Vec<T::Base>) -> R,
{
    const {
        assert!(size_of::<T>() == size_of::<T::Base>());
        assert!(align_of::<T>() == align_of::<T::Base>());
    }

    let mut taken = ManuallyDrop::new(std::mem::take(v));

    // SAFETY: the allocation was made for T, which has the size and
    // alignment of T::Base, and every T is a valid T::Base.
    let mut base = unsafe {
        Vec::from_raw_parts(
            taken.as_mut_ptr().cast::<T::Base>(),
            taken.len(),
            taken.capacity(),
        )
    };

    let out = f(&mut base);

    let mut base = ManuallyDrop::new(base);

    // SAFETY: as above, and every T::Base is a valid T.
    *v = unsafe {
        Vec::from_raw_parts(
            base.as_mut_ptr().cast::<T>(),
            base.len(),
            base.capacity(),
        )
    };

    out
}
