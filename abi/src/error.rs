//! Error types for the runtime's C ABI surface

use core::ffi::c_int;

/// Implement common methods for runtime error enums.
///
/// Generates `as_c_int()`, `from_c_int()`, `is_success()`, and `is_error()` methods
/// for `#[repr(i32)]` error enums that follow the runtime's error convention.
macro_rules! impl_runtime_error {
    ($ty:ty, fallback: $fallback:ident, variants: { $($val:literal => $variant:ident),* $(,)? }) => {
        impl $ty {
            /// Convert to C-style integer for ABI returns.
            #[inline]
            pub fn as_c_int(self) -> c_int {
                self as c_int
            }

            /// Convert from C-style integer.
            #[inline]
            pub fn from_c_int(val: c_int) -> Self {
                match val {
                    $($val => Self::$variant,)*
                    _ => Self::$fallback,
                }
            }

            /// Check if this is a success result.
            #[inline]
            pub fn is_success(self) -> bool {
                matches!(self, Self::Success)
            }

            /// Check if this is an error result.
            #[inline]
            pub fn is_error(self) -> bool {
                !self.is_success()
            }
        }
    };
}

/// Fragment registry operation result type
pub type FragmentResult<T> = Result<T, FragmentError>;

/// Errors returned by exception fragment registration
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FragmentError {
    /// Operation succeeded
    #[default]
    Success = 0,
    /// Every registry slot is in use
    RegistryFull = -1,
    /// Index does not name a registered slot
    InvalidHandle = -2,
}

impl_runtime_error!(FragmentError, fallback: InvalidHandle, variants: {
    0 => Success,
    -1 => RegistryFull,
    -2 => InvalidHandle,
});
