//! Byte-order conversion for values written to or read from portable
//! binary layouts.
//!
//! [`TransformEndianness::transform_endianness`] is an involution: it swaps
//! bytes when the requested byte order differs from the host's and is a
//! no-op otherwise, so the same call converts in both directions.
//!
//! ```
//! use arrow_ingest::endian::{BigEndian, NativeEndian, transform_endianness};
//!
//! let mut v = 0x0102_0304u32;
//! transform_endianness::<NativeEndian, _>(&mut v);
//! assert_eq!(v, 0x0102_0304);
//!
//! transform_endianness::<BigEndian, _>(&mut v);
//! assert_eq!(v.to_ne_bytes(), [1, 2, 3, 4]);
//! ```

use crate::{arrow_buffer::i256, column::Decimal128};

/// A target byte order.
pub trait Endianness {
    /// Whether this is the byte order of the host.
    const IS_NATIVE: bool;
}

/// Most significant byte first.
#[derive(Debug)]
pub enum BigEndian {}

/// Least significant byte first.
#[derive(Debug)]
pub enum LittleEndian {}

impl Endianness for BigEndian {
    const IS_NATIVE: bool = cfg!(target_endian = "big");
}

impl Endianness for LittleEndian {
    const IS_NATIVE: bool = cfg!(target_endian = "little");
}

/// The host byte order.
#[cfg(target_endian = "little")]
pub type NativeEndian = LittleEndian;

/// The host byte order.
#[cfg(target_endian = "big")]
pub type NativeEndian = BigEndian;

/// Values whose byte order can be converted in place.
pub trait TransformEndianness {
    /// Convert between the host byte order and `E`.
    fn transform_endianness<E: Endianness>(&mut self);
}

/// Convert `value` between the host byte order and `E`.
#[inline]
pub fn transform_endianness<E: Endianness, T: TransformEndianness + ?Sized>(value: &mut T) {
    value.transform_endianness::<E>();
}

macro_rules! impl_for_integers {
    ($($t:ty),+ $(,)?) => {
        $(
            impl TransformEndianness for $t {
                #[inline]
                fn transform_endianness<E: Endianness>(&mut self) {
                    if !E::IS_NATIVE {
                        *self = self.swap_bytes();
                    }
                }
            }
        )+
    };
}

impl_for_integers!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

macro_rules! impl_for_floats {
    ($($t:ty),+ $(,)?) => {
        $(
            impl TransformEndianness for $t {
                #[inline]
                fn transform_endianness<E: Endianness>(&mut self) {
                    if !E::IS_NATIVE {
                        *self = <$t>::from_bits(self.to_bits().swap_bytes());
                    }
                }
            }
        )+
    };
}

impl_for_floats!(f32, f64, half::f16);

impl TransformEndianness for Decimal128 {
    #[inline]
    fn transform_endianness<E: Endianness>(&mut self) {
        self.0.transform_endianness::<E>();
    }
}

impl TransformEndianness for i256 {
    // Byte-swapping a wide integer swaps each half and the order of halves.
    fn transform_endianness<E: Endianness>(&mut self) {
        if !E::IS_NATIVE {
            let (low, high) = self.to_parts();
            *self = i256::from_parts(
                (high as u128).swap_bytes(),
                low.swap_bytes() as i128,
            );
        }
    }
}

impl<A: TransformEndianness, B: TransformEndianness> TransformEndianness for (A, B) {
    #[inline]
    fn transform_endianness<E: Endianness>(&mut self) {
        self.0.transform_endianness::<E>();
        self.1.transform_endianness::<E>();
    }
}

impl<T: TransformEndianness> TransformEndianness for [T] {
    #[inline]
    fn transform_endianness<E: Endianness>(&mut self) {
        for value in self {
            value.transform_endianness::<E>();
        }
    }
}

/// Enums serialized through their integer representation.
///
/// Implement with [`endian_enum!`](crate::endian_enum).
pub trait EndianEnum: Copy + Sized {
    /// The underlying integer type.
    type Repr: TransformEndianness + Copy;

    /// The discriminant of `self`.
    fn to_repr(self) -> Self::Repr;

    /// The variant with discriminant `repr`, if any.
    fn from_repr(repr: Self::Repr) -> Option<Self>;

    /// The discriminant of `self` in byte order `E`.
    fn to_endian<E: Endianness>(self) -> Self::Repr {
        let mut repr = self.to_repr();
        repr.transform_endianness::<E>();
        repr
    }

    /// Read a discriminant stored in byte order `E`.
    fn from_endian<E: Endianness>(mut repr: Self::Repr) -> Option<Self> {
        repr.transform_endianness::<E>();
        Self::from_repr(repr)
    }
}

/// Implement [`EndianEnum`] for a fieldless enum with an explicit `#[repr]`.
///
/// ```
/// use arrow_ingest::endian::{BigEndian, EndianEnum};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// #[repr(u16)]
/// enum Kind {
///     Plain = 1,
///     Packed = 2,
/// }
///
/// arrow_ingest::endian_enum!(Kind: u16 { Plain, Packed });
///
/// let stored = Kind::Packed.to_endian::<BigEndian>();
/// assert_eq!(Kind::from_endian::<BigEndian>(stored), Some(Kind::Packed));
/// assert_eq!(Kind::from_repr(7), None);
/// ```
#[macro_export]
macro_rules! endian_enum {
    ($ty:ident : $repr:ty { $($variant:ident),+ $(,)? }) => {
        impl $crate::endian::EndianEnum for $ty {
            type Repr = $repr;

            fn to_repr(self) -> $repr {
                self as $repr
            }

            fn from_repr(repr: $repr) -> ::core::option::Option<Self> {
                $(
                    if repr == $ty::$variant as $repr {
                        return ::core::option::Option::Some($ty::$variant);
                    }
                )+
                ::core::option::Option::None
            }
        }
    };
}
