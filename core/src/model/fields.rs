use std::{
    borrow::Cow,
    io::{Error, ErrorKind},
};

use byteserde::prelude::*;
use byteserde_derive::{ByteDeserializeSlice, ByteSerializeStack, ByteSerializedLenOf, ByteSerializedSizeOf};
use byteserde_types::string_ascii_fixed;

/// Terminator and padding of every fixed width text field.
pub const NUL: u8 = b'\0';

/// Copies `value` into a `N` byte buffer padded with [NUL].
///
/// The last byte is always reserved for the terminator, so `value` may hold at most `N - 1` bytes.
/// Fails with [ErrorKind::InvalidInput] instead of truncating when `value` does not fit,
/// is not ascii or has an embedded [NUL]. `value` itself is never included in the error text.
pub fn bounded_copy<const N: usize>(field: &str, value: &str) -> Result<[u8; N], Error> {
    let bytes = value.as_bytes();
    if bytes.len() >= N {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("{} is {} bytes long, capacity is {} bytes", field, bytes.len(), N.saturating_sub(1)),
        ));
    }
    if !value.is_ascii() || bytes.contains(&NUL) {
        return Err(Error::new(ErrorKind::InvalidInput, format!("{} must be ascii without NUL bytes", field)));
    }
    let mut buf = [NUL; N];
    buf[..bytes.len()].copy_from_slice(bytes);
    Ok(buf)
}

/// Text of a [NUL] padded buffer up to the first terminator.
pub fn nul_trimmed(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|b| *b == NUL).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}

/// Declares [NUL] padded, left aligned ascii fields of `$len` bytes including the terminator.
///
/// The `string_ascii_fixed!` buffers stay private, their `From` conversions truncate or panic.
/// [bounded_copy] via `try_from_str` is the only way to build a non blank field from text.
macro_rules! ctp_fields {
    ($($name:ident: $len:literal),* $(,)?) => {
        mod buffers {
            use super::*;
            $(string_ascii_fixed!($name, $len, b'\0', false, #[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedSizeOf, ByteSerializedLenOf, PartialEq, Clone, Copy)]);)*
        }
        $(
            #[derive(ByteSerializeStack, ByteDeserializeSlice, ByteSerializedLenOf, PartialEq, Clone, Copy)]
            pub struct $name(buffers::$name);
            impl $name {
                /// Maximum number of text bytes, one byte is kept for the terminator.
                pub const CAPACITY: usize = $len - 1;
                pub fn try_from_str(value: &str) -> Result<Self, Error> {
                    Ok(Self(buffers::$name::new(bounded_copy::<$len>(stringify!($name), value)?)))
                }
                pub fn as_slice(&self) -> &[u8] {
                    self.0.as_slice()
                }
                pub fn text(&self) -> Cow<'_, str> {
                    nul_trimmed(self.as_slice())
                }
                pub fn is_blank(&self) -> bool {
                    self.as_slice().first().map_or(true, |b| *b == NUL)
                }
            }
            impl Default for $name {
                fn default() -> Self {
                    Self(buffers::$name::new([NUL; $len]))
                }
            }
            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.debug_tuple(stringify!($name)).field(&self.text()).finish()
                }
            }
            impl std::fmt::Display for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}", self.text())
                }
            }
        )*
    };
}

#[rustfmt::skip]
pub mod field_types {
    use super::*;

    ctp_fields! {
        BrokerId: 11,
        UserId: 16,
        Password: 41,
        AuthCode: 17,
        AppId: 33,
        ProductInfo: 11,
        Date: 9,
        Time: 9,
        SystemName: 41,
        OrderRef: 13,
        ErrorMsg: 81,
    }
}
pub use field_types::*;
