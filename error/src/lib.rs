#![no_std]

use core::{any::type_name, fmt};

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Error<K, T: ?Sized> {
    pub kind: K,
    pub data: T,
}

impl<K: Copy, T> Error<K, T> {
    pub const fn kind(&self) -> K {
        self.kind
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Error<K, U> {
        Error { kind: self.kind, data: f(self.data) }
    }
}

impl<K: fmt::Display, T: ?Sized> fmt::Display for Error<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, type_name::<T>())
    }
}

impl<K: fmt::Display + fmt::Debug, T: fmt::Debug> core::error::Error for Error<K, T> {}

#[macro_export]
macro_rules! make_error {
    ($kind:ident => $v:vis $err:ident) => {
        $v type $err<T> = $crate::Error<$kind, T>;

        impl $kind {
            $v fn with<T>(self, data: T) -> $err<T> {
                $err { kind: self, data }
            }
        }
    };
}

/// Reasons a received Neighbor Discovery message is rejected.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum DecodeErrorKind {
    /// Not enough bytes for a fixed header or an option field.
    Truncated,
    /// An option with a zero length, or whose content does not fit its kind.
    MalformedOption,
    /// The ICMPv6 type is not a Neighbor Discovery message.
    UnsupportedType,
    /// The ICMPv6 code is not the one mandated for the message type.
    UnsupportedCode,
    /// A field holds a value prohibited by RFC 4861.
    InvalidField,
    /// The ICMPv6 checksum does not verify.
    ChecksumInvalid,
}
make_error!(DecodeErrorKind => pub DecodeError);

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::Truncated => write!(f, "truncated"),
            DecodeErrorKind::MalformedOption => write!(f, "malformed option"),
            DecodeErrorKind::UnsupportedType => write!(f, "unsupported message type"),
            DecodeErrorKind::UnsupportedCode => write!(f, "unsupported message code"),
            DecodeErrorKind::InvalidField => write!(f, "invalid field"),
            DecodeErrorKind::ChecksumInvalid => write!(f, "invalid checksum"),
        }
    }
}

/// Reasons a message cannot be serialized.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum EncodeErrorKind {
    /// An option value plus its 2-byte header is not a multiple of 8 bytes.
    UnalignedOption,
    /// An option does not fit in 255 units of 8 bytes.
    OptionTooLong,
    /// The message would be rejected by a receiver.
    InvalidField,
}
make_error!(EncodeErrorKind => pub EncodeError);

impl fmt::Display for EncodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeErrorKind::UnalignedOption => write!(f, "unaligned option"),
            EncodeErrorKind::OptionTooLong => write!(f, "option too long"),
            EncodeErrorKind::InvalidField => write!(f, "invalid field"),
        }
    }
}
