#![no_std]
#![deny(future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

extern crate alloc;

#[cfg(test)]
extern crate std;

mod config;
pub use self::config::{Checks, Config};

mod message;
pub use self::message::{
    Message, NeighborAdvertisement, NeighborSolicitation, Redirect, RouterAdvertisement,
    RouterSolicitation,
};

mod ndisc;
pub use self::ndisc::{decode, decode_with, encode, Ndisc};

pub use ndisc_error::{DecodeError, DecodeErrorKind, EncodeError, EncodeErrorKind};
pub use ndisc_storage::{Ends, Meta, RawPacket, Shared, Storage};
pub use ndisc_wire as wire;

/// The ICMPv6 checksum over the IPv6 pseudo-header.
pub mod checksum {
    pub use ndisc_wire::{icmpv6_fill_checksum as fill, icmpv6_verify_checksum as verify};
}
