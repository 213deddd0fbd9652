#![no_std]

extern crate alloc;

use alloc::sync::Arc;
use core::ops::Deref;

use stable_deref_trait::CloneStableDeref;

mod buf;
pub use self::buf::Buf;

mod packet;
pub use self::packet::{Ends, Meta, RawPacket};

#[cfg(test)]
extern crate std;

/// Backing memory of a packet.
///
/// Clones must share the same bytes at the same address, so that offsets
/// recorded against one handle stay valid for every other handle.
pub trait Storage: Deref<Target = [u8]> + CloneStableDeref {}
impl<T: Deref<Target = [u8]> + CloneStableDeref> Storage for T {}

/// The reference-counted storage used for received and constructed packets.
pub type Shared = Arc<[u8]>;
