use alloc::sync::Arc;
use core::{net::Ipv6Addr, ops::Range};

use ndisc_error::DecodeErrorKind;

use crate::{Shared, Storage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ends<T> {
    pub src: T,
    pub dst: T,
}

/// Out-of-band information delivered with a frame by the socket layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Meta {
    pub addr: Ends<Ipv6Addr>,
    pub ifindex: u32,
    pub hop_limit: u8,
}

impl Meta {
    /// Hop limit every Neighbor Discovery message must be sent with.
    pub const HOP_LIMIT: u8 = 255;

    pub const fn new(src: Ipv6Addr, dst: Ipv6Addr, ifindex: u32, hop_limit: u8) -> Self {
        Meta {
            addr: Ends { src, dst },
            ifindex,
            hop_limit,
        }
    }
}

/// The ICMPv6 payload of one frame together with its metadata.
///
/// Cloning a `RawPacket` shares its bytes. The bytes are never written after
/// construction.
#[derive(Debug, Clone)]
pub struct RawPacket<S: Storage = Shared> {
    storage: S,
    meta: Meta,
}

impl RawPacket<Shared> {
    /// Copy a received frame into a fresh shared buffer.
    pub fn from_received(
        bytes: &[u8],
        src_addr: Ipv6Addr,
        dst_addr: Ipv6Addr,
        ifindex: u32,
        hop_limit: u8,
    ) -> Self {
        RawPacket {
            storage: Arc::from(bytes),
            meta: Meta::new(src_addr, dst_addr, ifindex, hop_limit),
        }
    }
}

impl<S: Storage> RawPacket<S> {
    pub const fn new(storage: S, meta: Meta) -> Self {
        RawPacket { storage, meta }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn meta(&self) -> &Meta {
        &self.meta
    }

    pub const fn src_addr(&self) -> Ipv6Addr {
        self.meta.addr.src
    }

    pub const fn dst_addr(&self) -> Ipv6Addr {
        self.meta.addr.dst
    }

    pub const fn ifindex(&self) -> u32 {
        self.meta.ifindex
    }

    pub const fn hop_limit(&self) -> u8 {
        self.meta.hop_limit
    }

    /// The first `size` bytes, or `Truncated` if the packet is shorter.
    pub fn fixed_header_region(&self, size: usize) -> Result<&[u8], DecodeErrorKind> {
        self.storage.get(..size).ok_or(DecodeErrorKind::Truncated)
    }

    /// Everything after a fixed header of `header_len` bytes.
    pub fn option_region(&self, header_len: usize) -> &[u8] {
        self.storage.get(header_len..).unwrap_or(&[])
    }

    /// The byte range of [`option_region`](Self::option_region) within the
    /// packet.
    pub fn option_range(&self, header_len: usize) -> Range<usize> {
        let len = self.len();
        header_len.min(len)..len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SRC: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);
    const DST: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1);

    #[test]
    fn test_from_received() {
        let bytes = [0x86, 0x00, 0x12, 0x34, 0x40, 0x00, 0x07, 0x08];
        let packet = RawPacket::from_received(&bytes, SRC, DST, 3, 255);
        assert_eq!(packet.as_bytes(), &bytes[..]);
        assert_eq!(packet.src_addr(), SRC);
        assert_eq!(packet.dst_addr(), DST);
        assert_eq!(packet.ifindex(), 3);
        assert_eq!(packet.hop_limit(), 255);
    }

    #[test]
    fn test_empty_input() {
        let packet = RawPacket::from_received(&[], SRC, DST, 1, 255);
        assert!(packet.is_empty());
        assert_eq!(packet.fixed_header_region(4), Err(DecodeErrorKind::Truncated));
        assert_eq!(packet.option_region(4), &[]);
        assert_eq!(packet.option_range(4), 0..0);
    }

    #[test]
    fn test_regions() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let packet = RawPacket::new(&bytes[..], Meta::new(SRC, DST, 1, 255));
        assert_eq!(packet.fixed_header_region(4), Ok(&bytes[..4]));
        assert_eq!(packet.fixed_header_region(10), Ok(&bytes[..]));
        assert_eq!(packet.fixed_header_region(11), Err(DecodeErrorKind::Truncated));
        assert_eq!(packet.option_region(8), &[9, 10]);
        assert_eq!(packet.option_region(10), &[]);
        assert_eq!(packet.option_region(16), &[]);
        assert_eq!(packet.option_range(8), 8..10);
    }

    #[test]
    fn test_clone_shares_bytes() {
        let packet = RawPacket::from_received(&[0x87, 0, 0, 0], SRC, DST, 1, 255);
        let other = packet.clone();
        assert_eq!(packet.as_bytes().as_ptr(), other.as_bytes().as_ptr());
        assert_eq!(Arc::strong_count(packet.storage()), 2);
        drop(other);
        assert_eq!(Arc::strong_count(packet.storage()), 1);
    }
}
