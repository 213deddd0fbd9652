use alloc::vec::Vec;
use core::net::Ipv6Addr;

use ndisc_error::{DecodeError, DecodeErrorKind, EncodeErrorKind};
use ndisc_storage::{Meta, RawPacket, Shared, Storage};
use ndisc_wire::{icmpv6_message_type, Icmpv6Message, OptionSet};

use crate::{
    message::{
        reject, NeighborAdvertisement, NeighborSolicitation, Redirect, RouterAdvertisement,
        RouterSolicitation,
    },
    Config,
};

/// Any Neighbor Discovery message.
#[derive(Debug, Clone)]
pub enum Ndisc<S: Storage = Shared> {
    RouterSolicit(RouterSolicitation<S>),
    RouterAdvert(RouterAdvertisement<S>),
    NeighborSolicit(NeighborSolicitation<S>),
    NeighborAdvert(NeighborAdvertisement<S>),
    Redirect(Redirect<S>),
}

macro_rules! each {
    ($this:expr, $msg:ident => $e:expr) => {
        match $this {
            Ndisc::RouterSolicit($msg) => $e,
            Ndisc::RouterAdvert($msg) => $e,
            Ndisc::NeighborSolicit($msg) => $e,
            Ndisc::NeighborAdvert($msg) => $e,
            Ndisc::Redirect($msg) => $e,
        }
    };
}

impl<S: Storage> Ndisc<S> {
    pub const fn message(&self) -> Icmpv6Message {
        match self {
            Ndisc::RouterSolicit(_) => Icmpv6Message::RouterSolicit,
            Ndisc::RouterAdvert(_) => Icmpv6Message::RouterAdvert,
            Ndisc::NeighborSolicit(_) => Icmpv6Message::NeighborSolicit,
            Ndisc::NeighborAdvert(_) => Icmpv6Message::NeighborAdvert,
            Ndisc::Redirect(_) => Icmpv6Message::Redirect,
        }
    }

    pub fn packet(&self) -> &RawPacket<S> {
        each!(self, msg => msg.packet())
    }

    pub fn options(&self) -> &OptionSet<S> {
        each!(self, msg => msg.options())
    }

    pub fn meta(&self) -> &Meta {
        each!(self, msg => msg.meta())
    }

    pub fn sender_addr(&self) -> Ipv6Addr {
        each!(self, msg => msg.sender_addr())
    }

    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrorKind> {
        each!(self, msg => msg.encode())
    }
}

/// Decode a received packet, dispatching on its ICMPv6 type.
pub fn decode<S: Storage>(packet: RawPacket<S>) -> Result<Ndisc<S>, DecodeError<RawPacket<S>>> {
    decode_with(&Config::default(), packet)
}

/// Decode a received packet, dispatching on its ICMPv6 type.
///
/// On failure the packet is handed back in the error.
pub fn decode_with<S: Storage>(
    config: &Config,
    packet: RawPacket<S>,
) -> Result<Ndisc<S>, DecodeError<RawPacket<S>>> {
    let Some(message) = icmpv6_message_type(packet.as_bytes()) else {
        return Err(reject(DecodeErrorKind::Truncated, packet));
    };

    match message {
        Icmpv6Message::RouterSolicit => {
            RouterSolicitation::decode_with(config, packet).map(Ndisc::RouterSolicit)
        }
        Icmpv6Message::RouterAdvert => {
            RouterAdvertisement::decode_with(config, packet).map(Ndisc::RouterAdvert)
        }
        Icmpv6Message::NeighborSolicit => {
            NeighborSolicitation::decode_with(config, packet).map(Ndisc::NeighborSolicit)
        }
        Icmpv6Message::NeighborAdvert => {
            NeighborAdvertisement::decode_with(config, packet).map(Ndisc::NeighborAdvert)
        }
        Icmpv6Message::Redirect => Redirect::decode_with(config, packet).map(Ndisc::Redirect),
        Icmpv6Message::Unknown(_) => Err(reject(DecodeErrorKind::UnsupportedType, packet)),
    }
}

/// Serialize a message. The checksum is left zero.
pub fn encode<S: Storage>(msg: &Ndisc<S>) -> Result<Vec<u8>, EncodeErrorKind> {
    msg.encode()
}

#[cfg(test)]
mod tests {
    use std::vec;

    use super::*;
    use crate::checksum;
    use ndisc_wire::{NdOptionType, RawHwAddr};

    const SRC: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2);
    const DST: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);

    static NEIGHBOR_ADVERT_BYTES: [u8; 32] = [
        0x88, 0x00, 0x00, 0x00, // type, code, checksum
        0x40, 0x00, 0x00, 0x00, // solicited
        0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, // target 2001:db8::1
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, //
        0x02, 0x01, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, // TLLAO
    ];

    static ROUTER_ADVERT_BYTES: [u8; 32] = [
        0x86, 0x00, 0x00, 0x00, // type, code, checksum
        0x40, 0xc0, 0x07, 0x08, // hop limit, M|O, lifetime 1800 s
        0x00, 0x00, 0x75, 0x30, // reachable time
        0x00, 0x00, 0x03, 0xe8, // retrans timer
        0x01, 0x01, 0x52, 0x54, 0x00, 0x12, 0x34, 0x56, // SLLAO
        0x05, 0x01, 0x00, 0x00, 0x00, 0x00, 0x05, 0xdc, // MTU 1500
    ];

    fn received(bytes: &[u8]) -> RawPacket {
        RawPacket::from_received(bytes, SRC, DST, 3, 255)
    }

    #[test]
    fn test_decode_neighbor_advert() {
        let msg = decode(received(&NEIGHBOR_ADVERT_BYTES)).unwrap();
        assert_eq!(msg.message(), Icmpv6Message::NeighborAdvert);
        assert_eq!(msg.sender_addr(), SRC);

        let Ndisc::NeighborAdvert(na) = &msg else {
            panic!("expected a neighbor advertisement, got {msg:?}");
        };
        assert!(na.is_solicited());
        assert!(!na.is_router());
        assert!(!na.is_override());
        assert_eq!(na.target_addr(), Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1));
        assert_eq!(na.ref_count(), 1);

        assert_eq!(na.options().len(), 1);
        let tllao = na.options().first(NdOptionType::DstLLAddr).unwrap();
        assert_eq!(tllao.data, &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        assert_eq!(
            na.tgt_lladdr(),
            Some(RawHwAddr::from([0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff])),
        );
    }

    #[test]
    fn test_decode_zero_option_length() {
        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[25] = 0;
        let err = decode(received(&bytes)).unwrap_err();
        assert_eq!(err.kind(), DecodeErrorKind::MalformedOption);
        assert_eq!(err.into_data().as_bytes(), &bytes[..]);
    }

    #[test]
    fn test_decode_rejects() {
        let err = decode(received(&[0x88, 0x00])).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::Truncated);

        let err = decode(received(&[0x80, 0x00, 0x00, 0x00, 0x12, 0x34, 0x00, 0x01])).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnsupportedType);

        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[1] = 1;
        let err = decode(received(&bytes)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::UnsupportedCode);
    }

    #[test]
    fn test_decode_strict() {
        let mut bytes = vec![0; NEIGHBOR_ADVERT_BYTES.len()];
        bytes.copy_from_slice(&NEIGHBOR_ADVERT_BYTES);

        let err = decode_with(&Config::strict(), received(&bytes)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::ChecksumInvalid);

        checksum::fill(&mut bytes, ndisc_storage::Ends { src: SRC, dst: DST });
        assert!(checksum::verify(&bytes, ndisc_storage::Ends { src: SRC, dst: DST }));
        let msg = decode_with(&Config::strict(), received(&bytes)).unwrap();
        assert!(matches!(msg, Ndisc::NeighborAdvert(_)));
    }

    #[test]
    fn test_decode_strict_oversized() {
        let mut bytes = vec![0; 140_000];
        bytes[..NEIGHBOR_ADVERT_BYTES.len()].copy_from_slice(&NEIGHBOR_ADVERT_BYTES);
        checksum::fill(&mut bytes, ndisc_storage::Ends { src: SRC, dst: DST });

        // The checksum verifies, so decoding reaches the zeroed option region.
        let err = decode_with(&Config::strict(), received(&bytes)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::MalformedOption);

        bytes[40] ^= 0x01;
        let err = decode_with(&Config::strict(), received(&bytes)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::ChecksumInvalid);
    }

    #[test]
    fn test_decode_every_prefix() {
        let boundaries = [16, 24, 32];
        for len in 0..=ROUTER_ADVERT_BYTES.len() {
            match decode(received(&ROUTER_ADVERT_BYTES[..len])) {
                Ok(msg) => {
                    assert!(boundaries.contains(&len), "decoded at {len}");
                    let Ndisc::RouterAdvert(ra) = &msg else {
                        panic!("expected a router advertisement, got {msg:?}");
                    };
                    let count = boundaries.iter().position(|&b| b == len).unwrap();
                    assert_eq!(ra.options().len(), count);
                }
                Err(err) => {
                    assert!(!boundaries.contains(&len), "rejected at {len}");
                    assert_eq!(err.kind, DecodeErrorKind::Truncated, "at {len}");
                }
            }
        }

        let Ndisc::RouterAdvert(ra) = decode(received(&ROUTER_ADVERT_BYTES)).unwrap() else {
            panic!("expected a router advertisement");
        };
        assert!(ra.is_managed() && ra.is_other());
        assert_eq!(ra.mtu(), Some(1500));
    }

    #[test]
    fn test_encode() {
        let msg = decode(received(&NEIGHBOR_ADVERT_BYTES)).unwrap();
        assert_eq!(encode(&msg).unwrap(), &NEIGHBOR_ADVERT_BYTES[..]);

        let again = decode(received(&encode(&msg).unwrap())).unwrap();
        assert_eq!(again.options(), msg.options());
        assert_eq!(again.message(), msg.message());
    }

    #[test]
    fn test_zeroed_region_terminates() {
        let mut bytes = vec![0u8; 24 + 64];
        bytes[..24].copy_from_slice(&NEIGHBOR_ADVERT_BYTES[..24]);
        let err = decode(received(&bytes)).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::MalformedOption);
    }
}
