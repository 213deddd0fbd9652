use alloc::vec::Vec;
use core::{net::Ipv6Addr, time::Duration};

use bitflags::bitflags;
use byteorder::{ByteOrder, NetworkEndian};
use ndisc_error::{DecodeErrorKind, EncodeErrorKind};
use ndisc_storage::{Buf, Meta, RawPacket, Storage};

use super::{
    field,
    option::{Preference, Type},
    option_set::OptionSet,
    Header, Message, HEADER_LEN,
};
use crate::ip::v6::Ipv6AddrExt;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RouterFlags: u8 {
        const MANAGED    = 0b10000000;
        const OTHER      = 0b01000000;
        const HOME_AGENT = 0b00100000;
        const PROXY      = 0b00000100;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NeighborFlags: u8 {
        const ROUTER    = 0b10000000;
        const SOLICITED = 0b01000000;
        const OVERRIDE  = 0b00100000;
    }
}

// Position of the default router preference in the RA flags byte.
const PRF_SHIFT: u8 = 3;
const PRF_MASK: u8 = 0b11 << PRF_SHIFT;

fn millis_u32(value: Duration) -> u32 {
    u32::try_from(value.as_millis()).unwrap_or(u32::MAX)
}

wire!(impl Header {
    cur_hop_limit/set_cur_hop_limit: u8 =>
        |data| data[field::CUR_HOP_LIMIT];
        |data, value| data[field::CUR_HOP_LIMIT] = value;

    router_flags/set_router_flags: RouterFlags =>
        |data| RouterFlags::from_bits_truncate(data[field::ROUTER_FLAGS]);
        |data, value| {
            let prf = data[field::ROUTER_FLAGS] & PRF_MASK;
            data[field::ROUTER_FLAGS] = prf | value.bits();
        };

    router_preference/set_router_preference: Preference =>
        |data| Preference::from_bits(data[field::ROUTER_FLAGS] >> PRF_SHIFT);
        |data, value| {
            let flags = data[field::ROUTER_FLAGS] & !PRF_MASK;
            data[field::ROUTER_FLAGS] = flags | (value.bits() << PRF_SHIFT);
        };

    router_lifetime/set_router_lifetime: Duration =>
        |data| Duration::from_secs(u64::from(NetworkEndian::read_u16(&data[field::ROUTER_LT])));
        |data, value| {
            let secs = u16::try_from(value.as_secs()).unwrap_or(u16::MAX);
            NetworkEndian::write_u16(&mut data[field::ROUTER_LT], secs)
        };

    reachable_time/set_reachable_time: Duration =>
        |data| Duration::from_millis(u64::from(NetworkEndian::read_u32(&data[field::REACHABLE_TM])));
        |data, value| NetworkEndian::write_u32(&mut data[field::REACHABLE_TM], millis_u32(value));

    retrans_time/set_retrans_time: Duration =>
        |data| Duration::from_millis(u64::from(NetworkEndian::read_u32(&data[field::RETRANS_TM])));
        |data, value| NetworkEndian::write_u32(&mut data[field::RETRANS_TM], millis_u32(value));

    target_addr/set_target_addr: Ipv6Addr =>
        |data| Ipv6Addr::from_bytes(&data[field::TARGET_ADDR]);
        |data, value| data[field::TARGET_ADDR].copy_from_slice(&value.octets());

    neighbor_flags/set_neighbor_flags: NeighborFlags =>
        |data| NeighborFlags::from_bits_truncate(data[field::NEIGH_FLAGS]);
        |data, value| data[field::NEIGH_FLAGS] = value.bits();

    dest_addr/set_dest_addr: Ipv6Addr =>
        |data| Ipv6Addr::from_bytes(&data[field::DEST_ADDR]);
        |data, value| data[field::DEST_ADDR].copy_from_slice(&value.octets());
});

/// The fixed part of one kind of NDISC message.
pub trait NdRepr: Sized {
    const MESSAGE: Message;
    /// Length of the fixed part, ICMPv6 header included.
    const HEADER_LEN: usize;

    /// Decode the fixed part. `header` is exactly `HEADER_LEN` bytes long.
    fn parse_header(header: &[u8], meta: &Meta) -> Result<Self, DecodeErrorKind>;

    /// Validation that depends on the options of the message.
    fn check_options<S: Storage>(
        &self,
        _meta: &Meta,
        _options: &OptionSet<S>,
    ) -> Result<(), DecodeErrorKind> {
        Ok(())
    }

    /// Write the fields following the ICMPv6 header. `header` is zeroed and
    /// exactly `HEADER_LEN` bytes long.
    fn emit_header(&self, header: &mut [u8]);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default)]
pub struct RouterSolicit;

impl NdRepr for RouterSolicit {
    const MESSAGE: Message = Message::RouterSolicit;
    const HEADER_LEN: usize = field::UNUSED.end;

    fn parse_header(_: &[u8], _: &Meta) -> Result<Self, DecodeErrorKind> {
        Ok(RouterSolicit)
    }

    fn check_options<S: Storage>(
        &self,
        meta: &Meta,
        options: &OptionSet<S>,
    ) -> Result<(), DecodeErrorKind> {
        if meta.addr.src.is_unspecified() && options.contains(Type::SrcLLAddr) {
            return Err(DecodeErrorKind::InvalidField);
        }
        Ok(())
    }

    fn emit_header(&self, _: &mut [u8]) {}
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct RouterAdvert {
    pub hop_limit: u8,
    pub flags: RouterFlags,
    pub preference: Preference,
    pub router_lifetime: Duration,
    pub reachable_time: Duration,
    pub retrans_time: Duration,
}

impl Default for RouterAdvert {
    fn default() -> Self {
        RouterAdvert {
            hop_limit: 0,
            flags: RouterFlags::empty(),
            preference: Preference::Medium,
            router_lifetime: Duration::ZERO,
            reachable_time: Duration::ZERO,
            retrans_time: Duration::ZERO,
        }
    }
}

impl NdRepr for RouterAdvert {
    const MESSAGE: Message = Message::RouterAdvert;
    const HEADER_LEN: usize = field::RETRANS_TM.end;

    fn parse_header(header: &[u8], _: &Meta) -> Result<Self, DecodeErrorKind> {
        let packet = Header(header);
        Ok(RouterAdvert {
            hop_limit: packet.cur_hop_limit(),
            flags: packet.router_flags(),
            preference: packet.router_preference(),
            router_lifetime: packet.router_lifetime(),
            reachable_time: packet.reachable_time(),
            retrans_time: packet.retrans_time(),
        })
    }

    fn emit_header(&self, header: &mut [u8]) {
        let mut packet = Header(header);
        packet.set_cur_hop_limit(self.hop_limit);
        packet.set_router_flags(self.flags);
        packet.set_router_preference(self.preference);
        packet.set_router_lifetime(self.router_lifetime);
        packet.set_reachable_time(self.reachable_time);
        packet.set_retrans_time(self.retrans_time);
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct NeighborSolicit {
    pub target_addr: Ipv6Addr,
}

impl NdRepr for NeighborSolicit {
    const MESSAGE: Message = Message::NeighborSolicit;
    const HEADER_LEN: usize = field::TARGET_ADDR.end;

    fn parse_header(header: &[u8], meta: &Meta) -> Result<Self, DecodeErrorKind> {
        let target_addr = Header(header).target_addr();
        if target_addr.is_multicast() {
            return Err(DecodeErrorKind::InvalidField);
        }
        // Duplicate address detection probes go to the solicited-node group.
        if meta.addr.src.is_unspecified() && !meta.addr.dst.is_solicited_node() {
            return Err(DecodeErrorKind::InvalidField);
        }
        Ok(NeighborSolicit { target_addr })
    }

    fn check_options<S: Storage>(
        &self,
        meta: &Meta,
        options: &OptionSet<S>,
    ) -> Result<(), DecodeErrorKind> {
        if meta.addr.src.is_unspecified() && options.contains(Type::SrcLLAddr) {
            return Err(DecodeErrorKind::InvalidField);
        }
        Ok(())
    }

    fn emit_header(&self, header: &mut [u8]) {
        Header(header).set_target_addr(self.target_addr);
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct NeighborAdvert {
    pub flags: NeighborFlags,
    pub target_addr: Ipv6Addr,
}

impl NdRepr for NeighborAdvert {
    const MESSAGE: Message = Message::NeighborAdvert;
    const HEADER_LEN: usize = field::TARGET_ADDR.end;

    fn parse_header(header: &[u8], meta: &Meta) -> Result<Self, DecodeErrorKind> {
        let packet = Header(header);
        let flags = packet.neighbor_flags();
        let target_addr = packet.target_addr();

        if target_addr.is_multicast() {
            return Err(DecodeErrorKind::InvalidField);
        }
        if flags.contains(NeighborFlags::SOLICITED) && meta.addr.dst.is_multicast() {
            return Err(DecodeErrorKind::InvalidField);
        }
        Ok(NeighborAdvert { flags, target_addr })
    }

    fn emit_header(&self, header: &mut [u8]) {
        let mut packet = Header(header);
        packet.set_neighbor_flags(self.flags);
        packet.set_target_addr(self.target_addr);
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Redirect {
    pub target_addr: Ipv6Addr,
    pub dest_addr: Ipv6Addr,
}

impl NdRepr for Redirect {
    const MESSAGE: Message = Message::Redirect;
    const HEADER_LEN: usize = field::DEST_ADDR.end;

    fn parse_header(header: &[u8], _: &Meta) -> Result<Self, DecodeErrorKind> {
        let packet = Header(header);
        let target_addr = packet.target_addr();
        let dest_addr = packet.dest_addr();

        if dest_addr.is_multicast() {
            return Err(DecodeErrorKind::InvalidField);
        }
        // The target is either a better first-hop router, identified by its
        // link-local address, or the destination itself being on-link.
        if !target_addr.is_link_local() && target_addr != dest_addr {
            return Err(DecodeErrorKind::InvalidField);
        }
        Ok(Redirect { target_addr, dest_addr })
    }

    fn emit_header(&self, header: &mut [u8]) {
        let mut packet = Header(header);
        packet.set_target_addr(self.target_addr);
        packet.set_dest_addr(self.dest_addr);
    }
}

/// Decode a message of kind `R` with its options.
///
/// The checksum and the packet metadata beyond addresses are not checked.
pub fn parse<R: NdRepr, S: Storage>(
    packet: &RawPacket<S>,
) -> Result<(R, OptionSet<S>), DecodeErrorKind> {
    let header = Header(packet.fixed_header_region(HEADER_LEN)?);
    if header.msg_type() != R::MESSAGE {
        return Err(DecodeErrorKind::UnsupportedType);
    }
    if header.msg_code() != 0 {
        return Err(DecodeErrorKind::UnsupportedCode);
    }

    let repr = R::parse_header(packet.fixed_header_region(R::HEADER_LEN)?, packet.meta())?;
    let options = OptionSet::from_packet(packet, R::HEADER_LEN)?;
    repr.check_options(packet.meta(), &options)?;
    Ok((repr, options))
}

/// Serialize a message of kind `R` with its options. The checksum is left
/// zero.
pub fn emit<R: NdRepr, S: Storage>(
    repr: &R,
    options: &OptionSet<S>,
) -> Result<Buf<Vec<u8>>, EncodeErrorKind> {
    let mut buf = Buf::with_capacity(R::HEADER_LEN + options.buffer_len()?);

    let fixed = buf.append(R::HEADER_LEN);
    let mut header = Header(&mut *fixed);
    header.set_msg_type(R::MESSAGE);
    header.set_msg_code(0);
    repr.emit_header(fixed);

    options.emit(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;
    use crate::{
        icmp::v6::option::{NdOption, PrefixInfo, PrefixInfoFlags},
        RawHwAddr,
    };

    const LINK_LOCAL: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);
    const PEER: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2);
    const TARGET: Ipv6Addr = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);

    fn meta(src: Ipv6Addr, dst: Ipv6Addr) -> Meta {
        Meta::new(src, dst, 1, Meta::HOP_LIMIT)
    }

    fn decode<R: NdRepr>(bytes: &[u8], meta: Meta) -> Result<(R, OptionSet<&[u8]>), DecodeErrorKind> {
        parse(&RawPacket::new(bytes, meta))
    }

    static NEIGHBOR_ADVERT_BYTES: [u8; 32] = [
        0x88, 0x00, 0x00, 0x00, // type, code, checksum
        0x40, 0x00, 0x00, 0x00, // flags
        0x20, 0x01, 0x0d, 0xb8, 0x00, 0x00, 0x00, 0x00, // target
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, //
        0x02, 0x01, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, // TLLAO
    ];

    static ROUTER_ADVERT_BYTES: [u8; 32] = [
        0x86, 0x00, 0x00, 0x00, // type, code, checksum
        0x40, 0x88, 0x07, 0x08, // hop limit, M + high preference, lifetime 1800
        0x00, 0x00, 0x75, 0x30, // reachable time 30000 ms
        0x00, 0x00, 0x03, 0xe8, // retrans timer 1000 ms
        0x01, 0x01, 0x52, 0x54, 0x00, 0x12, 0x34, 0x56, // SLLAO
        0x05, 0x01, 0x00, 0x00, 0x00, 0x00, 0x05, 0xdc, // MTU 1500
    ];

    #[test]
    fn test_neighbor_advert() {
        let (repr, options) =
            decode::<NeighborAdvert>(&NEIGHBOR_ADVERT_BYTES, meta(PEER, LINK_LOCAL)).unwrap();
        assert_eq!(repr, NeighborAdvert {
            flags: NeighborFlags::SOLICITED,
            target_addr: TARGET,
        });
        assert_eq!(options.len(), 1);

        let tllao = options.get(0).unwrap();
        assert_eq!(tllao.kind, Type::DstLLAddr);
        assert_eq!(tllao.data, &[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
    }

    #[test]
    fn test_neighbor_advert_override_bit() {
        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[4] = 0x20;
        let (repr, _) = decode::<NeighborAdvert>(&bytes, meta(PEER, LINK_LOCAL)).unwrap();
        assert_eq!(repr.flags, NeighborFlags::OVERRIDE);
    }

    #[test]
    fn test_neighbor_advert_zero_option_length() {
        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[25] = 0;
        assert_eq!(
            decode::<NeighborAdvert>(&bytes, meta(PEER, LINK_LOCAL)).unwrap_err(),
            DecodeErrorKind::MalformedOption,
        );
    }

    #[test]
    fn test_neighbor_advert_multicast_target() {
        for flags in [0x00, 0x20, 0x40, 0x80, 0xe0, 0x1f] {
            let mut bytes = NEIGHBOR_ADVERT_BYTES;
            bytes[4] = flags;
            bytes[8..24].copy_from_slice(&Ipv6Addr::LINK_LOCAL_ALL_NODES.octets());
            assert_eq!(
                decode::<NeighborAdvert>(&bytes, meta(PEER, LINK_LOCAL)).unwrap_err(),
                DecodeErrorKind::InvalidField,
            );
        }
    }

    #[test]
    fn test_neighbor_advert_solicited_multicast_dst() {
        let all_nodes = meta(PEER, Ipv6Addr::LINK_LOCAL_ALL_NODES);
        assert_eq!(
            decode::<NeighborAdvert>(&NEIGHBOR_ADVERT_BYTES, all_nodes).unwrap_err(),
            DecodeErrorKind::InvalidField,
        );

        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[4] = 0x20;
        assert!(decode::<NeighborAdvert>(&bytes, all_nodes).is_ok());
    }

    #[test]
    fn test_neighbor_advert_reserved_bits() {
        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[4] |= 0x1f;
        bytes[5..8].copy_from_slice(&[0xff, 0xff, 0xff]);
        assert_eq!(
            decode::<NeighborAdvert>(&bytes, meta(PEER, LINK_LOCAL)),
            decode::<NeighborAdvert>(&NEIGHBOR_ADVERT_BYTES, meta(PEER, LINK_LOCAL)),
        );
    }

    #[test]
    fn test_truncated() {
        for len in [0, 3, 4, 23] {
            assert_eq!(
                decode::<NeighborAdvert>(&NEIGHBOR_ADVERT_BYTES[..len], meta(PEER, LINK_LOCAL))
                    .unwrap_err(),
                DecodeErrorKind::Truncated,
                "{len}",
            );
        }
        assert_eq!(
            decode::<NeighborAdvert>(&NEIGHBOR_ADVERT_BYTES[..28], meta(PEER, LINK_LOCAL))
                .unwrap_err(),
            DecodeErrorKind::Truncated,
        );
    }

    #[test]
    fn test_type_and_code() {
        assert_eq!(
            decode::<NeighborSolicit>(&NEIGHBOR_ADVERT_BYTES, meta(PEER, LINK_LOCAL)).unwrap_err(),
            DecodeErrorKind::UnsupportedType,
        );

        let mut bytes = NEIGHBOR_ADVERT_BYTES;
        bytes[1] = 1;
        assert_eq!(
            decode::<NeighborAdvert>(&bytes, meta(PEER, LINK_LOCAL)).unwrap_err(),
            DecodeErrorKind::UnsupportedCode,
        );
    }

    #[test]
    fn test_router_advert() {
        let (repr, options) = decode::<RouterAdvert>(
            &ROUTER_ADVERT_BYTES,
            meta(LINK_LOCAL, Ipv6Addr::LINK_LOCAL_ALL_NODES),
        )
        .unwrap();
        assert_eq!(repr, RouterAdvert {
            hop_limit: 64,
            flags: RouterFlags::MANAGED,
            preference: Preference::High,
            router_lifetime: Duration::from_secs(1800),
            reachable_time: Duration::from_millis(30000),
            retrans_time: Duration::from_millis(1000),
        });
        assert_eq!(options.len(), 2);
        assert_eq!(options.parsed(Type::Mtu).next(), Some(NdOption::Mtu(1500)));

        let buf = emit(&repr, &options).unwrap();
        assert_eq!(buf.data(), &ROUTER_ADVERT_BYTES[..]);
    }

    #[test]
    fn test_router_advert_reserved_preference() {
        let mut bytes = ROUTER_ADVERT_BYTES;
        bytes[5] = 0x10 | 0x01;
        let (repr, _) = decode::<RouterAdvert>(&bytes, meta(LINK_LOCAL, PEER)).unwrap();
        assert_eq!(repr.preference, Preference::Medium);
        assert_eq!(repr.flags, RouterFlags::empty());
    }

    #[test]
    fn test_router_advert_prefixes() {
        let prefix = |n| PrefixInfo {
            prefix_len: 64,
            flags: PrefixInfoFlags::ON_LINK | PrefixInfoFlags::ADDRCONF,
            valid_lifetime: Duration::from_secs(86400),
            preferred_lifetime: Duration::from_secs(14400),
            prefix: Ipv6Addr::new(0x2001, 0xdb8, n, 0, 0, 0, 0, 0),
        };
        let options = OptionSet::builder()
            .push(NdOption::PrefixInfo(prefix(1)))
            .push(NdOption::PrefixInfo(prefix(2)))
            .build();
        let repr = RouterAdvert {
            hop_limit: 64,
            router_lifetime: Duration::from_secs(600),
            ..Default::default()
        };
        let bytes = emit(&repr, &options).unwrap().into_vec();
        assert_eq!(bytes.len(), 16 + 64);

        let (parsed, parsed_options) = decode::<RouterAdvert>(&bytes, meta(LINK_LOCAL, PEER)).unwrap();
        assert_eq!(parsed, repr);
        assert_eq!(parsed_options, options);

        let prefixes: Vec<_> = parsed_options.parsed(Type::PrefixInfo).collect();
        assert_eq!(prefixes, [
            NdOption::PrefixInfo(prefix(1)),
            NdOption::PrefixInfo(prefix(2)),
        ]);
    }

    #[test]
    fn test_router_solicit() {
        let lladdr = RawHwAddr::from([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        let options = OptionSet::builder().push(NdOption::SrcLLAddr(lladdr)).build();
        let bytes = emit(&RouterSolicit, &options).unwrap().into_vec();
        assert_eq!(&bytes[..8], &[0x85, 0, 0, 0, 0, 0, 0, 0]);

        let all_routers = Ipv6Addr::LINK_LOCAL_ALL_ROUTERS;
        assert!(decode::<RouterSolicit>(&bytes, meta(LINK_LOCAL, all_routers)).is_ok());
        assert_eq!(
            decode::<RouterSolicit>(&bytes, meta(Ipv6Addr::UNSPECIFIED, all_routers)).unwrap_err(),
            DecodeErrorKind::InvalidField,
        );
        assert!(decode::<RouterSolicit>(&bytes[..8], meta(Ipv6Addr::UNSPECIFIED, all_routers)).is_ok());
    }

    #[test]
    fn test_neighbor_solicit() {
        let repr = NeighborSolicit { target_addr: TARGET };
        let empty = OptionSet::builder().build();
        let bytes = emit(&repr, &empty).unwrap().into_vec();
        let solicited_node = TARGET.solicited_node();

        let (parsed, _) = decode::<NeighborSolicit>(&bytes, meta(LINK_LOCAL, solicited_node)).unwrap();
        assert_eq!(parsed, repr);

        // Duplicate address detection.
        assert!(decode::<NeighborSolicit>(&bytes, meta(Ipv6Addr::UNSPECIFIED, solicited_node)).is_ok());
        assert_eq!(
            decode::<NeighborSolicit>(&bytes, meta(Ipv6Addr::UNSPECIFIED, TARGET)).unwrap_err(),
            DecodeErrorKind::InvalidField,
        );

        let lladdr = RawHwAddr::from([0x52, 0x54, 0x00, 0x12, 0x34, 0x56]);
        let options = OptionSet::builder().push(NdOption::SrcLLAddr(lladdr)).build();
        let bytes = emit(&repr, &options).unwrap().into_vec();
        assert_eq!(
            decode::<NeighborSolicit>(&bytes, meta(Ipv6Addr::UNSPECIFIED, solicited_node))
                .unwrap_err(),
            DecodeErrorKind::InvalidField,
        );

        let multicast = NeighborSolicit { target_addr: solicited_node };
        let bytes = emit(&multicast, &empty).unwrap().into_vec();
        assert_eq!(
            decode::<NeighborSolicit>(&bytes, meta(LINK_LOCAL, solicited_node)).unwrap_err(),
            DecodeErrorKind::InvalidField,
        );
    }

    #[test]
    fn test_redirect() {
        let header = [0x60, 0x00, 0x00, 0x00, 0x00, 0x08, 0x3a, 0x40];
        let options = OptionSet::builder()
            .push(NdOption::RedirectedHeader(&header))
            .build();

        let repr = Redirect { target_addr: PEER, dest_addr: TARGET };
        let bytes = emit(&repr, &options).unwrap().into_vec();
        assert_eq!(bytes.len(), 40 + 16);

        let (parsed, parsed_options) = decode::<Redirect>(&bytes, meta(LINK_LOCAL, PEER)).unwrap();
        assert_eq!(parsed, repr);
        assert_eq!(
            parsed_options.parsed(Type::RedirectedHeader).next(),
            Some(NdOption::RedirectedHeader(&header)),
        );

        // On-link destination.
        let on_link = Redirect { target_addr: TARGET, dest_addr: TARGET };
        let bytes = emit(&on_link, &options).unwrap().into_vec();
        assert!(decode::<Redirect>(&bytes, meta(LINK_LOCAL, PEER)).is_ok());
    }

    #[test]
    fn test_redirect_invalid() {
        let empty = OptionSet::builder().build();
        let global = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 2);
        for repr in [
            Redirect { target_addr: global, dest_addr: TARGET },
            Redirect {
                target_addr: PEER,
                dest_addr: Ipv6Addr::LINK_LOCAL_ALL_NODES,
            },
        ] {
            let bytes = emit(&repr, &empty).unwrap().into_vec();
            assert_eq!(
                decode::<Redirect>(&bytes, meta(LINK_LOCAL, PEER)).unwrap_err(),
                DecodeErrorKind::InvalidField,
            );
        }
        assert_eq!(
            decode::<Redirect>(&[0x89, 0, 0, 0, 0, 0, 0, 0], meta(LINK_LOCAL, PEER)).unwrap_err(),
            DecodeErrorKind::Truncated,
        );
    }

    #[test]
    fn test_emit_saturates() {
        let repr = RouterAdvert {
            router_lifetime: Duration::from_secs(100_000),
            reachable_time: Duration::from_secs(u64::MAX),
            ..Default::default()
        };
        let empty = OptionSet::builder().build();
        let bytes = emit(&repr, &empty).unwrap().into_vec();
        assert_eq!(&bytes[6..12], &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }
}
