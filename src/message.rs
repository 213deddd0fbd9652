use alloc::{sync::Arc, vec::Vec};
use core::{fmt, net::Ipv6Addr, ops::Deref};

use ndisc_error::{DecodeError, DecodeErrorKind, EncodeErrorKind};
use ndisc_storage::{Meta, RawPacket, Shared, Storage};
use ndisc_wire::{
    self as wire, Icmpv6Message, Ipv6AddrExt, NdOption, NdOptionType, NdRepr, NeighborFlags,
    OptionSet, Pref64, PrefixInfo, RawHwAddr, Rdnss, RouteInfo, RouterFlags,
};

use crate::{Checks, Config};

struct Inner<R, S: Storage> {
    packet: RawPacket<S>,
    options: OptionSet<S>,
    repr: R,
}

/// A validated Neighbor Discovery message.
///
/// Cloning the handle shares the packet, its options and the decoded fields.
/// The handle dereferences to the fixed fields of its kind.
pub struct Message<R, S: Storage = Shared>(Arc<Inner<R, S>>);

pub type RouterSolicitation<S = Shared> = Message<wire::RouterSolicit, S>;
pub type RouterAdvertisement<S = Shared> = Message<wire::RouterAdvert, S>;
pub type NeighborSolicitation<S = Shared> = Message<wire::NeighborSolicit, S>;
pub type NeighborAdvertisement<S = Shared> = Message<wire::NeighborAdvert, S>;
pub type Redirect<S = Shared> = Message<wire::Redirect, S>;

// Metadata checks enabled by the config.
fn check_packet<R: NdRepr, S: Storage>(
    checks: Checks,
    packet: &RawPacket<S>,
) -> Result<(), DecodeErrorKind> {
    if checks.hop_limit() && packet.hop_limit() != Meta::HOP_LIMIT {
        return Err(DecodeErrorKind::InvalidField);
    }
    if checks.router_source()
        && matches!(R::MESSAGE, Icmpv6Message::RouterAdvert | Icmpv6Message::Redirect)
        && !packet.src_addr().is_link_local()
    {
        return Err(DecodeErrorKind::InvalidField);
    }
    Ok(())
}

pub(crate) fn reject<S: Storage>(
    kind: DecodeErrorKind,
    packet: RawPacket<S>,
) -> DecodeError<RawPacket<S>> {
    #[cfg(feature = "log")]
    tracing::debug!(
        target: "ndisc",
        src = %packet.src_addr(),
        ifindex = packet.ifindex(),
        len = packet.len(),
        "rejected: {kind}",
    );
    kind.with(packet)
}

impl<R: NdRepr, S: Storage> Message<R, S> {
    /// Decode `packet` as a message of kind `R`, without metadata checks.
    pub fn decode(packet: RawPacket<S>) -> Result<Self, DecodeError<RawPacket<S>>> {
        Self::decode_with(&Config::default(), packet)
    }

    /// Decode `packet` as a message of kind `R`.
    ///
    /// On failure the packet is handed back in the error.
    pub fn decode_with(
        config: &Config,
        packet: RawPacket<S>,
    ) -> Result<Self, DecodeError<RawPacket<S>>> {
        let checks = config.checks;
        if checks.checksum() && !wire::icmpv6_verify_checksum(packet.as_bytes(), packet.meta().addr)
        {
            return Err(reject(DecodeErrorKind::ChecksumInvalid, packet));
        }

        let res = wire::nd_parse::<R, S>(&packet)
            .and_then(|parsed| check_packet::<R, S>(checks, &packet).map(|()| parsed));
        match res {
            Ok((repr, options)) => Ok(Message(Arc::new(Inner {
                packet,
                options,
                repr,
            }))),
            Err(kind) => Err(reject(kind, packet)),
        }
    }

    /// Serialize the message. Reserved fields and the checksum are zero.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeErrorKind> {
        wire::nd_emit(&self.0.repr, &self.0.options).map(|buf| buf.into_vec())
    }
}

impl<R: NdRepr> Message<R> {
    /// Construct a message to be sent with the given metadata.
    ///
    /// The checksum is filled in, and the result is validated the same way a
    /// received message would be. A message that a receiver would reject
    /// fails with `InvalidField`.
    pub fn build<S: Storage>(
        repr: R,
        options: &OptionSet<S>,
        meta: Meta,
    ) -> Result<Self, EncodeErrorKind> {
        let mut buf = wire::nd_emit(&repr, options)?;
        wire::icmpv6_fill_checksum(buf.data_mut(), meta.addr);

        Self::decode(buf.into_packet(meta)).map_err(|_err| {
            #[cfg(feature = "log")]
            tracing::debug!(target: "ndisc", "constructed message rejected: {}", _err.kind);
            EncodeErrorKind::InvalidField
        })
    }
}

impl<R, S: Storage> Message<R, S> {
    pub fn packet(&self) -> &RawPacket<S> {
        &self.0.packet
    }

    pub fn options(&self) -> &OptionSet<S> {
        &self.0.options
    }

    pub fn repr(&self) -> &R {
        &self.0.repr
    }

    pub fn meta(&self) -> &Meta {
        self.0.packet.meta()
    }

    pub fn sender_addr(&self) -> Ipv6Addr {
        self.0.packet.src_addr()
    }

    pub fn ifindex(&self) -> u32 {
        self.0.packet.ifindex()
    }

    /// Take another reference to the message.
    pub fn retain(&self) -> Self {
        Message(self.0.clone())
    }

    /// Drop this reference. The message is freed with its last reference.
    pub fn release(self) {}

    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    fn lladdr(&self, kind: NdOptionType) -> Option<RawHwAddr> {
        self.0.options.parsed(kind).find_map(|opt| match opt {
            NdOption::SrcLLAddr(addr) | NdOption::DstLLAddr(addr) => Some(addr),
            _ => None,
        })
    }
}

impl<R, S: Storage> Clone for Message<R, S> {
    fn clone(&self) -> Self {
        self.retain()
    }
}

impl<R, S: Storage> Deref for Message<R, S> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.0.repr
    }
}

impl<R: fmt::Debug, S: Storage> fmt::Debug for Message<R, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("repr", &self.0.repr)
            .field("options", &self.0.options)
            .field("meta", self.meta())
            .finish()
    }
}

impl<S: Storage> RouterSolicitation<S> {
    pub fn src_lladdr(&self) -> Option<RawHwAddr> {
        self.lladdr(NdOptionType::SrcLLAddr)
    }
}

impl<S: Storage> RouterAdvertisement<S> {
    pub fn is_managed(&self) -> bool {
        self.flags.contains(RouterFlags::MANAGED)
    }

    pub fn is_other(&self) -> bool {
        self.flags.contains(RouterFlags::OTHER)
    }

    pub fn is_home_agent(&self) -> bool {
        self.flags.contains(RouterFlags::HOME_AGENT)
    }

    pub fn is_proxy(&self) -> bool {
        self.flags.contains(RouterFlags::PROXY)
    }

    pub fn src_lladdr(&self) -> Option<RawHwAddr> {
        self.lladdr(NdOptionType::SrcLLAddr)
    }

    pub fn mtu(&self) -> Option<u32> {
        self.options().parsed(NdOptionType::Mtu).find_map(|opt| match opt {
            NdOption::Mtu(mtu) => Some(mtu),
            _ => None,
        })
    }

    pub fn prefixes(&self) -> impl Iterator<Item = PrefixInfo> + '_ {
        self.options()
            .parsed(NdOptionType::PrefixInfo)
            .filter_map(|opt| match opt {
                NdOption::PrefixInfo(prefix) => Some(prefix),
                _ => None,
            })
    }

    pub fn routes(&self) -> impl Iterator<Item = RouteInfo> + '_ {
        self.options()
            .parsed(NdOptionType::RouteInfo)
            .filter_map(|opt| match opt {
                NdOption::RouteInfo(route) => Some(route),
                _ => None,
            })
    }

    pub fn rdnss(&self) -> impl Iterator<Item = Rdnss<'_>> + '_ {
        self.options()
            .parsed(NdOptionType::Rdnss)
            .filter_map(|opt| match opt {
                NdOption::Rdnss(rdnss) => Some(rdnss),
                _ => None,
            })
    }

    pub fn dnssl(&self) -> impl Iterator<Item = wire::Dnssl<'_>> + '_ {
        self.options()
            .parsed(NdOptionType::Dnssl)
            .filter_map(|opt| match opt {
                NdOption::Dnssl(dnssl) => Some(dnssl),
                _ => None,
            })
    }

    pub fn captive_portal(&self) -> Option<&str> {
        self.options()
            .parsed(NdOptionType::CaptivePortal)
            .find_map(|opt| match opt {
                NdOption::CaptivePortal(uri) => Some(uri),
                _ => None,
            })
    }

    pub fn pref64(&self) -> impl Iterator<Item = Pref64> + '_ {
        self.options()
            .parsed(NdOptionType::Pref64)
            .filter_map(|opt| match opt {
                NdOption::Pref64(pref64) => Some(pref64),
                _ => None,
            })
    }

    /// The extended flags from the Flags Expansion option, if present.
    pub fn ext_flags(&self) -> Option<u64> {
        self.options()
            .parsed(NdOptionType::FlagsExt)
            .find_map(|opt| match opt {
                NdOption::FlagsExt(flags) => Some(flags),
                _ => None,
            })
    }
}

impl<S: Storage> NeighborSolicitation<S> {
    pub fn target_addr(&self) -> Ipv6Addr {
        self.repr().target_addr
    }

    pub fn src_lladdr(&self) -> Option<RawHwAddr> {
        self.lladdr(NdOptionType::SrcLLAddr)
    }
}

impl<S: Storage> NeighborAdvertisement<S> {
    pub fn is_router(&self) -> bool {
        self.flags.contains(NeighborFlags::ROUTER)
    }

    pub fn is_solicited(&self) -> bool {
        self.flags.contains(NeighborFlags::SOLICITED)
    }

    pub fn is_override(&self) -> bool {
        self.flags.contains(NeighborFlags::OVERRIDE)
    }

    pub fn target_addr(&self) -> Ipv6Addr {
        self.repr().target_addr
    }

    pub fn tgt_lladdr(&self) -> Option<RawHwAddr> {
        self.lladdr(NdOptionType::DstLLAddr)
    }
}

impl<S: Storage> Redirect<S> {
    pub fn target_addr(&self) -> Ipv6Addr {
        self.repr().target_addr
    }

    pub fn dest_addr(&self) -> Ipv6Addr {
        self.repr().dest_addr
    }

    pub fn tgt_lladdr(&self) -> Option<RawHwAddr> {
        self.lladdr(NdOptionType::DstLLAddr)
    }

    /// The IP header and data of the redirected packet, as much as fit.
    pub fn redirected_header(&self) -> Option<&[u8]> {
        self.options()
            .parsed(NdOptionType::RedirectedHeader)
            .find_map(|opt| match opt {
                NdOption::RedirectedHeader(header) => Some(header),
                _ => None,
            })
    }
}
