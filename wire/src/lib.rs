#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod hw;
pub use self::hw::{RawHwAddr, ETHERNET_ADDR_LEN, HWADDR_MAX_LEN};

mod icmp;
pub use self::icmp::v6::{
    fill_checksum as icmpv6_fill_checksum, message_type as icmpv6_message_type,
    nd::{
        emit as nd_emit, parse as nd_parse, NdRepr, NeighborAdvert, NeighborFlags,
        NeighborSolicit, Redirect, RouterAdvert, RouterFlags, RouterSolicit,
    },
    option::{
        Dnssl, DomainName, Domains, DomainsIter, NdOption, Pref64, Preference, PrefixInfo,
        PrefixInfoFlags, Rdnss, RouteInfo, Servers, ServersIter, Type as NdOptionType,
        INFINITE_LIFETIME, MAX_LABEL_LEN, MAX_NAME_LEN,
    },
    option_set::{split as split_option, Builder as OptionSetBuilder, ByKind, Iter, Opt, OptionSet},
    verify_checksum as icmpv6_verify_checksum, Message as Icmpv6Message,
    HEADER_LEN as ICMPV6_HEADER_LEN,
};

mod ip;
pub use self::ip::{
    checksum,
    v6::Ipv6AddrExt,
    Protocol as IpProtocol,
};

mod field {
    pub type Field = core::ops::Range<usize>;
    pub type Rest = core::ops::RangeFrom<usize>;
}
