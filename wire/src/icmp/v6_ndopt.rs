use core::{fmt, net::Ipv6Addr, slice, str, time::Duration};

use bitflags::bitflags;
use byteorder::{ByteOrder, NetworkEndian};
use ndisc_error::{DecodeErrorKind, EncodeErrorKind};

use crate::{ip::v6::Ipv6AddrExt, RawHwAddr};

enum_with_unknown! {
    /// NDISC Option Type
    pub enum Type(u8) {
        /// Source Link-layer Address
        SrcLLAddr        = 1,
        /// Target Link-layer Address
        DstLLAddr        = 2,
        /// Prefix Information
        PrefixInfo       = 3,
        /// Redirected Header
        RedirectedHeader = 4,
        /// MTU
        Mtu              = 5,
        /// Route Information (RFC 4191)
        RouteInfo        = 24,
        /// Recursive DNS Server (RFC 8106)
        Rdnss            = 25,
        /// RA Flags Extension (RFC 5175)
        FlagsExt         = 26,
        /// DNS Search List (RFC 8106)
        Dnssl            = 31,
        /// Captive Portal (RFC 8910)
        CaptivePortal    = 37,
        /// NAT64 prefix (RFC 8781)
        Pref64           = 38,
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::SrcLLAddr => write!(f, "source link-layer address"),
            Type::DstLLAddr => write!(f, "target link-layer address"),
            Type::PrefixInfo => write!(f, "prefix information"),
            Type::RedirectedHeader => write!(f, "redirected header"),
            Type::Mtu => write!(f, "mtu"),
            Type::RouteInfo => write!(f, "route information"),
            Type::Rdnss => write!(f, "recursive dns server"),
            Type::FlagsExt => write!(f, "flags extension"),
            Type::Dnssl => write!(f, "dns search list"),
            Type::CaptivePortal => write!(f, "captive portal"),
            Type::Pref64 => write!(f, "pref64"),
            Type::Unknown(id) => write!(f, "{id}"),
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrefixInfoFlags: u8 {
        const ON_LINK     = 0b10000000;
        const ADDRCONF    = 0b01000000;
        const ROUTER_ADDR = 0b00100000;
    }
}

/// Default router or route preference. See [RFC 4191 § 2.1].
///
/// [RFC 4191 § 2.1]: https://tools.ietf.org/html/rfc4191#section-2.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Preference {
    Low,
    #[default]
    Medium,
    High,
}

impl Preference {
    /// Decode the 2-bit field. The reserved value `10` reads as medium.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b01 => Preference::High,
            0b11 => Preference::Low,
            _ => Preference::Medium,
        }
    }

    pub const fn bits(self) -> u8 {
        match self {
            Preference::High => 0b01,
            Preference::Medium => 0b00,
            Preference::Low => 0b11,
        }
    }
}

/// A lifetime of all ones, meaning "forever".
pub const INFINITE_LIFETIME: Duration = Duration::from_secs(u32::MAX as u64);

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 253;

pub type DomainName = heapless::String<MAX_NAME_LEN>;

struct RawOpt<T: ?Sized>(T);

// Offsets below are relative to the option data, i.e. the bytes following the
// Type and Length fields.
#[allow(unused)]
mod field {
    use crate::field::*;

    // Prefix Information Option fields.
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     | Prefix Length |L|A|R|Reserved1|
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                         Valid Lifetime                        |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                       Preferred Lifetime                      |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                           Reserved2                           |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                                                               |
    //  +                            Prefix                             +
    //  |                                                               |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const PREFIX_LEN: usize = 0;
    pub const PREFIX_FLAGS: usize = 1;
    pub const VALID_LT: Field = 2..6;
    pub const PREF_LT: Field = 6..10;
    pub const PREF_RESERVED: Field = 10..14;
    pub const PREFIX: Field = 14..30;

    // Redirected Header Option fields.
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     |            Reserved           |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                           Reserved                            |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  ~                       IP header + data                        ~
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const REDIRECTED_RESERVED: Field = 0..6;
    pub const REDIRECTED_DATA: Rest = 6..;

    // MTU Option fields
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     |           Reserved            |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                              MTU                              |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const MTU: Field = 2..6;

    // Route Information Option fields
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     | Prefix Length |Resvd|Prf|Resvd|
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                        Route Lifetime                         |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                   Prefix (Variable Length)                    |
    //  .                                                               .
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const ROUTE_PREFIX_LEN: usize = 0;
    pub const ROUTE_FLAGS: usize = 1;
    pub const ROUTE_LT: Field = 2..6;
    pub const ROUTE_PREFIX: Rest = 6..;

    // RDNSS and DNSSL Option fields
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |     Length    |           Reserved            |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                           Lifetime                            |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  :            Addresses of IPv6 Recursive DNS Servers            :
    //  :            or Domain Names of DNS Search List                 :
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const DNS_LT: Field = 2..6;
    pub const DNS_DATA: Rest = 6..;

    // Flags Expansion Option fields
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     |         Bit fields ...        |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                  ... available for future assignment          |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const EXT_FLAGS: Field = 0..6;

    // PREF64 Option fields
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |     Type      |    Length     |     Scaled Lifetime     | PLC |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    //  |                                                               |
    //  +               Highest 96 bits of the Prefix                   +
    //  |                                                               |
    //  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    pub const PREF64_LT_PLC: Field = 0..2;
    pub const PREF64_PREFIX: Field = 2..14;
}

wire!(impl RawOpt {
    prefix_len/set_prefix_len: u8 =>
        |data| data[field::PREFIX_LEN];
        |data, value| data[field::PREFIX_LEN] = value;

    prefix_flags/set_prefix_flags: PrefixInfoFlags =>
        |data| PrefixInfoFlags::from_bits_truncate(data[field::PREFIX_FLAGS]);
        |data, value| data[field::PREFIX_FLAGS] = value.bits();

    valid_lifetime/set_valid_lifetime: Duration =>
        |data| Duration::from_secs(u64::from(NetworkEndian::read_u32(&data[field::VALID_LT])));
        |data, value| NetworkEndian::write_u32(&mut data[field::VALID_LT], secs_u32(value));

    preferred_lifetime/set_preferred_lifetime: Duration =>
        |data| Duration::from_secs(u64::from(NetworkEndian::read_u32(&data[field::PREF_LT])));
        |data, value| NetworkEndian::write_u32(&mut data[field::PREF_LT], secs_u32(value));

    prefix/set_prefix: Ipv6Addr =>
        |data| Ipv6Addr::from_bytes(&data[field::PREFIX]);
        |data, value| data[field::PREFIX].copy_from_slice(&value.octets());

    mtu/set_mtu: u32 =>
        |data| NetworkEndian::read_u32(&data[field::MTU]);
        |data, value| NetworkEndian::write_u32(&mut data[field::MTU], value);

    route_prefix_len/set_route_prefix_len: u8 =>
        |data| data[field::ROUTE_PREFIX_LEN];
        |data, value| data[field::ROUTE_PREFIX_LEN] = value;

    route_preference/set_route_preference: Preference =>
        |data| Preference::from_bits(data[field::ROUTE_FLAGS] >> 3);
        |data, value| data[field::ROUTE_FLAGS] = value.bits() << 3;

    route_lifetime/set_route_lifetime: Duration =>
        |data| Duration::from_secs(u64::from(NetworkEndian::read_u32(&data[field::ROUTE_LT])));
        |data, value| NetworkEndian::write_u32(&mut data[field::ROUTE_LT], secs_u32(value));

    dns_lifetime/set_dns_lifetime: Duration =>
        |data| Duration::from_secs(u64::from(NetworkEndian::read_u32(&data[field::DNS_LT])));
        |data, value| NetworkEndian::write_u32(&mut data[field::DNS_LT], secs_u32(value));

    ext_flags/set_ext_flags: u64 =>
        |data| NetworkEndian::read_uint(&data[field::EXT_FLAGS], 6);
        |data, value| NetworkEndian::write_uint(&mut data[field::EXT_FLAGS], value & EXT_FLAGS_MASK, 6);

    pref64_lt_plc/set_pref64_lt_plc: u16 =>
        |data| NetworkEndian::read_u16(&data[field::PREF64_LT_PLC]);
        |data, value| NetworkEndian::write_u16(&mut data[field::PREF64_LT_PLC], value);
});

const EXT_FLAGS_MASK: u64 = (1 << 48) - 1;

fn secs_u32(value: Duration) -> u32 {
    u32::try_from(value.as_secs()).unwrap_or(u32::MAX)
}

fn mask_prefix(prefix: Ipv6Addr, prefix_len: u8) -> Ipv6Addr {
    match prefix_len {
        0 => Ipv6Addr::UNSPECIFIED,
        len if len >= 128 => prefix,
        len => Ipv6Addr::from(u128::from(prefix) & (!0u128 << (128 - u32::from(len)))),
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct PrefixInfo {
    pub prefix_len: u8,
    pub flags: PrefixInfoFlags,
    pub valid_lifetime: Duration,
    pub preferred_lifetime: Duration,
    pub prefix: Ipv6Addr,
}

/// A more-specific route advertised by a router. See [RFC 4191 § 2.3].
///
/// [RFC 4191 § 2.3]: https://tools.ietf.org/html/rfc4191#section-2.3
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct RouteInfo {
    pub prefix_len: u8,
    pub preference: Preference,
    pub lifetime: Duration,
    pub prefix: Ipv6Addr,
}

impl RouteInfo {
    // Bytes of prefix carried on the wire for a given prefix length.
    const fn prefix_bytes(prefix_len: u8) -> usize {
        match prefix_len {
            0 => 0,
            1..=64 => 8,
            _ => 16,
        }
    }

    fn parse(data: &[u8]) -> Result<Self, DecodeErrorKind> {
        let opt = RawOpt(data);
        if !matches!(data.len(), 6 | 14 | 22) {
            return Err(DecodeErrorKind::MalformedOption);
        }
        let prefix_len = opt.route_prefix_len();
        if prefix_len > 128 {
            return Err(DecodeErrorKind::MalformedOption);
        }
        let carried = &data[field::ROUTE_PREFIX];
        if carried.len() < Self::prefix_bytes(prefix_len) {
            return Err(DecodeErrorKind::MalformedOption);
        }

        let mut octets = [0u8; 16];
        octets[..carried.len()].copy_from_slice(carried);
        Ok(RouteInfo {
            prefix_len,
            preference: opt.route_preference(),
            lifetime: opt.route_lifetime(),
            prefix: mask_prefix(Ipv6Addr::from(octets), prefix_len),
        })
    }

    fn buffer_len(&self) -> usize {
        8 + Self::prefix_bytes(self.prefix_len)
    }
}

/// A NAT64 prefix. See [RFC 8781].
///
/// [RFC 8781]: https://tools.ietf.org/html/rfc8781
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Pref64 {
    lifetime: Duration,
    prefix_len: u8,
    prefix: Ipv6Addr,
}

impl Pref64 {
    const MAX_SCALED_LIFETIME: u64 = (1 << 13) - 1;

    /// The lifetime is rounded up to a multiple of 8 seconds and capped at
    /// 65528 seconds. Returns `None` for a prefix length other than 32, 40,
    /// 48, 56, 64 or 96.
    pub fn new(lifetime: Duration, prefix: Ipv6Addr, prefix_len: u8) -> Option<Self> {
        Self::plc(prefix_len)?;
        let scaled = lifetime.as_secs().div_ceil(8).min(Self::MAX_SCALED_LIFETIME);
        Some(Pref64 {
            lifetime: Duration::from_secs(scaled * 8),
            prefix_len,
            prefix: mask_prefix(prefix, prefix_len),
        })
    }

    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub const fn prefix(&self) -> Ipv6Addr {
        self.prefix
    }

    const fn plc(prefix_len: u8) -> Option<u16> {
        Some(match prefix_len {
            96 => 0,
            64 => 1,
            56 => 2,
            48 => 3,
            40 => 4,
            32 => 5,
            _ => return None,
        })
    }

    const fn prefix_len_of(plc: u16) -> Option<u8> {
        Some(match plc {
            0 => 96,
            1 => 64,
            2 => 56,
            3 => 48,
            4 => 40,
            5 => 32,
            _ => return None,
        })
    }

    fn parse(data: &[u8]) -> Result<Self, DecodeErrorKind> {
        let opt = RawOpt(data);
        let word = opt.pref64_lt_plc();
        let prefix_len = Self::prefix_len_of(word & 0b111).ok_or(DecodeErrorKind::MalformedOption)?;

        let mut octets = [0u8; 16];
        octets[..12].copy_from_slice(&data[field::PREF64_PREFIX]);
        Ok(Pref64 {
            lifetime: Duration::from_secs(u64::from(word >> 3) * 8),
            prefix_len,
            prefix: mask_prefix(Ipv6Addr::from(octets), prefix_len),
        })
    }

    fn emit(&self, opt: &mut RawOpt<&mut [u8]>) {
        let scaled = (self.lifetime.as_secs() / 8).min(Self::MAX_SCALED_LIFETIME) as u16;
        let plc = Self::plc(self.prefix_len).unwrap_or(0);
        opt.set_pref64_lt_plc((scaled << 3) | plc);
        opt.0[field::PREF64_PREFIX].copy_from_slice(&self.prefix.octets()[..12]);
    }
}

#[derive(Debug, Clone, Copy)]
enum AddrList<'a> {
    Wire(&'a [u8]),
    Addrs(&'a [Ipv6Addr]),
}

/// Addresses carried by an RDNSS option.
#[derive(Debug, Clone, Copy)]
pub struct Servers<'a>(AddrList<'a>);

impl<'a> Servers<'a> {
    pub fn len(&self) -> usize {
        match self.0 {
            AddrList::Wire(data) => data.len() / 16,
            AddrList::Addrs(addrs) => addrs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> ServersIter<'a> {
        ServersIter { list: self.0, index: 0 }
    }
}

impl<'a> From<&'a [Ipv6Addr]> for Servers<'a> {
    fn from(addrs: &'a [Ipv6Addr]) -> Self {
        Servers(AddrList::Addrs(addrs))
    }
}

impl PartialEq for Servers<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Servers<'_> {}

impl<'a> IntoIterator for Servers<'a> {
    type Item = Ipv6Addr;
    type IntoIter = ServersIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct ServersIter<'a> {
    list: AddrList<'a>,
    index: usize,
}

impl Iterator for ServersIter<'_> {
    type Item = Ipv6Addr;

    fn next(&mut self) -> Option<Ipv6Addr> {
        let addr = match self.list {
            AddrList::Wire(data) => data
                .get(self.index * 16..(self.index + 1) * 16)
                .map(Ipv6Addr::from_bytes)?,
            AddrList::Addrs(addrs) => *addrs.get(self.index)?,
        };
        self.index += 1;
        Some(addr)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Rdnss<'a> {
    pub lifetime: Duration,
    pub servers: Servers<'a>,
}

#[derive(Debug, Clone, Copy)]
enum NameList<'a> {
    Wire(&'a [u8]),
    Names(&'a [&'a str]),
}

/// Domain names carried by a DNSSL option.
#[derive(Debug, Clone, Copy)]
pub struct Domains<'a>(NameList<'a>);

impl<'a> Domains<'a> {
    pub fn iter(&self) -> DomainsIter<'a> {
        DomainsIter(match self.0 {
            NameList::Wire(data) => NameIter::Wire(data),
            NameList::Names(names) => NameIter::Names(names.iter()),
        })
    }

    // Bytes taken by the names in DNS label format.
    fn wire_len(&self) -> usize {
        match self.0 {
            NameList::Wire(data) => data.len(),
            NameList::Names(names) => names
                .iter()
                .map(|name| trim_name(name).split('.').map(|l| l.len() + 1).sum::<usize>() + 1)
                .sum(),
        }
    }

    fn emit(&self, mut out: &mut [u8]) {
        match self.0 {
            NameList::Wire(data) => out[..data.len()].copy_from_slice(data),
            NameList::Names(names) => {
                for name in names {
                    for label in trim_name(name).split('.') {
                        out[0] = label.len() as u8;
                        out[1..=label.len()].copy_from_slice(label.as_bytes());
                        out = &mut core::mem::take(&mut out)[label.len() + 1..];
                    }
                    out[0] = 0;
                    out = &mut core::mem::take(&mut out)[1..];
                }
            }
        }
    }
}

impl PartialEq for Domains<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

impl Eq for Domains<'_> {}

fn trim_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

fn check_name(name: &str) -> bool {
    let name = trim_name(name);
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name
            .split('.')
            .all(|label| !label.is_empty() && label.len() <= MAX_LABEL_LEN)
}

// Decode one name in DNS label format, without compression.
fn parse_name(mut data: &[u8]) -> Result<(DomainName, &[u8]), DecodeErrorKind> {
    let mut name = DomainName::new();
    loop {
        let (&len, rest) = data.split_first().ok_or(DecodeErrorKind::MalformedOption)?;
        let len = usize::from(len);
        if len == 0 {
            if name.is_empty() {
                return Err(DecodeErrorKind::MalformedOption);
            }
            return Ok((name, rest));
        }
        if len > MAX_LABEL_LEN {
            return Err(DecodeErrorKind::MalformedOption);
        }

        let label = rest.get(..len).ok_or(DecodeErrorKind::MalformedOption)?;
        let label = str::from_utf8(label).map_err(|_| DecodeErrorKind::MalformedOption)?;
        if label.contains('.') {
            return Err(DecodeErrorKind::MalformedOption);
        }
        if !name.is_empty() {
            name.push('.').map_err(|_| DecodeErrorKind::MalformedOption)?;
        }
        name.push_str(label).map_err(|_| DecodeErrorKind::MalformedOption)?;
        data = &rest[len..];
    }
}

#[derive(Debug, Clone)]
enum NameIter<'a> {
    Wire(&'a [u8]),
    Names(slice::Iter<'a, &'a str>),
}

#[derive(Debug, Clone)]
pub struct DomainsIter<'a>(NameIter<'a>);

impl Iterator for DomainsIter<'_> {
    type Item = Result<DomainName, DecodeErrorKind>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.0 {
            NameIter::Wire(data) => {
                // Trailing zeros pad the option to a multiple of 8 bytes.
                if data.iter().all(|&b| b == 0) {
                    *data = &[];
                    return None;
                }
                match parse_name(*data) {
                    Ok((name, rest)) => {
                        *data = rest;
                        Some(Ok(name))
                    }
                    Err(err) => {
                        *data = &[];
                        Some(Err(err))
                    }
                }
            }
            NameIter::Names(names) => names.next().map(|name| {
                DomainName::try_from(trim_name(name)).map_err(|_| DecodeErrorKind::MalformedOption)
            }),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Dnssl<'a> {
    lifetime: Duration,
    domains: Domains<'a>,
}

impl<'a> Dnssl<'a> {
    /// Fails with `InvalidField` if a name has an empty label, a label longer
    /// than 63 bytes, or exceeds 253 bytes.
    pub fn new(lifetime: Duration, names: &'a [&'a str]) -> Result<Self, EncodeErrorKind> {
        if !names.iter().all(|name| check_name(name)) {
            return Err(EncodeErrorKind::InvalidField);
        }
        Ok(Dnssl {
            lifetime,
            domains: Domains(NameList::Names(names)),
        })
    }

    pub const fn lifetime(&self) -> Duration {
        self.lifetime
    }

    pub const fn domains(&self) -> Domains<'a> {
        self.domains
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NdOption<'a> {
    SrcLLAddr(RawHwAddr),
    DstLLAddr(RawHwAddr),
    PrefixInfo(PrefixInfo),
    /// The IP header and data of the redirected packet.
    RedirectedHeader(&'a [u8]),
    Mtu(u32),
    RouteInfo(RouteInfo),
    Rdnss(Rdnss<'a>),
    /// Bits 8 to 55 of the expanded RA flags, right-aligned.
    FlagsExt(u64),
    Dnssl(Dnssl<'a>),
    CaptivePortal(&'a str),
    Pref64(Pref64),
    Unknown { kind: u8, data: &'a [u8] },
}

impl<'a> NdOption<'a> {
    pub fn kind(&self) -> Type {
        match self {
            NdOption::SrcLLAddr(_) => Type::SrcLLAddr,
            NdOption::DstLLAddr(_) => Type::DstLLAddr,
            NdOption::PrefixInfo(_) => Type::PrefixInfo,
            NdOption::RedirectedHeader(_) => Type::RedirectedHeader,
            NdOption::Mtu(_) => Type::Mtu,
            NdOption::RouteInfo(_) => Type::RouteInfo,
            NdOption::Rdnss(_) => Type::Rdnss,
            NdOption::FlagsExt(_) => Type::FlagsExt,
            NdOption::Dnssl(_) => Type::Dnssl,
            NdOption::CaptivePortal(_) => Type::CaptivePortal,
            NdOption::Pref64(_) => Type::Pref64,
            &NdOption::Unknown { kind, .. } => Type::from(kind),
        }
    }

    /// Length on the wire, including the Type and Length fields.
    pub fn buffer_len(&self) -> usize {
        match self {
            NdOption::SrcLLAddr(addr) | NdOption::DstLLAddr(addr) => {
                let len = 2 + addr.len(); // Round up to next multiple of 8
                len.next_multiple_of(8)
            }
            NdOption::PrefixInfo(_) => 2 + field::PREFIX.end,
            NdOption::RedirectedHeader(data) => (2 + field::REDIRECTED_DATA.start + data.len())
                .next_multiple_of(8),
            NdOption::Mtu(_) => 2 + field::MTU.end,
            NdOption::RouteInfo(route) => route.buffer_len(),
            NdOption::Rdnss(rdnss) => 2 + field::DNS_DATA.start + 16 * rdnss.servers.len(),
            NdOption::FlagsExt(_) => 2 + field::EXT_FLAGS.end,
            NdOption::Dnssl(dnssl) => (2 + field::DNS_DATA.start + dnssl.domains.wire_len())
                .next_multiple_of(8),
            NdOption::CaptivePortal(uri) => (2 + uri.len()).next_multiple_of(8),
            NdOption::Pref64(_) => 2 + field::PREF64_PREFIX.end,
            NdOption::Unknown { data, .. } => 2 + data.len(),
        }
    }

    /// Interpret the data of an option of the given kind.
    pub fn parse(kind: Type, data: &'a [u8]) -> Result<Self, DecodeErrorKind> {
        let opt = RawOpt(data);
        let len = data.len();

        Ok(match kind {
            Type::SrcLLAddr if len > 0 => NdOption::SrcLLAddr(RawHwAddr::from_bytes(data)),
            Type::DstLLAddr if len > 0 => NdOption::DstLLAddr(RawHwAddr::from_bytes(data)),

            Type::PrefixInfo if len == field::PREFIX.end => {
                let prefix_len = opt.prefix_len();
                if prefix_len > 128 {
                    return Err(DecodeErrorKind::MalformedOption);
                }
                NdOption::PrefixInfo(PrefixInfo {
                    prefix_len,
                    flags: opt.prefix_flags(),
                    valid_lifetime: opt.valid_lifetime(),
                    preferred_lifetime: opt.preferred_lifetime(),
                    prefix: opt.prefix(),
                })
            }

            Type::RedirectedHeader if len >= field::REDIRECTED_DATA.start => {
                NdOption::RedirectedHeader(&data[field::REDIRECTED_DATA])
            }

            Type::Mtu if len == field::MTU.end => NdOption::Mtu(opt.mtu()),

            Type::RouteInfo => NdOption::RouteInfo(RouteInfo::parse(data)?),

            Type::Rdnss if len > field::DNS_DATA.start && (len - field::DNS_DATA.start) % 16 == 0 => {
                NdOption::Rdnss(Rdnss {
                    lifetime: opt.dns_lifetime(),
                    servers: Servers(AddrList::Wire(&data[field::DNS_DATA])),
                })
            }

            Type::FlagsExt if len == field::EXT_FLAGS.end => NdOption::FlagsExt(opt.ext_flags()),

            Type::Dnssl if len >= field::DNS_DATA.start + 8 => {
                let domains = Domains(NameList::Wire(&data[field::DNS_DATA]));
                if domains.iter().any(|name| name.is_err()) {
                    return Err(DecodeErrorKind::MalformedOption);
                }
                NdOption::Dnssl(Dnssl {
                    lifetime: opt.dns_lifetime(),
                    domains,
                })
            }

            Type::CaptivePortal => {
                let end = data.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
                let uri = str::from_utf8(&data[..end])
                    .map_err(|_| DecodeErrorKind::MalformedOption)?;
                NdOption::CaptivePortal(uri)
            }

            Type::Pref64 if len == field::PREF64_PREFIX.end => NdOption::Pref64(Pref64::parse(data)?),

            Type::Unknown(kind) => NdOption::Unknown { kind, data },

            _ => return Err(DecodeErrorKind::MalformedOption),
        })
    }

    /// Write the option data into `data`, which must be zeroed and exactly
    /// `buffer_len() - 2` bytes long.
    pub fn emit(&self, data: &mut [u8]) {
        let mut opt = RawOpt(data);
        match *self {
            NdOption::SrcLLAddr(addr) | NdOption::DstLLAddr(addr) => {
                opt.0[..addr.len()].copy_from_slice(addr.as_bytes());
            }
            NdOption::PrefixInfo(PrefixInfo {
                prefix_len,
                flags,
                valid_lifetime,
                preferred_lifetime,
                prefix,
            }) => {
                opt.set_prefix_len(prefix_len);
                opt.set_prefix_flags(flags);
                opt.set_valid_lifetime(valid_lifetime);
                opt.set_preferred_lifetime(preferred_lifetime);
                opt.set_prefix(prefix);
            }
            NdOption::RedirectedHeader(header) => {
                let start = field::REDIRECTED_DATA.start;
                opt.0[start..start + header.len()].copy_from_slice(header);
            }
            NdOption::Mtu(mtu) => opt.set_mtu(mtu),
            NdOption::RouteInfo(route) => {
                opt.set_route_prefix_len(route.prefix_len);
                opt.set_route_preference(route.preference);
                opt.set_route_lifetime(route.lifetime);
                let prefix = mask_prefix(route.prefix, route.prefix_len).octets();
                let carried = &mut opt.0[field::ROUTE_PREFIX];
                let n = carried.len().min(16);
                carried[..n].copy_from_slice(&prefix[..n]);
            }
            NdOption::Rdnss(Rdnss { lifetime, servers }) => {
                opt.set_dns_lifetime(lifetime);
                for (chunk, addr) in opt.0[field::DNS_DATA].chunks_exact_mut(16).zip(servers) {
                    chunk.copy_from_slice(&addr.octets());
                }
            }
            NdOption::FlagsExt(flags) => opt.set_ext_flags(flags),
            NdOption::Dnssl(dnssl) => {
                opt.set_dns_lifetime(dnssl.lifetime);
                dnssl.domains.emit(&mut opt.0[field::DNS_DATA]);
            }
            NdOption::CaptivePortal(uri) => opt.0[..uri.len()].copy_from_slice(uri.as_bytes()),
            NdOption::Pref64(pref64) => pref64.emit(&mut opt),
            NdOption::Unknown { data, .. } => opt.0.copy_from_slice(data),
        }
    }
}
