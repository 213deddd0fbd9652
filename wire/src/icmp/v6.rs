use core::{fmt, net::Ipv6Addr};

use byteorder::{ByteOrder, NetworkEndian};
use ndisc_storage::Ends;

use crate::ip::{checksum, Protocol};

#[path = "v6_nd.rs"]
pub mod nd;

#[path = "v6_ndopt.rs"]
pub mod option;

#[path = "v6_ndopt_set.rs"]
pub mod option_set;

enum_with_unknown! {
    /// Internet protocol control message type.
    pub enum Message(u8) {
        /// Router Solicitation
        RouterSolicit   = 0x85,
        /// Router Advertisement
        RouterAdvert    = 0x86,
        /// Neighbor Solicitation
        NeighborSolicit = 0x87,
        /// Neighbor Advertisement
        NeighborAdvert  = 0x88,
        /// Redirect
        Redirect        = 0x89,
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Message::RouterSolicit => write!(f, "router solicitation"),
            Message::RouterAdvert => write!(f, "router advertisement"),
            Message::NeighborSolicit => write!(f, "neighbor solicitation"),
            Message::NeighborAdvert => write!(f, "neighbor advertisement"),
            Message::Redirect => write!(f, "redirect"),
            Message::Unknown(id) => write!(f, "{id}"),
        }
    }
}

struct Header<T: ?Sized>(T);

// Ranges and constants describing key boundaries in the ICMPv6 header.
#[allow(unused)]
pub(super) mod field {
    use crate::field::*;

    // ICMPv6: See https://tools.ietf.org/html/rfc4443
    pub const TYPE: usize = 0;
    pub const CODE: usize = 1;
    pub const CHECKSUM: Field = 2..4;

    pub const UNUSED: Field = 4..8;

    pub const HEADER_END: usize = 4;

    // NDISC: See https://tools.ietf.org/html/rfc4861
    // Router Advertisement message offsets
    pub const CUR_HOP_LIMIT: usize = 4;
    pub const ROUTER_FLAGS: usize = 5;
    pub const ROUTER_LT: Field = 6..8;
    pub const REACHABLE_TM: Field = 8..12;
    pub const RETRANS_TM: Field = 12..16;

    // Neighbor Solicitation message offsets
    pub const TARGET_ADDR: Field = 8..24;

    // Neighbor Advertisement message offsets
    pub const NEIGH_FLAGS: usize = 4;

    // Redirected Header message offsets
    pub const DEST_ADDR: Field = 24..40;
}

/// Length of the type, code and checksum fields shared by every ICMPv6 message.
pub const HEADER_LEN: usize = field::HEADER_END;

wire!(impl Header {
    msg_type/set_msg_type: Message =>
        |data| Message::from(data[field::TYPE]);
        |data, value| data[field::TYPE] = value.into();

    msg_code/set_msg_code: u8 =>
        |data| data[field::CODE];
        |data, value| data[field::CODE] = value;

    checksum/set_checksum: u16 =>
        |data| NetworkEndian::read_u16(&data[field::CHECKSUM]);
        |data, value| NetworkEndian::write_u16(&mut data[field::CHECKSUM], value);
});

fn checksum_of(data: &[u8], addr: Ends<Ipv6Addr>) -> u16 {
    checksum::combine(&[
        checksum::pseudo_header_v6(&addr.src, &addr.dst, Protocol::Icmpv6, data.len() as u32),
        checksum::data(data),
    ])
}

/// Validate the checksum of a complete ICMPv6 message.
pub fn verify_checksum(data: &[u8], addr: Ends<Ipv6Addr>) -> bool {
    data.len() >= HEADER_LEN && checksum_of(data, addr) == !0
}

/// Compute and store the checksum of a complete ICMPv6 message.
///
/// # Panics
///
/// Panics if `data` is shorter than the ICMPv6 header.
pub fn fill_checksum(data: &mut [u8], addr: Ends<Ipv6Addr>) {
    let mut packet = Header(data);
    packet.set_checksum(0);
    let checksum = !checksum_of(&packet.0[..], addr);
    packet.set_checksum(checksum);
}

/// Read the message type of an ICMPv6 message.
pub fn message_type(data: &[u8]) -> Option<Message> {
    (data.len() >= HEADER_LEN).then(|| Header(data).msg_type())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_IP_ADDRS: Ends<Ipv6Addr> = Ends {
        src: Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1),
        dst: Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 1),
    };

    #[test]
    fn test_message_type() {
        assert_eq!(message_type(&[0x88, 0, 0, 0]), Some(Message::NeighborAdvert));
        assert_eq!(message_type(&[0x80, 0, 0, 0]), Some(Message::Unknown(0x80)));
        assert_eq!(message_type(&[0x88, 0, 0]), None);
    }

    #[test]
    fn test_checksum_round_trip() {
        let mut bytes = [0x85, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(!verify_checksum(&bytes, MOCK_IP_ADDRS));
        fill_checksum(&mut bytes, MOCK_IP_ADDRS);
        assert!(verify_checksum(&bytes, MOCK_IP_ADDRS));

        bytes[7] = 1;
        assert!(!verify_checksum(&bytes, MOCK_IP_ADDRS));
    }
}
