use core::net::Ipv6Addr;

pub trait Ipv6AddrExt {
    const LINK_LOCAL_ALL_NODES: Ipv6Addr;
    const LINK_LOCAL_ALL_ROUTERS: Ipv6Addr;

    fn from_bytes(bytes: &[u8]) -> Self;

    fn is_link_local(&self) -> bool;

    /// Whether this is a solicited-node multicast address (`ff02::1:ffXX:XXXX`).
    fn is_solicited_node(&self) -> bool;

    fn solicited_node(&self) -> Self;
}

const SOLICITED_NODE_PREFIX: [u8; 13] = [
    0xff, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff,
];

impl Ipv6AddrExt for Ipv6Addr {
    const LINK_LOCAL_ALL_NODES: Ipv6Addr = Ipv6Addr::new(
        0xff02, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0001,
    );

    const LINK_LOCAL_ALL_ROUTERS: Ipv6Addr = Ipv6Addr::new(
        0xff02, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0000, 0x0002,
    );

    /// # Panics
    ///
    /// Panics if `bytes` is not exactly 16 bytes long.
    fn from_bytes(bytes: &[u8]) -> Self {
        let mut octets = [0u8; 16];
        octets.copy_from_slice(bytes);
        Ipv6Addr::from(octets)
    }

    fn is_link_local(&self) -> bool {
        self.octets()[0..8] == [0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
    }

    fn is_solicited_node(&self) -> bool {
        self.octets()[..13] == SOLICITED_NODE_PREFIX
    }

    fn solicited_node(&self) -> Self {
        let [.., b13, b14, b15] = self.octets();
        Ipv6Addr::from([
            0xff, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xff, b13, b14,
            b15,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_local() {
        assert!(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1).is_link_local());
        assert!(!Ipv6Addr::new(0xfe81, 0, 0, 0, 0, 0, 0, 1).is_link_local());
        assert!(!Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1).is_link_local());
    }

    #[test]
    fn test_solicited_node() {
        let addr = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x1234, 0x5678);
        let sn = addr.solicited_node();
        assert_eq!(sn, Ipv6Addr::new(0xff02, 0, 0, 0, 0, 1, 0xff34, 0x5678));
        assert!(sn.is_solicited_node());
        assert!(sn.is_multicast());
        assert!(!Ipv6Addr::LINK_LOCAL_ALL_NODES.is_solicited_node());
    }
}
