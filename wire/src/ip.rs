pub mod checksum;
pub mod v6;

enum_with_unknown! {
    /// IP datagram encapsulated protocol.
    pub enum Protocol(u8) {
        Icmpv6 = 0x3a,
    }
}
