use core::net::Ipv6Addr;

use byteorder::{ByteOrder, NetworkEndian};

use super::Protocol;

const fn propagate_carries(word: u32) -> u16 {
    let sum = (word >> 16) + (word & 0xffff);
    ((sum >> 16) as u16) + (sum as u16)
}

/// Compute an RFC 1071 compliant checksum (without the final complement).
pub fn data(mut data: &[u8]) -> u16 {
    let mut accum = 0;

    // For each 32-byte chunk...
    const CHUNK_SIZE: usize = 32;
    while data.len() >= CHUNK_SIZE {
        let mut d = &data[..CHUNK_SIZE];
        // ... take by 2 bytes and sum them.
        while d.len() >= 2 {
            accum += u32::from(NetworkEndian::read_u16(d));
            d = &d[2..];
        }
        accum = u32::from(propagate_carries(accum));

        data = &data[CHUNK_SIZE..];
    }

    // Sum the rest that does not fit the last 32-byte chunk,
    // taking by 2 bytes.
    while data.len() >= 2 {
        accum += u32::from(NetworkEndian::read_u16(data));
        data = &data[2..];
    }

    // Add the last remaining odd byte, if any.
    if let Some(&value) = data.first() {
        accum += u32::from(value) << 8;
    }

    propagate_carries(accum)
}

/// Combine several RFC 1071 compliant checksums.
pub fn combine(checksums: &[u16]) -> u16 {
    let accum = checksums.iter().copied().map(u32::from).sum();
    propagate_carries(accum)
}

/// Checksum of the IPv6 pseudo-header (RFC 8200 § 8.1).
pub fn pseudo_header_v6(
    src_addr: &Ipv6Addr,
    dst_addr: &Ipv6Addr,
    next_header: Protocol,
    length: u32,
) -> u16 {
    let mut len_nxt = [0u8; 8];
    NetworkEndian::write_u32(&mut len_nxt[0..4], length);
    len_nxt[7] = next_header.into();

    combine(&[
        data(&src_addr.octets()),
        data(&dst_addr.octets()),
        data(&len_nxt[..]),
    ])
}
