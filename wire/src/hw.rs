use core::fmt;

pub const HWADDR_MAX_LEN: usize = 8;

pub const ETHERNET_ADDR_LEN: usize = 6;

/// Unparsed hardware address.
///
/// Used to make NDISC parsing agnostic of the hardware medium in use.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct RawHwAddr {
    len: u8,
    data: [u8; HWADDR_MAX_LEN],
}

impl RawHwAddr {
    /// Bytes beyond [`HWADDR_MAX_LEN`] are dropped.
    pub fn from_bytes(addr: &[u8]) -> Self {
        let len = addr.len().min(HWADDR_MAX_LEN);
        let mut data = [0u8; HWADDR_MAX_LEN];
        data[..len].copy_from_slice(&addr[..len]);

        Self { len: len as u8, data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn to_ethernet(self) -> Option<[u8; ETHERNET_ADDR_LEN]> {
        self.as_bytes()
            .get(..ETHERNET_ADDR_LEN)
            .and_then(|b| b.try_into().ok())
    }
}

impl From<[u8; ETHERNET_ADDR_LEN]> for RawHwAddr {
    fn from(addr: [u8; ETHERNET_ADDR_LEN]) -> Self {
        Self::from_bytes(&addr)
    }
}

impl fmt::Display for RawHwAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &b) in self.as_bytes().iter().enumerate() {
            if i != 0 {
                write!(f, ":")?;
            }
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}
