bitflags::bitflags! {
    /// Checks on the packet metadata and checksum, performed before a
    /// message is accepted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Checks: u8 {
        /// The hop limit must be 255, proving the sender is on-link.
        const HOP_LIMIT = 1 << 0;
        /// The ICMPv6 checksum must verify over the IPv6 pseudo-header.
        const CHECKSUM = 1 << 1;
        /// Router Advertisements and Redirects must come from a link-local
        /// address.
        const ROUTER_SOURCE = 1 << 2;
    }
}

impl Checks {
    pub const IGNORE: Self = Checks::empty();

    pub const fn hop_limit(&self) -> bool {
        self.contains(Checks::HOP_LIMIT)
    }

    pub const fn checksum(&self) -> bool {
        self.contains(Checks::CHECKSUM)
    }

    pub const fn router_source(&self) -> bool {
        self.contains(Checks::ROUTER_SOURCE)
    }
}

/// Decoding options.
///
/// The default assumes the socket layer already dropped packets with a bad
/// checksum or hop limit, and performs no metadata checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Config {
    pub checks: Checks,
}

impl Config {
    pub const fn new() -> Self {
        Config {
            checks: Checks::IGNORE,
        }
    }

    /// Every check enabled, for packets straight off a raw socket.
    pub const fn strict() -> Self {
        Config {
            checks: Checks::all(),
        }
    }

    pub const fn with_checks(mut self, checks: Checks) -> Self {
        self.checks = checks;
        self
    }
}
