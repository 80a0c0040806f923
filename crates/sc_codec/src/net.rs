//! Built-in adapters for network types.
//!
//! [`Codec::new`](crate::Codec::new) registers both through
//! [`register_net_adapters`]:
//!
//! - [`MacAddr`]: `02:42:ac:11:00:02`, also read as `02-42-AC-11-00-02`.
//! - [`IpNet`]: `192.168.1.0/24` or `2001:db8::/32`.

use alloc::string::{String, ToString};
use core::convert::Infallible;
use core::fmt;
use core::net::{AddrParseError, IpAddr, Ipv4Addr, Ipv6Addr};
use core::str::FromStr;

use sc_reflect::derive::Reflect;
use sc_reflect::registry::TypeRegistry;

use crate::adapter::register_adapter;

/// Registers the [`MacAddr`] and [`IpNet`] adapters.
pub fn register_net_adapters(registry: &mut TypeRegistry) {
    register_adapter::<MacAddr, _, _, _, _>(
        registry,
        |mac| Ok::<_, Infallible>(mac.to_string()),
        |text| text.parse::<MacAddr>(),
    );
    register_adapter::<IpNet, _, _, _, _>(
        registry,
        |net| Ok::<_, Infallible>(net.to_string()),
        |text| text.parse::<IpNet>(),
    );
}

// -----------------------------------------------------------------------------
// MacAddr

/// A 48-bit hardware address.
///
/// ```
/// use sc_codec::net::MacAddr;
///
/// let mac: MacAddr = "02-42-AC-11-00-02".parse().unwrap();
/// assert_eq!(mac.octets(), [0x02, 0x42, 0xac, 0x11, 0x00, 0x02]);
/// assert_eq!(mac.to_string(), "02:42:ac:11:00:02");
///
/// assert_eq!("".parse::<MacAddr>().unwrap(), MacAddr::default());
/// ```
#[derive(Reflect, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[reflect(opaque, clone, partial_eq, debug, default)]
pub struct MacAddr([u8; 6]);

impl MacAddr {
    #[inline]
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    #[inline]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == [0; 6]
    }
}

impl From<[u8; 6]> for MacAddr {
    #[inline]
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl fmt::Debug for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MacAddr({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MacAddrParseError {
    #[error("expected `:` or `-` separated octets")]
    NoSeparator,
    #[error("expected 6 octets, found {0}")]
    OctetCount(usize),
    #[error("`{0}` is not a hex octet")]
    InvalidOctet(String),
}

impl FromStr for MacAddr {
    type Err = MacAddrParseError;

    /// Empty text is the zero address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        let separator = if s.contains('-') {
            '-'
        } else if s.contains(':') {
            ':'
        } else {
            return Err(MacAddrParseError::NoSeparator);
        };

        let count = s.split(separator).count();
        if count != 6 {
            return Err(MacAddrParseError::OctetCount(count));
        }

        let mut octets = [0_u8; 6];
        for (octet, group) in octets.iter_mut().zip(s.split(separator)) {
            let group = group.trim();
            *octet = match u8::from_str_radix(group, 16) {
                Ok(value) if !group.starts_with('+') => value,
                _ => return Err(MacAddrParseError::InvalidOctet(group.to_string())),
            };
        }
        Ok(Self(octets))
    }
}

// -----------------------------------------------------------------------------
// IpNet

/// An IP network: an address masked to its prefix.
///
/// ```
/// use sc_codec::net::IpNet;
///
/// let net: IpNet = "192.168.1.7/24".parse().unwrap();
/// assert_eq!(net.to_string(), "192.168.1.0/24");
/// assert_eq!(net.prefix_len(), 24);
///
/// let v6: IpNet = "2001:dead::beef/96".parse().unwrap();
/// assert_eq!(v6.to_string(), "2001:dead::/96");
///
/// assert!("10.0.0.0/33".parse::<IpNet>().is_err());
/// ```
#[derive(Reflect, Clone, Copy, PartialEq, Eq, Hash)]
#[reflect(opaque, clone, partial_eq, debug, default)]
pub struct IpNet {
    addr: IpAddr,
    prefix_len: u8,
}

impl IpNet {
    /// The network of `addr` with `prefix_len` leading bits.
    pub fn new(addr: IpAddr, prefix_len: u8) -> Result<Self, IpNetParseError> {
        let max = max_prefix_len(&addr);
        if prefix_len > max {
            return Err(IpNetParseError::PrefixTooLong {
                prefix: prefix_len,
                max,
            });
        }
        let addr = match addr {
            IpAddr::V4(v4) => {
                let mask = u32::MAX.checked_shl(u32::from(32 - prefix_len)).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(v4) & mask))
            }
            IpAddr::V6(v6) => {
                let mask = u128::MAX.checked_shl(u32::from(128 - prefix_len)).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(v6) & mask))
            }
        };
        Ok(Self { addr, prefix_len })
    }

    /// The network address, host bits are zero.
    #[inline]
    pub const fn addr(&self) -> IpAddr {
        self.addr
    }

    #[inline]
    pub const fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        match Self::new(*addr, self.prefix_len) {
            Ok(other) => other.addr == self.addr,
            Err(_) => false,
        }
    }
}

fn max_prefix_len(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl Default for IpNet {
    /// `0.0.0.0/0`.
    fn default() -> Self {
        Self {
            addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            prefix_len: 0,
        }
    }
}

impl fmt::Display for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}

impl fmt::Debug for IpNet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IpNet({self})")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IpNetParseError {
    #[error("missing `/prefix` in `{0}`")]
    MissingPrefix(String),
    #[error(transparent)]
    Addr(#[from] AddrParseError),
    #[error("`{0}` is not a prefix length")]
    InvalidPrefix(String),
    #[error("prefix length {prefix} exceeds {max}")]
    PrefixTooLong { prefix: u8, max: u8 },
}

impl FromStr for IpNet {
    type Err = IpNetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((addr, prefix)) = s.trim().split_once('/') else {
            return Err(IpNetParseError::MissingPrefix(s.to_string()));
        };
        let addr: IpAddr = addr.parse()?;
        let digits = !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit());
        let prefix: u8 = match prefix.parse() {
            Ok(prefix) if digits => prefix,
            _ => return Err(IpNetParseError::InvalidPrefix(prefix.to_string())),
        };
        Self::new(addr, prefix)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use core::net::{IpAddr, Ipv4Addr};

    use super::{IpNet, IpNetParseError, MacAddr, MacAddrParseError};

    #[test]
    fn mac_parse_forms() {
        let expected = MacAddr::new([0x00, 0x1b, 0x21, 0x3a, 0xff, 0x0c]);
        assert_eq!("00:1b:21:3a:ff:0c".parse::<MacAddr>().unwrap(), expected);
        assert_eq!("00-1B-21-3A-FF-0C".parse::<MacAddr>().unwrap(), expected);
        assert_eq!(" 0:1b:21:3a:ff:c ".parse::<MacAddr>().unwrap(), expected);
        assert_eq!(expected.to_string(), "00:1b:21:3a:ff:0c");
    }

    #[test]
    fn mac_parse_errors() {
        assert_eq!(
            "001b213aff0c".parse::<MacAddr>(),
            Err(MacAddrParseError::NoSeparator)
        );
        assert_eq!(
            "00:1b:21:3a:ff".parse::<MacAddr>(),
            Err(MacAddrParseError::OctetCount(5))
        );
        assert_eq!(
            "00:1b:21:3a:ff:100".parse::<MacAddr>(),
            Err(MacAddrParseError::InvalidOctet("100".into()))
        );
        assert_eq!(
            "00:1b:21:3a:ff:".parse::<MacAddr>(),
            Err(MacAddrParseError::InvalidOctet("".into()))
        );
        assert!("00:1b:21:3a:ff:+1".parse::<MacAddr>().is_err());
    }

    #[test]
    fn ipnet_masks_host_bits() {
        let net: IpNet = "10.1.2.3/8".parse().unwrap();
        assert_eq!(net.addr(), IpAddr::V4(Ipv4Addr::new(10, 0, 0, 0)));
        assert!(net.contains(&IpAddr::V4(Ipv4Addr::new(10, 200, 0, 1))));
        assert!(!net.contains(&IpAddr::V4(Ipv4Addr::new(11, 0, 0, 1))));

        let all: IpNet = "1.2.3.4/0".parse().unwrap();
        assert_eq!(all, IpNet::default());
        assert_eq!(IpNet::default().to_string(), "0.0.0.0/0");

        let host: IpNet = "::1/128".parse().unwrap();
        assert_eq!(host.to_string(), "::1/128");
    }

    #[test]
    fn ipnet_parse_errors() {
        assert!(matches!(
            "10.0.0.1".parse::<IpNet>(),
            Err(IpNetParseError::MissingPrefix(_))
        ));
        assert!(matches!("10.0.0/8".parse::<IpNet>(), Err(IpNetParseError::Addr(_))));
        assert_eq!(
            "10.0.0.0/x".parse::<IpNet>(),
            Err(IpNetParseError::InvalidPrefix("x".into()))
        );
        assert_eq!(
            "::/129".parse::<IpNet>(),
            Err(IpNetParseError::PrefixTooLong { prefix: 129, max: 128 })
        );
    }
}
