//! Random host addresses inside a subnet.

use super::GeneratorSlot;
use crate::error::{ConfigError, DecodeError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// An IPv4 or IPv6 network in `addr/prefix` form, stored with host bits cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    network: IpAddr,
    prefix: u8,
}

impl Subnet {
    pub fn new(addr: IpAddr, prefix: u8) -> Result<Self, ConfigError> {
        let bits = address_bits(&addr);
        if prefix > bits {
            return Err(ConfigError::InvalidSubnet(format!("{}/{}", addr, prefix)));
        }
        let host_bits = (bits - prefix) as u32;
        let network = match addr {
            IpAddr::V4(a) => {
                let mask = u32::MAX.checked_shl(host_bits).unwrap_or(0);
                IpAddr::V4(Ipv4Addr::from(u32::from(a) & mask))
            }
            IpAddr::V6(a) => {
                let mask = u128::MAX.checked_shl(host_bits).unwrap_or(0);
                IpAddr::V6(Ipv6Addr::from(u128::from(a) & mask))
            }
        };
        Ok(Self { network, prefix })
    }

    pub fn network(&self) -> IpAddr {
        self.network
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    pub fn host_bits(&self) -> u32 {
        (address_bits(&self.network) - self.prefix) as u32
    }

    /// Number of assignable hosts, excluding the network and broadcast addresses.
    pub fn usable_hosts(&self) -> Result<u128, ConfigError> {
        let h = self.host_bits();
        if h <= 1 {
            return Err(ConfigError::SubnetTooSmall(self.to_string()));
        }
        if h == 128 {
            return Ok(u128::MAX - 1);
        }
        Ok((1u128 << h) - 2)
    }

    pub fn contains(&self, addr: &IpAddr) -> bool {
        Subnet::new(*addr, self.prefix).is_ok_and(|s| s.network == self.network)
    }

    /// Host number `host` counted from the network address.
    fn host(&self, host: u128) -> IpAddr {
        match self.network {
            IpAddr::V4(n) => IpAddr::V4(Ipv4Addr::from(u32::from(n).wrapping_add(host as u32))),
            IpAddr::V6(n) => IpAddr::V6(Ipv6Addr::from(u128::from(n).wrapping_add(host))),
        }
    }
}

fn address_bits(addr: &IpAddr) -> u8 {
    match addr {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    }
}

impl FromStr for Subnet {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidSubnet(s.to_string());
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(invalid)?;
        let addr: IpAddr = addr.parse().map_err(|_| invalid())?;
        let prefix: u8 = prefix.parse().map_err(|_| invalid())?;
        Subnet::new(addr, prefix)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// Random host addresses, never the network or broadcast address.
#[derive(Debug)]
pub struct RandomIpTransformer {
    slot: GeneratorSlot,
    subnet: Subnet,
    usable: u128,
}

impl RandomIpTransformer {
    pub fn new(subnet: Subnet) -> Result<Self, ConfigError> {
        let usable = subnet.usable_hosts()?;
        Ok(Self {
            // IPv4 only reads the first 4 bytes; the size is shared so one
            // generator serves either family
            slot: GeneratorSlot::new(16),
            subnet,
            usable,
        })
    }

    pub fn subnet(&self) -> &Subnet {
        &self.subnet
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    pub fn transform(
        &mut self,
        subnet: Option<&Subnet>,
        original: &[u8],
    ) -> Result<IpAddr, TransformError> {
        let (subnet, usable) = match subnet {
            Some(s) => (*s, s.usable_hosts().map_err(DecodeError::RuntimeSubnet)?),
            None => (self.subnet, self.usable),
        };
        let bytes = self.slot.generate(original)?;
        let n = match subnet.network {
            IpAddr::V4(_) => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&bytes[..4]);
                u32::from_be_bytes(raw) as u128
            }
            IpAddr::V6(_) => {
                let mut raw = [0u8; 16];
                raw.copy_from_slice(&bytes[..16]);
                u128::from_be_bytes(raw)
            }
        };
        Ok(subnet.host(n % usable + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{Engine, RandomBytes};

    #[test]
    fn test_subnet_parse_masks_host_bits() {
        let s: Subnet = "192.168.1.77/24".parse().unwrap();
        assert_eq!(s.network(), "192.168.1.0".parse::<IpAddr>().unwrap());
        assert_eq!(s.to_string(), "192.168.1.0/24");
        assert_eq!(s.usable_hosts().unwrap(), 254);
        assert!("10.0.0.0/33".parse::<Subnet>().is_err());
        assert!("nonsense".parse::<Subnet>().is_err());
    }

    #[test]
    fn test_subnet_too_small() {
        for text in ["10.0.0.1/32", "10.0.0.0/31", "::1/128", "fe80::/127"] {
            let s: Subnet = text.parse().unwrap();
            assert!(matches!(
                RandomIpTransformer::new(s),
                Err(ConfigError::SubnetTooSmall(_))
            ));
        }
    }

    #[test]
    fn test_ip_excludes_network_and_broadcast() {
        let subnet: Subnet = "192.168.1.0/30".parse().unwrap();
        let mut t = RandomIpTransformer::new(subnet).unwrap();
        t.set_generator(Box::new(RandomBytes::new(16))).unwrap();
        let network: IpAddr = "192.168.1.0".parse().unwrap();
        let broadcast: IpAddr = "192.168.1.3".parse().unwrap();
        for _ in 0..100_000 {
            let ip = t.transform(None, b"x").unwrap();
            assert_ne!(ip, network);
            assert_ne!(ip, broadcast);
            assert!(subnet.contains(&ip));
        }
    }

    #[test]
    fn test_ipv6_in_subnet() {
        let subnet: Subnet = "2001:db8::/64".parse().unwrap();
        let mut t = RandomIpTransformer::new(subnet).unwrap();
        t.set_generator(Box::new(RandomBytes::new(16))).unwrap();
        for _ in 0..1000 {
            let ip = t.transform(None, b"x").unwrap();
            assert!(ip.is_ipv6());
            assert!(subnet.contains(&ip));
        }
    }

    #[test]
    fn test_full_ipv6_range() {
        let subnet: Subnet = "::/0".parse().unwrap();
        assert_eq!(subnet.usable_hosts().unwrap(), u128::MAX - 1);
        assert!(RandomIpTransformer::new(subnet).is_ok());
    }

    #[test]
    fn test_runtime_subnet_override() {
        let mut t = RandomIpTransformer::new("10.0.0.0/8".parse().unwrap()).unwrap();
        t.set_generator(Engine::Deterministic.generator(b"salt", 16).unwrap())
            .unwrap();
        let other: Subnet = "172.16.5.0/29".parse().unwrap();
        let ip = t.transform(Some(&other), b"host-1").unwrap();
        assert!(other.contains(&ip));

        let tiny: Subnet = "172.16.5.0/31".parse().unwrap();
        assert!(matches!(
            t.transform(Some(&tiny), b"host-1"),
            Err(TransformError::Decode(DecodeError::RuntimeSubnet(
                ConfigError::SubnetTooSmall(_)
            )))
        ));
    }
}
