//! MAC addresses.

use super::GeneratorSlot;
use crate::error::{DecodeError, InsufficientSizeError, TransformError};
use crate::generator::Generator;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Bit 0 of the first octet.
const GROUP_BIT: u8 = 0b01;
/// Bit 1 of the first octet.
const LOCAL_BIT: u8 = 0b10;

/// Unicast (individual) or multicast (group) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastType {
    Individual,
    Group,
    #[default]
    Any,
}

/// Globally unique (universal) or locally administered address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManagementType {
    Universal,
    Local,
    #[default]
    Any,
}

impl FromStr for CastType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "individual" | "unicast" => Ok(CastType::Individual),
            "group" | "multicast" => Ok(CastType::Group),
            "any" => Ok(CastType::Any),
            _ => Err(format!(
                "Unknown cast type: {}. Valid options: individual, group, any",
                s
            )),
        }
    }
}

impl FromStr for ManagementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "universal" | "global" => Ok(ManagementType::Universal),
            "local" => Ok(ManagementType::Local),
            "any" => Ok(ManagementType::Any),
            _ => Err(format!(
                "Unknown management type: {}. Valid options: universal, local, any",
                s
            )),
        }
    }
}

impl fmt::Display for CastType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CastType::Individual => write!(f, "individual"),
            CastType::Group => write!(f, "group"),
            CastType::Any => write!(f, "any"),
        }
    }
}

impl fmt::Display for ManagementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagementType::Universal => write!(f, "universal"),
            ManagementType::Local => write!(f, "local"),
            ManagementType::Any => write!(f, "any"),
        }
    }
}

/// A 48-bit MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

/// What the first octet of an address says about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MacInfo {
    pub vendor: [u8; 3],
    pub cast_type: CastType,
    pub management_type: ManagementType,
}

impl MacAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn cast_type(&self) -> CastType {
        if self.0[0] & GROUP_BIT == 0 {
            CastType::Individual
        } else {
            CastType::Group
        }
    }

    pub fn management_type(&self) -> ManagementType {
        if self.0[0] & LOCAL_BIT == 0 {
            ManagementType::Universal
        } else {
            ManagementType::Local
        }
    }

    pub fn explore(&self) -> MacInfo {
        MacInfo {
            vendor: [self.0[0], self.0[1], self.0[2]],
            cast_type: self.cast_type(),
            management_type: self.management_type(),
        }
    }
}

impl FromStr for MacAddress {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidMac(s.to_string());
        let sep = if s.contains('-') { '-' } else { ':' };
        let mut octets = [0u8; 6];
        let mut parts = s.split(sep);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}", a, b, c, d, e, g)
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Random MAC addresses with cast and management bits set by policy.
#[derive(Debug)]
pub struct RandomMacTransformer {
    slot: GeneratorSlot,
    cast_type: CastType,
    management_type: ManagementType,
    keep_original_vendor: bool,
}

impl RandomMacTransformer {
    pub fn new(
        cast_type: CastType,
        management_type: ManagementType,
        keep_original_vendor: bool,
    ) -> Self {
        Self {
            slot: GeneratorSlot::new(6),
            cast_type,
            management_type,
            keep_original_vendor,
        }
    }

    pub fn keeps_original_vendor(&self) -> bool {
        self.keep_original_vendor
    }

    pub fn required_byte_length(&self) -> usize {
        self.slot.required()
    }

    pub fn set_generator(&mut self, generator: Box<dyn Generator>) -> Result<(), InsufficientSizeError> {
        self.slot.attach(generator)
    }

    /// Replace `original`, copying its vendor prefix when configured to.
    pub fn transform(&mut self, original: &MacAddress) -> Result<MacAddress, TransformError> {
        let vendor = self.keep_original_vendor.then(|| original.explore().vendor);
        self.generate(original.to_string().as_bytes(), vendor)
    }

    /// Generate from raw input when no original address is available.
    pub fn transform_bytes(&mut self, original: &[u8]) -> Result<MacAddress, TransformError> {
        self.generate(original, None)
    }

    fn generate(
        &mut self,
        input: &[u8],
        vendor: Option<[u8; 3]>,
    ) -> Result<MacAddress, TransformError> {
        let bytes = self.slot.generate(input)?;
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&bytes[..6]);

        if let Some(vendor) = vendor {
            octets[..3].copy_from_slice(&vendor);
            return Ok(MacAddress(octets));
        }

        match self.management_type {
            ManagementType::Universal => octets[0] &= !LOCAL_BIT,
            ManagementType::Local => octets[0] |= LOCAL_BIT,
            ManagementType::Any => {}
        }
        match self.cast_type {
            CastType::Individual => octets[0] &= !GROUP_BIT,
            CastType::Group => octets[0] |= GROUP_BIT,
            CastType::Any => {}
        }
        Ok(MacAddress(octets))
    }
}
