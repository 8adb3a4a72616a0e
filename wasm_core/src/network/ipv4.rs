//! IPv4 address representations and subnet arithmetic.
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::error::{Result, ToolError};

/// Prefix used for IPv4-mapped IPv6 addresses in full (uncompressed) notation.
pub const IPV4_MAPPED_PREFIX: &str = "0000:0000:0000:0000:0000:ffff:";

/// Four dot-separated decimal octets in `0..=255`, no leading `+` or sign.
pub fn parse_ipv4(input: &str) -> Result<Ipv4Addr> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split('.').collect();
    if parts.len() != 4 {
        return Err(invalid_ip(trimmed));
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(&parts) {
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid_ip(trimmed));
        }
        *slot = part.parse::<u8>().map_err(|_| invalid_ip(trimmed))?;
    }
    Ok(Ipv4Addr::from(octets))
}

fn invalid_ip(input: &str) -> ToolError {
    ToolError::validation(format!("invalid IPv4 address: {input}"))
}

pub fn is_valid_ipv4(input: &str) -> bool {
    parse_ipv4(input).is_ok()
}

pub fn ipv4_to_int(input: &str) -> Result<u32> {
    parse_ipv4(input).map(u32::from)
}

/// Appends the four octets to `prefix` as two 16-bit hex blocks.
pub fn ipv4_to_ipv6(input: &str, prefix: &str) -> Result<String> {
    let octets = parse_ipv4(input)?.octets();
    Ok(format!(
        "{prefix}{:02x}{:02x}:{:02x}{:02x}",
        octets[0], octets[1], octets[2], octets[3]
    ))
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4Representations {
    pub decimal: String,
    pub hexadecimal: String,
    pub binary: String,
    pub ipv6: String,
    pub ipv6_short: String,
}

pub fn ipv4_representations(input: &str) -> Result<Ipv4Representations> {
    let ip = parse_ipv4(input)?;
    let value = u32::from(ip);
    let octets = ip.octets();
    Ok(Ipv4Representations {
        decimal: value.to_string(),
        hexadecimal: format!("{value:X}"),
        binary: format!("{value:b}"),
        ipv6: ipv4_to_ipv6(input, IPV4_MAPPED_PREFIX)?,
        ipv6_short: format!(
            "::ffff:{:02x}{:02x}:{:02x}{:02x}",
            octets[0], octets[1], octets[2], octets[3]
        ),
    })
}

#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubnetInfo {
    #[serde(rename = "type")]
    pub kind: String,
    pub input: String,
    pub cidr: Option<String>,
    pub mask: Option<String>,
    pub range_start: String,
    pub range_end: String,
    pub total: String,
    pub integer: Option<String>,
}

/// Describes a single address, a CIDR block (`/24` or `/255.255.255.0`) or a `start-end` range.
pub fn ipv4_subnet_info(input: &str) -> Result<SubnetInfo> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation("input is empty"));
    }
    if looks_like_range(trimmed) {
        return ipv4_range(trimmed);
    }
    if trimmed.contains('/') {
        return ipv4_with_prefix(trimmed);
    }
    let ip = parse_ipv4(trimmed)?;
    Ok(SubnetInfo {
        kind: "single".into(),
        input: trimmed.to_string(),
        cidr: Some(format!("{ip}/32")),
        mask: Some(Ipv4Addr::BROADCAST.to_string()),
        range_start: ip.to_string(),
        range_end: ip.to_string(),
        total: "1".into(),
        integer: Some(u32::from(ip).to_string()),
    })
}

fn ipv4_with_prefix(input: &str) -> Result<SubnetInfo> {
    let (left, right) = input.split_once('/').unwrap_or((input, ""));
    let ip = parse_ipv4(left)?;
    let right = right.trim();
    if right.is_empty() {
        return Err(ToolError::validation("missing prefix length"));
    }
    let (prefix, mask_value) = if right.contains('.') {
        let mask_value = u32::from(parse_ipv4(right)?);
        (mask_to_prefix(mask_value)?, mask_value)
    } else {
        let prefix: u8 = right
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| ToolError::validation(format!("invalid prefix length: {right}")))?;
        let mask_value = if prefix == 0 {
            0
        } else {
            u32::MAX << (32 - u32::from(prefix))
        };
        (prefix, mask_value)
    };
    let ip_value = u32::from(ip);
    let network = ip_value & mask_value;
    let broadcast = network | !mask_value;
    let total = 1u64 << (32 - u32::from(prefix));
    Ok(SubnetInfo {
        kind: "network".into(),
        input: input.to_string(),
        cidr: Some(format!("{}/{prefix}", Ipv4Addr::from(network))),
        mask: Some(Ipv4Addr::from(mask_value).to_string()),
        range_start: Ipv4Addr::from(network).to_string(),
        range_end: Ipv4Addr::from(broadcast).to_string(),
        total: total.to_string(),
        integer: Some(ip_value.to_string()),
    })
}

fn ipv4_range(input: &str) -> Result<SubnetInfo> {
    let normalized = input
        .replace(' ', "")
        .replace("->", "-")
        .replace(['—', '–'], "-");
    let (start, end) = normalized
        .split_once('-')
        .filter(|(_, end)| !end.contains('-'))
        .ok_or_else(|| ToolError::validation("range must be in start-end format"))?;
    let start_ip = parse_ipv4(start)?;
    let end_ip = parse_ipv4(end)?;
    let (start, end) = (u32::from(start_ip), u32::from(end_ip));
    if start > end {
        return Err(ToolError::validation(
            "start address must not be greater than end address",
        ));
    }
    let cidrs = ip_range_to_cidrs(start, end);
    Ok(SubnetInfo {
        kind: "range".into(),
        input: input.to_string(),
        cidr: (!cidrs.is_empty()).then(|| cidrs.join(", ")),
        mask: None,
        range_start: start_ip.to_string(),
        range_end: end_ip.to_string(),
        total: (u64::from(end - start) + 1).to_string(),
        integer: None,
    })
}

fn looks_like_range(input: &str) -> bool {
    input.contains('-') || input.contains(['—', '–'])
}

fn mask_to_prefix(mask: u32) -> Result<u8> {
    // A contiguous mask is all ones followed by all zeros.
    if mask.leading_ones() + mask.trailing_zeros() != 32 {
        return Err(ToolError::validation("invalid subnet mask"));
    }
    Ok(mask.leading_ones() as u8)
}

/// Minimal set of CIDR blocks that exactly covers `start..=end`.
fn ip_range_to_cidrs(mut start: u32, end: u32) -> Vec<String> {
    let mut cidrs = Vec::new();
    loop {
        let align = if start == 0 { 32 } else { start.trailing_zeros() };
        let span = u64::from(end - start) + 1;
        let fit = 63 - span.leading_zeros();
        let bits = align.min(fit);
        cidrs.push(format!("{}/{}", Ipv4Addr::from(start), 32 - bits));
        let size = 1u64 << bits;
        let next = u64::from(start) + size;
        if next > u64::from(end) {
            break;
        }
        start = next as u32;
    }
    cidrs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_to_int_is_big_endian() {
        assert_eq!(ipv4_to_int("192.168.0.1").unwrap(), 3_232_235_521);
        assert_eq!(ipv4_to_int("0.0.0.0").unwrap(), 0);
        assert_eq!(ipv4_to_int("255.255.255.255").unwrap(), u32::MAX);
        assert!(matches!(ipv4_to_int("1.2.3").unwrap_err(), ToolError::Validation(_)));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "1.2.3", "1.2.3.4.5", "256.1.1.1", "1.2.3.-4", "a.b.c.d", "1..2.3"] {
            assert!(!is_valid_ipv4(bad), "{bad} should be invalid");
        }
        assert!(is_valid_ipv4(" 192.168.0.1 "));
    }

    #[test]
    fn representations_of_private_address() {
        let reps = ipv4_representations("192.168.0.1").unwrap();
        assert_eq!(reps.decimal, "3232235521");
        assert_eq!(reps.hexadecimal, "C0A80001");
        assert_eq!(reps.binary, "11000000101010000000000000000001");
        assert_eq!(reps.ipv6, "0000:0000:0000:0000:0000:ffff:c0a8:0001");
        assert_eq!(reps.ipv6_short, "::ffff:c0a8:0001");
    }

    #[test]
    fn cidr_block_summary() {
        let info = ipv4_subnet_info("10.1.2.3/24").unwrap();
        assert_eq!(info.cidr.as_deref(), Some("10.1.2.0/24"));
        assert_eq!(info.mask.as_deref(), Some("255.255.255.0"));
        assert_eq!(info.range_end, "10.1.2.255");
        assert_eq!(info.total, "256");
    }

    #[test]
    fn dotted_mask_and_zero_prefix() {
        let info = ipv4_subnet_info("172.16.5.4/255.255.0.0").unwrap();
        assert_eq!(info.cidr.as_deref(), Some("172.16.0.0/16"));
        let all = ipv4_subnet_info("1.2.3.4/0").unwrap();
        assert_eq!(all.total, "4294967296");
        assert!(ipv4_subnet_info("1.2.3.4/255.0.255.0").is_err());
        assert!(ipv4_subnet_info("1.2.3.4/33").is_err());
    }

    #[test]
    fn range_is_covered_by_minimal_cidrs() {
        let info = ipv4_subnet_info("192.168.1.0 - 192.168.1.130").unwrap();
        assert_eq!(info.total, "131");
        assert_eq!(
            info.cidr.as_deref(),
            Some("192.168.1.0/25, 192.168.1.128/31, 192.168.1.130/32")
        );
        let full = ipv4_subnet_info("0.0.0.0-255.255.255.255").unwrap();
        assert_eq!(full.cidr.as_deref(), Some("0.0.0.0/0"));
        assert!(ipv4_subnet_info("10.0.0.5-10.0.0.1").is_err());
    }
}
