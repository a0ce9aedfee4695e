/*!
 * Hardware Address Validation
 * Six colon-separated hex octets
 */

/// Decides whether a string is an acceptable peer hardware address.
pub trait AddressValidator: Send + Sync {
    fn is_valid(&self, address: &str) -> bool;
}

/// Accepts the standard six-octet colon-separated hex form.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacAddressValidator;

impl AddressValidator for MacAddressValidator {
    fn is_valid(&self, address: &str) -> bool {
        is_valid_hardware_address(address)
    }
}

/// `XX:XX:XX:XX:XX:XX` with hex digits of either case.
pub fn is_valid_hardware_address(address: &str) -> bool {
    let octets: Vec<&str> = address.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_hex_octets() {
        assert!(is_valid_hardware_address("DE:AD:BE:EF:CA:FE"));
        assert!(is_valid_hardware_address("00:1a:7d:da:71:13"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "DE:AD:BE:EF:CA:ZE",
            "DE:AD:BE:EF:CA",
            "DE:AD:BE:EF:CA:FE:01",
            "DE-AD-BE-EF-CA-FE",
            "DEA:D:BE:EF:CA:FE",
            " DE:AD:BE:EF:CA:FE",
            "",
        ] {
            assert!(!is_valid_hardware_address(bad), "{bad} should be rejected");
        }
    }
}
