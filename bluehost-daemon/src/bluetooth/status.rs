/*!
 * Tool Output Parsers
 * One parser per status kind
 *
 * Matching is case-sensitive substring presence, which is all the tools'
 * output format guarantees.
 */

use std::collections::BTreeMap;

use super::adapter::{Adapter, PowerMode};

/// Parse `hciconfig` output into adapters keyed by name.
///
/// An adapter header is any line starting with `hci`; its name is the text up
/// to the first `:`, kept verbatim. Indented lines that follow fill in the BD
/// address and power state. A repeated name replaces the earlier entry.
pub fn parse_adapters(output: &str, sysfs_root: &str) -> BTreeMap<String, Adapter> {
    let mut adapters = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in output.lines() {
        if line.starts_with("hci") {
            let name = line.split(':').next().unwrap_or(line).to_string();
            adapters.insert(name.clone(), Adapter::new(&name, sysfs_root));
            current = Some(name);
        }

        let Some(adapter) = current.as_ref().and_then(|name| adapters.get_mut(name)) else {
            continue;
        };

        if line.contains("BD Address") {
            adapter.address = line.split_whitespace().nth(2).map(str::to_string);
        }
        if line.contains("DOWN") {
            adapter.power = Some(PowerMode::Off);
        }
        if line.contains("UP RUNNING") {
            adapter.power = Some(PowerMode::On);
        }
    }

    adapters
}

/// Version reported by `bluetoothctl -v`: the first line, trimmed.
pub fn parse_version(output: &str) -> String {
    output.trim().lines().next().unwrap_or_default().trim().to_string()
}

/// Adapter flags show it is up, running and answering inquiry scans.
pub fn is_discoverable(status: &str) -> bool {
    let status = status.trim();
    ["UP", "RUNNING", "ISCAN"]
        .iter()
        .all(|flag| status.contains(flag))
}

/// Adapter flags show neither inquiry nor page scanning.
pub fn is_non_discoverable(status: &str) -> bool {
    !status.trim().contains("SCAN")
}

/// Every output line, in order.
pub fn transcript(output: &str) -> Vec<String> {
    output.lines().map(str::to_string).collect()
}

/// Output lines with blank ones dropped, in order.
pub fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "/sys/class/bluetooth";

    #[test]
    fn adapter_label_is_kept_verbatim() {
        let adapters = parse_adapters("hci : hci0", ROOT);
        assert_eq!(adapters.len(), 1);
        let adapter = &adapters["hci "];
        assert_eq!(adapter.name, "hci ");
        assert_eq!(adapter.device_path, "/sys/class/bluetooth/hci ");
        assert_eq!(adapter.address, None);
        assert_eq!(adapter.power, None);
    }

    #[test]
    fn adapter_details_follow_header() {
        let output = "hci0:\tType: Primary  Bus: USB\n\
            \tBD Address: 00:1A:7D:DA:71:13  ACL MTU: 310:10  SCO MTU: 64:8\n\
            \tUP RUNNING PSCAN ISCAN\n";
        let adapters = parse_adapters(output, ROOT);
        let hci0 = &adapters["hci0"];
        assert_eq!(hci0.address.as_deref(), Some("00:1A:7D:DA:71:13"));
        assert_eq!(hci0.power, Some(PowerMode::On));
    }

    #[test]
    fn no_adapter_lines_means_empty_registry() {
        assert!(parse_adapters("", ROOT).is_empty());
        assert!(parse_adapters("Can't get device info: No such device", ROOT).is_empty());
        // Detail lines before any header are ignored
        assert!(parse_adapters("\tDOWN\n", ROOT).is_empty());
    }

    #[test]
    fn duplicate_adapter_last_wins() {
        let output = "hci0:\tType: Primary\n\tDOWN\nhci0:\tType: Primary\n";
        let adapters = parse_adapters(output, ROOT);
        assert_eq!(adapters.len(), 1);
        assert_eq!(adapters["hci0"].power, None);
    }

    #[test]
    fn version_is_first_trimmed_line() {
        assert_eq!(parse_version("5.7"), "5.7");
        assert_eq!(parse_version("\n  5.66\nextra\n"), "5.66");
        assert_eq!(parse_version(""), "");
    }

    #[test]
    fn discoverable_needs_all_three_flags() {
        assert!(is_discoverable("UP RUNNING ISCAN"));
        assert!(is_discoverable("\tUP RUNNING PSCAN ISCAN \n"));
        assert!(!is_discoverable(""));
        assert!(!is_discoverable("UP RUNNING PSCAN"));
        assert!(!is_discoverable("up running iscan"));
    }

    #[test]
    fn non_discoverable_means_no_scan_flag() {
        assert!(is_non_discoverable(""));
        assert!(is_non_discoverable("UP RUNNING"));
        assert!(!is_non_discoverable("SCAN"));
        assert!(!is_non_discoverable("UP RUNNING PSCAN"));
    }

    #[test]
    fn line_splitting() {
        assert_eq!(transcript("Ok\n\nDone"), vec!["Ok", "", "Done"]);
        assert_eq!(non_empty_lines("Ok\n\nDone\n"), vec!["Ok", "Done"]);
        assert!(transcript("").is_empty());
    }
}
