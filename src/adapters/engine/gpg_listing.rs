//! Parsers for GnuPG's machine- and human-readable listings.

use crate::core::models::key_info::{KeyInfo, KeyValidity};
use crate::core::models::packet_listing::PacketListing;

/// Parse `gpg --with-colons --list-keys` output into one `KeyInfo` per
/// primary key.
///
/// See `doc/DETAILS` in the GnuPG sources for the field layout.
pub fn parse_key_listing(stdout: &str) -> Vec<KeyInfo> {
    let mut keys: Vec<KeyInfo> = Vec::new();
    // `fpr` records follow the key they belong to; only the primary's is kept.
    let mut in_primary = false;

    for line in stdout.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        let field = |i: usize| fields.get(i).copied().unwrap_or("");

        match field(0) {
            "pub" => {
                keys.push(KeyInfo {
                    key_id: field(4).to_string(),
                    fingerprint: None,
                    user_ids: Vec::new(),
                    validity: parse_validity(field(1)),
                    capabilities: field(11).to_string(),
                });
                in_primary = true;
            }
            "fpr" if in_primary => {
                if let Some(key) = keys.last_mut() {
                    key.fingerprint = Some(field(9).to_string());
                }
                in_primary = false;
            }
            "uid" => {
                if let Some(key) = keys.last_mut() {
                    key.user_ids.push(unescape(field(9)));
                }
            }
            "sub" | "ssb" => in_primary = false,
            _ => {}
        }
    }

    keys
}

fn parse_validity(flag: &str) -> KeyValidity {
    match flag.chars().next() {
        Some('r') => KeyValidity::Revoked,
        Some('e') => KeyValidity::Expired,
        Some('d') => KeyValidity::Disabled,
        Some('i') => KeyValidity::Invalid,
        Some('m' | 'f' | 'u' | 'w' | 's') => KeyValidity::Valid,
        _ => KeyValidity::Unknown,
    }
}

/// Undo the `\xNN` escaping GnuPG applies to user IDs.
fn unescape(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' && bytes.get(i + 1) == Some(&b'x') {
            let decoded = raw
                .get(i + 2..i + 4)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(b) = decoded {
                out.push(b);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Parse `gpg --list-packets` output.
///
/// Packet headers look like `:pubkey enc packet: version 3, ...`; every
/// non-empty stderr line is kept as a diagnostic.
pub fn parse_packet_listing(stdout: &str, stderr: &str, exit_ok: bool) -> PacketListing {
    let packets = stdout
        .lines()
        .filter_map(|line| line.strip_prefix(':'))
        .filter_map(|rest| rest.split_once(':'))
        .map(|(name, _)| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect();

    let diagnostics = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect();

    PacketListing {
        packets,
        diagnostics,
        exit_ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = "\
tru::1:1700000000:0:3:1:5
pub:u:255:22:0123456789ABCDEF:1700000000:::u:::scESC:::::ed25519:::0:
fpr:::::::::AAAABBBBCCCCDDDDEEEEFFFF0123456789ABCDEF:
uid:u::::1700000000::4B1D::Alice \\x3a Ops <alice@example.com>::::::::::0:
sub:u:255:18:FEDCBA9876543210:1700000000::::::e:::::cv25519::
fpr:::::::::1111222233334444555566667777FEDCBA987654:
";

    #[test]
    fn parses_primary_key() {
        let keys = parse_key_listing(ALICE);
        assert_eq!(keys.len(), 1);

        let key = &keys[0];
        assert_eq!(key.key_id, "0123456789ABCDEF");
        assert_eq!(
            key.fingerprint.as_deref(),
            Some("AAAABBBBCCCCDDDDEEEEFFFF0123456789ABCDEF")
        );
        assert_eq!(key.user_ids, ["Alice : Ops <alice@example.com>"]);
        assert_eq!(key.validity, KeyValidity::Valid);
        assert!(key.can_encrypt());
    }

    #[test]
    fn parses_revoked_and_expired_keys() {
        let listing = "\
pub:r:4096:1:1111111111111111:1500000000:::-:::sc:::::::
uid:r::::::::Old <old@example.com>:
pub:e:4096:1:2222222222222222:1500000000:1600000000::-:::sc:::::::
uid:e::::::::Old <old@example.com>:
";
        let keys = parse_key_listing(listing);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].validity, KeyValidity::Revoked);
        assert_eq!(keys[1].validity, KeyValidity::Expired);
        assert!(!keys[0].can_encrypt());
    }

    #[test]
    fn empty_listing_has_no_keys() {
        assert!(parse_key_listing("").is_empty());
    }

    #[test]
    fn packet_headers_are_extracted() {
        let stdout = "\
# off=0 ctb=84 tag=1 hlen=2 plen=94
:pubkey enc packet: version 3, algo 18, keyid FEDCBA9876543210
\tdata: [263 bits]
:encrypted data packet:
\tlength: unknown
\tmdc_method: 2
";
        let listing = parse_packet_listing(stdout, "", true);
        assert_eq!(
            listing.packets,
            ["pubkey enc packet", "encrypted data packet"]
        );
        assert!(listing.is_well_formed());
    }

    #[test]
    fn garbage_produces_no_packets() {
        let listing = parse_packet_listing("", "gpg: no valid OpenPGP data found.\n", false);
        assert!(listing.packets.is_empty());
        assert_eq!(listing.diagnostics.len(), 1);
        assert!(!listing.is_well_formed());
    }
}
