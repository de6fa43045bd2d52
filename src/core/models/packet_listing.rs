/// Diagnostics that mean the packet stream could not be parsed.
const FATAL_MARKERS: &[&str] = &[
    "invalid packet",
    "no valid openpgp data",
    "unexpected",
    "crc error",
    "premature eof",
    "invalid armor",
    "packet too short",
    "unknown packet type",
];

/// Structural dump of an OpenPGP file, as reported by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketListing {
    /// Packet type names in stream order, e.g. `pubkey enc packet`.
    pub packets: Vec<String>,
    /// Engine diagnostics (one per line).
    pub diagnostics: Vec<String>,
    /// Whether the engine exited successfully.
    pub exit_ok: bool,
}

impl PacketListing {
    /// The first diagnostic that indicates broken framing, if any.
    pub fn fatal_diagnostic(&self) -> Option<&str> {
        self.diagnostics
            .iter()
            .find(|d| {
                let lower = d.to_lowercase();
                FATAL_MARKERS.iter().any(|m| lower.contains(m))
            })
            .map(String::as_str)
    }

    pub fn is_well_formed(&self) -> bool {
        self.exit_ok && !self.packets.is_empty() && self.fatal_diagnostic().is_none()
    }

    /// Number of public-key encrypted session key packets.
    pub fn session_key_packets(&self) -> usize {
        self.packets
            .iter()
            .filter(|p| p.starts_with("pubkey enc"))
            .count()
    }
}
