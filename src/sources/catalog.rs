//! Fixed catalog of tracked Solana DeFi protocols.
//!
//! Each entry carries the band its synthesized values are drawn from. Bands
//! are centered on the protocols' typical dashboard figures.

/// Inclusive value bands for one protocol.
///
/// Dollar amounts are whole USD; `change_bps` is hundredths of a percent.
#[derive(Debug, Clone, Copy)]
pub struct ProtocolBand {
    pub name: &'static str,
    pub tvl_usd: (i64, i64),
    pub volume_24h_usd: (i64, i64),
    pub change_bps: (i64, i64),
    pub users_24h: (u64, u64),
}

pub const PROTOCOL_CATALOG: [ProtocolBand; 4] = [
    ProtocolBand {
        name: "Raydium",
        tvl_usd: (1_000_000_000, 1_400_000_000),
        volume_24h_usd: (200_000_000, 270_000_000),
        change_bps: (-500, 1_500),
        users_24h: (40_000, 52_000),
    },
    ProtocolBand {
        name: "Serum",
        tvl_usd: (800_000_000, 1_000_000_000),
        volume_24h_usd: (160_000_000, 220_000_000),
        change_bps: (-500, 1_200),
        users_24h: (28_000, 36_000),
    },
    ProtocolBand {
        name: "Marinade",
        tvl_usd: (680_000_000, 830_000_000),
        volume_24h_usd: (80_000_000, 115_000_000),
        change_bps: (-800, 500),
        users_24h: (16_000, 22_000),
    },
    ProtocolBand {
        name: "Orca",
        tvl_usd: (500_000_000, 640_000_000),
        volume_24h_usd: (120_000_000, 170_000_000),
        change_bps: (-300, 2_000),
        users_24h: (25_000, 32_000),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_unique() {
        let names: HashSet<_> = PROTOCOL_CATALOG.iter().map(|p| p.name).collect();
        assert_eq!(names.len(), PROTOCOL_CATALOG.len());
    }

    #[test]
    fn test_catalog_bands_ordered() {
        for band in &PROTOCOL_CATALOG {
            assert!(band.tvl_usd.0 <= band.tvl_usd.1, "{}", band.name);
            assert!(band.volume_24h_usd.0 <= band.volume_24h_usd.1, "{}", band.name);
            assert!(band.change_bps.0 <= band.change_bps.1, "{}", band.name);
            assert!(band.users_24h.0 <= band.users_24h.1, "{}", band.name);
        }
    }
}
