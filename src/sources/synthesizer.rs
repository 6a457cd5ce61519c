//! Plausible-value generator standing in for real chain and DeFi data.
//!
//! Ranges (inclusive):
//! - Point metrics: tx count 2M-3M, active wallets 800K-1.3M,
//!   volume $500M-$1B, SOL price $100-$150, 24h change -10%..+10%
//! - Protocols: per-protocol bands from [`PROTOCOL_CATALOG`]
//! - Wallet flows: inflow $300M-$500M, outflow $250M-$400M per day
//! - Transaction volume: $500M-$800M and 2M-3M transactions per day

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;

use super::catalog::{ProtocolBand, PROTOCOL_CATALOG};
use super::price_feed::{CoinGeckoFeed, SolQuote};
use super::MetricsSource;
use crate::config::{PriceFeedSettings, PriceSource};
use crate::db::models::{NewPointMetric, NewProtocolSnapshot, NewVolumeRecord, NewWalletFlow};
use crate::utils::{decimal_from_units, AMOUNT_SCALE, PERCENT_SCALE, PRICE_SCALE};

// ============================================
// Ranges
// ============================================

const DAILY_TX_COUNT: (u64, u64) = (2_000_000, 3_000_000);
const ACTIVE_WALLETS: (u64, u64) = (800_000, 1_300_000);
const TOTAL_VOLUME_USD: (i64, i64) = (500_000_000, 1_000_000_000);
/// Micro-dollars.
const SOL_PRICE_MICROS: (i64, i64) = (100_000_000, 150_000_000);
/// Hundredths of a percent.
const PRICE_CHANGE_BPS: (i64, i64) = (-1_000, 1_000);

const INFLOW_USD: (i64, i64) = (300_000_000, 500_000_000);
const OUTFLOW_USD: (i64, i64) = (250_000_000, 400_000_000);

const DAILY_VOLUME_USD: (i64, i64) = (500_000_000, 800_000_000);
const DAILY_VOLUME_TX_COUNT: (u64, u64) = (2_000_000, 3_000_000);

const CENTS_PER_USD: i64 = 100;

/// Random USD amount within a whole-dollar band, with cent precision.
fn usd_in<R: Rng + ?Sized>(rng: &mut R, (low, high): (i64, i64)) -> bigdecimal::BigDecimal {
    let cents = rng.gen_range(low * CENTS_PER_USD..=high * CENTS_PER_USD);
    decimal_from_units(cents, AMOUNT_SCALE)
}

// ============================================
// Generators
// ============================================

/// Synthesize a point metric; `quote` overrides the random price when present.
pub fn synthesize_point_metric<R: Rng + ?Sized>(
    rng: &mut R,
    quote: Option<SolQuote>,
) -> NewPointMetric {
    let daily_tx_count = rng.gen_range(DAILY_TX_COUNT.0..=DAILY_TX_COUNT.1);
    let active_wallets = rng.gen_range(ACTIVE_WALLETS.0..=ACTIVE_WALLETS.1);
    let total_volume = usd_in(rng, TOTAL_VOLUME_USD);

    let (sol_price, price_change_24h) = match quote {
        Some(quote) => (quote.price, quote.change_24h),
        None => (
            decimal_from_units(
                rng.gen_range(SOL_PRICE_MICROS.0..=SOL_PRICE_MICROS.1),
                PRICE_SCALE,
            ),
            decimal_from_units(
                rng.gen_range(PRICE_CHANGE_BPS.0..=PRICE_CHANGE_BPS.1),
                PERCENT_SCALE,
            ),
        ),
    };

    NewPointMetric {
        daily_tx_count,
        active_wallets,
        total_volume,
        sol_price,
        price_change_24h,
    }
}

pub fn synthesize_protocol<R: Rng + ?Sized>(
    rng: &mut R,
    band: &ProtocolBand,
) -> NewProtocolSnapshot {
    NewProtocolSnapshot {
        name: band.name.to_string(),
        tvl: usd_in(rng, band.tvl_usd),
        volume_24h: usd_in(rng, band.volume_24h_usd),
        change_24h: decimal_from_units(
            rng.gen_range(band.change_bps.0..=band.change_bps.1),
            PERCENT_SCALE,
        ),
        users_24h: rng.gen_range(band.users_24h.0..=band.users_24h.1),
    }
}

/// One snapshot per catalog entry, in catalog order.
pub fn synthesize_protocols<R: Rng + ?Sized>(rng: &mut R) -> Vec<NewProtocolSnapshot> {
    PROTOCOL_CATALOG
        .iter()
        .map(|band| synthesize_protocol(rng, band))
        .collect()
}

/// Dates for a `days`-long daily series ending at `now`, oldest first.
pub fn daily_dates(days: u32, now: DateTime<Utc>) -> impl Iterator<Item = DateTime<Utc>> {
    (0..days as i64)
        .rev()
        .map(move |days_ago| now - chrono::Duration::days(days_ago))
}

pub fn synthesize_wallet_flows<R: Rng + ?Sized>(
    rng: &mut R,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<NewWalletFlow> {
    daily_dates(days, now)
        .map(|date| NewWalletFlow {
            date,
            inflow: usd_in(rng, INFLOW_USD),
            outflow: usd_in(rng, OUTFLOW_USD),
        })
        .collect()
}

pub fn synthesize_volume_records<R: Rng + ?Sized>(
    rng: &mut R,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<NewVolumeRecord> {
    daily_dates(days, now)
        .map(|date| NewVolumeRecord {
            date,
            volume: usd_in(rng, DAILY_VOLUME_USD),
            tx_count: rng.gen_range(DAILY_VOLUME_TX_COUNT.0..=DAILY_VOLUME_TX_COUNT.1),
        })
        .collect()
}

// ============================================
// Source
// ============================================

/// [`MetricsSource`] backed by random generation, optionally with a live SOL quote.
#[derive(Clone)]
pub struct Synthesizer {
    price_feed: Option<CoinGeckoFeed>,
}

impl Synthesizer {
    /// Fully synthetic source; never fails.
    pub fn synthetic() -> Self {
        Self { price_feed: None }
    }

    pub fn with_price_feed(price_feed: CoinGeckoFeed) -> Self {
        Self {
            price_feed: Some(price_feed),
        }
    }

    pub fn from_settings(settings: &PriceFeedSettings) -> Result<Self> {
        match settings.source {
            PriceSource::Synthetic => {
                info!("Using synthetic SOL price");
                Ok(Self::synthetic())
            }
            PriceSource::Coingecko => {
                let feed = CoinGeckoFeed::new(
                    &settings.url,
                    Duration::from_secs(settings.timeout_secs),
                )?;
                info!("Using CoinGecko SOL price from {}", feed.url());
                Ok(Self::with_price_feed(feed))
            }
        }
    }
}

#[async_trait]
impl MetricsSource for Synthesizer {
    async fn point_metric(&self) -> Result<NewPointMetric> {
        let quote = match &self.price_feed {
            Some(feed) => Some(feed.fetch_quote().await?),
            None => None,
        };

        Ok(synthesize_point_metric(&mut rand::thread_rng(), quote))
    }

    async fn protocol_snapshots(&self) -> Result<Vec<NewProtocolSnapshot>> {
        Ok(synthesize_protocols(&mut rand::thread_rng()))
    }

    async fn wallet_flows(&self, days: u32) -> Result<Vec<NewWalletFlow>> {
        Ok(synthesize_wallet_flows(
            &mut rand::thread_rng(),
            days,
            Utc::now(),
        ))
    }

    async fn volume_records(&self, days: u32) -> Result<Vec<NewVolumeRecord>> {
        Ok(synthesize_volume_records(
            &mut rand::thread_rng(),
            days,
            Utc::now(),
        ))
    }
}
