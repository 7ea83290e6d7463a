//! Renders network figures into Markdown replies

use num_format::{Locale, ToFormattedString};

use crate::domain::rules::{HalvingCountdown, MasternodeStats, MiningYield, RewardProjection, HALVING_HEIGHT};

/// Integer with thousands separators
fn grouped(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// Hash rate in KSols/s, truncated to whole Sols/s first
fn ksols(solps: f64) -> f64 {
    solps.trunc() / 1000.0
}

pub fn format_calc(user_solps: f64, network_solps: f64, income: &MiningYield, price: f64, currency: &str) -> String {
    format!(
        "Current network hashrate is *{:.2} KSols/s*.\n\
         A hashrate of *{:.0} Sols/s* will get you approximately \
         *{:.2} {cur}* _({:.2}$)_ per *hour* and \
         *{:.2} {cur}* _({:.2}$)_ per *day* at current network difficulty.",
        ksols(network_solps),
        user_solps,
        income.per_hour,
        income.per_hour * price,
        income.per_day,
        income.per_day * price,
        cur = currency,
    )
}

pub fn format_network(height: u64, avg_block_time: f64, network_solps: f64, difficulty: f64) -> String {
    format!(
        "*Network status*\n\
         Block height: *{}*\n\
         Average block time: *{:.2} s*\n\
         Network hashrate: *{:.2} KSols/s*\n\
         Network difficulty: *{:.2}*",
        grouped(height),
        avg_block_time,
        ksols(network_solps),
        difficulty,
    )
}

pub fn format_halving(height: u64, countdown: Option<&HalvingCountdown>) -> String {
    match countdown {
        Some(c) => format!(
            "Current block height is *{}*.\n\
             The next halving happens at block *{}*, *{}* blocks from now: \
             approximately *{:.2} days* (*{:.2} years*).",
            grouped(height),
            grouped(HALVING_HEIGHT),
            grouped(c.blocks_left),
            c.days,
            c.years,
        ),
        None => format!(
            "Current block height is *{}*.\nThe halving at block *{}* has been reached.",
            grouped(height),
            grouped(HALVING_HEIGHT),
        ),
    }
}

pub fn format_mninfo(stats: &MasternodeStats, collateral: f64, currency: &str) -> String {
    let locked = (stats.count as f64 * collateral).round() as u64;
    format!(
        "*Masternodes*\n\
         Active masternodes: *{}*\n\
         Coins locked: *{} {cur}*\n\
         ROI: *{:.3}%* per year\n\
         Time to first payment: *{:.3} hours*\n\
         Reward per masternode: *{:.3} {cur}* per *day*",
        grouped(stats.count as u64),
        grouped(locked),
        stats.roi_percent,
        stats.first_payment_hours,
        stats.daily_reward,
        cur = currency,
    )
}

pub fn format_mnrew(nodes: f64, projection: &RewardProjection, price: f64, currency: &str) -> String {
    let mut message = format!("With *{}* masternode(s) you will get approximately:", nodes);
    for (period, amount) in projection.periods() {
        message.push_str(&format!(
            "\n*{:.3} {}* _({:.3}$)_ per *{}*",
            amount,
            currency,
            amount * price,
            period
        ));
    }
    message
}

/// Reply when no active masternode is reported
pub fn no_masternodes() -> String {
    "No active masternodes were found, rewards cannot be estimated.".to_string()
}
