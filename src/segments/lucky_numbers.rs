//! Six lucky numbers that stay the same all day on one machine

use super::{FormatOptions, RefreshUnit, Segment, SegmentContext, SegmentInit};
use crate::display::TimedWriter;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rand::rngs::SmallRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use std::hash::{DefaultHasher, Hash, Hasher};
use tracing::debug;

const MACHINE_ID_PATHS: [&str; 2] = ["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Largest value for the first five numbers.
const MAIN_MAX: usize = 69;
/// Largest value for the sixth number.
const BONUS_MAX: u32 = 25;

/// Days since the Unix epoch for a local date.
pub fn day_number(date: NaiveDate) -> i64 {
    date.signed_duration_since(NaiveDate::default()).num_days()
}

/// Draws the numbers for one day and machine.
///
/// The first five are distinct, between 1 and 69, in ascending order. The
/// sixth is between 1 and 25 and differs from all five.
pub fn lucky_numbers(day: i64, machine: u64) -> [u32; 6] {
    let mut rng = SmallRng::seed_from_u64(machine ^ (day as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    let mut main: Vec<u32> = sample(&mut rng, MAIN_MAX, 5)
        .into_iter()
        .map(|i| i as u32 + 1)
        .collect();
    main.sort_unstable();

    let mut bonus = rng.random_range(1..=BONUS_MAX);
    while main.contains(&bonus) {
        bonus = rng.random_range(1..=BONUS_MAX);
    }

    [main[0], main[1], main[2], main[3], main[4], bonus]
}

/// A stable per-machine value, or zero when the machine has no id file.
fn machine_seed() -> u64 {
    for path in MACHINE_ID_PATHS {
        if let Ok(id) = std::fs::read_to_string(path) {
            let mut hasher = DefaultHasher::new();
            id.trim().hash(&mut hasher);
            return hasher.finish();
        }
    }
    debug!("No machine id found, lucky numbers use a fixed seed");
    0
}

pub struct LuckyNumbersSegment {
    intro: Option<String>,
    machine: u64,
}

impl LuckyNumbersSegment {
    pub fn new(intro: Option<String>, machine: u64) -> Self {
        Self { intro, machine }
    }

    pub fn from_context(ctx: &SegmentContext<'_>) -> Result<Self, AppError> {
        let init = SegmentInit::resolve(
            ctx.name,
            ctx.options,
            crate::constants::refresh::DEFAULT_MINUTES,
            RefreshUnit::Minutes,
            None,
        )?;
        Ok(Self::new(init.intro, machine_seed()))
    }
}

#[async_trait]
impl Segment for LuckyNumbersSegment {
    fn introduction(&self) -> Option<&str> {
        self.intro.as_deref()
    }

    async fn show(&mut self, out: &mut TimedWriter, _format: &FormatOptions) {
        let numbers = lucky_numbers(day_number(Local::now().date_naive()), self.machine);
        out.write("Your Lucky Numbers for Today:").await;
        out.write_inline("  ").await;
        for (i, number) in numbers.iter().enumerate() {
            out.write_inline(&format!("{number} ")).await;
            if i == 4 {
                out.write_inline("and").await;
                for _ in 0..3 {
                    out.wait_beats(1).await;
                    out.write_inline(".").await;
                }
                out.wait_beats(1).await;
                out.write_inline(" ").await;
            }
        }
        out.newline().await;
    }
}
