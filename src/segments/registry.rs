//! Builds the named segments a config declares and announces their introductions

use super::Segment;
use super::date_time::DateTimeSegment;
use super::lucky_numbers::LuckyNumbersSegment;
use super::news::NewsSegment;
use super::on_this_day::OnThisDaySegment;
use super::station::StationSegment;
use super::stocks::StocksSegment;
use super::template::TemplateSegment;
use super::weather::WeatherSegment;
use crate::config::Config;
use crate::display::TimedWriter;
use crate::error::AppError;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Everything a provider needs to construct itself from a declaration.
#[derive(Debug, Clone, Copy)]
pub struct SegmentContext<'a> {
    /// The user-chosen name, used in logs and error messages.
    pub name: &'a str,
    pub options: &'a toml::Table,
    pub client: &'a Client,
}

type SegmentFactory = fn(&SegmentContext<'_>) -> Result<Box<dyn Segment>, AppError>;

/// Every module identifier a declaration may name.
static MODULES: [(&str, SegmentFactory); 8] = [
    ("date_time", |ctx| Ok(Box::new(DateTimeSegment::from_context(ctx)?))),
    ("lucky_numbers", |ctx| Ok(Box::new(LuckyNumbersSegment::from_context(ctx)?))),
    ("template", |ctx| Ok(Box::new(TemplateSegment::from_context(ctx)?))),
    ("us_weather", |ctx| Ok(Box::new(WeatherSegment::from_context(ctx)?))),
    ("ap_news", |ctx| Ok(Box::new(NewsSegment::from_context(ctx)?))),
    ("yahoo_finance", |ctx| Ok(Box::new(StocksSegment::from_context(ctx)?))),
    ("spot_the_station", |ctx| Ok(Box::new(StationSegment::from_context(ctx)?))),
    ("wiki_on_this_day", |ctx| Ok(Box::new(OnThisDaySegment::from_context(ctx)?))),
];

/// Strips a tolerated `.py` or `.rs` suffix from a module identifier.
pub fn normalize_module(module: &str) -> &str {
    let module = module.trim();
    module
        .strip_suffix(".py")
        .or_else(|| module.strip_suffix(".rs"))
        .unwrap_or(module)
}

/// Constructs the segment for one declaration.
pub fn create_segment(module: &str, ctx: &SegmentContext<'_>) -> Result<Box<dyn Segment>, AppError> {
    let id = normalize_module(module);
    let (_, factory) = MODULES
        .iter()
        .find(|(known, _)| *known == id)
        .ok_or_else(|| AppError::UnknownModule {
            segment: ctx.name.to_string(),
            module: module.to_string(),
        })?;
    debug!("Creating segment '{}' from module '{}'", ctx.name, id);
    factory(ctx)
}

/// Named segments plus the introductions already shown.
#[derive(Default)]
pub struct SegmentRegistry {
    segments: HashMap<String, Box<dyn Segment>>,
    seen_intros: HashSet<String>,
    announced: Vec<String>,
}

impl SegmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every declared segment, in declaration order, announcing introductions as it goes.
    ///
    /// Any unknown module or mistyped init option aborts the whole build.
    pub async fn build(
        config: &Config,
        client: &Client,
        out: &mut TimedWriter,
    ) -> Result<Self, AppError> {
        let mut registry = Self::new();
        for (name, declaration) in &config.segments {
            let ctx = SegmentContext {
                name,
                options: &declaration.options,
                client,
            };
            let segment = create_segment(&declaration.module, &ctx)?;
            registry.register(name.clone(), segment, out).await;
        }
        info!(
            "Built {} segment(s), {} introduction(s) shown",
            registry.len(),
            registry.announced.len()
        );
        Ok(registry)
    }

    /// Adds a segment under `name` and shows its introduction if no other segment has.
    ///
    /// Introductions are only written when `show_intros` is on.
    pub async fn register(
        &mut self,
        name: impl Into<String>,
        segment: Box<dyn Segment>,
        out: &mut TimedWriter,
    ) {
        let intro = segment.introduction().map(str::to_string);
        if out.settings().show_intros
            && let Some(intro) = intro
            && self.seen_intros.insert(intro.clone())
        {
            out.write(&intro).await;
            out.newline().await;
            self.announced.push(intro);
        }
        self.segments.insert(name.into(), segment);
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Box<dyn Segment>> {
        self.segments.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.segments.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Introductions shown so far, in the order they were written.
    pub fn announced(&self) -> &[String] {
        &self.announced
    }
}
