use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::assets::{AssetQueue, AssetQueueBuilder};
use crate::cli::{Command, Step};
use crate::config::Config;
use crate::interaction::CardView;
use crate::layout::{InteractionMode, ViewportSnapshot, ViewportTier};
use crate::navigation::{Navigator, RecordingNavigator, SystemNavigator};
use crate::section::{PortfolioSection, SectionCommand};

/// How long `settle` waits for outstanding asset loads.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ReelgridApp {
    config: Config,
}

impl ReelgridApp {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self, command: Command) -> Result<()> {
        match command {
            Command::Plan { width, touch, json } => self.print_plan(width, touch, json),
            Command::Simulate {
                width,
                touch,
                steps,
                open,
                json,
            } => {
                let snapshot = ViewportSnapshot::new(width, touch);
                if open {
                    let session = self.simulate(snapshot, steps, SystemNavigator)?;
                    print_session(&SessionReport::new(session.section()), json)
                } else {
                    let session = self.simulate(snapshot, steps, RecordingNavigator::new())?;
                    let mut report = SessionReport::new(session.section());
                    report.navigations = session.navigator().opened();
                    print_session(&report, json)
                }
            }
            Command::Catalog => {
                let catalog = self.config.catalog.catalog();
                if catalog.is_empty() {
                    println!("catalog is empty");
                }
                for (index, item) in catalog.items().iter().enumerate() {
                    println!("{:>3}  {}  {}", index, item.id, item.watch_url());
                }
                Ok(())
            }
        }
    }

    fn print_plan(&self, width: u32, touch: bool, json: bool) -> Result<()> {
        let report = PlanReport::new(&self.config, ViewportSnapshot::new(width, touch));
        if json {
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to encode plan")?
            );
            return Ok(());
        }
        println!(
            "width {}: {:?} / {:?}, {} columns x {} rows ({} of {} cells{})",
            report.width,
            report.tier,
            report.mode,
            report.columns,
            report.rows,
            report.items.len(),
            report.capacity,
            if report.partial_row { ", partial last row" } else { "" }
        );
        let mut index = 0;
        for row in &report.grid {
            let cells: Vec<String> = row
                .iter()
                .map(|id| {
                    index += 1;
                    format!("{:>2} {}", index - 1, id)
                })
                .collect();
            println!("  {}", cells.join("  "));
        }
        Ok(())
    }

    fn simulate<N: Navigator>(
        &self,
        snapshot: ViewportSnapshot,
        steps: Vec<Step>,
        navigator: N,
    ) -> Result<Session<N>> {
        let mut session = Session::new(&self.config, snapshot, navigator)?;
        for step in steps {
            session.step(step);
        }
        session.settle();
        Ok(session)
    }
}

fn print_session(report: &SessionReport, json: bool) -> Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(report).context("Failed to encode session")?
        );
        return Ok(());
    }
    println!(
        "{:?} / {:?}, {} columns, {} cards, in view: {}",
        report.tier,
        report.mode,
        report.columns,
        report.cards.len(),
        report.in_view
    );
    for view in &report.cards {
        let layer = if view.preview_visible {
            "preview"
        } else if view.placeholder_visible {
            "placeholder"
        } else {
            "thumbnail"
        };
        let failed = match (view.thumbnail_failed, view.preview_failed) {
            (true, _) => " thumbnail-failed",
            (false, true) => " preview-failed",
            _ => "",
        };
        println!(
            "{:<18} {:<16} {:<11} autoplay={} play_button={}{}",
            view.key,
            format!("{:?}", view.phase),
            layer,
            view.autoplay,
            view.play_button_visible,
            failed
        );
    }
    for url in &report.navigations {
        println!("navigated: {}", url);
    }
    Ok(())
}

/// Plan summary printed by the `plan` command.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub width: u32,
    pub tier: ViewportTier,
    pub mode: InteractionMode,
    pub columns: usize,
    pub rows: usize,
    pub capacity: usize,
    pub partial_row: bool,
    pub items: Vec<String>,
    /// Item ids row by row.
    pub grid: Vec<Vec<String>>,
}

impl PlanReport {
    pub fn new(config: &Config, snapshot: ViewportSnapshot) -> Self {
        let (tier, mode) = config.layout.breakpoints().classify_snapshot(snapshot);
        let catalog = config.catalog.catalog();
        let plan = config.layout.planner().plan(catalog.items(), tier);
        let grid = plan
            .row_items()
            .map(|row| row.iter().map(|item| item.id.clone()).collect())
            .collect();
        Self {
            width: snapshot.width,
            tier,
            mode,
            columns: plan.columns,
            rows: plan.rows,
            capacity: plan.capacity(),
            partial_row: plan.has_partial_row(),
            items: plan.items.iter().map(|item| item.id.clone()).collect(),
            grid,
        }
    }
}

/// Final state printed by the `simulate` command.
#[derive(Debug, Serialize)]
pub struct SessionReport {
    pub tier: Option<ViewportTier>,
    pub mode: InteractionMode,
    pub in_view: bool,
    pub columns: usize,
    pub cards: Vec<CardView>,
    /// URLs recorded instead of opened.
    pub navigations: Vec<String>,
}

impl SessionReport {
    pub fn new(section: &PortfolioSection) -> Self {
        Self {
            tier: section.tier(),
            mode: section.mode(),
            in_view: section.in_view(),
            columns: section.plan().columns,
            cards: section.views(),
            navigations: Vec::new(),
        }
    }
}

/// A live grid wired to an asset queue and a navigator.
///
/// Commands from the section are executed here; asset completions are
/// pumped back into the section on the calling thread.
pub struct Session<N: Navigator> {
    section: PortfolioSection,
    queue: AssetQueue,
    navigator: N,
    snapshot: ViewportSnapshot,
}

impl<N: Navigator> Session<N> {
    pub fn new(config: &Config, snapshot: ViewportSnapshot, navigator: N) -> Result<Self> {
        let queue = AssetQueueBuilder::new()
            .workers(config.assets.workers)
            .cache_entries(config.assets.cache_entries)
            .build(config.assets.fetcher())?;
        let section = PortfolioSection::new(config.catalog.catalog(), &config.layout);

        let mut session = Self {
            section,
            queue,
            navigator,
            snapshot,
        };
        let commands = session.section.apply_viewport(snapshot);
        session.execute(commands);
        Ok(session)
    }

    pub fn section(&self) -> &PortfolioSection {
        &self.section
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn step(&mut self, step: Step) {
        debug!(?step, "Applying step");
        let commands = match step {
            Step::Resize(width) => {
                self.snapshot.width = width;
                self.section.apply_viewport(self.snapshot)
            }
            Step::Touch(has_touch) => {
                self.snapshot.has_touch = has_touch;
                self.section.apply_viewport(self.snapshot)
            }
            Step::View => self.section.mark_in_view(),
            Step::Catalog(ids) => self.section.replace_catalog(ids.into_iter().collect()),
            Step::Enter(index) | Step::Leave(index) | Step::Tap(index)
                if self.section.card(index).is_none() =>
            {
                warn!(index, cards = self.section.cards().len(), "No card at index");
                Vec::new()
            }
            Step::Enter(index) => self.section.pointer_enter(index),
            Step::Leave(index) => self.section.pointer_leave(index),
            Step::Tap(index) => self.section.tap(index),
            Step::Settle => {
                self.settle();
                Vec::new()
            }
        };
        self.execute(commands);
        self.pump();
    }

    /// Feed completed loads into the section. Returns the number handled.
    pub fn pump(&mut self) -> usize {
        let events = self.queue.poll_results();
        let count = events.len();
        for event in events {
            let commands = self.section.handle_asset_event(event);
            self.execute(commands);
        }
        count
    }

    /// Wait for all outstanding loads, including the ones they trigger.
    pub fn settle(&mut self) {
        loop {
            if !self.queue.wait_idle(SETTLE_TIMEOUT) {
                warn!(
                    pending = self.queue.pending_count(),
                    "Asset loads still pending after timeout"
                );
                return;
            }
            if self.pump() == 0 && !self.queue.is_busy() {
                return;
            }
        }
    }

    fn execute(&mut self, commands: Vec<SectionCommand>) {
        for command in commands {
            match command {
                SectionCommand::Load(req) => {
                    self.queue.request(req);
                }
                SectionCommand::PlayPreview(key) => debug!(%key, "Play preview"),
                SectionCommand::StopPreview(key) => debug!(%key, "Stop preview"),
                SectionCommand::Navigate(url) => {
                    info!(%url, "Opening video");
                    if let Err(e) = self.navigator.open(&url) {
                        warn!(error = %e, "Navigation failed");
                    }
                }
            }
        }
    }
}
