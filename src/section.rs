//! The portfolio section: owns the grid plan and the mounted cards.
//!
//! All methods run on the UI thread. They return the commands the caller
//! must carry out (asset loads, preview playback, navigation) instead of
//! performing them.

use std::collections::HashMap;

use tracing::{debug, info, trace};

use crate::assets::{AssetEvent, AssetKind, AssetRequest};
use crate::config::LayoutConfig;
use crate::interaction::{CardController, CardEffect, CardEvent, CardKey, CardView};
use crate::layout::{Breakpoints, GridPlanner, InteractionMode, ViewportSnapshot, ViewportTier};
use crate::models::{Catalog, GridPlan};

/// Work the section asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionCommand {
    Load(AssetRequest),
    PlayPreview(CardKey),
    StopPreview(CardKey),
    Navigate(String),
}

pub struct PortfolioSection {
    catalog: Catalog,
    catalog_hash: u64,
    breakpoints: Breakpoints,
    planner: GridPlanner,
    tier: Option<ViewportTier>,
    mode: InteractionMode,
    plan: GridPlan,
    /// Mounted cards in plan order.
    cards: Vec<CardController>,
    in_view: bool,
}

impl PortfolioSection {
    pub fn new(catalog: Catalog, layout: &LayoutConfig) -> Self {
        let planner = layout.planner();
        let catalog_hash = catalog.fingerprint();
        Self {
            catalog,
            catalog_hash,
            breakpoints: layout.breakpoints(),
            plan: GridPlan::new(0, planner.rows, Vec::new()),
            planner,
            tier: None,
            mode: InteractionMode::Touch,
            cards: Vec::new(),
            in_view: false,
        }
    }

    pub fn tier(&self) -> Option<ViewportTier> {
        self.tier
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn plan(&self) -> &GridPlan {
        &self.plan
    }

    pub fn cards(&self) -> &[CardController] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&CardController> {
        self.cards.get(index)
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    pub fn views(&self) -> Vec<CardView> {
        self.cards
            .iter()
            .map(|card| CardView::derive(card, self.mode, self.in_view))
            .collect()
    }

    /// Apply a viewport change. Re-plans only when the tier moves.
    pub fn apply_viewport(&mut self, snapshot: ViewportSnapshot) -> Vec<SectionCommand> {
        let (tier, mode) = self.breakpoints.classify_snapshot(snapshot);

        let mut commands = Vec::new();
        if mode != self.mode {
            debug!(?mode, width = snapshot.width, "Interaction mode changed");
            self.mode = mode;
            commands.extend(self.sync_preview_gate());
        }

        if self.tier == Some(tier) {
            trace!(width = snapshot.width, ?tier, "Viewport change within tier");
            return commands;
        }

        info!(width = snapshot.width, from = ?self.tier, to = ?tier, "Viewport tier changed");
        self.tier = Some(tier);
        commands.extend(self.replan());
        commands
    }

    /// Swap in a new catalog. Identical catalogs are a no-op.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> Vec<SectionCommand> {
        let hash = catalog.fingerprint();
        if hash == self.catalog_hash {
            return Vec::new();
        }
        debug!(items = catalog.len(), "Catalog replaced");
        self.catalog = catalog;
        self.catalog_hash = hash;
        if self.tier.is_some() {
            self.replan()
        } else {
            Vec::new()
        }
    }

    /// Latch the section as scrolled into view. Only the first call has
    /// any effect: previews held back for hovered cards are started.
    pub fn mark_in_view(&mut self) -> Vec<SectionCommand> {
        if self.in_view {
            return Vec::new();
        }
        debug!("Portfolio section in view");
        self.in_view = true;
        self.sync_preview_gate()
    }

    /// Preview embeds exist only once the section is in view, and only for
    /// pointers that can hover.
    fn preview_mountable(&self) -> bool {
        self.in_view && self.mode == InteractionMode::HoverCapable
    }

    fn sync_preview_gate(&mut self) -> Vec<SectionCommand> {
        let mountable = self.preview_mountable();
        let mut commands = Vec::new();
        for card in &mut self.cards {
            if let Some(effect) = card.set_preview_mountable(mountable) {
                commands.push(command_for(card, effect));
            }
        }
        commands
    }

    pub fn pointer_enter(&mut self, index: usize) -> Vec<SectionCommand> {
        self.dispatch(index, CardEvent::PointerEnter)
    }

    pub fn pointer_leave(&mut self, index: usize) -> Vec<SectionCommand> {
        self.dispatch(index, CardEvent::PointerLeave)
    }

    pub fn tap(&mut self, index: usize) -> Vec<SectionCommand> {
        self.dispatch(index, CardEvent::Tap)
    }

    /// Route an asset completion to its card. Completions for cards that
    /// have since been unmounted are dropped.
    pub fn handle_asset_event(&mut self, event: AssetEvent) -> Vec<SectionCommand> {
        let Some(index) = self.cards.iter().position(|c| c.key() == &event.key) else {
            trace!(key = %event.key, kind = %event.kind, "Asset event for unmounted card dropped");
            return Vec::new();
        };
        let card_event = match &event.outcome {
            Ok(()) => CardEvent::AssetLoaded(event.kind),
            Err(e) => {
                debug!(key = %event.key, error = %e, "Card keeps fallback visual");
                CardEvent::AssetFailed(event.kind)
            }
        };
        self.dispatch(index, card_event)
    }

    fn dispatch(&mut self, index: usize, event: CardEvent) -> Vec<SectionCommand> {
        let mode = self.mode;
        let Some(card) = self.cards.get_mut(index) else {
            trace!(index, ?event, "No card at index");
            return Vec::new();
        };
        let effect = card.handle(event, mode);
        effect
            .map(|effect| command_for(card, effect))
            .into_iter()
            .collect()
    }

    /// Recompute the plan and diff mounted cards against it.
    ///
    /// Cards whose key is still planned keep their state. The rest are
    /// dropped and new keys are mounted fresh.
    fn replan(&mut self) -> Vec<SectionCommand> {
        let Some(tier) = self.tier else {
            return Vec::new();
        };
        let plan = self.planner.plan(self.catalog.items(), tier);

        let mut previous: HashMap<CardKey, CardController> = self
            .cards
            .drain(..)
            .map(|card| (card.key().clone(), card))
            .collect();

        let mountable = self.preview_mountable();
        let mut commands = Vec::new();
        let mut cards = Vec::with_capacity(plan.items.len());
        for (index, item) in plan.items.iter().enumerate() {
            let key = CardKey::new(item.id.clone(), index);
            match previous.remove(&key) {
                Some(card) => cards.push(card),
                None => {
                    let mut card = CardController::new(key, item.clone());
                    let effect = card.mount();
                    commands.push(command_for(&card, effect));
                    // A freshly mounted card is never hovered, so this only
                    // records the gate.
                    card.set_preview_mountable(mountable);
                    cards.push(card);
                }
            }
        }

        for key in previous.keys() {
            trace!(%key, "Card unmounted");
        }
        debug!(
            columns = plan.columns,
            items = plan.items.len(),
            mounted = commands.len(),
            unmounted = previous.len(),
            "Grid re-planned"
        );

        self.plan = plan;
        self.cards = cards;
        commands
    }
}

fn command_for(card: &CardController, effect: CardEffect) -> SectionCommand {
    match effect {
        CardEffect::RequestThumbnail => SectionCommand::Load(AssetRequest::new(
            card.key().clone(),
            AssetKind::Thumbnail,
            card.item(),
        )),
        CardEffect::LoadPreview => SectionCommand::Load(AssetRequest::new(
            card.key().clone(),
            AssetKind::Preview,
            card.item(),
        )),
        CardEffect::PlayPreview => SectionCommand::PlayPreview(card.key().clone()),
        CardEffect::StopPreview => SectionCommand::StopPreview(card.key().clone()),
        CardEffect::Navigate(url) => SectionCommand::Navigate(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetError;

    fn catalog(n: usize) -> Catalog {
        (0..n).map(|i| format!("v{}", i)).collect()
    }

    fn section(n: usize) -> PortfolioSection {
        PortfolioSection::new(catalog(n), &LayoutConfig::default())
    }

    fn desktop() -> ViewportSnapshot {
        ViewportSnapshot::new(1200, false)
    }

    fn loads(commands: &[SectionCommand]) -> Vec<(String, AssetKind)> {
        commands
            .iter()
            .filter_map(|c| match c {
                SectionCommand::Load(req) => Some((req.key.to_string(), req.kind)),
                _ => None,
            })
            .collect()
    }

    fn load_thumbnail(section: &mut PortfolioSection, index: usize) -> Vec<SectionCommand> {
        let key = section.card(index).unwrap().key().clone();
        section.handle_asset_event(AssetEvent::loaded(key, AssetKind::Thumbnail))
    }

    #[test]
    fn test_first_viewport_mounts_planned_cards() {
        let mut section = section(12);
        let commands = section.apply_viewport(desktop());
        assert_eq!(section.tier(), Some(ViewportTier::Desktop));
        assert_eq!(section.mode(), InteractionMode::HoverCapable);
        assert_eq!(section.plan().columns, 3);
        assert_eq!(section.cards().len(), 6);
        let requested = loads(&commands);
        assert_eq!(requested.len(), 6);
        assert!(requested.iter().all(|(_, kind)| *kind == AssetKind::Thumbnail));
        assert_eq!(requested[0].0, "v0-0");
        assert_eq!(requested[5].0, "v5-5");
    }

    #[test]
    fn test_same_width_twice_is_noop() {
        let mut section = section(12);
        section.apply_viewport(desktop());
        let plan = section.plan().clone();
        assert!(section.apply_viewport(desktop()).is_empty());
        assert!(section
            .apply_viewport(ViewportSnapshot::new(1500, false))
            .is_empty());
        assert_eq!(section.plan(), &plan);
    }

    #[test]
    fn test_resize_to_mobile_tears_down_extra_cards() {
        let mut section = section(12);
        section.apply_viewport(desktop());
        load_thumbnail(&mut section, 0);
        let late_key = section.card(4).unwrap().key().clone();

        let commands = section.apply_viewport(ViewportSnapshot::new(600, false));
        assert_eq!(section.tier(), Some(ViewportTier::Mobile));
        assert_eq!(section.mode(), InteractionMode::Touch);
        assert_eq!(section.plan().columns, 1);
        assert_eq!(section.cards().len(), 2);
        // Cards 0 and 1 survive with their state; nothing new to load.
        assert!(commands.is_empty());
        assert!(section.card(0).unwrap().state().thumbnail_loaded);

        // A late completion for a torn-down card is a no-op.
        let late = AssetEvent::loaded(late_key, AssetKind::Thumbnail);
        assert!(section.handle_asset_event(late).is_empty());
        assert_eq!(section.cards().len(), 2);
    }

    #[test]
    fn test_growing_tier_mounts_new_cards_fresh() {
        let mut section = section(12);
        section.apply_viewport(ViewportSnapshot::new(500, false));
        load_thumbnail(&mut section, 1);
        let commands = section.apply_viewport(ViewportSnapshot::new(900, false));
        assert_eq!(section.cards().len(), 4);
        let requested = loads(&commands);
        assert_eq!(
            requested.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            vec!["v2-2", "v3-3"]
        );
        assert!(section.card(1).unwrap().state().thumbnail_loaded);
        assert!(!section.card(2).unwrap().state().thumbnail_loaded);
    }

    #[test]
    fn test_short_catalog_partial_row() {
        let mut section = section(4);
        section.apply_viewport(desktop());
        assert_eq!(section.cards().len(), 4);
        assert!(section.plan().has_partial_row());
    }

    #[test]
    fn test_hover_flow_through_section() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        section.mark_in_view();

        load_thumbnail(&mut section, 2);
        let commands = section.pointer_enter(2);
        assert_eq!(
            loads(&commands),
            vec![("v2-2".to_string(), AssetKind::Preview)]
        );

        let key = section.card(2).unwrap().key().clone();
        section.handle_asset_event(AssetEvent::loaded(key.clone(), AssetKind::Preview));
        assert!(section.views()[2].preview_visible);

        assert_eq!(
            section.pointer_leave(2),
            vec![SectionCommand::StopPreview(key)]
        );
        assert!(!section.views()[2].preview_visible);
    }

    #[test]
    fn test_preview_failure_is_absorbed() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        section.mark_in_view();
        load_thumbnail(&mut section, 0);
        section.pointer_enter(0);
        let key = section.card(0).unwrap().key().clone();
        let error = AssetError::failed(AssetKind::Preview, "v0", "boom");
        let commands =
            section.handle_asset_event(AssetEvent::failed(key, AssetKind::Preview, error));
        assert!(commands.is_empty());
        assert!(!section.card(0).unwrap().state().preview_loaded);
        assert!(section.card(0).unwrap().preview_failed());
    }

    #[test]
    fn test_hover_before_in_view_holds_preview() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        load_thumbnail(&mut section, 0);
        assert!(section.pointer_enter(0).is_empty());

        // A preview completion that slips through is not accepted.
        let key = section.card(0).unwrap().key().clone();
        section.handle_asset_event(AssetEvent::loaded(key.clone(), AssetKind::Preview));
        let view = &section.views()[0];
        assert!(!view.preview_mounted);
        assert!(!view.thumbnail_faded);

        let commands = section.mark_in_view();
        assert_eq!(loads(&commands), vec![("v0-0".to_string(), AssetKind::Preview)]);

        assert_eq!(
            section.handle_asset_event(AssetEvent::loaded(key.clone(), AssetKind::Preview)),
            vec![SectionCommand::PlayPreview(key)]
        );
        assert!(section.views()[0].thumbnail_faded);
    }

    #[test]
    fn test_switch_to_touch_stops_playing_preview() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        section.mark_in_view();
        load_thumbnail(&mut section, 0);
        section.pointer_enter(0);
        let key = section.card(0).unwrap().key().clone();
        section.handle_asset_event(AssetEvent::loaded(key.clone(), AssetKind::Preview));

        let commands = section.apply_viewport(ViewportSnapshot::new(1200, true));
        assert_eq!(commands, vec![SectionCommand::StopPreview(key)]);
        assert_eq!(section.mode(), InteractionMode::Touch);
        assert!(!section.views()[0].preview_mounted);
        assert!(!section.card(0).unwrap().state().preview_loaded);
    }

    #[test]
    fn test_switch_to_touch_and_mobile_stops_preview_once() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        section.mark_in_view();
        load_thumbnail(&mut section, 0);
        section.pointer_enter(0);
        let key = section.card(0).unwrap().key().clone();

        let commands = section.apply_viewport(ViewportSnapshot::new(500, false));
        assert_eq!(commands, vec![SectionCommand::StopPreview(key)]);
        assert_eq!(section.cards().len(), 2);
    }

    #[test]
    fn test_tap_on_touch_navigates() {
        let mut section = section(6);
        section.apply_viewport(ViewportSnapshot::new(1200, true));
        assert_eq!(section.mode(), InteractionMode::Touch);
        assert_eq!(
            section.tap(1),
            vec![SectionCommand::Navigate(
                "https://www.youtube.com/watch?v=v1".to_string()
            )]
        );
        assert!(section.pointer_enter(1).is_empty());
    }

    #[test]
    fn test_events_out_of_range_are_ignored() {
        let mut section = section(2);
        section.apply_viewport(desktop());
        assert!(section.pointer_enter(5).is_empty());
        assert!(section.tap(5).is_empty());
    }

    #[test]
    fn test_in_view_latch_is_sticky() {
        let mut section = section(2);
        section.apply_viewport(desktop());
        assert!(!section.in_view());
        section.mark_in_view();
        assert!(section.in_view());
        assert!(section.mark_in_view().is_empty());
        assert!(section.in_view());
    }

    #[test]
    fn test_replace_catalog_replans() {
        let mut section = section(6);
        section.apply_viewport(desktop());
        load_thumbnail(&mut section, 0);

        assert!(section.replace_catalog(catalog(6)).is_empty());

        let reordered: Catalog = ["v0", "x", "y"].into_iter().collect();
        let commands = section.replace_catalog(reordered);
        assert_eq!(section.cards().len(), 3);
        assert_eq!(loads(&commands).len(), 2);
        assert!(section.card(0).unwrap().state().thumbnail_loaded);
    }

    #[test]
    fn test_duplicate_ids_get_distinct_cards() {
        let mut section = PortfolioSection::new(Catalog::builtin().clone(), &LayoutConfig::default());
        section.apply_viewport(desktop());
        let keys: Vec<String> = section.cards().iter().map(|c| c.key().to_string()).collect();
        assert_eq!(keys[2], "2qFnRXpSFn8-2");
        assert_eq!(keys[5], "2qFnRXpSFn8-5");
    }

    #[test]
    fn test_empty_catalog() {
        let mut section = section(0);
        assert!(section.apply_viewport(desktop()).is_empty());
        assert_eq!(section.plan().columns, 3);
        assert!(section.cards().is_empty());
    }
}
