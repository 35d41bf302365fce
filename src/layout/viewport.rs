use serde::Serialize;

/// Discrete responsive-layout bucket derived from viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportTier {
    Mobile,
    Tablet,
    Desktop,
}

impl ViewportTier {
    /// Grid columns used at this tier.
    pub fn columns(self) -> usize {
        match self {
            Self::Mobile => 1,
            Self::Tablet => 2,
            Self::Desktop => 3,
        }
    }
}

/// How the user is expected to interact with cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum InteractionMode {
    Touch,
    HoverCapable,
}

/// Current viewport state reported by the viewport observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSnapshot {
    pub width: u32,
    pub has_touch: bool,
}

impl ViewportSnapshot {
    pub fn new(width: u32, has_touch: bool) -> Self {
        Self { width, has_touch }
    }
}

/// Inclusive lower bounds of the tablet and desktop tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    pub tablet: u32,
    pub desktop: u32,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            tablet: 768,
            desktop: 1024,
        }
    }
}

impl Breakpoints {
    pub fn tier_for(&self, width: u32) -> ViewportTier {
        if width < self.tablet {
            ViewportTier::Mobile
        } else if width < self.desktop {
            ViewportTier::Tablet
        } else {
            ViewportTier::Desktop
        }
    }

    /// Classify a viewport into a tier and interaction mode.
    ///
    /// Touch-capable devices always get touch interaction, as does any
    /// mobile-width viewport.
    pub fn classify(&self, width: u32, has_touch: bool) -> (ViewportTier, InteractionMode) {
        let tier = self.tier_for(width);
        let mode = if has_touch || tier == ViewportTier::Mobile {
            InteractionMode::Touch
        } else {
            InteractionMode::HoverCapable
        };
        (tier, mode)
    }

    pub fn classify_snapshot(&self, snapshot: ViewportSnapshot) -> (ViewportTier, InteractionMode) {
        self.classify(snapshot.width, snapshot.has_touch)
    }
}
