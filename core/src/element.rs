//! Element and tier tables that parameterize towers and their projectiles.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{StatusEffect, StatusKind};

/// Highest tier a tower can reach through fusion.
pub const MAX_TIER: u8 = 5;

const DAMAGE_GROWTH_PER_TIER: f32 = 1.8;
const RANGE_GROWTH_PER_TIER: f32 = 20.0;
const INTERVAL_DECAY_PER_TIER: f64 = 0.9;

const BURN_DURATION: Duration = Duration::from_millis(2_000);
const BURN_MAGNITUDE: f32 = 0.5;
const SLOW_DURATION: Duration = Duration::from_millis(3_000);
const SLOW_MAGNITUDE: f32 = 0.4;
const STUN_DURATION: Duration = Duration::from_millis(500);

/// Damage types shared by towers and the projectiles they launch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Ignites targets with a burn effect.
    Fire,
    /// Drenches targets with a slow effect.
    Water,
    /// Staggers targets with a stun effect.
    Earth,
    /// Rapid projectiles that splash nearby enemies.
    Air,
}

impl Element {
    /// Every element in presentation order.
    pub const ALL: [Element; 4] = [Self::Fire, Self::Water, Self::Earth, Self::Air];

    /// Upper-case name used in player-facing announcements.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fire => "FIRE",
            Self::Water => "WATER",
            Self::Earth => "EARTH",
            Self::Air => "AIR",
        }
    }

    /// Status effect a projectile of this element leaves on every enemy it damages.
    ///
    /// Burn and slow replace an existing effect of the same kind. Stun is
    /// appended so overlapping stuns never evict one another early.
    #[must_use]
    pub const fn on_hit(self) -> Option<OnHit> {
        match self {
            Self::Fire => Some(OnHit::Replace(StatusEffect::new(
                StatusKind::Burn,
                BURN_DURATION,
                Some(BURN_MAGNITUDE),
            ))),
            Self::Water => Some(OnHit::Replace(StatusEffect::new(
                StatusKind::Slow,
                SLOW_DURATION,
                Some(SLOW_MAGNITUDE),
            ))),
            Self::Earth => Some(OnHit::Append(StatusEffect::new(
                StatusKind::Stun,
                STUN_DURATION,
                None,
            ))),
            Self::Air => None,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy used when an on-hit effect lands on an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OnHit {
    /// Drop any effect of the same kind, then add the new one.
    Replace(StatusEffect),
    /// Add the new effect alongside existing ones.
    Append(StatusEffect),
}

impl OnHit {
    /// Applies the effect to an enemy's active effect list.
    pub fn apply_to(self, effects: &mut Vec<StatusEffect>) {
        match self {
            Self::Replace(effect) => {
                effects.retain(|existing| existing.kind() != effect.kind());
                effects.push(effect);
            }
            Self::Append(effect) => effects.push(effect),
        }
    }
}

/// Error raised when a tier value falls outside `1..=MAX_TIER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("tier {0} is outside 1..={MAX_TIER}")]
pub struct TierError(u8);

/// Upgrade level of a tower, raised only through fusion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Tier assigned to freshly placed towers.
    pub const BASE: Tier = Tier(1);
    /// Highest reachable tier.
    pub const MAX: Tier = Tier(MAX_TIER);

    /// Creates a tier, rejecting values outside `1..=MAX_TIER`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_TIER {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Numeric tier value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Reports whether the tier can no longer be raised.
    #[must_use]
    pub const fn is_max(self) -> bool {
        self.0 >= MAX_TIER
    }

    /// Tier produced by fusing two towers of this tier.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        Self::new(self.0 + 1)
    }

    fn steps_above_base(self) -> i32 {
        i32::from(self.0) - 1
    }
}

impl TryFrom<u8> for Tier {
    type Error = TierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(TierError(value))
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.0
    }
}

/// Error raised when a color string is not of the form `#rrggbb`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("color `{0}` is not a #rrggbb hex string")]
pub struct ColorError(String);

/// Cosmetic color carried by towers and projectiles for presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
}

impl Color {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let digits = value
            .strip_prefix('#')
            .filter(|digits| digits.len() == 6 && digits.is_ascii())
            .ok_or_else(|| ColorError(value.clone()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError(value.clone()))
        };
        Ok(Self::from_rgb(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
        ))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
    }
}

/// Base parameters of one element, before tier scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementStats {
    /// Presentation color for towers and projectiles.
    pub color: Color,
    /// Gold required to place a tier-1 tower.
    pub cost: u32,
    /// Damage dealt per projectile at tier 1.
    pub base_damage: f32,
    /// Targeting radius at tier 1.
    pub base_range: f32,
    /// Milliseconds between shots at tier 1.
    pub base_fire_interval_ms: u32,
    /// Projectile travel per reference tick.
    pub projectile_speed: f32,
    /// Radius of area damage on impact; single-target when absent.
    #[serde(default)]
    pub splash_radius: Option<f32>,
}

impl ElementStats {
    /// Cooldown between shots at tier 1.
    #[must_use]
    pub fn base_fire_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.base_fire_interval_ms))
    }
}

/// Combat stats of a tower, derived purely from its element and tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Targeting radius.
    pub range: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Cooldown between shots at 1× time scale.
    pub fire_interval: Duration,
    /// Projectile travel per reference tick.
    pub projectile_speed: f32,
}

impl TowerStats {
    /// Scales base element stats to the provided tier.
    ///
    /// Each tier step multiplies damage by 1.8, adds 20 to the range and
    /// multiplies the fire interval by 0.9, always relative to tier 1.
    #[must_use]
    pub fn derive(stats: &ElementStats, tier: Tier) -> Self {
        let steps = tier.steps_above_base();
        let interval_ms =
            f64::from(stats.base_fire_interval_ms) * INTERVAL_DECAY_PER_TIER.powi(steps);
        Self {
            range: stats.base_range + RANGE_GROWTH_PER_TIER * steps as f32,
            damage: stats.base_damage * DAMAGE_GROWTH_PER_TIER.powi(steps),
            fire_interval: Duration::from_secs_f64(interval_ms / 1_000.0),
            projectile_speed: stats.projectile_speed,
        }
    }
}

/// Exhaustive mapping from element to its base stats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementTable {
    /// Fire element parameters.
    pub fire: ElementStats,
    /// Water element parameters.
    pub water: ElementStats,
    /// Earth element parameters.
    pub earth: ElementStats,
    /// Air element parameters.
    pub air: ElementStats,
}

impl ElementTable {
    /// Base parameters for the provided element.
    #[must_use]
    pub const fn stats(&self, element: Element) -> &ElementStats {
        match element {
            Element::Fire => &self.fire,
            Element::Water => &self.water,
            Element::Earth => &self.earth,
            Element::Air => &self.air,
        }
    }

    /// Combat stats of a tower of the given element and tier.
    #[must_use]
    pub fn tower_stats(&self, element: Element, tier: Tier) -> TowerStats {
        TowerStats::derive(self.stats(element), tier)
    }

    /// Gold required to fuse two towers of the given element and tier.
    ///
    /// Returns `None` for towers already at [`MAX_TIER`]. The cost is
    /// `floor(0.8 * base_cost * tier)`.
    #[must_use]
    pub fn fusion_cost(&self, element: Element, tier: Tier) -> Option<u32> {
        if tier.is_max() {
            return None;
        }
        let scaled = u64::from(self.stats(element).cost) * u64::from(tier.get()) * 4 / 5;
        Some(u32::try_from(scaled).unwrap_or(u32::MAX))
    }
}

impl Default for ElementTable {
    fn default() -> Self {
        Self {
            fire: ElementStats {
                color: Color::from_rgb(0xef, 0x44, 0x44),
                cost: 50,
                base_damage: 25.0,
                base_range: 120.0,
                base_fire_interval_ms: 1_000,
                projectile_speed: 5.0,
                splash_radius: None,
            },
            water: ElementStats {
                color: Color::from_rgb(0x3b, 0x82, 0xf6),
                cost: 40,
                base_damage: 10.0,
                base_range: 100.0,
                base_fire_interval_ms: 800,
                projectile_speed: 6.0,
                splash_radius: None,
            },
            earth: ElementStats {
                color: Color::from_rgb(0x84, 0xcc, 0x16),
                cost: 60,
                base_damage: 40.0,
                base_range: 80.0,
                base_fire_interval_ms: 1_500,
                projectile_speed: 4.0,
                splash_radius: None,
            },
            air: ElementStats {
                color: Color::from_rgb(0x06, 0xb6, 0xd4),
                cost: 45,
                base_damage: 15.0,
                base_range: 180.0,
                base_fire_interval_ms: 500,
                projectile_speed: 8.0,
                splash_radius: Some(60.0),
            },
        }
    }
}
