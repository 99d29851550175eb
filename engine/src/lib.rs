#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven simulation engine that owns the world, runs every system in
//! order and forwards side effects to external collaborators.

mod config;
mod flavor;
mod ledger;

use std::{sync::Arc, time::Duration};

use elemental_siege_core::{
    Command, Element, EnemySnapshot, Event, FusionError, GameStateSnapshot, MovementModifier,
    PlacementError, ProjectileArrival, ProjectileSnapshot, TowerId, TowerSnapshot, TowerTarget,
};
use elemental_siege_system_impact::Impact;
use elemental_siege_system_interaction::{self as interaction, Interaction, PlacementPreview};
use elemental_siege_system_movement::Movement;
use elemental_siege_system_status_effects::StatusEffects;
use elemental_siege_system_tower_combat::TowerCombat;
use elemental_siege_system_tower_targeting::TowerTargeting;
use elemental_siege_system_wave_director::WaveDirector;
use elemental_siege_world::{self as world, query, World, WorldConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

pub use config::{ConfigError, EconomyConfig, SimulationConfig};
pub use elemental_siege_system_interaction::PointerEvent;
pub use flavor::{
    CannedFlavor, FlavorDispatcher, FlavorError, FlavorReply, FlavorSource, BOSS_FLAVOR_EMPTY,
    BOSS_FLAVOR_FALLBACK,
};
pub use ledger::{EconomyLedger, EconomyTotals, InMemoryLedger};

const PATH_BLOCKED: &str = "Invalid position: Path blocked!";
const NOT_ENOUGH_GOLD: &str = "Not enough gold!";
const TREASURY_EMPTY: &str = "Treasury empty! Cannot fuse.";

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    /// Towers in identifier order.
    pub towers: Vec<TowerSnapshot>,
    /// Live enemies in identifier order.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles in flight in identifier order.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Economy, wave and interaction state.
    pub state: GameStateSnapshot,
    /// Ghost tower under the cursor while placement is armed.
    pub preview: Option<PlacementPreview>,
    /// Fusion price of the selected tower, absent at max tier or without selection.
    pub selected_fusion_cost: Option<u32>,
    /// Latest player-facing message.
    pub announcement: String,
}

/// Authoritative simulation with `step` and `handle_pointer` as its only mutators.
pub struct Simulation {
    world: World,
    status_effects: StatusEffects,
    movement: Movement,
    targeting: TowerTargeting,
    combat: TowerCombat,
    impact: Impact,
    wave_director: WaveDirector,
    interaction: Interaction,
    flavor: FlavorDispatcher,
    ledger: Box<dyn EconomyLedger>,
    announcement: String,
    events: Vec<Event>,
    commands: Vec<Command>,
    modifiers: Vec<MovementModifier>,
    targets: Vec<TowerTarget>,
    arrivals: Vec<ProjectileArrival>,
}

impl Simulation {
    /// Creates a simulation with offline flavor text and an in-memory ledger
    /// seeded from the configured starting economy.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        let ledger = InMemoryLedger::new(EconomyTotals {
            gold: config.economy.starting_gold,
            diamonds: config.economy.starting_diamonds,
        });
        Self::with_collaborators(config, Arc::new(CannedFlavor), Box::new(ledger))
    }

    /// Creates a simulation wired to the provided collaborators.
    #[must_use]
    pub fn with_collaborators(
        config: SimulationConfig,
        flavor: Arc<dyn FlavorSource>,
        ledger: Box<dyn EconomyLedger>,
    ) -> Self {
        let SimulationConfig {
            path,
            corridor,
            elements,
            economy,
            waves,
            interaction,
        } = config;
        let world = World::with_config(WorldConfig::new(path, corridor, elements, economy.hearts));
        let announcement = query::welcome_banner(&world).to_owned();
        Self {
            world,
            status_effects: StatusEffects::new(),
            movement: Movement::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            impact: Impact::new(),
            wave_director: WaveDirector::new(waves),
            interaction: Interaction::new(interaction),
            flavor: FlavorDispatcher::new(flavor),
            ledger,
            announcement,
            events: Vec::new(),
            commands: Vec::new(),
            modifiers: Vec::new(),
            targets: Vec::new(),
            arrivals: Vec::new(),
        }
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Ledger receiving economy updates.
    #[must_use]
    pub fn ledger(&self) -> &dyn EconomyLedger {
        self.ledger.as_ref()
    }

    /// Latest player-facing message.
    #[must_use]
    pub fn announcement(&self) -> &str {
        &self.announcement
    }

    /// Gold required to fuse `tower` with a twin, `None` at max tier.
    #[must_use]
    pub fn fusion_cost(&self, tower: TowerId) -> Option<u32> {
        query::fusion_cost(&self.world, tower)
    }

    /// Starts a fresh run from the ledger totals and spawns wave one.
    pub fn start_run(&mut self) -> &[Event] {
        self.events.clear();
        let EconomyTotals { gold, diamonds } = self.ledger.totals();
        info!(gold, diamonds, "run started");
        self.commands.push(Command::StartRun { gold, diamonds });
        self.flush();
        self.direct_waves();
        self.publish();
        &self.events
    }

    /// Leaves the current run and returns to the menu.
    pub fn abandon(&mut self) -> &[Event] {
        self.control(Command::AbandonRun)
    }

    /// Pauses a running simulation or resumes a paused one.
    pub fn toggle_pause(&mut self) -> &[Event] {
        let paused = !query::game_state(&self.world).paused;
        self.control(Command::SetPaused { paused })
    }

    /// Advances the time scale through 1×, 2× and 4×.
    pub fn cycle_time_scale(&mut self) -> &[Event] {
        let scale = query::game_state(&self.world).time_scale.cycle();
        self.control(Command::SetTimeScale { scale })
    }

    /// Arms placement of `element`, or disarms it when it is already armed.
    pub fn toggle_placement(&mut self, element: Element) -> &[Event] {
        let armed = query::game_state(&self.world).placing == Some(element);
        let element = if armed { None } else { Some(element) };
        self.control(Command::SetPlacementMode { element })
    }

    /// Updates the device-to-simulation scale used for pointer events.
    pub fn set_display_scale(&mut self, scale: f32) -> bool {
        let accepted = self.interaction.set_display_scale(scale);
        if !accepted {
            debug!(scale, "display scale rejected");
        }
        accepted
    }

    /// Resolves a pointer event against the current world state.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> &[Event] {
        self.events.clear();
        self.interaction.handle(
            event,
            &query::game_state(&self.world),
            &query::tower_view(&self.world),
            &mut self.commands,
        );
        self.flush();
        self.publish();
        &self.events
    }

    /// Runs one frame covering `frame_dt` of wall-clock time.
    ///
    /// Flavor replies are collected even while the run is paused or over.
    pub fn step(&mut self, frame_dt: Duration) -> &[Event] {
        self.events.clear();
        self.collect_flavor();
        if !query::is_running(&self.world) {
            return &self.events;
        }

        self.commands.push(Command::Tick { dt: frame_dt });
        self.flush();
        self.movement.observe(&self.events);

        self.status_effects.handle(
            &self.events,
            &query::enemy_view(&self.world),
            &mut self.commands,
            &mut self.modifiers,
        );
        self.flush();

        self.movement.advance_enemies(
            &query::enemy_view(&self.world),
            &self.modifiers,
            query::path(&self.world),
            &mut self.commands,
        );
        self.flush();

        let enemies = query::enemy_view(&self.world);
        self.targeting
            .handle(&query::tower_view(&self.world), &enemies, &mut self.targets);
        self.combat.handle(
            query::clock(&self.world),
            query::game_state(&self.world).time_scale,
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush();

        let projectiles = query::projectile_view(&self.world);
        self.movement.advance_projectiles(
            &projectiles,
            &enemies,
            &mut self.commands,
            &mut self.arrivals,
        );
        self.impact.handle(
            &self.arrivals,
            &projectiles,
            &enemies,
            query::elements(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.direct_waves();
        self.publish();
        &self.events
    }

    /// Captures the current frame for presentation.
    #[must_use]
    pub fn snapshot(&self) -> Frame {
        let state = query::game_state(&self.world);
        let preview = interaction::preview(&state, query::elements(&self.world), |point| {
            query::is_blocked(&self.world, point)
        });
        let selected_fusion_cost = state
            .selected_tower
            .and_then(|tower| query::fusion_cost(&self.world, tower));
        Frame {
            towers: query::tower_view(&self.world).into_vec(),
            enemies: query::enemy_view(&self.world).into_vec(),
            projectiles: query::projectile_view(&self.world).into_vec(),
            state,
            preview,
            selected_fusion_cost,
            announcement: self.announcement.clone(),
        }
    }

    fn control(&mut self, command: Command) -> &[Event] {
        self.events.clear();
        self.commands.push(command);
        self.flush();
        self.publish();
        &self.events
    }

    fn direct_waves(&mut self) {
        self.wave_director.handle(
            query::wave_phase(&self.world),
            query::is_running(&self.world),
            &query::enemy_view(&self.world),
            query::path(&self.world).entry(),
            &mut self.commands,
        );
        self.flush();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }

    fn collect_flavor(&mut self) {
        for reply in self.flavor.poll() {
            if let Err(error) = &reply.outcome {
                warn!(wave = reply.wave, %error, "boss flavor request failed");
            }
            self.announcement = reply.display_text().to_owned();
        }
    }

    fn publish(&mut self) {
        let events = std::mem::take(&mut self.events);
        for event in &events {
            self.publish_event(event);
        }
        self.events = events;
    }

    fn publish_event(&mut self, event: &Event) {
        match *event {
            Event::EconomyChanged { gold, diamonds } => {
                self.ledger.record(EconomyTotals { gold, diamonds });
            }
            Event::WaveStarted {
                wave,
                enemies,
                boss,
            } => {
                info!(wave, enemies, boss, "wave started");
                if boss {
                    self.announcement = BOSS_FLAVOR_FALLBACK.to_owned();
                    if let Err(error) = self.flavor.request(wave) {
                        warn!(wave, %error, "boss flavor request not sent");
                    }
                }
            }
            Event::WaveCleared { wave, diamonds } => info!(wave, diamonds, "wave cleared"),
            Event::GameOver { wave } => info!(wave, "run lost"),
            Event::RunAbandoned => info!("run abandoned"),
            Event::EnemyEscaped { enemy, hearts } => {
                debug!(enemy = enemy.get(), hearts, "enemy escaped");
            }
            Event::TowerPlacementRejected {
                element, reason, ..
            } => {
                debug!(element = element.name(), %reason, "placement rejected");
                match reason {
                    PlacementError::OnPath => self.announcement = PATH_BLOCKED.to_owned(),
                    PlacementError::InsufficientGold { .. } => {
                        self.announcement = NOT_ENOUGH_GOLD.to_owned();
                    }
                    PlacementError::NotRunning => {}
                }
            }
            Event::TowerFused { element, tier, .. } => {
                let tier = tier.get();
                let name = element.name();
                self.announcement = format!("FUSION SUCCESS: Tier {tier} {name} Tower online.");
            }
            Event::FusionRejected { reason, .. } => {
                debug!(%reason, "fusion rejected");
                if matches!(reason, FusionError::InsufficientGold { .. }) {
                    self.announcement = TREASURY_EMPTY.to_owned();
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("announcement", &self.announcement)
            .finish_non_exhaustive()
    }
}
