//! Headless gloam host: runs a HUD scene and a fog transition against the
//! recording backend in real time, saving and restoring halfway through.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use glam::Vec3;

use gloam_engine::backend::RecordingBackend;
use gloam_engine::config::HostConfig;
use gloam_engine::ids::ObjectId;
use gloam_engine::logging::{LoggingConfig, init_logging};
use gloam_engine::paint::Color;
use gloam_engine::params::{DesignNoteParams, ParamScope};
use gloam_engine::persist::MemoryStore;
use gloam_engine::time::{FrameClock, ManualTimers, WakeUp};
use gloam_engine::world::MemoryWorld;
use gloam_hud::prelude::*;
use gloam_transition::prelude::*;

const PLAYER: ObjectId = ObjectId(1);
const GUARD: ObjectId = ObjectId(2);
const LANTERN: ObjectId = ObjectId(3);
const FOG_ZONE: ObjectId = ObjectId(4);

const FOG: EffectId = EffectId(1);

const FRAMES: u64 = 48;
const FRAME_MS: u64 = 50;
const SAVE_AT_FRAME: u64 = 12;

// ── Fog ───────────────────────────────────────────────────────────────────

/// Fog color and distance for one zone, ramped by `fog_color_*` / `fog_dist_*`.
struct Fog {
    color: Color,
    distance: f32,
    tick_ms: u32,
}

impl TransitionHost for Fog {
    fn prepare(&mut self, on: bool, params: &ParamScope<'_>) -> Option<Vec<ChannelPair>> {
        let (color, distance) = if on { ("fog_color_on", "fog_dist_on") } else { ("fog_color_off", "fog_dist_off") };
        Some(vec![
            ChannelPair::new(self.color, params.get_opt::<Color>(color).map(ChannelValue::from)),
            ChannelPair::new(self.distance, params.get_opt::<f32>(distance).map(ChannelValue::from)),
        ])
    }

    fn step(&mut self, step: &Step) -> bool {
        if let Some(color) = step.color(0) {
            self.color = color;
        }
        if let Some(distance) = step.scalar(1) {
            self.distance = distance;
        }
        log::trace!("fog at {:.2}: {:?} {:.1}", step.progress, self.color, self.distance);
        true
    }

    fn tick_ms(&self) -> u32 {
        self.tick_ms
    }
}

// ── Host ──────────────────────────────────────────────────────────────────

struct Host {
    backend: RecordingBackend,
    world: MemoryWorld,
    params: DesignNoteParams,
    store: MemoryStore,
    timers: ManualTimers,
    scene: HudScene,
    engine: TransitionEngine,
    fog: Fog,
}

impl Host {
    fn new(config: &HostConfig) -> anyhow::Result<Self> {
        let mut world = MemoryWorld::new();
        world.set_name(PLAYER, "Player");
        world.set_location(PLAYER, Vec3::ZERO);
        world.set_name(GUARD, "Guard");
        world.set_location(GUARD, Vec3::new(4.0, 0.0, -10.0));
        world.set_quest_var("health", 100);
        world.set_string("hud", "health", "Health");

        let mut params = DesignNoteParams::new();
        params
            .set_design_note(
                PLAYER,
                "stat_meter_position=south;stat_source_qvar=health;stat_range_max=100;stat_meter_text=health",
            )
            .context("player design note")?;
        params.set_design_note(GUARD, "marker_text=@name;marker_color=yellow").context("guard design note")?;
        params.set_design_note(LANTERN, "tool_sight_image=reticule").context("lantern design note")?;
        params
            .set_design_note(
                FOG_ZONE,
                "transition=1.2s;curve=sqrt;fog_color_on=#406080;fog_dist_on=12;fog_color_off=black;fog_dist_off=200",
            )
            .context("fog zone design note")?;

        Ok(Self {
            backend: RecordingBackend::new(config.canvas_size()),
            world,
            params,
            store: MemoryStore::new(),
            timers: ManualTimers::new(),
            scene: HudScene::new(),
            engine: TransitionEngine::new(),
            fog: Fog { color: Color::BLACK, distance: 200.0, tick_ms: config.transition_tick_ms },
        })
    }

    fn populate(&mut self, config: &HostConfig) {
        let mut services = HudServices::new(&mut self.backend, &self.world, &mut self.params, &mut self.store);
        self.scene.add(StatMeter::new(PLAYER).with_margin(config.hud_margin), &mut services);
        self.scene.add(ObjectMarker::new(GUARD), &mut services);
        let sight = self.scene.add(ToolSight::new(LANTERN), &mut services);
        self.scene.add(Subtitle::new(GUARD, "Who goes there?", Color::YELLOW), &mut services);
        self.scene.send_message(sight, "InvSelect", &mut services);
    }

    fn trigger_fog(&mut self, on: bool) {
        let mut ctx = TransitionCtx::new(&mut self.timers, &self.params);
        if !self.engine.trigger(FOG, FOG_ZONE, on, &mut self.fog, &mut ctx) {
            log::warn!("fog zone has nothing to transition");
        }
    }

    fn deliver(&mut self, wakes: Vec<WakeUp>) {
        for wake in wakes {
            if TransitionEngine::target(&wake) != Some(FOG) {
                log::debug!("unrouted wake-up {:?}", wake.name);
                continue;
            }
            let mut ctx = TransitionCtx::new(&mut self.timers, &self.params);
            self.engine.on_timer(&wake, &mut self.fog, &mut ctx);
        }
    }

    /// One simulated frame of `dt_ms`.
    fn frame(&mut self, index: u64, dt_ms: u64) {
        let wakes = self.timers.advance(dt_ms);
        self.deliver(wakes);

        // The guard walks right to left across the view and gets hurt.
        let x = 4.0 - 8.0 * (index as f32 / FRAMES as f32);
        self.world.set_location(GUARD, Vec3::new(x, 0.0, -10.0));
        self.world.set_quest_var("health", 100 - (index as i32) * 2);

        self.backend.begin_frame();
        let mut services = HudServices::new(&mut self.backend, &self.world, &mut self.params, &mut self.store);
        self.scene.post_sim(&mut services);
        self.scene.frame(&mut services);
    }

    /// Saves everything, then rebuilds the transition arena and timers as a
    /// freshly loaded process would.
    fn save_and_restore(&mut self) -> anyhow::Result<()> {
        self.engine.save(&mut self.store).context("saving transitions")?;
        let snapshot = self.store.save_ron().context("encoding save game")?;
        log::info!("saved game ({} bytes)", snapshot.len());

        self.store = MemoryStore::load_ron(&snapshot).context("decoding save game")?;
        self.timers = ManualTimers::new();
        self.engine = TransitionEngine::restore(&self.store).context("restoring transitions")?;

        let mut ctx = TransitionCtx::new(&mut self.timers, &self.params);
        if self.engine.after_restore(FOG, &mut self.fog, &mut ctx) {
            log::info!("fog transition resumed at {:.2}", self.engine.progress(FOG));
        }
        Ok(())
    }

    fn shutdown(&mut self) {
        let mut services = HudServices::new(&mut self.backend, &self.world, &mut self.params, &mut self.store);
        self.scene.clear(&mut services);
        self.engine.cancel(FOG, &mut self.timers);
    }
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("gloam.ron"));
    let config = HostConfig::load(&path);
    init_logging(config.log_filter.clone().map(LoggingConfig::with_filter).unwrap_or_default());
    log::info!("canvas {}x{}, tick {}ms", config.canvas_width, config.canvas_height, config.transition_tick_ms);

    let mut host = Host::new(&config)?;
    host.populate(&config);
    host.trigger_fog(true);

    let mut clock = FrameClock::new();
    for index in 0..FRAMES {
        std::thread::sleep(Duration::from_millis(FRAME_MS));
        let time = clock.tick();
        host.frame(index, u64::from(time.dt_ms));

        if index == SAVE_AT_FRAME {
            host.save_and_restore()?;
            clock.reset();
        }
        if index == FRAMES / 2 {
            host.trigger_fog(false);
        }
        log::debug!(
            "frame {}: {} blits, fog {:.2}",
            time.frame_index,
            host.backend.blits().len(),
            host.engine.progress(FOG)
        );
    }

    log::info!(
        "{} frames, {} elements, {} overlays live; fog {:?} at {:.1} ({})",
        FRAMES,
        host.scene.len(),
        host.backend.live_overlays(),
        host.fog.color,
        host.fog.distance,
        if host.engine.is_running(FOG) { "ramping" } else { "settled" }
    );
    host.shutdown();
    if host.timers.pending_count() > 0 {
        log::warn!("{} wake-ups still pending at exit", host.timers.pending_count());
    }
    Ok(())
}
