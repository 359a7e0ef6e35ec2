use glam::Vec3;

use gloam_engine::backend::RenderBackend;
use gloam_engine::coords::{CanvasPoint, CanvasRect, CanvasSize};
use gloam_engine::ids::ObjectId;
use gloam_engine::logging::WarnOnce;
use gloam_engine::params::{ParamScope, ParamSource};
use gloam_engine::persist::Persistence;
use gloam_engine::world::World;

/// Host services the scene borrows for the duration of one call.
pub struct HudServices<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub world: &'a dyn World,
    pub params: &'a mut dyn ParamSource,
    pub store: &'a mut dyn Persistence,
}

impl<'a> HudServices<'a> {
    pub fn new(
        backend: &'a mut dyn RenderBackend,
        world: &'a dyn World,
        params: &'a mut dyn ParamSource,
        store: &'a mut dyn Persistence,
    ) -> Self {
        Self { backend, world, params, store }
    }

    pub(crate) fn ctx<'s>(&'s mut self, host: ObjectId, warnings: &'s mut WarnOnce) -> HudCtx<'s> {
        HudCtx {
            backend: &mut *self.backend,
            world: self.world,
            params: &mut *self.params,
            store: &mut *self.store,
            warnings,
            host,
        }
    }
}

/// What an element's hooks can reach, scoped to the element's host object.
pub struct HudCtx<'a> {
    pub backend: &'a mut dyn RenderBackend,
    pub world: &'a dyn World,
    pub params: &'a mut dyn ParamSource,
    pub store: &'a mut dyn Persistence,
    warnings: &'a mut WarnOnce,
    host: ObjectId,
}

impl<'a> HudCtx<'a> {
    #[inline]
    pub fn host(&self) -> ObjectId {
        self.host
    }

    // ── parameters ────────────────────────────────────────────────────────

    /// Read view of the host's parameters.
    pub fn params(&self) -> ParamScope<'_> {
        ParamScope::new(&*self.params, self.host)
    }

    /// Object parameter, resolving names through the world.
    pub fn param_object(&self, name: &str, default: ObjectId) -> ObjectId {
        let world = self.world;
        self.params().get_object(name, default, |n| world.find_object(n))
    }

    pub fn set_param_bool(&mut self, name: &str, value: bool) {
        self.params.set_bool(self.host, name, value);
    }

    pub fn set_param_int(&mut self, name: &str, value: i32) {
        self.params.set_int(self.host, name, value);
    }

    pub fn set_param_float(&mut self, name: &str, value: f32) {
        self.params.set_float(self.host, name, value);
    }

    pub fn set_param_string(&mut self, name: &str, value: &str) {
        self.params.set_string(self.host, name, value);
    }

    // ── diagnostics ───────────────────────────────────────────────────────

    /// Warns once per host and `key` until [`rearm_warning`](Self::rearm_warning).
    /// Returns whether the warning was logged.
    pub fn warn_once(&mut self, key: &'static str, message: impl FnOnce() -> String) -> bool {
        self.warnings.warn(self.host, key, message)
    }

    pub fn rearm_warning(&mut self, key: &'static str) {
        self.warnings.reset(self.host, key);
    }

    // ── canvas ────────────────────────────────────────────────────────────

    pub fn canvas_size(&self) -> CanvasSize {
        self.backend.canvas_size()
    }

    pub fn text_size(&self, text: &str) -> CanvasSize {
        self.backend.text_size(text)
    }

    /// Canvas position of a world point, or `OFFSCREEN`.
    pub fn location_to_canvas(&self, location: Vec3) -> CanvasPoint {
        self.backend.project_point(location).unwrap_or(CanvasPoint::OFFSCREEN)
    }

    /// Canvas bounds of an object, or a zero-area rect at `OFFSCREEN`.
    pub fn object_to_canvas(&self, object: ObjectId) -> CanvasRect {
        self.world
            .object_bounds(object)
            .and_then(|(min, max)| self.backend.project_bounds(min, max))
            .unwrap_or(CanvasRect::OFFSCREEN)
    }

    /// Canvas position of an object's center, or `OFFSCREEN`.
    pub fn object_centroid_to_canvas(&self, object: ObjectId) -> CanvasPoint {
        self.world
            .object_location(object)
            .map_or(CanvasPoint::OFFSCREEN, |l| self.location_to_canvas(l))
    }
}
