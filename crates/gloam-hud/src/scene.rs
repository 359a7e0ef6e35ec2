use gloam_engine::ids::ObjectId;
use gloam_engine::logging::WarnOnce;

use crate::ctx::HudServices;
use crate::element::{self, HudElement};

/// Identity of an element inside a [`HudScene`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

struct Entry {
    id: ElementId,
    element: Box<dyn HudElement>,
}

// ── HudScene ──────────────────────────────────────────────────────────────

/// The composition root: every live HUD element, in paint order.
///
/// Elements added later draw on top. Each frame runs `prepare` and stage 1
/// for every element, then stage 2 for every element.
///
/// ```rust,ignore
/// let mut scene = HudScene::new();
/// let meter = scene.add(StatMeter::new(player), &mut services);
///
/// // Every frame:
/// scene.frame(&mut services);
///
/// // When the owning script shuts down:
/// let element = scene.remove(meter, &mut services);
/// ```
#[derive(Default)]
pub struct HudScene {
    entries: Vec<Entry>,
    next_id: u32,
    warnings: WarnOnce,
}

impl HudScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Element ids in paint order.
    pub fn ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    pub fn get(&self, id: ElementId) -> Option<&dyn HudElement> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.element.as_ref())
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut (dyn HudElement + 'static)> {
        self.entries.iter_mut().find(|e| e.id == id).map(|e| e.element.as_mut())
    }

    // ── registry ──────────────────────────────────────────────────────────

    /// Registers and initializes `element`.
    pub fn add<E: HudElement>(&mut self, element: E, services: &mut HudServices<'_>) -> ElementId {
        self.add_boxed(Box::new(element), services)
    }

    pub fn add_boxed(&mut self, mut element: Box<dyn HudElement>, services: &mut HudServices<'_>) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;

        let host = element.core().host();
        element.initialize(&mut services.ctx(host, &mut self.warnings));
        element.core_mut().mark_initialized();
        log::debug!("hud: added element {id:?} for {host}");

        self.entries.push(Entry { id, element });
        id
    }

    /// Deinitializes the element, frees its overlay and hands it back.
    pub fn remove(&mut self, id: ElementId, services: &mut HudServices<'_>) -> Option<Box<dyn HudElement>> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        let mut element = self.entries.remove(index).element;
        Self::release(element.as_mut(), services, &mut self.warnings);
        log::debug!("hud: removed element {id:?}");
        Some(element)
    }

    /// Removes every element.
    pub fn clear(&mut self, services: &mut HudServices<'_>) {
        for mut entry in self.entries.drain(..) {
            Self::release(entry.element.as_mut(), services, &mut self.warnings);
        }
    }

    fn release(element: &mut dyn HudElement, services: &mut HudServices<'_>, warnings: &mut WarnOnce) {
        let host = element.core().host();
        element.deinitialize(&mut services.ctx(host, warnings));
        element.core_mut().deinitialize(&mut *services.backend);
        warnings.reset_owner(host);
    }

    // ── per frame ─────────────────────────────────────────────────────────

    /// Prepares and renders every element, then composites them in order.
    pub fn frame(&mut self, services: &mut HudServices<'_>) {
        for entry in &mut self.entries {
            let element = entry.element.as_mut();
            let host = element.core().host();
            let draw = element.prepare(&mut services.ctx(host, &mut self.warnings));
            element.core_mut().set_drawn(draw);
            element::render_surface(element, &mut *services.backend);
        }
        for entry in &self.entries {
            element::composite(entry.element.as_ref(), &mut *services.backend);
        }
    }

    // ── notifications ─────────────────────────────────────────────────────

    /// Notifies elements on `object` that subscribed to `property`.
    pub fn property_changed(&mut self, object: ObjectId, property: &str, services: &mut HudServices<'_>) {
        for entry in &mut self.entries {
            let element = entry.element.as_mut();
            let core = element.core();
            if core.host() == object && core.is_subscribed(property) {
                element.on_property_changed(property, &mut services.ctx(object, &mut self.warnings));
            }
        }
    }

    /// Delivers `message` to one element. Returns whether it was handled.
    pub fn send_message(&mut self, id: ElementId, message: &str, services: &mut HudServices<'_>) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        let host = entry.element.core().host();
        entry.element.on_message(message, &mut services.ctx(host, &mut self.warnings))
    }

    /// Delivers `message` to every element on `host`. Returns how many handled it.
    pub fn message_host(&mut self, host: ObjectId, message: &str, services: &mut HudServices<'_>) -> usize {
        let mut handled = 0;
        for entry in &mut self.entries {
            if entry.element.core().host() == host
                && entry.element.on_message(message, &mut services.ctx(host, &mut self.warnings))
            {
                handled += 1;
            }
        }
        handled
    }

    /// Delivers `message` to every element. Returns how many handled it.
    pub fn broadcast(&mut self, message: &str, services: &mut HudServices<'_>) -> usize {
        let mut handled = 0;
        for entry in &mut self.entries {
            let host = entry.element.core().host();
            if entry.element.on_message(message, &mut services.ctx(host, &mut self.warnings)) {
                handled += 1;
            }
        }
        handled
    }

    /// Runs every element's post-simulation hook.
    pub fn post_sim(&mut self, services: &mut HudServices<'_>) {
        for entry in &mut self.entries {
            let host = entry.element.core().host();
            entry.element.on_post_sim(&mut services.ctx(host, &mut self.warnings));
        }
    }
}
