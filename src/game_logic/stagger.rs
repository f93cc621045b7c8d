use crate::resources::StaggerSettings;

/// Accumulates recent damage and decides when a hit is heavy enough to
/// interrupt the actor. Times are on the owning actor's clock.
#[derive(Debug, Clone, PartialEq)]
pub struct StaggerGate {
    tenacity: f32,
    accumulated: f32,
    last_damage_at: Option<f32>,
    last_stagger_at: Option<f32>,
    window: f32,
    cooldown: f32,
}

impl StaggerGate {
    pub fn new(tenacity: f32, settings: StaggerSettings) -> Self {
        Self {
            tenacity: clamp_tenacity(tenacity),
            accumulated: 0.0,
            last_damage_at: None,
            last_stagger_at: None,
            window: settings.damage_window,
            cooldown: settings.cooldown,
        }
    }

    pub fn tenacity(&self) -> f32 {
        self.tenacity
    }

    pub fn accumulated(&self) -> f32 {
        self.accumulated
    }

    /// Record a hit. A gap longer than the window since the previous hit
    /// discards what had built up.
    pub fn accumulate(&mut self, amount: f32, now: f32) {
        if let Some(last) = self.last_damage_at {
            if now - last > self.window {
                self.accumulated = 0.0;
            }
        }
        self.accumulated += amount.max(0.0);
        self.last_damage_at = Some(now);
    }

    /// Fire when the accumulated damage reaches the threshold and the cooldown
    /// has elapsed. A zero tenacity staggers on any recorded damage.
    pub fn try_trigger(&mut self, max_health: f32, now: f32) -> bool {
        let threshold_met = if self.tenacity <= 0.0 {
            self.accumulated > 0.0
        } else {
            self.accumulated >= max_health * self.tenacity
        };

        let cooled_down = self
            .last_stagger_at
            .is_none_or(|last| now - last >= self.cooldown);

        if threshold_met && cooled_down {
            self.accumulated = 0.0;
            self.last_stagger_at = Some(now);
            true
        } else {
            false
        }
    }

    pub fn on_damage(&mut self, amount: f32, max_health: f32, now: f32) -> bool {
        self.accumulate(amount, now);
        self.try_trigger(max_health, now)
    }

    /// Forget all history, keeping tenacity and timing constants
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
        self.last_damage_at = None;
        self.last_stagger_at = None;
    }
}

fn clamp_tenacity(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
