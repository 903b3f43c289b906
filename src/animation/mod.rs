pub(crate) mod effect;

use std::time::Instant;

pub(crate) use effect::{Effect, Progress};

use crate::tui::geometry::GridGeometry;
use crate::tui::surface::Surface;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct EffectId(u64);

impl std::fmt::Display for EffectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fx#{}", self.0)
    }
}

struct Scheduled {
    id: EffectId,
    started: Instant,
    effect: Effect,
    progress: Progress,
}

/// Animations owns every effect from the moment it is scheduled until the batch it belongs to
/// has played out.
///
/// Effects are advanced and drawn in the order they were scheduled so later effects paint over
/// earlier ones. A completed effect stops advancing but keeps painting its final frame until no
/// effect is running any more, at which point the whole batch is dropped.
#[derive(Default)]
pub(crate) struct Animations {
    next_id: u64,
    scheduled: Vec<Scheduled>,
}

impl Animations {
    /// Takes ownership of `effect`; its delay is measured from `now`.
    pub(crate) fn push(&mut self, now: Instant, effect: Effect) -> EffectId {
        let id = EffectId(self.next_id);
        self.next_id += 1;
        log::trace!("scheduling {0}: {1}", id, effect);
        self.scheduled.push(Scheduled {
            id,
            started: now,
            effect,
            progress: Progress::Waiting,
        });
        id
    }

    pub(crate) fn schedule<I>(&mut self, now: Instant, effects: I)
    where
        I: IntoIterator<Item = Effect>,
    {
        for effect in effects {
            self.push(now, effect);
        }
    }

    /// Whether any effect is still waiting or running.
    pub(crate) fn active(&self) -> bool {
        self.scheduled
            .iter()
            .any(|s| s.progress != Progress::Complete)
    }

    /// Number of effects that have not completed yet.
    pub(crate) fn len(&self) -> usize {
        self.scheduled
            .iter()
            .filter(|s| s.progress != Progress::Complete)
            .count()
    }

    /// Advances every effect to `now` and draws the resulting frame. Returns whether any effect is
    /// still active afterwards.
    pub(crate) fn advance<S: Surface>(
        &mut self,
        now: Instant,
        geometry: &GridGeometry,
        surface: &mut S,
    ) -> bool {
        for s in self.scheduled.iter_mut() {
            if s.progress != Progress::Complete {
                s.progress = s.effect.update(now.saturating_duration_since(s.started));
                if s.progress == Progress::Complete {
                    log::trace!("{0} complete", s.id);
                }
            }
            s.effect.draw(geometry, surface);
        }

        if self.active() {
            return true;
        }
        if !self.scheduled.is_empty() {
            log::trace!("batch of {} effects settled", self.scheduled.len());
            self.scheduled.clear();
        }
        false
    }

    /// Drops every effect immediately, finished or not.
    pub(crate) fn cancel(&mut self) {
        if !self.scheduled.is_empty() {
            log::debug!("cancelling {} effects", self.scheduled.len());
        }
        self.scheduled.clear();
    }
}
