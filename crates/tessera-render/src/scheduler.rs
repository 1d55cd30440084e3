// Copyright 2025 the Tessera contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Coalescing and debouncing of object update requests.

use crate::debounce::Debouncer;
use crate::package::ObjectUpdate;
use crate::registry::ObjectId;
use crate::server::PreviewServer;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tessera_core::gpu::{IdleDispatcher, RedrawHost};

/// Debounce delays for the scheduler's two timers.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Quiescent period before a burst of update requests is applied.
    pub update_delay: Duration,
    /// Quiescent period before an applied batch triggers a view refresh.
    pub redraw_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            update_delay: Duration::from_millis(20),
            redraw_delay: Duration::from_millis(50),
        }
    }
}

/// What should happen to one object when the pending batch flushes.
#[derive(Debug, Clone)]
enum PendingUpdate {
    Refresh(ObjectUpdate),
    Delete,
}

/// Coalesces bursts of per-object update requests into a single deferred
/// registry mutation plus a single deferred redraw.
///
/// Requests for the same object replace each other in the pending map, so
/// only the latest state per object is ever applied. The batch runs on the
/// host's idle callback after the update delay has passed without newer
/// requests; a successful flush then arms the redraw timer, so any flurry
/// of updates ends in exactly one view refresh.
pub struct UpdateScheduler {
    server: Arc<PreviewServer>,
    idle: Arc<dyn IdleDispatcher>,
    redraw: Arc<dyn RedrawHost>,
    pending: Arc<Mutex<HashMap<ObjectId, PendingUpdate>>>,
    update_timer: Debouncer,
    redraw_timer: Arc<Debouncer>,
    config: SchedulerConfig,
}

impl std::fmt::Debug for UpdateScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateScheduler")
            .field("server", &self.server)
            .field("pending", &self.pending.lock().unwrap().len())
            .field("config", &self.config)
            .finish()
    }
}

impl UpdateScheduler {
    /// Creates a scheduler feeding `server` from the host's idle context.
    pub fn new(
        server: Arc<PreviewServer>,
        idle: Arc<dyn IdleDispatcher>,
        redraw: Arc<dyn RedrawHost>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            server,
            idle,
            redraw,
            pending: Arc::new(Mutex::new(HashMap::new())),
            update_timer: Debouncer::new("updates"),
            redraw_timer: Arc::new(Debouncer::new("redraw")),
            config,
        }
    }

    /// Queues an update for `id`, replacing any earlier pending request.
    ///
    /// A flags-only update merged over a queued geometry update keeps the
    /// queued geometry, so a selection change never discards a rebuild that
    /// has not flushed yet.
    pub fn schedule_update(&self, id: ObjectId, update: ObjectUpdate) {
        {
            let mut pending = self.pending.lock().unwrap();
            let merged = match (pending.remove(&id), update.geometry.is_some()) {
                (Some(PendingUpdate::Refresh(queued)), false) => ObjectUpdate {
                    geometry: queued.geometry,
                    ..update
                },
                _ => update,
            };
            pending.insert(id, PendingUpdate::Refresh(merged));
        }
        self.arm_flush();
    }

    /// Queues the removal of `id`, replacing any pending update for it.
    pub fn schedule_delete(&self, id: ObjectId) {
        self.pending
            .lock()
            .unwrap()
            .insert(id, PendingUpdate::Delete);
        self.arm_flush();
    }

    /// Requests a debounced view refresh without touching any object.
    pub fn request_redraw(&self) {
        let redraw = Arc::clone(&self.redraw);
        self.redraw_timer
            .call(self.config.redraw_delay, move || {
                redraw.refresh_active_view()
            });
    }

    /// Drops all pending requests and disarms both timers.
    ///
    /// A batch already running on the idle context is not interrupted.
    pub fn cancel(&self) {
        self.update_timer.cancel();
        self.redraw_timer.cancel();
        self.pending.lock().unwrap().clear();
    }

    fn arm_flush(&self) {
        let server = Arc::clone(&self.server);
        let idle = Arc::clone(&self.idle);
        let redraw = Arc::clone(&self.redraw);
        let pending = Arc::clone(&self.pending);
        let redraw_timer = Arc::clone(&self.redraw_timer);
        let redraw_delay = self.config.redraw_delay;

        self.update_timer.call(self.config.update_delay, move || {
            idle.run_on_idle(Box::new(move || {
                let batch: Vec<_> = pending.lock().unwrap().drain().collect();
                if batch.is_empty() {
                    return;
                }
                let started = Instant::now();
                let count = batch.len();
                for (id, request) in batch {
                    match request {
                        PendingUpdate::Delete => {
                            server.remove_object(id);
                        }
                        PendingUpdate::Refresh(update) => {
                            // a malformed package spoils only its own
                            // object; the rest of the batch still applies
                            if let Err(err) = server.update_object(id, &update) {
                                log::error!("update failed for object {id}: {err}");
                            }
                        }
                    }
                }
                log::debug!(
                    "applied {count} coalesced object update(s) in {:?}",
                    started.elapsed()
                );
                redraw_timer.call(redraw_delay, move || redraw.refresh_active_view());
            }));
        });
    }
}
