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

//! Single-slot debounce timers.

use std::fmt;
use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

type Action = Box<dyn FnOnce() + Send + 'static>;

struct Pending {
    deadline: Instant,
    action: Action,
}

#[derive(Default)]
struct State {
    pending: Option<Pending>,
    shutdown: bool,
}

#[derive(Default)]
struct Shared {
    state: Mutex<State>,
    signal: Condvar,
}

/// A single-flight delayed action.
///
/// Holds at most one pending action. Arming the timer replaces and cancels
/// whatever was pending, so a burst of calls fires exactly once, after the
/// delay of the last call has elapsed without a newer one. The action runs
/// on the timer's own worker thread; callers that need a specific execution
/// context hop onto it inside the action.
pub struct Debouncer {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates a debouncer with a named worker thread.
    pub fn new(name: &str) -> Self {
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = std::thread::Builder::new()
            .name(format!("tessera-debounce-{name}"))
            .spawn(move || Self::run(worker_shared))
            .expect("failed to spawn debounce worker thread");
        Self {
            shared,
            worker: Some(worker),
        }
    }

    /// Arms the timer: `action` fires after `delay`, unless a newer call or
    /// [`cancel`](Self::cancel) replaces it first.
    ///
    /// A zero `delay` still runs the action on the worker thread, not the
    /// calling thread.
    pub fn call(&self, delay: Duration, action: impl FnOnce() + Send + 'static) {
        let mut state = self.shared.state.lock().unwrap();
        state.pending = Some(Pending {
            deadline: Instant::now() + delay,
            action: Box::new(action),
        });
        drop(state);
        self.shared.signal.notify_one();
    }

    /// Drops the pending action, if any.
    ///
    /// Does not interrupt an action that has already started running.
    pub fn cancel(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.pending = None;
    }

    fn run(shared: Arc<Shared>) {
        let mut state = shared.state.lock().unwrap();
        loop {
            if state.shutdown {
                return;
            }
            let Some(deadline) = state.pending.as_ref().map(|p| p.deadline) else {
                state = shared.signal.wait(state).unwrap();
                continue;
            };
            let now = Instant::now();
            if now < deadline {
                let (guard, _) = shared
                    .signal
                    .wait_timeout(state, deadline - now)
                    .unwrap();
                state = guard;
                continue;
            }
            if let Some(pending) = state.pending.take() {
                // run without the lock so the action may re-arm the timer
                drop(state);
                (pending.action)();
                state = shared.state.lock().unwrap();
            }
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.shutdown = true;
            state.pending = None;
        }
        self.shared.signal.notify_one();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let armed = self
            .shared
            .state
            .lock()
            .map(|state| state.pending.is_some())
            .unwrap_or(false);
        f.debug_struct("Debouncer").field("armed", &armed).finish()
    }
}
