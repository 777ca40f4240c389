//! # Coroutine Runner
//!
//! A cooperative, single-threaded container for coroutine instances, driven
//! by an external tick. The host calls [`Runner::update`] once per frame and
//! every live instance is advanced by at most one step.
//!
//! ## Core Principles
//!
//! 1. **Tick driven**: no timers, no threads. One `update()` is one tick
//! 2. **Stack per instance**: nested yields push frames, completion pops them
//! 3. **Deterministic order**: instances are visited in creation order
//! 4. **Fault isolation**: a misbehaving body stops itself, never the runner
//!
//! ## Lifecycle
//!
//! ```text
//! start() ──► Running ──► Completed   (stack emptied)
//!                 └─────► Stopped     (stop request or fault)
//! ```
//!
//! Terminal instances stay in the table until the end of the next
//! `update()` pass, then they are reaped and their handles report no
//! status at all.

pub mod exec_loop;
pub mod handle;
pub(crate) mod registry;
pub mod types;

#[cfg(test)]
mod tests;

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

use crate::config::RunnerConfig;
use crate::errors::{AdmissionError, CoroutineFault};
use crate::resumable::Resumable;

use exec_loop::{Fault, Limits, Step};
use registry::{Registry, SharedRegistry};

pub use handle::{Handle, Spawner};
pub use types::{CoroutineId, CoroutineInfo, FrameStack, Status};

/* ===================== Runner ===================== */

/// Owner of every coroutine instance
pub struct Runner {
    registry: SharedRegistry,

    /// Frame stacks of instances that have entered the stepping order
    stacks: BTreeMap<CoroutineId, FrameStack>,

    /// Faults recorded since the last `drain_faults()`, oldest first and
    /// bounded by `max_recorded_faults`
    faults: VecDeque<CoroutineFault>,

    /// Completed `update()` calls
    tick: u64,
}

impl Runner {
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    pub fn with_config(config: RunnerConfig) -> Self {
        Runner {
            registry: Rc::new(RefCell::new(Registry::new(config))),
            stacks: BTreeMap::new(),
            faults: VecDeque::new(),
            tick: 0,
        }
    }

    /// Weak start/stop access for use inside coroutine bodies
    pub fn spawner(&self) -> Spawner {
        Spawner::new(Rc::downgrade(&self.registry))
    }

    /* ===================== Start / Stop ===================== */

    /// Start a coroutine; it is first stepped by the next `update()`
    pub fn start<R>(&mut self, name: impl Into<String>, body: R, initial_delay: u32) -> Handle
    where
        R: Resumable + 'static,
    {
        self.spawner().start(name, body, initial_delay)
    }

    /// Start a coroutine subject to the configured admission policy
    pub fn try_start<R>(
        &mut self,
        name: impl Into<String>,
        body: R,
        initial_delay: u32,
    ) -> Result<Handle, AdmissionError>
    where
        R: Resumable + 'static,
    {
        self.spawner().try_start(name, body, initial_delay)
    }

    /// Stop every running coroutine called `name`, returning how many
    pub fn stop(&mut self, name: &str) -> usize {
        let stopped = self.registry.borrow_mut().stop_name(name);
        tracing::debug!(name = %name, stopped, "Stop by name");
        stopped
    }

    /// Stop the coroutine behind `handle`; false if it was not running
    ///
    /// Handles issued by another runner never match, even when their id
    /// collides with one of ours.
    pub fn stop_handle(&mut self, handle: &Handle) -> bool {
        if !self.owns(handle) {
            return false;
        }
        self.registry.borrow_mut().stop_id(handle.id())
    }

    pub fn stop_all(&mut self) -> usize {
        let stopped = self.registry.borrow_mut().stop_all();
        tracing::debug!(stopped, "Stop all");
        stopped
    }

    /* ===================== Tick ===================== */

    /// Advance every running coroutine by one tick
    ///
    /// 1. Queued starts enter the stepping order
    /// 2. Each instance, in creation order, is skipped (terminal), has its
    ///    wait counter decremented, or is stepped once
    /// 3. Instances found terminal during the pass are reaped
    pub fn update(&mut self) {
        self.tick += 1;
        self.activate_pending();

        let limits = {
            let registry = self.registry.borrow();
            Limits {
                catch_panics: registry.config.catch_panics,
                max_frame_depth: registry.config.max_frame_depth,
            }
        };

        let ids: Vec<CoroutineId> = self.stacks.keys().copied().collect();
        let mut reap = Vec::new();

        for id in ids {
            // Decide whether this instance steps, without holding the
            // borrow across advance()
            let should_step = {
                let mut registry = self.registry.borrow_mut();
                let should_step = match registry.entries.get_mut(&id) {
                    None => {
                        reap.push(id);
                        false
                    }
                    Some(entry) if entry.status.is_terminal() => {
                        reap.push(id);
                        false
                    }
                    Some(entry) if entry.wait_ticks > 0 => {
                        entry.wait_ticks -= 1;
                        false
                    }
                    Some(_) => true,
                };
                should_step
            };

            if !should_step {
                continue;
            }

            let Some(stack) = self.stacks.get_mut(&id) else {
                continue;
            };
            let step = exec_loop::step(stack, limits);
            let depth = stack.depth();

            self.apply_step(id, step, depth);
        }

        self.reap(reap);
    }

    /// Move bodies started since the last tick into the stepping order
    fn activate_pending(&mut self) {
        let pending = std::mem::take(&mut self.registry.borrow_mut().pending);
        for entry in pending {
            self.stacks.insert(entry.id, FrameStack::new(entry.body));
        }
    }

    /// Record the result of stepping `id` in its scheduling state
    fn apply_step(&mut self, id: CoroutineId, step: Step, depth: usize) {
        let mut registry = self.registry.borrow_mut();
        let Some(entry) = registry.entries.get_mut(&id) else {
            return;
        };

        entry.depth = depth;

        // The body stopped itself (or was stopped by a sibling) mid-step
        if entry.status.is_terminal() {
            return;
        }

        match step {
            Step::Wait(ticks) => {
                entry.wait_ticks = ticks;
                tracing::trace!(coroutine_id = %id, ticks, "Coroutine suspended");
            }
            Step::Delegated => {
                tracing::trace!(coroutine_id = %id, depth, "Coroutine delegated to child");
            }
            Step::Returned => {
                tracing::trace!(coroutine_id = %id, depth, "Child frame completed");
            }
            Step::Done => {
                entry.status = Status::Completed;
                tracing::debug!(coroutine_id = %id, name = %entry.name, "Coroutine completed");
            }
            Step::Fault(fault) => {
                entry.status = Status::Stopped;
                let fault = match fault {
                    Fault::InvalidYield(kind) => CoroutineFault::InvalidYield {
                        id,
                        name: entry.name.clone(),
                        kind,
                    },
                    Fault::Panicked(message) => CoroutineFault::Panicked {
                        id,
                        name: entry.name.clone(),
                        message,
                    },
                    Fault::DepthExceeded(limit) => CoroutineFault::DepthExceeded {
                        id,
                        name: entry.name.clone(),
                        limit,
                    },
                };
                tracing::error!(
                    coroutine_id = %id,
                    name = %entry.name,
                    code = fault.code(),
                    "{}",
                    fault
                );
                let capacity = registry.config.max_recorded_faults;
                drop(registry);
                self.record_fault(fault, capacity);
            }
        }
    }

    /// Keep at most `capacity` faults, dropping the oldest first
    fn record_fault(&mut self, fault: CoroutineFault, capacity: usize) {
        if capacity == 0 {
            return;
        }
        while self.faults.len() >= capacity {
            if let Some(dropped) = self.faults.pop_front() {
                tracing::trace!(coroutine_id = %dropped.id(), "Fault record dropped");
            }
        }
        self.faults.push_back(fault);
    }

    /// Drop terminal instances; frames are dropped outside any registry borrow
    fn reap(&mut self, ids: Vec<CoroutineId>) {
        if ids.is_empty() {
            return;
        }

        let mut dropped = Vec::with_capacity(ids.len());
        {
            let mut registry = self.registry.borrow_mut();
            for id in &ids {
                registry.entries.remove(id);
            }
        }
        for id in ids {
            if let Some(stack) = self.stacks.remove(&id) {
                dropped.push(stack);
            }
            tracing::trace!(coroutine_id = %id, "Coroutine reaped");
        }
        drop(dropped);
    }

    /* ===================== Queries ===================== */

    pub fn is_running(&self, handle: &Handle) -> bool {
        self.owns(handle) && self.registry.borrow().status(handle.id()) == Some(Status::Running)
    }

    fn owns(&self, handle: &Handle) -> bool {
        handle.belongs_to(&Rc::downgrade(&self.registry))
    }

    /// Handles for every instance in the table called `name`
    pub fn find(&self, name: &str) -> Vec<Handle> {
        let registry = self.registry.borrow();
        registry
            .ids_named(name)
            .map(|id| Handle::new(id, name, Rc::downgrade(&self.registry)))
            .collect()
    }

    /// Instances in the table, terminal-but-unreaped ones included
    pub fn len(&self) -> usize {
        self.registry.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn running_count(&self) -> usize {
        self.registry.borrow().running_count()
    }

    /// Number of `update()` calls so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// State of every instance, in creation order
    pub fn snapshot(&self) -> Vec<CoroutineInfo> {
        self.registry.borrow().info()
    }

    pub fn config(&self) -> RunnerConfig {
        self.registry.borrow().config.clone()
    }

    /// Take the faults recorded since the last call, oldest first
    ///
    /// Only the most recent `max_recorded_faults` are kept between drains;
    /// every fault is still logged when it happens.
    pub fn drain_faults(&mut self) -> Vec<CoroutineFault> {
        self.faults.drain(..).collect()
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("tick", &self.tick)
            .field("instances", &self.len())
            .field("faults", &self.faults.len())
            .finish()
    }
}
