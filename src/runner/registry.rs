//! Shared instance table
//!
//! The registry is the part of a runner that handles and spawners can reach
//! while the runner is in the middle of stepping bodies. It holds identity,
//! name, status and wait state for every instance, plus the bodies of
//! instances started since the last `update()`. Frame stacks themselves stay
//! with the runner so no registry borrow is ever held across `advance()`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::RunnerConfig;
use crate::errors::AdmissionError;
use crate::resumable::Resumable;

use super::types::{CoroutineId, CoroutineInfo, Status};

pub(crate) type SharedRegistry = Rc<RefCell<Registry>>;

/// Scheduling state of one instance
#[derive(Debug)]
pub(crate) struct Entry {
    pub name: String,
    pub status: Status,
    pub wait_ticks: u32,
    pub depth: usize,
}

/// A started instance whose body has not entered the stepping order yet
pub(crate) struct Pending {
    pub id: CoroutineId,
    pub body: Box<dyn Resumable>,
}

pub(crate) struct Registry {
    pub config: RunnerConfig,
    /// Keyed by id, so iteration order is creation order
    pub entries: BTreeMap<CoroutineId, Entry>,
    pub pending: Vec<Pending>,
}

impl Registry {
    pub fn new(config: RunnerConfig) -> Self {
        Registry {
            config,
            entries: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /* ===================== Start ===================== */

    /// Register a new Running instance and queue its body
    pub fn start(
        &mut self,
        name: String,
        body: Box<dyn Resumable>,
        initial_delay: u32,
    ) -> CoroutineId {
        let id = CoroutineId::next();

        self.entries.insert(
            id,
            Entry {
                name,
                status: Status::Running,
                wait_ticks: initial_delay,
                depth: 1,
            },
        );
        self.pending.push(Pending { id, body });

        id
    }

    /// Check the admission policy for a new instance named `name`
    pub fn admit(&self, name: &str) -> Result<(), AdmissionError> {
        if let Some(limit) = self.config.max_coroutines {
            if self.running_count() >= limit {
                return Err(AdmissionError::CapacityExceeded { limit });
            }
        }

        if self.config.reject_duplicate_names
            && self
                .entries
                .values()
                .any(|entry| entry.status == Status::Running && entry.name == name)
        {
            return Err(AdmissionError::DuplicateName(name.to_string()));
        }

        Ok(())
    }

    /* ===================== Stop ===================== */

    /// Stop one instance; false if it is unknown or already terminal
    pub fn stop_id(&mut self, id: CoroutineId) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) if entry.status == Status::Running => {
                entry.status = Status::Stopped;
                true
            }
            _ => false,
        }
    }

    /// Stop every running instance called `name`, returning how many
    pub fn stop_name(&mut self, name: &str) -> usize {
        let mut stopped = 0;
        for entry in self.entries.values_mut() {
            if entry.status == Status::Running && entry.name == name {
                entry.status = Status::Stopped;
                stopped += 1;
            }
        }
        stopped
    }

    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for entry in self.entries.values_mut() {
            if entry.status == Status::Running {
                entry.status = Status::Stopped;
                stopped += 1;
            }
        }
        stopped
    }

    /* ===================== Queries ===================== */

    pub fn status(&self, id: CoroutineId) -> Option<Status> {
        self.entries.get(&id).map(|entry| entry.status)
    }

    pub fn running_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.status == Status::Running)
            .count()
    }

    pub fn ids_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = CoroutineId> + 'a {
        self.entries
            .iter()
            .filter(move |(_, entry)| entry.name == name)
            .map(|(id, _)| *id)
    }

    pub fn info(&self) -> Vec<CoroutineInfo> {
        self.entries
            .iter()
            .map(|(id, entry)| CoroutineInfo {
                id: *id,
                name: entry.name.clone(),
                status: entry.status,
                wait_ticks: entry.wait_ticks,
                depth: entry.depth,
            })
            .collect()
    }
}
