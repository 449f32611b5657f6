//! Processes: owners of threads, counters and objects.

use super::counter::Counter;
use super::object::ObjectRegistry;
use super::thread::Thread;
use super::Bounds;
use std::collections::BTreeMap;

/// One traced process, created on first reference to its pid
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub pid: String,
    pub name: Option<String>,
    pub threads: BTreeMap<String, Thread>,

    /// Counters keyed by `category.name`
    pub counters: BTreeMap<String, Counter>,
    pub objects: ObjectRegistry,
}

impl Process {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            name: None,
            threads: BTreeMap::new(),
            counters: BTreeMap::new(),
            objects: ObjectRegistry::new(),
        }
    }

    /// Lookup key of a counter within its process
    pub fn counter_key(category: &str, name: &str) -> String {
        format!("{}.{}", category, name)
    }

    pub fn get_or_create_thread(&mut self, tid: &str) -> &mut Thread {
        let pid = &self.pid;
        self.threads
            .entry(tid.to_string())
            .or_insert_with(|| Thread::new(pid.clone(), tid))
    }

    pub fn thread(&self, tid: &str) -> Option<&Thread> {
        self.threads.get(tid)
    }

    pub fn get_or_create_counter(&mut self, category: &str, name: &str) -> &mut Counter {
        self.counters
            .entry(Self::counter_key(category, name))
            .or_insert_with(|| Counter::new(category, name))
    }

    pub fn counter(&self, category: &str, name: &str) -> Option<&Counter> {
        self.counters.get(&Self::counter_key(category, name))
    }

    pub fn remove_counter(&mut self, category: &str, name: &str) -> Option<Counter> {
        self.counters.remove(&Self::counter_key(category, name))
    }

    pub fn shift_timestamps(&mut self, amount: f64) {
        for thread in self.threads.values_mut() {
            thread.shift_timestamps(amount);
        }
        for counter in self.counters.values_mut() {
            counter.shift_timestamps(amount);
        }
        self.objects.shift_timestamps(amount);
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut Bounds) {
        for thread in self.threads.values() {
            thread.extend_bounds(bounds);
        }
        for counter in self.counters.values() {
            counter.extend_bounds(bounds);
        }
        self.objects.extend_bounds(bounds);
    }
}
