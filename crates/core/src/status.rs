// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task sequencer and status block mutators.
//!
//! The task sequence is a plan: built once per transition request, then
//! drained one tick at a time. The pointer only moves forward and stops on
//! the last task. Every mutator advances the operator timestamp in the same
//! call that changes the field; savepoint mutators also advance the
//! savepoint timestamp.

use crate::clock::Clock;
use crate::crd::{FlinkCluster, FlinkClusterStatus};
use crate::digest::Digests;
use crate::savepoint::SavepointRequest;
use crate::task::{ClusterStatus, ClusterTask, TaskStatus};

impl FlinkCluster {
    /// Status block, created empty on first access.
    pub fn status_mut(&mut self) -> &mut FlinkClusterStatus {
        self.status.get_or_insert_with(FlinkClusterStatus::default)
    }
}

impl FlinkClusterStatus {
    // ── Task sequence ───────────────────────────────────────────────────

    /// True iff the sequence is non-empty.
    pub fn has_current_task(&self) -> bool {
        !self.task_sequence.is_empty()
    }

    /// Task under the pointer, or [`ClusterTask::ClusterHalted`] when empty.
    pub fn current_task(&self) -> ClusterTask {
        self.task_at(self.clamped_index())
    }

    /// Task after the current one, or the current one at the last index.
    pub fn next_task(&self) -> ClusterTask {
        if self.is_last_task() {
            self.current_task()
        } else {
            self.task_at(self.clamped_index() + 1)
        }
    }

    /// True when the pointer cannot move any further.
    pub fn is_last_task(&self) -> bool {
        self.clamped_index() + 1 >= self.task_sequence.len()
    }

    pub fn task_sequence(&self) -> &[ClusterTask] {
        &self.task_sequence
    }

    pub fn task_index(&self) -> usize {
        self.task_index
    }

    /// Concatenate tasks to the sequence, keeping the pointer.
    pub fn append_tasks(&mut self, tasks: &[ClusterTask], clock: &impl Clock) {
        self.task_sequence.extend_from_slice(tasks);
        self.touch(clock);
    }

    /// Replace the sequence and point at its first task.
    pub fn reset_tasks(&mut self, tasks: &[ClusterTask], clock: &impl Clock) {
        self.task_sequence = tasks.to_vec();
        self.task_index = 0;
        self.touch(clock);
    }

    /// Move to the next task unless already on the last one.
    ///
    /// The timestamp advances either way.
    pub fn select_next_task(&mut self, clock: &impl Clock) {
        if !self.is_last_task() {
            self.task_index = self.clamped_index() + 1;
        }
        self.touch(clock);
    }

    // ── Task and cluster status ─────────────────────────────────────────

    pub fn task_status(&self) -> TaskStatus {
        self.task_status
    }

    pub fn set_task_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.task_status = status;
        self.touch(clock);
    }

    pub fn cluster_status(&self) -> ClusterStatus {
        self.cluster_status
    }

    pub fn set_cluster_status(&mut self, status: ClusterStatus, clock: &impl Clock) {
        self.cluster_status = status;
        self.touch(clock);
    }

    pub fn task_attempts(&self) -> u32 {
        self.task_attempts
    }

    pub fn set_task_attempts(&mut self, attempts: u32, clock: &impl Clock) {
        self.task_attempts = attempts;
        self.touch(clock);
    }

    // ── Digests ─────────────────────────────────────────────────────────

    pub fn digests(&self) -> &Digests {
        &self.digests
    }

    pub fn set_digests(&mut self, digests: Digests, clock: &impl Clock) {
        self.digests = digests;
        self.touch(clock);
    }

    pub fn set_job_manager_digest(&mut self, digest: impl Into<String>, clock: &impl Clock) {
        self.digests.job_manager = digest.into();
        self.touch(clock);
    }

    pub fn set_task_manager_digest(&mut self, digest: impl Into<String>, clock: &impl Clock) {
        self.digests.task_manager = digest.into();
        self.touch(clock);
    }

    pub fn set_runtime_digest(&mut self, digest: impl Into<String>, clock: &impl Clock) {
        self.digests.runtime = digest.into();
        self.touch(clock);
    }

    pub fn set_bootstrap_digest(&mut self, digest: impl Into<String>, clock: &impl Clock) {
        self.digests.bootstrap = digest.into();
        self.touch(clock);
    }

    // ── Savepoints ──────────────────────────────────────────────────────

    pub fn savepoint_path(&self) -> Option<&str> {
        self.savepoint_path.as_deref()
    }

    pub fn set_savepoint_path(&mut self, path: Option<String>, clock: &impl Clock) {
        self.savepoint_path = path;
        self.touch_savepoint(clock);
    }

    pub fn savepoint_request(&self) -> Option<&SavepointRequest> {
        self.savepoint_request.as_ref()
    }

    pub fn set_savepoint_request(&mut self, request: Option<SavepointRequest>, clock: &impl Clock) {
        self.savepoint_request = request;
        self.touch_savepoint(clock);
    }

    /// Start a new savepoint epoch, dropping any in-flight request so no
    /// later workflow polls a trigger that belongs to an earlier one.
    pub fn update_savepoint_timestamp(&mut self, clock: &impl Clock) {
        self.savepoint_request = None;
        self.touch_savepoint(clock);
    }

    pub fn savepoint_timestamp(&self) -> u64 {
        self.savepoint_timestamp
    }

    pub fn operator_timestamp(&self) -> u64 {
        self.operator_timestamp
    }

    // ── Manual actions and scale ────────────────────────────────────────

    /// Timestamp of the last manual action already turned into a plan.
    pub fn action_timestamp(&self) -> u64 {
        self.action_timestamp
    }

    pub fn set_action_timestamp(&mut self, timestamp: u64, clock: &impl Clock) {
        self.action_timestamp = timestamp;
        self.touch(clock);
    }

    pub fn task_managers(&self) -> i32 {
        self.task_managers
    }

    pub fn task_slots(&self) -> i32 {
        self.task_slots
    }

    /// Record the scale the job was last started with.
    pub fn set_scale(&mut self, task_managers: i32, task_slots: i32, clock: &impl Clock) {
        self.task_managers = task_managers;
        self.task_slots = task_slots;
        self.touch(clock);
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn clamped_index(&self) -> usize {
        self.task_index.min(self.task_sequence.len().saturating_sub(1))
    }

    fn task_at(&self, index: usize) -> ClusterTask {
        self.task_sequence.get(index).copied().unwrap_or_default()
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.operator_timestamp = clock.tick_after(self.operator_timestamp);
    }

    fn touch_savepoint(&mut self, clock: &impl Clock) {
        self.savepoint_timestamp = clock.tick_after(self.savepoint_timestamp);
        self.touch(clock);
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
