use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Actuator and sensor groups a command needs exclusive use of while it
/// is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resource {
    Drivetrain,
    Intake,
    Transfer,
    Indexer,
    Shooter,
    Vision,
}

/// A periodic behavior owned by the [`Scheduler`]. `tick` runs at a
/// fixed cadence between `start` and either completion or interruption;
/// nothing in it may block.
pub trait Command {
    fn start(&mut self);
    fn tick(&mut self, dt: Duration);
    fn is_done(&self) -> bool;
    /// Must leave every claimed actuator commanded to stop, whether the
    /// command finished on its own (`interrupted == false`) or was cut off.
    fn stop(&mut self, interrupted: bool);
    fn requirements(&self) -> &[Resource];
    fn name(&self) -> &'static str;
}

pub type TaskId = usize;

/// Arena of running commands plus an index of which command holds which
/// resource. Scheduling a command interrupts any older command holding
/// one of its claims; the newer claim always wins.
#[derive(Default)]
pub struct Scheduler {
    slots: Vec<Option<Box<dyn Command>>>,
    owners: HashMap<Resource, TaskId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, mut command: Box<dyn Command>) -> TaskId {
        let mut conflicts: Vec<TaskId> = command
            .requirements()
            .iter()
            .filter_map(|resource| self.owners.get(resource).copied())
            .collect();
        conflicts.sort_unstable();
        conflicts.dedup();

        for id in conflicts {
            self.cancel(id);
        }

        let id = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };

        for resource in command.requirements() {
            self.owners.insert(*resource, id);
        }

        info!(command = command.name(), id, "scheduled");
        command.start();
        self.slots[id] = Some(command);

        id
    }

    /// Runs one tick for every active command and retires the finished
    /// ones with `stop(false)`.
    pub fn run(&mut self, dt: Duration) {
        for id in 0..self.slots.len() {
            let done = match &mut self.slots[id] {
                Some(command) => {
                    command.tick(dt);
                    command.is_done()
                }
                None => false,
            };

            if done {
                if let Some(mut command) = self.slots[id].take() {
                    command.stop(false);
                    self.release(id);
                    info!(command = command.name(), id, "finished");
                }
            }
        }
    }

    /// Interrupts a command with `stop(true)` and releases its claims.
    pub fn cancel(&mut self, id: TaskId) {
        let Some(slot) = self.slots.get_mut(id) else {
            return;
        };

        if let Some(mut command) = slot.take() {
            command.stop(true);
            self.release(id);
            info!(command = command.name(), id, "interrupted");
        }
    }

    pub fn cancel_all(&mut self) {
        for id in 0..self.slots.len() {
            self.cancel(id);
        }
    }

    pub fn is_active(&self, id: TaskId) -> bool {
        self.slots.get(id).is_some_and(Option::is_some)
    }

    fn release(&mut self, id: TaskId) {
        self.owners.retain(|_, owner| *owner != id);
    }
}
