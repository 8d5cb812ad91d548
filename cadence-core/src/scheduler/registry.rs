//! Task registry
//!
//! Fixed-capacity arena of task records. Slots are reused after removal,
//! while a separate index keeps creation order so sweeps always visit
//! tasks in the order they were registered.

use heapless::Vec;

use crate::event::EventBus;
use crate::task::{Pid, TaskRecord};

/// Maximum number of tasks that can be registered
///
/// Slot indices are stored as `u8`, so this must stay below 256.
pub const MAX_TASKS: usize = 32;

/// Arena of task records keyed by PID
#[derive(Debug)]
pub(crate) struct Registry<C, B: EventBus> {
    slots: Vec<Option<TaskRecord<C, B>>, MAX_TASKS>,
    /// Occupied slot indices in creation order
    order: Vec<u8, MAX_TASKS>,
    pub(super) next_pid: u32,
}

impl<C, B: EventBus> Registry<C, B> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            order: Vec::new(),
            next_pid: 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn is_full(&self) -> bool {
        self.order.len() >= MAX_TASKS
    }

    /// Next unused PID; wraps and never yields zero
    pub(crate) fn allocate_pid(&mut self) -> Pid {
        loop {
            let raw = self.next_pid;
            self.next_pid = self.next_pid.wrapping_add(1);
            if let Some(pid) = Pid::new(raw) {
                if self.slot_of(pid).is_none() {
                    return pid;
                }
            }
        }
    }

    /// Store a record, handing it back if every slot is taken
    pub(crate) fn insert(&mut self, record: TaskRecord<C, B>) -> Result<(), TaskRecord<C, B>> {
        if self.is_full() {
            return Err(record);
        }

        let index = match self.slots.iter().position(Option::is_none) {
            Some(free) => free,
            None => {
                if self.slots.push(None).is_err() {
                    return Err(record);
                }
                self.slots.len() - 1
            }
        };
        self.slots[index] = Some(record);

        // same capacity as `slots`, cannot fail after the is_full() check
        let _ = self.order.push(index as u8);
        Ok(())
    }

    fn slot_of(&self, pid: Pid) -> Option<usize> {
        self.order.iter().map(|&i| usize::from(i)).find(|&i| {
            self.slots[i]
                .as_ref()
                .map_or(false, |record| record.pid == pid)
        })
    }

    pub(crate) fn get(&self, pid: Pid) -> Option<&TaskRecord<C, B>> {
        let index = self.slot_of(pid)?;
        self.slots[index].as_ref()
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> Option<&mut TaskRecord<C, B>> {
        let index = self.slot_of(pid)?;
        self.slots[index].as_mut()
    }

    /// Take a record out of the arena, freeing its slot for reuse
    pub(crate) fn remove(&mut self, pid: Pid) -> Option<TaskRecord<C, B>> {
        let index = self.slot_of(pid)?;
        self.order.retain(|&i| usize::from(i) != index);
        self.slots[index].take()
    }

    /// Records in creation order
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TaskRecord<C, B>> + '_ {
        self.order
            .iter()
            .filter_map(move |&i| self.slots[usize::from(i)].as_ref())
    }

    /// Visit every record mutably, in creation order
    pub(crate) fn for_each_mut(&mut self, mut f: impl FnMut(&mut TaskRecord<C, B>)) {
        for &i in self.order.iter() {
            if let Some(record) = self.slots[usize::from(i)].as_mut() {
                f(record);
            }
        }
    }
}
