use crate::notes::NoteId;

/// Pending voice teardowns, one cancellable deadline per note.
///
/// Deadlines are engine frames, so teardown advances with the same clock
/// that renders audio and tests never wait on wall time. Scheduling a note
/// that already has a deadline replaces it; a retrigger cancels it.
pub struct TeardownScheduler {
    deadlines: [Option<u64>; NoteId::COUNT],
}

impl TeardownScheduler {
    pub fn new() -> Self {
        Self {
            deadlines: [None; NoteId::COUNT],
        }
    }

    pub fn schedule(&mut self, note: NoteId, at_frame: u64) {
        self.deadlines[note.index()] = Some(at_frame);
    }

    /// Drop the pending teardown for `note`. Returns true if one existed.
    pub fn cancel(&mut self, note: NoteId) -> bool {
        self.deadlines[note.index()].take().is_some()
    }

    pub fn deadline(&self, note: NoteId) -> Option<u64> {
        self.deadlines[note.index()]
    }

    /// Earliest pending deadline, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.deadlines.iter().flatten().copied().min()
    }

    /// Remove every deadline at or before `now`, calling `fire` for each.
    pub fn drain_due(&mut self, now: u64, mut fire: impl FnMut(NoteId)) {
        for (slot, note) in self.deadlines.iter_mut().zip(NoteId::ALL) {
            if slot.is_some_and(|at| at <= now) {
                *slot = None;
                fire(note);
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.deadlines.iter().filter(|d| d.is_some()).count()
    }
}

impl Default for TeardownScheduler {
    fn default() -> Self {
        Self::new()
    }
}
