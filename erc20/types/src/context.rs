use crate::{Buffer, Event, GasMeter, Storage};

/// State threaded through keeper methods: the backing store, the events
/// emitted so far, and the gas meter charged for the work done.
pub struct Ctx<S = Box<dyn Storage>> {
    pub storage: S,
    pub events: Vec<Event>,
    pub gas: GasMeter,
}

impl<S> Ctx<S> {
    pub fn new(storage: S, gas: GasMeter) -> Self {
        Self {
            storage,
            events: Vec::new(),
            gas,
        }
    }

    pub fn emit<E>(&mut self, event: E)
    where
        E: Into<Event>,
    {
        self.events.push(event.into());
    }
}

impl Ctx {
    /// Branch off an isolated child context with its own gas meter.
    ///
    /// Writes and events in the child only land in this context when the
    /// child is committed; dropping the child discards them.
    pub fn branch(&self, gas: GasMeter) -> Ctx<Buffer<Box<dyn Storage>>> {
        Ctx {
            storage: Buffer::new(self.storage.clone()),
            events: Vec::new(),
            gas,
        }
    }
}

impl Ctx<Buffer<Box<dyn Storage>>> {
    /// Flush the buffered writes and collected events into the parent.
    pub fn commit(self, parent: &mut Ctx) {
        parent.storage.flush(self.storage.into_batch());
        parent.events.extend(self.events);
    }
}

// ----------------------------------- tests -----------------------------------
