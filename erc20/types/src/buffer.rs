use {
    crate::{Batch, Op, Order, Record, Storage},
    std::{collections::BTreeMap, iter, ops::Bound},
};

/// An in-memory write overlay on top of a parent store.
///
/// Reads consult the staged batch first and fall through to the parent.
/// Writes and removes only touch the batch; [`Ctx::commit`](crate::Ctx)
/// flushes it into the parent in one go, and dropping the buffer discards it.
/// That one level of staging is all the bridge ever needs: conversions and
/// callbacks branch off the transaction store, never off another branch.
#[derive(Clone)]
pub struct Buffer<S> {
    base: S,
    staged: Batch,
}

impl<S> Buffer<S> {
    pub fn new(base: S) -> Self {
        Self {
            base,
            staged: Batch::new(),
        }
    }

    /// Consume the buffer, returning the staged batch and abandoning the
    /// parent snapshot.
    pub fn into_batch(self) -> Batch {
        self.staged
    }
}

impl<S> Storage for Buffer<S>
where
    S: Storage + Clone,
{
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        match self.staged.get(key) {
            Some(Op::Insert(value)) => Some(value.clone()),
            Some(Op::Delete) => None,
            None => self.base.read(key),
        }
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Box::new(iter::empty());
            }
        }

        // With a single overlay and the short scans the bridge does (genesis
        // exports, cascade deletes), materializing the merged view is simpler
        // than interleaving two sorted cursors.
        let mut merged = self
            .base
            .scan(min, max, Order::Ascending)
            .collect::<BTreeMap<_, _>>();

        let lower = min.map_or(Bound::Unbounded, |bytes| Bound::Included(bytes.to_vec()));
        let upper = max.map_or(Bound::Unbounded, |bytes| Bound::Excluded(bytes.to_vec()));
        for (key, op) in self.staged.range((lower, upper)) {
            match op {
                Op::Insert(value) => {
                    merged.insert(key.clone(), value.clone());
                },
                Op::Delete => {
                    merged.remove(key);
                },
            }
        }

        match order {
            Order::Ascending => Box::new(merged.into_iter()),
            Order::Descending => Box::new(merged.into_iter().rev()),
        }
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.staged
            .insert(key.to_vec(), Op::Insert(value.to_vec()));
    }

    fn remove(&mut self, key: &[u8]) {
        self.staged.insert(key.to_vec(), Op::Delete);
    }

    fn flush(&mut self, batch: Batch) {
        // On key collisions, `extend` keeps the incoming op, which is the
        // later write.
        self.staged.extend(batch);
    }
}

// ----------------------------------- tests -----------------------------------
