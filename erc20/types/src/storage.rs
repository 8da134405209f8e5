use {dyn_clone::DynClone, std::collections::BTreeMap};

/// A key-value pair.
pub type Record = (Vec<u8>, Vec<u8>);

/// A batch of writes and removes, to be applied to a storage atomically.
pub type Batch<K = Vec<u8>, V = Vec<u8>> = BTreeMap<K, Op<V>>;

/// A single write or remove operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op<V = Vec<u8>> {
    Insert(V),
    Delete,
}

/// Iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

/// Describing a KV store that supports read, write, and iteration.
pub trait Storage: DynClone + Send + Sync {
    /// Read a single key-value pair from the storage.
    ///
    /// Return `None` if the key doesn't exist.
    fn read(&self, key: &[u8]) -> Option<Vec<u8>>;

    /// Iterate over data in the KV store under the given bounds and order.
    ///
    /// Minimum bound is inclusive, maximum bound is exclusive.
    /// If `min` > `max`, an empty iterator is to be returned.
    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a>;

    /// Similar to `scan`, but only return the keys.
    fn scan_keys<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'a> {
        Box::new(self.scan(min, max, order).map(|(k, _)| k))
    }

    /// Similar to `scan`, but only return the values.
    fn scan_values<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'a> {
        Box::new(self.scan(min, max, order).map(|(_, v)| v))
    }

    /// Write a single key-value pair to the storage.
    fn write(&mut self, key: &[u8], value: &[u8]);

    /// Delete a single key-value pair from the storage.
    ///
    /// No-op if the key doesn't exist.
    fn remove(&mut self, key: &[u8]);

    /// Delete all key-value pairs whose keys are in the given range.
    ///
    /// Similar to `scan`, `min` is inclusive, while `max` is exclusive.
    /// No-op if `min` > `max`.
    fn remove_range(&mut self, min: Option<&[u8]>, max: Option<&[u8]>) {
        let keys = self
            .scan_keys(min, max, Order::Ascending)
            .collect::<Vec<_>>();
        for key in keys {
            self.remove(&key);
        }
    }

    /// Perform a batch of writes and removes altogether, ideally atomically.
    fn flush(&mut self, batch: Batch) {
        for (key, op) in batch {
            match op {
                Op::Insert(value) => self.write(&key, &value),
                Op::Delete => self.remove(&key),
            }
        }
    }
}

dyn_clone::clone_trait_object!(Storage);

// A boxed storage is also a storage. This allows keeper methods that take a
// `&mut dyn Storage` to operate on an owned, type-erased store.
impl Storage for Box<dyn Storage> {
    fn read(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.as_ref().read(key)
    }

    fn scan<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'a> {
        self.as_ref().scan(min, max, order)
    }

    fn scan_keys<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'a> {
        self.as_ref().scan_keys(min, max, order)
    }

    fn scan_values<'a>(
        &'a self,
        min: Option<&[u8]>,
        max: Option<&[u8]>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'a> {
        self.as_ref().scan_values(min, max, order)
    }

    fn write(&mut self, key: &[u8], value: &[u8]) {
        self.as_mut().write(key, value)
    }

    fn remove(&mut self, key: &[u8]) {
        self.as_mut().remove(key)
    }

    fn remove_range(&mut self, min: Option<&[u8]>, max: Option<&[u8]>) {
        self.as_mut().remove_range(min, max)
    }

    fn flush(&mut self, batch: Batch) {
        self.as_mut().flush(batch)
    }
}
