use {
    crate::{Bound, Path, Prefix, Prefixer, PrimaryKey, Raw},
    erc20_types::{Order, StdResult, Storage},
    std::marker::PhantomData,
};

/// Mimic the behavior of a BTreeSet.
///
/// Internally, this is basically a map from the item to empty bytes.
pub struct Set<'a, T> {
    namespace: &'a [u8],
    item: PhantomData<T>,
}

impl<'a, T> Set<'a, T> {
    pub const fn new(namespace: &'a str) -> Self {
        Self {
            namespace: namespace.as_bytes(),
            item: PhantomData,
        }
    }
}

impl<T> Set<'_, T>
where
    T: PrimaryKey,
{
    fn path(&self, item: T) -> Path<Vec<u8>, Raw> {
        let mut raw_keys = item.raw_keys();
        let last_raw_key = raw_keys.pop();
        Path::new(self.namespace, &raw_keys, last_raw_key)
    }

    fn no_prefix(&self) -> Prefix<T, Vec<u8>, Raw> {
        Prefix::new(self.namespace, &[])
    }

    pub fn prefix(&self, prefix: T::Prefix) -> Prefix<T::Suffix, Vec<u8>, Raw>
    where
        T::Suffix: PrimaryKey,
    {
        Prefix::new(self.namespace, &prefix.raw_prefixes())
    }

    pub fn is_empty(&self, storage: &dyn Storage) -> bool {
        self.no_prefix().is_empty(storage)
    }

    pub fn has(&self, storage: &dyn Storage, item: T) -> bool {
        self.path(item).exists(storage)
    }

    pub fn insert(&self, storage: &mut dyn Storage, item: T) {
        // Membership is the key itself; the value is empty.
        storage.write(self.path(item).as_bytes(), &[])
    }

    pub fn remove(&self, storage: &mut dyn Storage, item: T) {
        self.path(item).remove(storage)
    }

    pub fn range<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<T>>,
        max: Option<Bound<T>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<T::Output>> + 'b> {
        self.no_prefix().keys(storage, min, max, order)
    }

    pub fn clear(&self, storage: &mut dyn Storage, min: Option<Bound<T>>, max: Option<Bound<T>>) {
        self.no_prefix().clear(storage, min, max)
    }
}

// ----------------------------------- tests -----------------------------------
