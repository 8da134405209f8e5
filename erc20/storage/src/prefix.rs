use {
    crate::{
        concat, extend_one_byte, increment_last_byte, nested_namespaces_with_key, trim, Codec,
        PrimaryKey, RawKey,
    },
    erc20_types::{Order, Record, StdResult, Storage},
    std::marker::PhantomData,
};

/// An iteration bound over a key type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound<K> {
    Inclusive(K),
    Exclusive(K),
}

/// A map or set under a fixed key prefix, ready for iteration over the
/// remaining key segments.
pub struct Prefix<K, T, C> {
    prefix: Vec<u8>,
    suffix: PhantomData<K>,
    data: PhantomData<T>,
    codec: PhantomData<C>,
}

impl<K, T, C> Prefix<K, T, C>
where
    K: PrimaryKey,
    C: Codec<T>,
{
    pub fn new(namespace: &[u8], prefixes: &[RawKey]) -> Self {
        Self {
            prefix: nested_namespaces_with_key(Some(namespace), prefixes, None),
            suffix: PhantomData,
            data: PhantomData,
            codec: PhantomData,
        }
    }

    fn bounds(&self, min: Option<Bound<K>>, max: Option<Bound<K>>) -> (Vec<u8>, Vec<u8>) {
        let min = match min {
            None => self.prefix.clone(),
            Some(Bound::Inclusive(k)) => concat(&self.prefix, &k.joined_key()),
            Some(Bound::Exclusive(k)) => extend_one_byte(concat(&self.prefix, &k.joined_key())),
        };
        let max = match max {
            None => increment_last_byte(self.prefix.clone()),
            Some(Bound::Inclusive(k)) => extend_one_byte(concat(&self.prefix, &k.joined_key())),
            Some(Bound::Exclusive(k)) => concat(&self.prefix, &k.joined_key()),
        };
        (min, max)
    }

    pub fn is_empty(&self, storage: &dyn Storage) -> bool {
        self.keys_raw(storage, None, None, Order::Ascending)
            .next()
            .is_none()
    }

    pub fn range_raw<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Record> + 'b> {
        let (min, max) = self.bounds(min, max);
        let prefix = self.prefix.clone();

        Box::new(
            storage
                .scan(Some(&min), Some(&max), order)
                .map(move |(k, v)| (trim(&prefix, &k), v)),
        )
    }

    pub fn range<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<(K::Output, T)>> + 'b> {
        Box::new(self.range_raw(storage, min, max, order).map(|(k, v)| {
            let key = K::from_slice(&k)?;
            let data = C::from_bytes(&v)?;
            Ok((key, data))
        }))
    }

    pub fn keys_raw<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = Vec<u8>> + 'b> {
        let (min, max) = self.bounds(min, max);
        let prefix = self.prefix.clone();

        Box::new(
            storage
                .scan_keys(Some(&min), Some(&max), order)
                .map(move |k| trim(&prefix, &k)),
        )
    }

    pub fn keys<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<K::Output>> + 'b> {
        Box::new(
            self.keys_raw(storage, min, max, order)
                .map(|k| K::from_slice(&k)),
        )
    }

    pub fn values<'b>(
        &self,
        storage: &'b dyn Storage,
        min: Option<Bound<K>>,
        max: Option<Bound<K>>,
        order: Order,
    ) -> Box<dyn Iterator<Item = StdResult<T>> + 'b> {
        let (min, max) = self.bounds(min, max);

        Box::new(
            storage
                .scan_values(Some(&min), Some(&max), order)
                .map(|v| C::from_bytes(&v)),
        )
    }

    pub fn clear(&self, storage: &mut dyn Storage, min: Option<Bound<K>>, max: Option<Bound<K>>) {
        let (min, max) = self.bounds(min, max);
        storage.remove_range(Some(&min), Some(&max))
    }
}
