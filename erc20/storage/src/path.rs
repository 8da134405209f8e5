use {
    crate::{nested_namespaces_with_key, Codec, RawKey},
    erc20_types::{StdError, StdResult, Storage},
    std::marker::PhantomData,
};

/// The fully resolved storage key of one entry in a [`Map`](crate::Map) or
/// [`Set`](crate::Set): the length-prefixed namespace and prefix segments
/// followed by the terminal key segment.
pub struct Path<T, C> {
    bytes: Vec<u8>,
    phantom: PhantomData<(T, C)>,
}

impl<T, C> Path<T, C>
where
    C: Codec<T>,
{
    pub(crate) fn new(namespace: &[u8], prefixes: &[RawKey], key: Option<RawKey>) -> Self {
        Self {
            bytes: nested_namespaces_with_key(Some(namespace), prefixes, key),
            phantom: PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn exists(&self, storage: &dyn Storage) -> bool {
        storage.read(&self.bytes).is_some()
    }

    pub fn may_load(&self, storage: &dyn Storage) -> StdResult<Option<T>> {
        storage
            .read(&self.bytes)
            .map(|val| C::from_bytes(&val))
            .transpose()
    }

    pub fn load(&self, storage: &dyn Storage) -> StdResult<T> {
        storage
            .read(&self.bytes)
            .ok_or_else(|| StdError::data_not_found::<T>(&self.bytes))
            .and_then(|val| C::from_bytes(&val))
    }

    pub fn save(&self, storage: &mut dyn Storage, data: &T) -> StdResult<()> {
        let bytes = C::to_bytes(data)?;
        storage.write(&self.bytes, &bytes);

        Ok(())
    }

    pub fn remove(&self, storage: &mut dyn Storage) {
        storage.remove(&self.bytes);
    }

    /// Load the value if it exists, apply the action, save the result.
    pub fn may_update<F, E>(&self, storage: &mut dyn Storage, action: F) -> Result<T, E>
    where
        F: FnOnce(Option<T>) -> Result<T, E>,
        E: From<StdError>,
    {
        let data = action(self.may_load(storage)?)?;

        self.save(storage, &data)?;

        Ok(data)
    }
}

// ----------------------------------- tests -----------------------------------
