use {
    crate::{Codec, Serde},
    erc20_types::{StdError, StdResult, Storage},
    std::marker::PhantomData,
};

/// A single typed value under a fixed storage key, e.g. the bridge params.
pub struct Item<T, C = Serde> {
    storage_key: &'static [u8],
    phantom: PhantomData<(T, C)>,
}

impl<T, C> Item<T, C>
where
    C: Codec<T>,
{
    pub const fn new(storage_key: &'static str) -> Self {
        Self {
            storage_key: storage_key.as_bytes(),
            phantom: PhantomData,
        }
    }

    pub fn exists(&self, storage: &dyn Storage) -> bool {
        storage.read(self.storage_key).is_some()
    }

    pub fn may_load(&self, storage: &dyn Storage) -> StdResult<Option<T>> {
        storage
            .read(self.storage_key)
            .map(|val| C::from_bytes(&val))
            .transpose()
    }

    pub fn load(&self, storage: &dyn Storage) -> StdResult<T> {
        storage
            .read(self.storage_key)
            .ok_or_else(|| StdError::data_not_found::<T>(self.storage_key))
            .and_then(|val| C::from_bytes(&val))
    }

    pub fn save(&self, storage: &mut dyn Storage, data: &T) -> StdResult<()> {
        let bytes = C::to_bytes(data)?;
        storage.write(self.storage_key, &bytes);

        Ok(())
    }

    pub fn remove(&self, storage: &mut dyn Storage) {
        storage.remove(self.storage_key);
    }
}

// ----------------------------------- tests -----------------------------------
