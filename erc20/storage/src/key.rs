use {
    crate::nested_namespaces_with_key,
    erc20_types::{Address, Denom, StdError, StdResult, B256},
    std::{borrow::Cow, mem, vec},
};

/// A raw key segment, either borrowed or owned.
pub type RawKey<'a> = Cow<'a, [u8]>;

// ------------------------------------ key ------------------------------------

/// Describes a key used in mapping data structures, i.e. [`Map`](crate::Map)
/// and [`Set`](crate::Set).
///
/// The key needs to be serialized to or deserialized from raw bytes. We don't
/// use `serde` here because it's slow, not compact, and faillable.
///
/// Additionally, compound keys can be split into `Prefix` and `Suffix`, which
/// are useful in iterations.
pub trait PrimaryKey {
    /// The number of elements in a tuple key. 1 for singleton keys.
    ///
    /// This value is necessary for deserializing nested tuple keys: without
    /// knowing the number of elements in each subkey, the length-prefixed
    /// byte layout is ambiguous.
    const KEY_ELEMS: u8;

    /// For tuple keys, the first element; `()` for singleton keys.
    ///
    /// This is used for iterations: given a value of the prefix, iterate all
    /// values of the suffix.
    type Prefix: Prefixer;

    /// For tuple keys, the elements excluding the `Prefix`; `()` for
    /// singleton keys.
    type Suffix;

    /// The type that raw keys deserialize into, which may be different from
    /// the key itself. E.g. `&str` deserializes into `String`.
    type Output;

    /// Convert the key into one or more raw key segments.
    fn raw_keys(&self) -> Vec<RawKey>;

    /// Serialize the raw keys into bytes. Each raw key, other than the last
    /// one, is prefixed by its length as a 16-bit big endian number.
    fn joined_key(&self) -> Vec<u8> {
        let mut raw_keys = self.raw_keys();
        let last_raw_key = raw_keys.pop();
        nested_namespaces_with_key(None, &raw_keys, last_raw_key)
    }

    /// Deserialize the raw bytes into the output.
    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output>;
}

impl PrimaryKey for () {
    type Output = ();
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        if !bytes.is_empty() {
            return Err(StdError::deserialize::<Self::Output, _>(
                "key",
                "expecting empty bytes",
            ));
        }

        Ok(())
    }
}

impl PrimaryKey for &[u8] {
    type Output = Vec<u8>;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self)]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        Ok(bytes.to_vec())
    }
}

impl PrimaryKey for Vec<u8> {
    type Output = Vec<u8>;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self)]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        Ok(bytes.to_vec())
    }
}

impl PrimaryKey for &str {
    type Output = String;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
    }
}

impl PrimaryKey for String {
    type Output = String;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
    }
}

// An address is always exactly 20 bytes, so it's stored raw, without a length
// prefix.
impl PrimaryKey for Address {
    type Output = Address;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_slice())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        Address::try_from(bytes).map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
    }
}

impl PrimaryKey for B256 {
    type Output = B256;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_slice())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        B256::try_from(bytes).map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
    }
}

impl PrimaryKey for Denom {
    type Output = Denom;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_str().as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
            .and_then(TryInto::try_into)
    }
}

impl<K> PrimaryKey for &K
where
    K: PrimaryKey,
{
    type Output = K::Output;
    type Prefix = K::Prefix;
    type Suffix = K::Suffix;

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<RawKey> {
        (*self).raw_keys()
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        K::from_slice(bytes)
    }
}

impl<A, B> PrimaryKey for (A, B)
where
    A: PrimaryKey + Prefixer,
    B: PrimaryKey,
{
    type Output = (A::Output, B::Output);
    type Prefix = A;
    type Suffix = B;

    const KEY_ELEMS: u8 = A::KEY_ELEMS + B::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<RawKey> {
        let mut keys = self.0.raw_keys();
        keys.extend(self.1.raw_keys());
        keys
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (a_raw, b_raw) = split_first_key(A::KEY_ELEMS, bytes);

        let a = A::from_slice(&a_raw)?;
        let b = B::from_slice(b_raw)?;

        Ok((a, b))
    }
}

impl<A, B, C> PrimaryKey for (A, B, C)
where
    A: PrimaryKey + Prefixer,
    B: PrimaryKey,
    C: PrimaryKey,
{
    type Output = (A::Output, B::Output, C::Output);
    type Prefix = A;
    type Suffix = (B, C);

    const KEY_ELEMS: u8 = A::KEY_ELEMS + B::KEY_ELEMS + C::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<RawKey> {
        let mut keys = self.0.raw_keys();
        keys.extend(self.1.raw_keys());
        keys.extend(self.2.raw_keys());
        keys
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (a_raw, bc_raw) = split_first_key(A::KEY_ELEMS, bytes);
        let (b_raw, c_raw) = split_first_key(B::KEY_ELEMS, bc_raw);

        let a = A::from_slice(&a_raw)?;
        let b = B::from_slice(&b_raw)?;
        let c = C::from_slice(c_raw)?;

        Ok((a, b, c))
    }
}

macro_rules! impl_unsigned_integer_key {
    ($($t:ty),+) => {
        $(impl PrimaryKey for $t {
            type Output = $t;
            type Prefix = ();
            type Suffix = ();

            const KEY_ELEMS: u8 = 1;

            fn raw_keys(&self) -> Vec<RawKey> {
                vec![Cow::Owned(self.to_be_bytes().to_vec())]
            }

            fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
                let Ok(bytes) = <[u8; mem::size_of::<Self>()]>::try_from(bytes) else {
                    return Err(StdError::deserialize::<Self::Output, _>(
                        "key",
                        format!(
                            "wrong number of bytes: expecting {}, got {}",
                            mem::size_of::<Self>(),
                            bytes.len(),
                        ),
                    ));
                };

                Ok(Self::from_be_bytes(bytes))
            }
        })*
    };
}

impl_unsigned_integer_key!(u8, u16, u32, u64, u128);

/// Given the raw bytes of a tuple key consisting of at least one subkey, each
/// subkey having one or more key elements, split off the first subkey.
///
/// Elements other than the last retain their length prefixes in the returned
/// first subkey; the last element does not. The remaining byte slice is also
/// returned.
pub fn split_first_key(key_elems: u8, value: &[u8]) -> (Vec<u8>, &[u8]) {
    let mut index = 0;
    let mut first_key = Vec::new();

    for i in 0..key_elems {
        let len_slice = &value[index..index + 2];
        index += 2;

        if i < key_elems - 1 {
            first_key.extend_from_slice(len_slice);
        }

        let elem_len = u16::from_be_bytes(len_slice.try_into().unwrap()) as usize;
        first_key.extend_from_slice(&value[index..index + elem_len]);
        index += elem_len;
    }

    let remainder = &value[index..];

    (first_key, remainder)
}

// --------------------------------- prefixer ----------------------------------

pub trait Prefixer {
    fn raw_prefixes(&self) -> Vec<RawKey>;

    fn joined_prefix(&self) -> Vec<u8> {
        let raw_prefixes = self.raw_prefixes();
        nested_namespaces_with_key(None, &raw_prefixes, None)
    }
}

impl Prefixer for () {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![]
    }
}

impl Prefixer for &[u8] {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self)]
    }
}

impl Prefixer for Vec<u8> {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self)]
    }
}

impl Prefixer for &str {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_bytes())]
    }
}

impl Prefixer for String {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_bytes())]
    }
}

impl Prefixer for Address {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_slice())]
    }
}

impl Prefixer for B256 {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_slice())]
    }
}

impl Prefixer for Denom {
    fn raw_prefixes(&self) -> Vec<RawKey> {
        vec![Cow::Borrowed(self.as_str().as_bytes())]
    }
}

impl<P> Prefixer for &P
where
    P: Prefixer,
{
    fn raw_prefixes(&self) -> Vec<RawKey> {
        (*self).raw_prefixes()
    }
}

impl<A, B> Prefixer for (A, B)
where
    A: Prefixer,
    B: Prefixer,
{
    fn raw_prefixes(&self) -> Vec<RawKey> {
        let mut prefixes = self.0.raw_prefixes();
        prefixes.extend(self.1.raw_prefixes());
        prefixes
    }
}

macro_rules! impl_integer_prefixer {
    ($($t:ty),+) => {
        $(impl Prefixer for $t {
            fn raw_prefixes(&self) -> Vec<RawKey> {
                vec![Cow::Owned(self.to_be_bytes().to_vec())]
            }
        })*
    };
}

impl_integer_prefixer!(u8, u16, u32, u64, u128);

// ----------------------------------- tests -----------------------------------
