mod allowances;
mod conversion;
mod error;
mod genesis;
mod ibc;
mod keeper;
mod precompiles;
mod query;
mod state;
mod token_pairs;

pub use {
    conversion::*, error::*, genesis::*, ibc::*, keeper::*, precompiles::*, query::*, state::*,
};
