mod address;
mod error;
mod keeper;

pub use {address::*, error::*, keeper::*};
