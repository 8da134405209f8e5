mod codec;
mod item;
mod key;
mod map;
mod path;
mod prefix;
mod set;
mod utils;

pub use {codec::*, item::*, key::*, map::*, path::*, prefix::*, set::*, utils::*};
