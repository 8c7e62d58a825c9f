pub mod address;
pub mod block;
pub mod factory;

pub use address::Address;
pub use block::{Block, BlockHeader};
pub use factory::{FactoryError, StateFactory};
