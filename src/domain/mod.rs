//! Domain slices. Each keeps its types in `mod.rs`, the normalized wire shape
//! in `wire.rs`, validation in `convert.rs` and its sub-client in `client.rs`.

pub mod participant;
pub mod raffle;
pub mod transaction;
