// Engine orchestration — shared handle lifecycle and the per-request read loop.

pub mod collector;
pub mod handle;
