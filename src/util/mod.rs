//! Side-effect sinks and persistence shared by the state and net layers.

pub mod nav;
pub mod notify;
pub mod storage;
