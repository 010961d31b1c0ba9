pub mod launcher;
pub mod probe;
pub mod registry;
pub mod signal;

pub use launcher::{Launch, launch};
pub use probe::{StatusProbe, WaitPidProbe};
pub use registry::{JobRecord, JobRegistry, JobRow};
pub use signal::send_signal;
