//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod console;
pub mod heater;
pub mod job;

pub use console::console_task;
pub use heater::heater_task;
pub use job::job_task;
