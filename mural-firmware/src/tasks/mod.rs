//! Embassy tasks

pub mod command;
pub mod motion;
pub mod tmc;

pub use command::{command_rx_task, status_tx_task};
pub use motion::motion_task;
