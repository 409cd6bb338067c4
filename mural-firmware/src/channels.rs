//! Inter-task communication channels
//!
//! Static embassy-sync primitives connecting the command link tasks to
//! the motion task, which is the sole owner of the movement controller.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::protocol::{Command, Status};

/// Channel capacity for decoded host commands
const COMMAND_CHANNEL_SIZE: usize = 8;

/// Decoded commands from the host link
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Latest status frame awaiting transmission
pub static STATUS_SIGNAL: Signal<CriticalSectionRawMutex, Status> = Signal::new();
