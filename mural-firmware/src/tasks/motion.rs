//! Motion control task
//!
//! Sole owner of the movement controller: every Movement operation runs
//! here, serialized with the execution tick, so no locking is needed
//! around motion state. The tick cadence is the step-timing contract -
//! the controller emits at most one step per axis per tick, so the
//! ticker rate bounds the top step rate.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use mural_core::motion::Movement;
use mural_drivers::axis::StepDirAxis;

use crate::channels::{COMMAND_CHANNEL, STATUS_SIGNAL};
use crate::clock::UptimeClock;
use crate::protocol::{Command, Side, Status};

/// Execution tick interval. The axes pace themselves off the clock and
/// emit at most one step per poll, so the poll rate bounds the step
/// rate: 4kHz sits comfortably above the 3000 steps/s peak speed.
pub const TICK_INTERVAL_US: u64 = 250;

/// Winch axis as wired on the board
pub type WinchAxis = StepDirAxis<Output<'static>, Output<'static>, Output<'static>, UptimeClock>;

/// Motion control task
#[embassy_executor::task]
pub async fn motion_task(mut movement: Movement<WinchAxis, WinchAxis>) {
    info!("Motion task started");

    let mut ticker = Ticker::every(Duration::from_micros(TICK_INTERVAL_US));
    let mut was_moving = false;

    loop {
        match select(COMMAND_CHANNEL.receive(), ticker.next()).await {
            Either::First(cmd) => dispatch(&mut movement, cmd),
            Either::Second(()) => movement.run_steppers(),
        }

        if was_moving && !movement.is_moving() {
            info!("Motion complete");
        }
        was_moving = movement.is_moving();
    }
}

fn dispatch(movement: &mut Movement<WinchAxis, WinchAxis>, cmd: Command) {
    match cmd {
        Command::SetTopDistance(mm) => {
            info!("Top distance set to {} mm", mm);
            movement.set_top_distance(mm);
        }
        Command::ResumeTopDistance(mm) => {
            info!("Resuming with top distance {} mm", mm);
            movement.resume_top_distance(mm);
        }
        Command::MoveTo { x, y, speed_sps } => {
            match movement.begin_linear_travel(x, y, speed_sps) {
                Ok(seconds) => info!("Travel begun, about {} s", seconds),
                Err(e) => warn!("Travel rejected: {:?}", e),
            }
        }
        Command::Home => match movement.extend_to_home() {
            Ok(seconds) => info!("Homing, about {} s", seconds),
            Err(e) => warn!("Homing rejected: {:?}", e),
        },
        Command::Extend100 => {
            info!("Extending calibration probe");
            movement.extend_100mm();
        }
        Command::Jog { side, jog } => match side {
            Side::Left => movement.left_stepper(jog),
            Side::Right => movement.right_stepper(jog),
        },
        Command::DisableMotors => {
            info!("Motors released");
            movement.disable_motors();
        }
        Command::Query => {
            // coordinates are only reported at rest
            let at = movement.coordinates().ok().map(|p| (p.x, p.y));
            STATUS_SIGNAL.signal(Status {
                top_distance: movement.top_distance(),
                moving: movement.is_moving(),
                started_homing: movement.has_started_homing(),
                at,
            });
        }
    }
}
