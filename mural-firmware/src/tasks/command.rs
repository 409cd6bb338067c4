//! Host command link tasks
//!
//! `command_rx_task` turns the UART byte stream into decoded commands for
//! the motion task; `status_tx_task` sends status frames back whenever
//! the motion task publishes one.

use defmt::*;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use postcard::accumulator::{CobsAccumulator, FeedResult};

use crate::channels::{COMMAND_CHANNEL, STATUS_SIGNAL};
use crate::protocol::{Command, MAX_FRAME};

/// Command receive task
///
/// Feeds raw UART bytes through a COBS accumulator; every complete frame
/// decodes into one [`Command`]. Malformed frames are dropped with a log,
/// the stream resynchronizes on the next frame boundary.
#[embassy_executor::task]
pub async fn command_rx_task(mut rx: BufferedUartRx<'static, UART0>) {
    info!("Command link rx task started");

    let mut raw = [0u8; 32];
    let mut accumulator: CobsAccumulator<MAX_FRAME> = CobsAccumulator::new();

    loop {
        match rx.read(&mut raw).await {
            Ok(0) => continue,
            Ok(n) => {
                let mut window = &raw[..n];
                while !window.is_empty() {
                    window = match accumulator.feed::<Command>(window) {
                        FeedResult::Consumed => break,
                        FeedResult::OverFull(next) => {
                            warn!("Command frame too long, resyncing");
                            next
                        }
                        FeedResult::DeserError(next) => {
                            warn!("Undecodable command frame");
                            next
                        }
                        FeedResult::Success { data, remaining } => {
                            trace!("Command: {:?}", data);
                            COMMAND_CHANNEL.send(data).await;
                            remaining
                        }
                    };
                }
            }
            Err(e) => {
                warn!("Command link read error: {:?}", e);
            }
        }
    }
}

/// Status transmit task
#[embassy_executor::task]
pub async fn status_tx_task(mut tx: BufferedUartTx<'static, UART0>) {
    info!("Command link tx task started");

    loop {
        let status = STATUS_SIGNAL.wait().await;

        let mut buf = [0u8; MAX_FRAME];
        match postcard::to_slice_cobs(&status, &mut buf) {
            Ok(frame) => {
                if tx.write_all(frame).await.is_err() {
                    warn!("Status frame write failed");
                }
            }
            Err(_) => warn!("Status frame encode failed"),
        }
    }
}
