//! Mural - suspended wall plotter firmware
//!
//! Main firmware binary for RP2040-based controller boards. Two TMC2209
//! driven winches spool belts to position the pen carriage; a host app
//! commands calibration, homing and travel over the UART link.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{UART0, UART1};
use embassy_rp::uart::{
    BufferedInterruptHandler, Config as UartConfig, InterruptHandler as UartInterruptHandler, Uart,
};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use mural_core::config::RigConfig;
use mural_core::motion::Movement;
use mural_drivers::axis::{StepDirAxis, StepDirConfig};

use crate::clock::UptimeClock;
use crate::tasks::motion::WinchAxis;

mod channels;
mod clock;
mod protocol;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    UART1_IRQ => UartInterruptHandler<UART1>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Mural firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Command link on UART0 (GPIO0 TX, GPIO1 RX)
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("Command link UART initialized");

    // TMC2209 configuration link on UART1 (GPIO8 TX, GPIO9 RX)
    let tmc_uart_config = {
        let mut cfg = UartConfig::default();
        cfg.baudrate = 115_200;
        cfg
    };
    let mut tmc_uart = Uart::new(
        p.UART1,
        p.PIN_8,
        p.PIN_9,
        Irqs,
        p.DMA_CH0,
        p.DMA_CH1,
        tmc_uart_config,
    );

    // Bring-up gates everything: no motion task exists until both drivers
    // have answered the identity check and taken their configuration.
    match tasks::tmc::bring_up_both(&mut tmc_uart).await {
        Ok(()) => info!("Winch drivers verified and configured"),
        Err(e) => {
            error!("Winch driver bring-up failed: {:?}", e);
            error!("Refusing to start motion control");
            return;
        }
    }

    // Left winch: STEP=GPIO11, DIR=GPIO10, EN=GPIO12
    let left: WinchAxis = StepDirAxis::new(
        Output::new(p.PIN_11, Level::Low),
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_12, Level::High),
        UptimeClock,
        StepDirConfig::default(),
    );

    // Right winch: STEP=GPIO6, DIR=GPIO5, EN=GPIO7, mirrored mounting
    let right: WinchAxis = StepDirAxis::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_7, Level::High),
        UptimeClock,
        StepDirConfig {
            dir_inverted: true,
            ..Default::default()
        },
    );

    let movement = Movement::new(RigConfig::default(), left, right);
    info!("Movement controller ready");

    spawner.spawn(tasks::motion_task(movement)).unwrap();
    spawner.spawn(tasks::command_rx_task(rx)).unwrap();
    spawner.spawn(tasks::status_tx_task(tx)).unwrap();

    info!("All tasks spawned, firmware running");

    // All work happens in the spawned tasks
    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
