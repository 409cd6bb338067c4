//! TMC2209 bring-up
//!
//! Runs once at startup, before the motion task exists. Each driver must
//! answer the identity check before any configuration is pushed; a wrong
//! or missing answer aborts startup with a reported cause, because the
//! kinematics are calibrated against configured drivers and running
//! without them would produce physically unsafe motion.

use defmt::*;
use embassy_rp::peripherals::UART1;
use embassy_rp::uart::{Async, Uart};
use embassy_time::{with_timeout, Duration, Timer};

use mural_drivers::stepper::tmc2209::{parse_reply, Tmc2209, Tmc2209Config, Tmc2209Error};

/// UART address of the left winch driver (MS1 strap)
pub const LEFT_UART_ADDRESS: u8 = 1;

/// UART address of the right winch driver (MS1+MS2 straps)
pub const RIGHT_UART_ADDRESS: u8 = 3;

/// How long to wait for a register read reply
const REPLY_TIMEOUT: Duration = Duration::from_millis(20);

/// Verify and configure both winch drivers
pub async fn bring_up_both(uart: &mut Uart<'static, UART1, Async>) -> Result<(), Tmc2209Error> {
    // let the drivers power up before the first datagram
    Timer::after_millis(100).await;

    for address in [LEFT_UART_ADDRESS, RIGHT_UART_ADDRESS] {
        let config = Tmc2209Config {
            uart_address: address,
            ..Default::default()
        };
        bring_up(uart, config).await?;
    }
    Ok(())
}

/// Verify one driver's identity, then push its configuration
async fn bring_up(
    uart: &mut Uart<'static, UART1, Async>,
    config: Tmc2209Config,
) -> Result<(), Tmc2209Error> {
    let address = config.uart_address;
    let driver = Tmc2209::new(config);

    uart.write(&driver.version_request())
        .await
        .map_err(|_| Tmc2209Error::Timeout)?;

    // single-wire UART: our own request echoes back ahead of the reply
    let mut echo = [0u8; 4];
    read_exact(uart, &mut echo).await?;
    let mut reply = [0u8; 8];
    read_exact(uart, &mut reply).await?;

    let ioin = parse_reply(&reply)?;
    driver.verify_version(ioin)?;
    info!("TMC2209 at address {} answered the identity check", address);

    for datagram in driver.init_datagrams() {
        // small gap so the driver can process each write
        Timer::after_millis(10).await;
        uart.write(&datagram)
            .await
            .map_err(|_| Tmc2209Error::Timeout)?;

        // drain the echo of our own write
        let mut write_echo = [0u8; 8];
        read_exact(uart, &mut write_echo).await?;
    }

    debug!(
        "TMC2209 at address {} configured, {} mA run current",
        address,
        driver.config().run_current_ma
    );
    Ok(())
}

async fn read_exact(
    uart: &mut Uart<'static, UART1, Async>,
    buf: &mut [u8],
) -> Result<(), Tmc2209Error> {
    with_timeout(REPLY_TIMEOUT, uart.read(buf))
        .await
        .map_err(|_| Tmc2209Error::Timeout)?
        .map_err(|_| Tmc2209Error::Timeout)?;
    Ok(())
}
