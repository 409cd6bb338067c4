//! TMC2209 bring-up over UART
//!
//! The winch motors step over dedicated step/dir pins; the TMC2209 UART
//! is only used once at startup, to confirm we are talking to the right
//! silicon and to push chopper, current and microstep configuration.
//! A failed identity check must surface as an error - every later
//! kinematics computation assumes configured drivers, so proceeding (or
//! spinning in place) would let physically unsafe commands through.
//!
//! # UART protocol
//!
//! Single-wire UART at 115200 baud (8N1). Write datagrams are 8 bytes:
//! sync, slave address, register | 0x80, 4 data bytes big-endian, CRC8.
//! Read requests are 4 bytes; the reply mirrors the write layout.

/// TMC2209 register addresses
pub mod reg {
    /// General configuration
    pub const GCONF: u8 = 0x00;
    /// Global status flags
    pub const GSTAT: u8 = 0x01;
    /// Input pin state + silicon version
    pub const IOIN: u8 = 0x06;
    /// Hold/run current settings
    pub const IHOLD_IRUN: u8 = 0x10;
    /// Power down delay
    pub const TPOWERDOWN: u8 = 0x11;
    /// Chopper configuration
    pub const CHOPCONF: u8 = 0x6C;
}

/// UART sync byte
const SYNC_BYTE: u8 = 0x05;

/// Silicon version reported by every TMC2209 in IOIN bits 31:24
pub const EXPECTED_VERSION: u8 = 0x21;

/// Sense resistor on the driver boards, in milliohms
const R_SENSE_MOHMS: u32 = 220;

/// Bring-up errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tmc2209Error {
    /// Invalid sync byte in a reply
    InvalidSync,
    /// Reply CRC mismatch
    CrcMismatch,
    /// No reply within the deadline
    Timeout,
    /// Wrong silicon answered the identity check
    VersionMismatch {
        /// The version every TMC2209 reports
        expected: u8,
        /// What came back
        got: u8,
    },
}

/// Bring-up configuration for one driver
#[derive(Debug, Clone)]
pub struct Tmc2209Config {
    /// UART address (0-3, set by MS1/MS2 strapping)
    pub uart_address: u8,
    /// Run current in mA
    pub run_current_ma: u16,
    /// Hold current in mA
    pub hold_current_ma: u16,
    /// Microstepping (1-256, powers of two)
    pub microsteps: u16,
}

impl Default for Tmc2209Config {
    fn default() -> Self {
        Self {
            uart_address: 0,
            run_current_ma: 400,
            hold_current_ma: 200,
            microsteps: 16,
        }
    }
}

impl Tmc2209Config {
    /// MRES register value for the configured microstepping
    pub fn mres(&self) -> u8 {
        match self.microsteps {
            256 => 0,
            128 => 1,
            64 => 2,
            32 => 3,
            16 => 4,
            8 => 5,
            4 => 6,
            2 => 7,
            1 => 8,
            _ => 4, // fall back to 16 microsteps
        }
    }

    /// Convert a current in mA to an IRUN/IHOLD scale value (0-31)
    ///
    /// CS = I_rms * 32 * 1.41 * Rsense / Vref - 1, Vref = 0.325 internal.
    /// With the 0.22 ohm sense resistors that is about 30.5 per ampere.
    pub fn current_to_cs(current_ma: u16) -> u8 {
        let per_amp = 32 * 141 * R_SENSE_MOHMS / 325; // x1000 scale
        let cs = (current_ma as u32 * per_amp / 100_000).saturating_sub(1);
        cs.min(31) as u8
    }
}

/// CRC8 over a datagram prefix, polynomial 0x07 per the datasheet
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut current = byte;
        for _ in 0..8 {
            if ((crc >> 7) ^ (current >> 7)) != 0 {
                crc = (crc << 1) ^ 0x07;
            } else {
                crc <<= 1;
            }
            current <<= 1;
        }
    }
    crc
}

/// Build an 8-byte register write datagram
pub fn write_datagram(addr: u8, register: u8, data: u32) -> [u8; 8] {
    let mut datagram = [0u8; 8];
    datagram[0] = SYNC_BYTE;
    datagram[1] = addr;
    datagram[2] = register | 0x80;
    datagram[3..7].copy_from_slice(&data.to_be_bytes());
    datagram[7] = crc8(&datagram[..7]);
    datagram
}

/// Build a 4-byte register read request
pub fn read_request(addr: u8, register: u8) -> [u8; 4] {
    let mut datagram = [0u8; 4];
    datagram[0] = SYNC_BYTE;
    datagram[1] = addr;
    datagram[2] = register;
    datagram[3] = crc8(&datagram[..3]);
    datagram
}

/// Parse an 8-byte read reply into its 32-bit register value
pub fn parse_reply(reply: &[u8; 8]) -> Result<u32, Tmc2209Error> {
    if reply[0] != SYNC_BYTE {
        return Err(Tmc2209Error::InvalidSync);
    }
    if reply[7] != crc8(&reply[..7]) {
        return Err(Tmc2209Error::CrcMismatch);
    }

    let mut data = [0u8; 4];
    data.copy_from_slice(&reply[3..7]);
    Ok(u32::from_be_bytes(data))
}

/// One driver's bring-up state
pub struct Tmc2209 {
    config: Tmc2209Config,
}

impl Tmc2209 {
    /// Create a bring-up handle for one driver
    pub fn new(config: Tmc2209Config) -> Self {
        Self { config }
    }

    /// The configuration
    pub fn config(&self) -> &Tmc2209Config {
        &self.config
    }

    /// Read request for the IOIN register (identity check)
    pub fn version_request(&self) -> [u8; 4] {
        read_request(self.config.uart_address, reg::IOIN)
    }

    /// Check the silicon version in an IOIN reply
    ///
    /// IOIN carries VERSION in bits 31:24; every TMC2209 reports 0x21.
    pub fn verify_version(&self, ioin: u32) -> Result<(), Tmc2209Error> {
        let got = (ioin >> 24) as u8;
        if got != EXPECTED_VERSION {
            return Err(Tmc2209Error::VersionMismatch {
                expected: EXPECTED_VERSION,
                got,
            });
        }
        Ok(())
    }

    /// GCONF: UART-controlled microstepping, PDN input disabled
    fn build_gconf(&self) -> u32 {
        let mut gconf = 0u32;
        gconf |= 1 << 6; // pdn_disable: UART owns the PDN pin
        gconf |= 1 << 7; // mstep_reg_select: MRES from CHOPCONF, not MS pins
        gconf |= 1 << 8; // multistep_filt
        gconf
    }

    /// CHOPCONF: TOFF=5 chopper, configured microstepping, 256x interpolation
    fn build_chopconf(&self) -> u32 {
        let mut chopconf = 0u32;
        chopconf |= 5; // TOFF
        chopconf |= 4 << 4; // HSTRT
        chopconf |= 2 << 15; // TBL
        chopconf |= (self.config.mres() as u32) << 24;
        chopconf |= 1 << 28; // intpol
        chopconf
    }

    /// IHOLD_IRUN from the configured currents
    fn build_ihold_irun(&self) -> u32 {
        let ihold = Tmc2209Config::current_to_cs(self.config.hold_current_ma);
        let irun = Tmc2209Config::current_to_cs(self.config.run_current_ma);
        let iholddelay = 6u32;
        ((iholddelay & 0x0F) << 16) | ((irun as u32 & 0x1F) << 8) | (ihold as u32 & 0x1F)
    }

    /// The write datagrams that configure the driver, in push order
    pub fn init_datagrams(&self) -> [[u8; 8]; 4] {
        let addr = self.config.uart_address;
        [
            write_datagram(addr, reg::GCONF, self.build_gconf()),
            write_datagram(addr, reg::CHOPCONF, self.build_chopconf()),
            write_datagram(addr, reg::IHOLD_IRUN, self.build_ihold_irun()),
            write_datagram(addr, reg::TPOWERDOWN, 20),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_check_accepts_real_silicon() {
        let driver = Tmc2209::new(Tmc2209Config::default());
        assert_eq!(driver.verify_version(0x21F0_00C3), Ok(()));
    }

    #[test]
    fn version_check_reports_the_impostor() {
        let driver = Tmc2209::new(Tmc2209Config::default());
        assert_eq!(
            driver.verify_version(0x2000_0000),
            Err(Tmc2209Error::VersionMismatch {
                expected: 0x21,
                got: 0x20
            })
        );
    }

    #[test]
    fn current_scale_for_our_sense_resistors() {
        // 400mA across 0.22 ohm lands near CS=11
        let cs = Tmc2209Config::current_to_cs(400);
        assert!((10..=13).contains(&cs));
        assert!(Tmc2209Config::current_to_cs(200) < cs);
        // never exceeds the 5-bit field
        assert_eq!(Tmc2209Config::current_to_cs(10_000), 31);
    }

    #[test]
    fn write_datagram_layout() {
        let datagram = write_datagram(1, reg::CHOPCONF, 0x1000_0053);
        assert_eq!(datagram[0], 0x05);
        assert_eq!(datagram[1], 1);
        assert_eq!(datagram[2], reg::CHOPCONF | 0x80);
        assert_eq!(&datagram[3..7], &[0x10, 0x00, 0x00, 0x53]);
        assert_eq!(datagram[7], crc8(&datagram[..7]));
    }

    #[test]
    fn reply_round_trip_and_corruption() {
        let mut reply = [0u8; 8];
        reply[0] = 0x05;
        reply[1] = 0xFF; // master address
        reply[2] = reg::IOIN;
        reply[3..7].copy_from_slice(&0x2100_0007u32.to_be_bytes());
        reply[7] = crc8(&reply[..7]);

        assert_eq!(parse_reply(&reply), Ok(0x2100_0007));

        let mut bad_sync = reply;
        bad_sync[0] = 0xAA;
        assert_eq!(parse_reply(&bad_sync), Err(Tmc2209Error::InvalidSync));

        let mut bad_crc = reply;
        bad_crc[5] ^= 0x01;
        assert_eq!(parse_reply(&bad_crc), Err(Tmc2209Error::CrcMismatch));
    }

    #[test]
    fn init_pushes_chopper_current_and_microsteps() {
        let driver = Tmc2209::new(Tmc2209Config {
            uart_address: 3,
            ..Default::default()
        });

        let datagrams = driver.init_datagrams();
        for datagram in &datagrams {
            assert_eq!(datagram[0], 0x05);
            assert_eq!(datagram[1], 3);
            assert!(datagram[2] & 0x80 != 0);
        }

        // CHOPCONF carries TOFF=5 and MRES for 16 microsteps
        let chopconf = u32::from_be_bytes(datagrams[1][3..7].try_into().unwrap());
        assert_eq!(chopconf & 0x0F, 5);
        assert_eq!((chopconf >> 24) & 0x0F, 4);
    }
}
