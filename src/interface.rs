//! The interface to the display controller's 4-wire serial bus.
//!
//! The controller distinguishes command bytes from data bytes with the D/C line, and only listens
//! to the bus while the active-low CS line is asserted. Single writes each get their own
//! chip-select window; the bulk pixel path holds the chip selected for the entire burst, because
//! the controller's address window fills correctly only if the pixel stream is uninterrupted.

pub trait DisplayInterface {
    /// Send a command byte, framed with D/C low, in its own chip-select window.
    fn send_command(&mut self, cmd: u8) -> Result<(), ()>;
    /// Send argument bytes, framed with D/C high. Each byte is clocked out in its own chip-select
    /// window.
    fn send_data(&mut self, data: &[u8]) -> Result<(), ()>;
    /// Stream `count` copies of a 16-bit word, high byte first, framed with D/C high. The chip
    /// stays selected from the first byte to the last.
    fn send_repeated_word(&mut self, word: u16, count: u32) -> Result<(), ()>;
}

pub mod spi {
    //! The SPI interface supports the "4-wire" interface of the controller, such that each word on
    //! the SPI bus is 8 bits. The "3-wire" mode replaces the D/C GPIO with a 9th bit on each word,
    //! which seems really awkward to implement with embedded_hal SPI.

    use crate::hal;
    use crate::hal::digital::v2::OutputPin;

    use super::DisplayInterface;

    pub struct SpiInterface<SPI, DC, CS> {
        /// The SPI master device connected to the ST7789.
        spi: SPI,
        /// A GPIO output pin connected to the D/C (data/command) pin of the ST7789 (the fourth
        /// "wire" of "4-wire" mode).
        dc: DC,
        /// A GPIO output pin connected to the active-low CS pin of the ST7789.
        cs: CS,
    }

    impl<SPI, DC, CS> SpiInterface<SPI, DC, CS>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        /// Create a new SPI interface to communicate with the display controller. `spi` is the SPI
        /// master device, `dc` is the GPIO output pin connected to the D/C pin, and `cs` is the
        /// GPIO output pin connected to the CS pin of the ST7789.
        pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
            Self { spi, dc, cs }
        }

        fn write_selected(&mut self, bytes: &[u8]) -> Result<(), ()> {
            self.cs.set_low().map_err(|_| ())?;
            let res = self.spi.write(bytes).map_err(|_| ());
            // The chip must be deselected whether or not the transfer succeeded.
            self.cs.set_high().map_err(|_| ())?;
            res
        }
    }

    impl<SPI, DC, CS> DisplayInterface for SpiInterface<SPI, DC, CS>
    where
        SPI: hal::blocking::spi::Write<u8>,
        DC: OutputPin,
        CS: OutputPin,
    {
        fn send_command(&mut self, cmd: u8) -> Result<(), ()> {
            self.dc.set_low().map_err(|_| ())?;
            self.write_selected(&[cmd])
        }

        fn send_data(&mut self, data: &[u8]) -> Result<(), ()> {
            self.dc.set_high().map_err(|_| ())?;
            for byte in data {
                self.write_selected(&[*byte])?;
            }
            Ok(())
        }

        fn send_repeated_word(&mut self, word: u16, count: u32) -> Result<(), ()> {
            let mut chunk = [0u8; 32];
            for pair in chunk.chunks_mut(2) {
                pair[0] = (word >> 8) as u8;
                pair[1] = word as u8;
            }

            self.dc.set_high().map_err(|_| ())?;
            self.cs.set_low().map_err(|_| ())?;
            let mut remaining = count as usize * 2;
            while remaining != 0 {
                let len = if remaining < chunk.len() {
                    remaining
                } else {
                    chunk.len()
                };
                if self.spi.write(&chunk[..len]).is_err() {
                    self.cs.set_high().ok();
                    return Err(());
                }
                remaining -= len;
            }
            self.cs.set_high().map_err(|_| ())
        }
    }
}
