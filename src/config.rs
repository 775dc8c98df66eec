//! Fixed electrical parameters of the controller's serial interface.
//!
//! These are properties of the chip, not of any one board: the host sets up its SPI peripheral
//! with them once, and every transaction the driver performs relies on them. MSB-first bit order
//! is assumed, as embedded-hal SPI implementations default to it.

use crate::hal::spi::{Mode, MODE_2};

/// SPI bus mode the controller requires: the clock idles high and data is latched on the falling
/// edge (CPOL=1, CPHA=0).
pub const SPI_MODE: Mode = MODE_2;

/// The fastest serial clock the controller's write path is specified for.
pub const SPI_MAX_FREQ_HZ: u32 = 24_000_000;
