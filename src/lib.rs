//! Driver library for the Sitronix ST7789 TFT display controller.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

// This has to be here in order to be usable by mods declared afterwards.
#[cfg(test)]
#[macro_use]
pub mod testing {
    macro_rules! send {
        ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
        ($c:tt) => {Sent::Cmd($c)};
    }
    macro_rules! sends {
        ($($e:tt),*) => {&[$(send!($e),)*]};
    }
}

pub mod command;
pub mod config;
pub mod display;
pub mod interface;
pub mod sequence;

// Re-exports for primary API.
pub use crate::command::{ColorOrder, ColumnOrder, Command, PixelFormat, RowOrder};
pub use crate::config::{SPI_MAX_FREQ_HZ, SPI_MODE};
pub use crate::display::{Display, PixelCoord};
pub use crate::interface::spi::SpiInterface;
pub use crate::sequence::{CommandSequence, INIT_240X240};
