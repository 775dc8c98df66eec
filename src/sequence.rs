//! The packed command program that initializes the controller, and its interpreter.
//!
//! Power-on initialization is a fixed series of commands, arguments, and settling delays. It is
//! stored as a compact byte program so the whole series lives in read-only memory: a leading
//! record count `N`, then `N` records of the form
//!
//! ```text
//! opcode | argsByte | arg bytes (0..127) | delay byte, if flagged
//! ```
//!
//! Bit 7 of `argsByte` (`DELAY_FLAG`) marks a record that ends with one delay byte; the low 7 bits
//! are the argument count. The delay byte is in milliseconds, except that 255 stands for 500ms,
//! which a single byte cannot hold. Programs are trusted, compiled-in data and are never validated
//! at runtime; decoding a program whose length does not match its records stops at a slice-bounds
//! panic.

use crate::hal::blocking::delay::DelayMs;
use crate::interface::DisplayInterface;

/// Bit in a record's `argsByte` marking a trailing delay byte.
pub const DELAY_FLAG: u8 = 0x80;

/// Delay byte value standing in for 500ms.
const DELAY_ESCAPE_500_MS: u8 = 255;

/// MADCTL payload selecting top-to-bottom, left-to-right refresh in RGB subpixel order.
pub const MADCTL_RGB: u8 = 0x00;

/// The power-on program for the 240x240 TFT modules, as given by the module vendor.
#[rustfmt::skip]
pub const INIT_240X240: &[u8] = &[
    9,                                              // number of records
    0x01, DELAY_FLAG,     150,                      // software reset, 150ms settle
    0x11, DELAY_FLAG,     255,                      // sleep out, 255 = 500ms settle
    0x3A, 1 | DELAY_FLAG, 0x55, 10,                 // color mode 16-bit RGB565
    0x36, 1,              MADCTL_RGB,               // top-to-bottom, left-to-right, RGB
    0x2A, 4,              0x00, 0x00, 0x00, 0xF0,   // column address window 0-240
    0x2B, 4,              0x00, 0x00, 0x00, 0xF0,   // row address window 0-240
    0x21, DELAY_FLAG,     10,                       // inversion on, these panels want it
    0x13, DELAY_FLAG,     10,                       // normal display mode on
    0x29, DELAY_FLAG,     255,                      // display on, 255 = 500ms settle
];

/// One decoded record of a command program.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Step<'a> {
    pub opcode: u8,
    pub args: &'a [u8],
    /// Settling delay to observe after the command, with the 500ms escape already applied.
    pub delay_ms: Option<u16>,
}

/// A packed command program, decodable as an iterator of `Step`s.
#[derive(Clone)]
pub struct CommandSequence<'a> {
    bytes: &'a [u8],
    cursor: usize,
    remaining: u8,
}

impl<'a> CommandSequence<'a> {
    /// Wrap a packed program. The record count is read from the leading byte.
    pub fn new(bytes: &'a [u8]) -> Self {
        CommandSequence {
            bytes,
            cursor: 1,
            remaining: bytes[0],
        }
    }

    /// Execute the program against `iface`: for each record, one command write, then the record's
    /// argument bytes as data writes, then the settling delay if the record carries one. Every
    /// write and delay is issued in program order.
    pub fn run<DI, D>(self, iface: &mut DI, delay: &mut D) -> Result<(), ()>
    where
        DI: DisplayInterface,
        D: DelayMs<u16>,
    {
        for step in self {
            iface.send_command(step.opcode)?;
            if !step.args.is_empty() {
                iface.send_data(step.args)?;
            }
            if let Some(ms) = step.delay_ms {
                delay.delay_ms(ms);
            }
        }
        Ok(())
    }
}

impl<'a> Iterator for CommandSequence<'a> {
    type Item = Step<'a>;

    fn next(&mut self) -> Option<Step<'a>> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let bytes = self.bytes;

        let opcode = bytes[self.cursor];
        let args_byte = bytes[self.cursor + 1];
        let arg_count = (args_byte & !DELAY_FLAG) as usize;
        self.cursor += 2;

        let args = &bytes[self.cursor..self.cursor + arg_count];
        self.cursor += arg_count;

        let delay_ms = if args_byte & DELAY_FLAG != 0 {
            let raw = bytes[self.cursor];
            self.cursor += 1;
            Some(match raw {
                DELAY_ESCAPE_500_MS => 500,
                ms => ms as u16,
            })
        } else {
            None
        };

        Some(Step {
            opcode,
            args,
            delay_ms,
        })
    }
}
