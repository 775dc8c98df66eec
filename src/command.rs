//! The command set for the ST7789.
//!
//! Note 1: The frame memory of the ST7789 is 240 columns by 320 rows regardless of the glass
//! attached to it. Panels smaller than the full memory expose a sub-window of it, described by the
//! column/row offsets given to `Display::new`; the 240x240 modules this crate targets start at
//! column 0, row 0. Column and row addresses are 16 bits on the wire, sent high byte first.

use crate::interface::DisplayInterface;

pub const NUM_PIXEL_COLS: u16 = 240;
pub const NUM_PIXEL_ROWS: u16 = 320;
pub const PIXEL_COL_MAX: u16 = NUM_PIXEL_COLS - 1;
pub const PIXEL_ROW_MAX: u16 = NUM_PIXEL_ROWS - 1;

/// Setting of the row refresh order. Changing this setting will flip the image vertically.
#[derive(Clone, Copy)]
pub enum RowOrder {
    /// Rows refresh top to bottom, so that row address 0 is the first row of the display.
    TopToBottom,
    /// Rows refresh bottom to top, so that row address 0 is the last row of the display.
    BottomToTop,
}

/// Setting of the column refresh order. Changing this setting will mirror the image horizontally.
#[derive(Clone, Copy)]
pub enum ColumnOrder {
    /// Columns refresh left to right, so that column address 0 is the leftmost column.
    LeftToRight,
    /// Columns refresh right to left, so that column address 0 is the rightmost column.
    RightToLeft,
}

/// Setting of the subpixel order the controller expects in pixel data. This is dictated by how the
/// display module wires the panel to the controller; the wrong setting swaps red and blue.
#[derive(Clone, Copy)]
pub enum ColorOrder {
    Rgb,
    Bgr,
}

/// Setting of the format pixel data is transferred in.
#[derive(Clone, Copy)]
pub enum PixelFormat {
    /// 16 bits per pixel: 5 bits red, 6 bits green, 5 bits blue, packed into two bus bytes.
    Rgb565,
    /// 18 bits per pixel, transferred as three bus bytes of 6 significant bits each.
    Rgb666,
}

#[derive(Clone, Copy)]
pub enum Command {
    /// No operation.
    Nop,
    /// Reset the controller's registers to their power-on defaults. The datasheet requires 120ms
    /// of settling time before the next command is accepted.
    SoftwareReset,
    /// Control sleep mode. Entering sleep stops the display oscillator; leaving it requires a
    /// settling delay before the frame memory is writable again.
    SetSleepMode(bool),
    /// Leave partial mode and display the whole frame memory window.
    NormalDisplayOn,
    /// Control color inversion. The 240x240 TFT modules are wired such that inversion ON produces
    /// correct colors.
    SetInversionMode(bool),
    /// Control whether the panel shows the frame memory or blanks. Frame memory contents are
    /// preserved while the display is off.
    SetDisplayOn(bool),
    /// Set the column start and end address range when writing to the frame memory. The column
    /// address pointer is reset to the start column such that `WriteRam` will begin writing there.
    /// Range is 0-239. (Note 1)
    SetColumnAddress(u16, u16),
    /// Set the row start and end address range when writing to the frame memory. The row address
    /// pointer is reset to the start row such that `WriteRam` will begin writing there. Range is
    /// 0-319. (Note 1)
    SetRowAddress(u16, u16),
    /// Begin writing pixel data into the frame memory window set by `SetColumnAddress` and
    /// `SetRowAddress`. The controller's address pointer auto-advances as data bytes arrive, so a
    /// whole window can be filled from a single uninterrupted stream.
    WriteRam,
    /// Set the refresh order and subpixel order of frame memory access. See documentation for each
    /// enum for details.
    SetMemoryMode(RowOrder, ColumnOrder, ColorOrder),
    /// Set the format pixel data is transferred in. See enum for details.
    SetPixelFormat(PixelFormat),
}

macro_rules! ok_command {
    ($buf:ident, $cmd:expr,[]) => {
        Ok(($cmd, &$buf[..0]))
    };
    ($buf:ident, $cmd:expr,[$arg0:expr]) => {{
        $buf[0] = $arg0;
        Ok(($cmd, &$buf[..1]))
    }};
    ($buf:ident, $cmd:expr,[$arg0:expr, $arg1:expr, $arg2:expr, $arg3:expr]) => {{
        $buf[0] = $arg0;
        $buf[1] = $arg1;
        $buf[2] = $arg2;
        $buf[3] = $arg3;
        Ok(($cmd, &$buf[..4]))
    }};
}

impl Command {
    pub fn send<DI>(self, iface: &mut DI) -> Result<(), ()>
    where
        DI: DisplayInterface,
    {
        let mut arg_buf = [0u8; 4];
        let (cmd, data) = match self {
            Command::Nop => ok_command!(arg_buf, 0x00, []),
            Command::SoftwareReset => ok_command!(arg_buf, 0x01, []),
            Command::SetSleepMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x10,
                    false => 0x11,
                },
                []
            ),
            Command::NormalDisplayOn => ok_command!(arg_buf, 0x13, []),
            Command::SetInversionMode(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x21,
                    false => 0x20,
                },
                []
            ),
            Command::SetDisplayOn(ena) => ok_command!(
                arg_buf,
                match ena {
                    true => 0x29,
                    false => 0x28,
                },
                []
            ),
            Command::SetColumnAddress(start, end) => match (start, end) {
                (0..=PIXEL_COL_MAX, 0..=PIXEL_COL_MAX) => ok_command!(
                    arg_buf,
                    0x2A,
                    [
                        (start >> 8) as u8,
                        start as u8,
                        (end >> 8) as u8,
                        end as u8
                    ]
                ),
                _ => Err(()),
            },
            Command::SetRowAddress(start, end) => match (start, end) {
                (0..=PIXEL_ROW_MAX, 0..=PIXEL_ROW_MAX) => ok_command!(
                    arg_buf,
                    0x2B,
                    [
                        (start >> 8) as u8,
                        start as u8,
                        (end >> 8) as u8,
                        end as u8
                    ]
                ),
                _ => Err(()),
            },
            Command::WriteRam => ok_command!(arg_buf, 0x2C, []),
            Command::SetMemoryMode(row_order, column_order, color_order) => {
                let ro = match row_order {
                    RowOrder::TopToBottom => 0x00,
                    RowOrder::BottomToTop => 0x80,
                };
                let co = match column_order {
                    ColumnOrder::LeftToRight => 0x00,
                    ColumnOrder::RightToLeft => 0x40,
                };
                let sp = match color_order {
                    ColorOrder::Rgb => 0x00,
                    ColorOrder::Bgr => 0x08,
                };
                ok_command!(arg_buf, 0x36, [ro | co | sp])
            }
            Command::SetPixelFormat(format) => ok_command!(
                arg_buf,
                0x3A,
                [match format {
                    PixelFormat::Rgb565 => 0x55,
                    PixelFormat::Rgb666 => 0x66,
                }]
            ),
        }?;
        iface.send_command(cmd)?;
        if data.len() == 0 {
            Ok(())
        } else {
            iface.send_data(data)
        }
    }
}
