//! The main API to the display driver. It composes the bus interface, the reset line, and the
//! panel geometry, and provides methods for initializing the panel and filling rectangular
//! regions of it with a solid color.

use crate::command::{Command, NUM_PIXEL_COLS, NUM_PIXEL_ROWS};
use crate::hal::blocking::delay::DelayMs;
use crate::hal::digital::v2::OutputPin;
use crate::interface::DisplayInterface;
use crate::sequence::{CommandSequence, INIT_240X240, MADCTL_RGB};

/// A pixel coordinate pair of `column` and `row`. `column` must be in the range [0,
/// `command::PIXEL_COL_MAX`], and `row` must be in the range [0, `command::PIXEL_ROW_MAX`].
#[derive(Clone, Copy, Debug)]
pub struct PixelCoord(pub u16, pub u16);

/// A driver for an ST7789 display.
pub struct Display<DI, RST>
where
    DI: DisplayInterface,
    RST: OutputPin,
{
    iface: DI,
    rst: RST,
    display_size: PixelCoord,
    display_offset: PixelCoord,
}

impl<DI, RST> Display<DI, RST>
where
    DI: DisplayInterface,
    RST: OutputPin,
{
    /// Construct a new display driver for a display with viewable dimensions `display_size`,
    /// which is connected to the interface `iface` and whose reset line is driven by `rst`.
    ///
    /// Some display modules with resolution lower than the chip's full 240x320 frame memory wire
    /// their glass into the middle of the memory rather than starting at address 0, for
    /// mechanical PCB layout reasons. For such modules, `display_offset` gives the frame memory
    /// column and row that correspond to pixel column 0 and pixel row 0 of the glass. The 240x240
    /// modules use an offset of (0, 0).
    pub fn new(iface: DI, rst: RST, display_size: PixelCoord, display_offset: PixelCoord) -> Self {
        if false
            || display_size.0 > NUM_PIXEL_COLS
            || display_size.1 > NUM_PIXEL_ROWS
            || display_offset.0 + display_size.0 > NUM_PIXEL_COLS
            || display_offset.1 + display_size.1 > NUM_PIXEL_ROWS
        {
            panic!("Display size or offset not supported by ST7789.");
        }
        Display {
            iface,
            rst,
            display_size,
            display_offset,
        }
    }

    /// Pulse the hardware reset line. The controller requires the falling and rising edge each to
    /// be held for the line to register, so the pin is driven high, low, and high again with a
    /// 50ms hold at each level.
    pub fn reset<D>(&mut self, delay: &mut D) -> Result<(), ()>
    where
        D: DelayMs<u16>,
    {
        self.rst.set_high().map_err(|_| ())?;
        delay.delay_ms(50);
        self.rst.set_low().map_err(|_| ())?;
        delay.delay_ms(50);
        self.rst.set_high().map_err(|_| ())?;
        delay.delay_ms(50);
        Ok(())
    }

    /// Initialize the display: pulse the reset line, execute the power-on command program, and
    /// select RGB refresh order. The display is left on, in normal mode, ready to accept pixel
    /// data. `delay` provides the settling delays the program calls for; the whole sequence
    /// blocks for a little over 1.5 seconds.
    pub fn init<D>(&mut self, delay: &mut D) -> Result<(), ()>
    where
        D: DelayMs<u16>,
    {
        self.reset(delay)?;
        CommandSequence::new(INIT_240X240).run(&mut self.iface, delay)?;
        // The vendor's bring-up ends with this bare data write re-selecting RGB refresh order; it
        // is issued outside the command program, exactly as the controller expects it.
        self.iface.send_data(&[MADCTL_RGB])
    }

    /// Control sleep mode.
    pub fn sleep(&mut self, enabled: bool) -> Result<(), ()> {
        Command::SetSleepMode(enabled).send(&mut self.iface)
    }

    /// Control color inversion.
    pub fn invert(&mut self, enabled: bool) -> Result<(), ()> {
        Command::SetInversionMode(enabled).send(&mut self.iface)
    }

    /// Control whether the panel shows the frame memory contents.
    pub fn display_on(&mut self, enabled: bool) -> Result<(), ()> {
        Command::SetDisplayOn(enabled).send(&mut self.iface)
    }

    /// Set the frame memory window that subsequent pixel data will fill, and put the controller
    /// in RAM-write mode. The window is inclusive of both corners; the controller's address
    /// pointer auto-advances over it as pixel bytes arrive, so the caller need not re-address per
    /// pixel. Coordinates are in panel space; the display offset is applied here.
    fn set_address_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), ()> {
        let (col, row) = (self.display_offset.0, self.display_offset.1);
        Command::SetColumnAddress(x0 + col, x1 + col).send(&mut self.iface)?;
        Command::SetRowAddress(y0 + row, y1 + row).send(&mut self.iface)?;
        Command::WriteRam.send(&mut self.iface)
    }

    /// Fill a rectangle with a solid RGB565 color.
    ///
    /// A rectangle whose origin lies off the panel is silently dropped, and one that hangs off
    /// the right or bottom edge is silently clipped to the panel; callers never hear about
    /// either. The clipped pixel run is streamed to the controller in one uninterrupted
    /// chip-select span.
    pub fn fill_rect(
        &mut self,
        x: u16,
        y: u16,
        mut w: u16,
        mut h: u16,
        color: u16,
    ) -> Result<(), ()> {
        if x >= self.display_size.0 || y >= self.display_size.1 || w == 0 || h == 0 {
            return Ok(());
        }
        // Clip in u32 so oversized rectangles cannot wrap the arithmetic.
        if u32::from(x) + u32::from(w) > u32::from(self.display_size.0) {
            w = self.display_size.0 - x;
        }
        if u32::from(y) + u32::from(h) > u32::from(self.display_size.1) {
            h = self.display_size.1 - y;
        }
        self.set_address_window(x, y, x + w - 1, y + h - 1)?;
        self.iface
            .send_repeated_word(color, u32::from(w) * u32::from(h))
    }

    /// Fill the entire panel with a solid RGB565 color.
    pub fn fill_screen(&mut self, color: u16) -> Result<(), ()> {
        self.fill_rect(0, 0, self.display_size.0, self.display_size.1, color)
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelCoord as Px, *};
    use crate::interface::test_spy::{Sent, TestDelay, TestPin, TestSpyInterface};

    fn display_240x240(
        di: &TestSpyInterface,
        rst: &TestPin,
    ) -> Display<TestSpyInterface, TestPin> {
        Display::new(di.split(), rst.split(), Px(240, 240), Px(0, 0))
    }

    #[test]
    fn init_wire_order() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut delay = TestDelay::new();
        let mut disp = display_240x240(&di, &rst);
        disp.init(&mut delay).unwrap();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        di.check_multi(sends!(
            0x01, // software reset
            0x11, // sleep out
            0x3A, [0x55], // color mode RGB565
            0x36, [0x00], // refresh order
            0x2A, [0x00, 0x00, 0x00, 0xF0], // column window
            0x2B, [0x00, 0x00, 0x00, 0xF0], // row window
            0x21, // inversion on
            0x13, // normal display mode
            0x29, // display on
            [0x00] // trailing RGB refresh order data byte
        ));
        assert_eq!(delay.delays, [50, 50, 50, 150, 500, 10, 10, 10, 500]);
    }

    #[test]
    fn reset_pulse() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut delay = TestDelay::new();
        let mut disp = display_240x240(&di, &rst);
        disp.reset(&mut delay).unwrap();
        assert_eq!(rst.levels(), [true, false, true]);
        assert_eq!(delay.delays, [50, 50, 50]);
        // The reset line is not touched by anything but `reset`.
        di.check_multi(&[]);
    }

    #[test]
    fn fill_screen_covers_panel() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.fill_screen(0xF800).unwrap();
        let sent = di.sent();
        assert_eq!(sent.len(), 6);
        assert_eq!(sent[0], Sent::Cmd(0x2A));
        assert_eq!(sent[1], Sent::Data(vec![0x00, 0x00, 0x00, 0xEF]));
        assert_eq!(sent[2], Sent::Cmd(0x2B));
        assert_eq!(sent[3], Sent::Data(vec![0x00, 0x00, 0x00, 0xEF]));
        assert_eq!(sent[4], Sent::Cmd(0x2C));
        match &sent[5] {
            Sent::Data(pixels) => {
                assert_eq!(pixels.len(), 240 * 240 * 2);
                assert!(pixels.chunks(2).all(|p| p == [0xF8, 0x00]));
            }
            other => panic!("expected pixel data, got {:?}", other),
        }
    }

    #[test]
    fn fill_rect_oversized_clips_to_panel() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.fill_rect(0, 0, 300, 300, 0xF800).unwrap();
        let sent = di.sent();
        assert_eq!(sent[1], Sent::Data(vec![0x00, 0x00, 0x00, 0xEF]));
        assert_eq!(sent[3], Sent::Data(vec![0x00, 0x00, 0x00, 0xEF]));
        match &sent[5] {
            Sent::Data(pixels) => assert_eq!(pixels.len(), 240 * 240 * 2),
            other => panic!("expected pixel data, got {:?}", other),
        }
    }

    #[test]
    fn fill_rect_off_panel_is_silent() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.fill_rect(240, 0, 10, 10, 0xFFFF).unwrap();
        disp.fill_rect(0, 240, 10, 10, 0xFFFF).unwrap();
        disp.fill_rect(1000, 1000, 10, 10, 0xFFFF).unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn fill_rect_zero_area_is_silent() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.fill_rect(10, 10, 0, 5, 0xFFFF).unwrap();
        disp.fill_rect(10, 10, 5, 0, 0xFFFF).unwrap();
        di.check_multi(&[]);
    }

    #[test]
    fn fill_rect_corner_clip() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.fill_rect(200, 200, 100, 100, 0x07E0).unwrap();
        let sent = di.sent();
        // 200 + 100 hangs off both edges; the window clips to 40x40 at (200, 200).
        assert_eq!(sent[0], Sent::Cmd(0x2A));
        assert_eq!(sent[1], Sent::Data(vec![0x00, 0xC8, 0x00, 0xEF]));
        assert_eq!(sent[2], Sent::Cmd(0x2B));
        assert_eq!(sent[3], Sent::Data(vec![0x00, 0xC8, 0x00, 0xEF]));
        assert_eq!(sent[4], Sent::Cmd(0x2C));
        match &sent[5] {
            Sent::Data(pixels) => {
                assert_eq!(pixels.len(), 40 * 40 * 2);
                assert!(pixels.chunks(2).all(|p| p == [0x07, 0xE0]));
            }
            other => panic!("expected pixel data, got {:?}", other),
        }
    }

    #[test]
    fn fill_rect_huge_extent_does_not_wrap() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        // 100 + 65500 overflows u16; the clip math must not wrap it back on-panel short.
        disp.fill_rect(100, 0, 65500, 1, 0xFFFF).unwrap();
        let sent = di.sent();
        assert_eq!(sent[1], Sent::Data(vec![0x00, 100, 0x00, 0xEF]));
        match &sent[5] {
            Sent::Data(pixels) => assert_eq!(pixels.len(), 140 * 2),
            other => panic!("expected pixel data, got {:?}", other),
        }
    }

    #[test]
    fn fill_rect_applies_display_offset() {
        let di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = Display::new(di.split(), rst.split(), Px(240, 240), Px(0, 80));
        disp.fill_rect(2, 3, 4, 5, 0x0000).unwrap();
        let sent = di.sent();
        #[cfg_attr(rustfmt, rustfmt_skip)]
        assert_eq!(
            sent[..5],
            *sends!(
                0x2A, [0x00, 2, 0x00, 5],
                0x2B, [0x00, 83, 0x00, 87],
                0x2C
            )
        );
        assert_eq!(sent[5], Sent::Data(vec![0x00; 4 * 5 * 2]));
    }

    #[test]
    fn sleep_invert_display_on() {
        let mut di = TestSpyInterface::new();
        let rst = TestPin::new();
        let mut disp = display_240x240(&di, &rst);
        disp.sleep(true).unwrap();
        di.check(0x10, &[]);
        di.clear();
        disp.invert(false).unwrap();
        di.check(0x20, &[]);
        di.clear();
        disp.display_on(true).unwrap();
        di.check(0x29, &[]);
    }
}
