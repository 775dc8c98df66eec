//! Full example code for setting up an ST7789 display. This runs on an STM32F303RE, using a
//! 240x240 TFT module connected to SPI1, PA8 for D/C, PB6 for CS, and PA9 for RESET.

#![deny(unsafe_code)]
#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate panic_abort;
extern crate st7789;

use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use hal::spi;
use st7789 as tft;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let mut delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Get GPIO banks A and B where the display is connected.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let mut gpiob = dp.GPIOB.split(&mut rcc.ahb);

    // Set up SPI1, which is Alternate Function 5 for GPIOs PA5,6,7. The controller's bus mode and
    // rate ceiling come from the driver crate.
    let disp_sck = gpioa.pa5.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_miso = gpioa.pa6.into_af5(&mut gpioa.moder, &mut gpioa.afrl);
    let disp_mosi = gpioa.pa7.into_af5(&mut gpioa.moder, &mut gpioa.afrl);

    let disp_spi = spi::Spi::spi1(
        dp.SPI1,
        (disp_sck, disp_miso, disp_mosi),
        tft::SPI_MODE,
        24.mhz(),
        clocks,
        &mut rcc.apb2,
    );

    // PA8 will be the D/C push-pull output for the 4th wire, PB6 the chip select.
    let disp_dc = gpioa
        .pa8
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let disp_cs = gpiob
        .pb6
        .into_push_pull_output(&mut gpiob.moder, &mut gpiob.otyper);

    // PA9 is the display's RESET pin; the driver owns it and pulses it during `init`.
    let disp_rst = gpioa
        .pa9
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // Create the SpiInterface and Display.
    let mut disp = tft::Display::new(
        tft::SpiInterface::new(disp_spi, disp_dc, disp_cs),
        disp_rst,
        tft::PixelCoord(240, 240),
        tft::PixelCoord(0, 0),
    );

    // Initialize the display. This pulses reset and runs the vendor power-on command program,
    // blocking for the settling delays it embeds.
    disp.init(&mut delay).unwrap();

    // Paint the whole panel red.
    disp.fill_screen(0xF800).unwrap();

    loop {
        asm::wfi();
    }
}
