//! Keyquiz - Keypad Arithmetic Quiz Firmware
//!
//! A small sum scrolls across a cascade of MAX7219 8x8 LED matrices and
//! the player answers on a matrix keypad before the time budget runs out.
//! Every run of correct answers raises the level and shortens the budget.
//!
//! Two tasks share the work: the quiz task owns the display, the keypad
//! task owns the keypad, and they talk over two bounded channels.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use keyquiz_drivers::display::{Max7219, Max7219Config};
use keyquiz_drivers::keypad::{Keypad, KeypadLayout, KeypadTiming};
use keyquiz_hal_rp2040::spi::{self, Rp2040SpiHost, SharedBus};
use keyquiz_hal_rp2040::{EmbassyClock, FlexBank, PinBank};

/// Embedded board configuration (compiled into firmware)
/// Edit keyquiz.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../keyquiz.toml");

mod channels;
mod config;
mod rng;
mod tasks;

/// Display bus, shared by reference with the SPI device
static SPI_BUS: StaticCell<SharedBus> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Keyquiz firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load(EMBEDDED_CONFIG);

    let (mut pins, spi_peripherals) = PinBank::split(p);
    let bus: &'static SharedBus = SPI_BUS.init(spi::new_bus(spi_peripherals));

    // Keypad
    let layout = match KeypadLayout::try_from(&config.keypad) {
        Ok(layout) => layout,
        Err(e) => {
            error!("Invalid keypad layout: {}", e);
            halt();
        }
    };
    let gpio = FlexBank::claim(
        &mut pins,
        layout.rows().iter().chain(layout.cols()).copied(),
    );
    let scanner = Keypad::configure(
        gpio,
        layout,
        KeypadTiming::from(&config.keypad),
        Delay,
        EmbassyClock,
    );
    if scanner.failed_pins() > 0 {
        warn!(
            "{} keypad pin(s) failed to configure, their keys are disabled",
            scanner.failed_pins()
        );
    }
    info!("Keypad initialized");

    // Display
    let display_config = config.display;
    let mut host = Rp2040SpiHost::new(bus, &mut pins);
    let mut display = match Max7219::attach(
        &mut host,
        display_config.cs_pin,
        display_config.clock_hz,
        Max7219Config::from(&display_config),
        Delay,
    ) {
        Ok(display) => display,
        Err(e) => {
            error!("Display attach failed: {}", e);
            halt();
        }
    };
    if let Err(e) = display.initialize() {
        error!("Display init failed: {}", e);
        halt();
    }
    if let Err(e) = display.set_brightness(display_config.brightness) {
        warn!("Display brightness {} rejected: {}", display_config.brightness, e);
    }
    info!(
        "Display initialized: {} chip(s), {} rows",
        display.cascade_size(),
        display.digit_count()
    );

    // Spawn tasks
    spawner.spawn(tasks::keypad_task(scanner)).unwrap();
    spawner.spawn(tasks::quiz_task(display, config.quiz)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Stop here after a fatal bring-up error
fn halt() -> ! {
    error!("Halted");
    loop {
        cortex_m::asm::wfi();
    }
}
