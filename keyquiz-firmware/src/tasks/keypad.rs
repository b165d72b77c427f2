//! Keypad responder task
//!
//! Waits for answer requests and runs the bounded keypad scan for each.

use defmt::*;
use embassy_time::Delay;

use keyquiz_core::quiz::Responder;
use keyquiz_drivers::keypad::Keypad;
use keyquiz_hal_rp2040::{EmbassyClock, FlexBank};

use crate::channels::{ANSWER_CHANNEL, REQUEST_CHANNEL};

/// Keypad on flex GPIOs, timed by embassy
pub type Scanner = Keypad<FlexBank, Delay, EmbassyClock>;

#[embassy_executor::task]
pub async fn keypad_task(scanner: Scanner) {
    info!("Keypad task started");

    let mut responder = Responder::new(
        scanner,
        REQUEST_CHANNEL.receiver(),
        ANSWER_CHANNEL.sender(),
    );
    responder.run().await;

    info!("Keypad task stopped");
}
