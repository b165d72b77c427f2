//! Quiz producer task
//!
//! Owns the LED matrix and the quiz state; plays rounds forever.

use defmt::*;
use embassy_rp::clocks::RoscRng;
use embassy_time::Delay;

use keyquiz_core::config::QuizConfig;
use keyquiz_core::quiz::Producer;
use keyquiz_drivers::display::Max7219;
use keyquiz_hal_rp2040::Rp2040SpiDevice;

use crate::channels::{ANSWER_CHANNEL, REQUEST_CHANNEL};
use crate::rng::Rng;

/// MAX7219 cascade on SPI0
pub type Display = Max7219<Rp2040SpiDevice, Delay>;

#[embassy_executor::task]
pub async fn quiz_task(display: Display, config: QuizConfig) {
    info!(
        "Quiz task started: budget {}ms, level up every {} correct",
        config.initial_budget_ms, config.streak_to_level
    );

    let mut producer = Producer::new(
        display,
        Delay,
        Rng(RoscRng),
        config,
        REQUEST_CHANNEL.sender(),
        ANSWER_CHANNEL.receiver(),
    );
    producer.run().await
}
