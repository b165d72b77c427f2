//! Inter-task communication channels
//!
//! The quiz producer and the keypad responder share nothing but these two
//! bounded queues. Requests and answers pair up one-for-one.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use keyquiz_core::quiz::{Answer, Request, QUEUE_DEPTH};

/// Producer -> responder: "read a key within this budget"
pub static REQUEST_CHANNEL: Channel<CriticalSectionRawMutex, Request, QUEUE_DEPTH> =
    Channel::new();

/// Responder -> producer: the key read, or a timeout
pub static ANSWER_CHANNEL: Channel<CriticalSectionRawMutex, Answer, QUEUE_DEPTH> =
    Channel::new();
