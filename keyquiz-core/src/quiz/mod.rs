//! Timed arithmetic quiz
//!
//! The quiz runs as two cooperating tasks. The producer owns the display
//! and the [`QuizState`]; the responder owns the keypad. They talk over two
//! bounded channels carrying [`Request`] and [`Answer`] messages.
//!
//! ```text
//!   Producer ──Request::NeedAnswer──▶ Responder
//!      ▲                                 │ scan_with_timeout
//!      └──────Answer::Key / Timeout──────┘
//! ```

pub mod coordinator;
pub mod messages;
pub mod problem;
pub mod state;

pub use coordinator::{Producer, Responder};
pub use messages::{Answer, Request, QUEUE_DEPTH};
pub use problem::{Operator, Problem};
pub use state::{LevelUp, Outcome, QuizState};
