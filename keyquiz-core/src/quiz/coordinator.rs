//! Producer and responder task loops
//!
//! The producer owns the display and the quiz state. It never blocks on
//! the answer channel: it polls it between scroll repeats so the problem
//! keeps animating while the player thinks. The responder owns the keypad
//! and is the only place the bounded scan runs.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::{Receiver, Sender};
use embedded_hal_async::delay::DelayNs;

use crate::config::QuizConfig;
use crate::traits::{KeyScanner, MatrixDisplay, RandomSource};

use super::messages::{Answer, Request};
use super::problem::Problem;
use super::state::{LevelUp, Outcome, QuizState};

/// Tick mark shown after a correct answer
pub const SUCCESS_IMAGE: u64 = 0x4020180c06060c00;

/// Clock face shown when the budget runs out
pub const TIMEOUT_IMAGE: u64 = 0x1e2125a5eda1211e;

/// Glyph shown after a wrong key
pub const ERROR_GLYPH: char = '*';

/// Scrolled between level digits on level-up
pub const LEVEL_UP_BANNER: &str = "<<<";

/// Quiz producer: poses problems, shows feedback, tracks progress
pub struct Producer<'ch, M, D, T, R, const N: usize>
where
    M: RawMutex,
{
    display: D,
    delay: T,
    rng: R,
    config: QuizConfig,
    state: QuizState,
    requests: Sender<'ch, M, Request, N>,
    answers: Receiver<'ch, M, Answer, N>,
}

impl<'ch, M, D, T, R, const N: usize> Producer<'ch, M, D, T, R, N>
where
    M: RawMutex,
    D: MatrixDisplay,
    T: DelayNs,
    R: RandomSource,
{
    /// Create a producer bound to the request/answer channel ends
    pub fn new(
        display: D,
        delay: T,
        rng: R,
        config: QuizConfig,
        requests: Sender<'ch, M, Request, N>,
        answers: Receiver<'ch, M, Answer, N>,
    ) -> Self {
        Self {
            display,
            delay,
            rng,
            config,
            state: QuizState::new(config),
            requests,
            answers,
        }
    }

    /// Current quiz progress
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// Play rounds forever
    pub async fn run(&mut self) -> ! {
        loop {
            self.play_round().await;
        }
    }

    /// Ask the responder to stop
    pub async fn shutdown(&self) {
        self.requests.send(Request::Shutdown).await;
    }

    /// Pose one problem, wait for its answer and show the result
    pub async fn play_round(&mut self) -> Outcome {
        let problem = Problem::generate(&mut self.rng, self.config.max_operand);
        self.state.pose(problem);

        #[cfg(feature = "defmt")]
        defmt::debug!("Posing {:?}, budget {}ms", problem, self.state.time_budget_ms());

        let answer = self.ask(&problem).await;
        let outcome = self.state.grade(answer);

        let shown = match outcome {
            Outcome::Correct => self.display.draw_packed(0, SUCCESS_IMAGE),
            Outcome::Timeout => self.display.draw_packed(0, TIMEOUT_IMAGE),
            Outcome::Wrong => self.display.draw_char(0, ERROR_GLYPH),
        };
        report(shown);
        self.delay.delay_ms(self.config.feedback_ms).await;

        if let Some(level_up) = self.state.record(outcome) {
            #[cfg(feature = "defmt")]
            defmt::info!(
                "Level {} reached, budget now {}ms",
                level_up.to,
                level_up.budget_ms
            );
            self.celebrate(level_up).await;
        }

        outcome
    }

    /// Send the request, then animate the problem until an answer arrives
    async fn ask(&mut self, problem: &Problem) -> Answer {
        let text = problem.text();
        self.requests
            .send(Request::NeedAnswer {
                budget_ms: self.state.time_budget_ms(),
            })
            .await;

        loop {
            if let Ok(answer) = self.answers.try_receive() {
                return answer;
            }
            report(self.display.draw_string(&text).await);
            self.delay.delay_ms(self.config.refresh_ms).await;
        }
    }

    async fn celebrate(&mut self, level_up: LevelUp) {
        report(self.display.draw_char(0, level_glyph(level_up.from)));
        self.delay.delay_ms(self.config.level_up_ms).await;
        report(self.display.draw_string(LEVEL_UP_BANNER).await);
        report(self.display.draw_char(0, level_glyph(level_up.to)));
        self.delay.delay_ms(self.config.level_up_ms).await;
        report(self.display.draw_string(LEVEL_UP_BANNER).await);
    }
}

/// Quiz responder: turns answer requests into bounded keypad scans
pub struct Responder<'ch, M, S, const N: usize>
where
    M: RawMutex,
{
    scanner: S,
    requests: Receiver<'ch, M, Request, N>,
    answers: Sender<'ch, M, Answer, N>,
}

impl<'ch, M, S, const N: usize> Responder<'ch, M, S, N>
where
    M: RawMutex,
    S: KeyScanner,
{
    /// Create a responder bound to the request/answer channel ends
    pub fn new(
        scanner: S,
        requests: Receiver<'ch, M, Request, N>,
        answers: Sender<'ch, M, Answer, N>,
    ) -> Self {
        Self {
            scanner,
            requests,
            answers,
        }
    }

    /// Serve requests until [`Request::Shutdown`]
    pub async fn run(&mut self) {
        loop {
            match self.requests.receive().await {
                Request::NeedAnswer { budget_ms } => {
                    let answer = Answer::from(self.scanner.scan_with_timeout(budget_ms).await);
                    #[cfg(feature = "defmt")]
                    defmt::debug!("Answer: {:?}", answer);
                    self.answers.send(answer).await;
                }
                Request::Shutdown => {
                    #[cfg(feature = "defmt")]
                    defmt::info!("Responder shutting down");
                    return;
                }
            }
        }
    }
}

/// Single digit shown for a level number
fn level_glyph(level: u8) -> char {
    char::from_digit(u32::from(level % 10), 10).unwrap_or('0')
}

/// Display failures leave the previous frame up; the round carries on
fn report<E>(result: Result<(), E>) {
    if result.is_err() {
        #[cfg(feature = "defmt")]
        defmt::warn!("Display write failed");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::vec::Vec;

    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embassy_sync::channel::Channel;

    use super::*;
    use crate::quiz::messages::QUEUE_DEPTH;

    /// What the producer put on screen
    #[derive(Debug, Clone, PartialEq)]
    enum Drawn {
        Image(u64),
        Char(char),
        Text(std::string::String),
    }

    struct MockDisplay<'a> {
        log: &'a RefCell<Vec<Drawn>>,
        fail: bool,
    }

    impl MatrixDisplay for MockDisplay<'_> {
        type Error = ();

        fn draw_image(&mut self, _pos: u8, image: &[u8; 8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.log
                .borrow_mut()
                .push(Drawn::Image(u64::from_le_bytes(*image)));
            Ok(())
        }

        fn draw_char(&mut self, _pos: u8, c: char) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.log.borrow_mut().push(Drawn::Char(c));
            Ok(())
        }

        async fn draw_string(&mut self, text: &str) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.log.borrow_mut().push(Drawn::Text(text.into()));
            Ok(())
        }
    }

    /// Yields once per delay so the other task gets to run
    struct YieldDelay;

    impl DelayNs for YieldDelay {
        async fn delay_ns(&mut self, _ns: u32) {
            embassy_futures::yield_now().await;
        }
    }

    /// Always draws the same value: 1 - 1, answer 0
    struct Constant(u32);

    impl RandomSource for Constant {
        fn next_u32(&mut self) -> u32 {
            self.0
        }
    }

    /// Replays queued scan results, then times out
    struct ScriptedKeys {
        keys: Vec<Option<char>>,
        budgets: Vec<u32>,
    }

    impl KeyScanner for ScriptedKeys {
        async fn scan_with_timeout(&mut self, timeout_ms: u32) -> Option<char> {
            self.budgets.push(timeout_ms);
            embassy_futures::yield_now().await;
            if self.keys.is_empty() {
                None
            } else {
                self.keys.remove(0)
            }
        }
    }

    type TestChannel<T> = Channel<NoopRawMutex, T, QUEUE_DEPTH>;

    /// Play `rounds` rounds against scripted keys, then shut down
    fn play(
        rng: u32,
        keys: Vec<Option<char>>,
        rounds: usize,
        fail_display: bool,
    ) -> (Vec<Outcome>, QuizState, Vec<Drawn>, Vec<u32>) {
        let requests: TestChannel<Request> = Channel::new();
        let answers: TestChannel<Answer> = Channel::new();
        let log = RefCell::new(Vec::new());

        let mut producer = Producer::new(
            MockDisplay { log: &log, fail: fail_display },
            YieldDelay,
            Constant(rng),
            QuizConfig::default(),
            requests.sender(),
            answers.receiver(),
        );
        let mut responder = Responder::new(
            ScriptedKeys { keys, budgets: Vec::new() },
            requests.receiver(),
            answers.sender(),
        );

        let (outcomes, ()) = block_on(join(
            async {
                let mut outcomes = Vec::new();
                for _ in 0..rounds {
                    outcomes.push(producer.play_round().await);
                }
                producer.shutdown().await;
                outcomes
            },
            responder.run(),
        ));

        let state = producer.state().clone();
        let budgets = responder.scanner.budgets.clone();
        (outcomes, state, log.into_inner(), budgets)
    }

    #[test]
    fn test_correct_answer_round() {
        // rng 1: operands 1 and 1, odd operator draw => "1-1?", answer 0
        let (outcomes, state, drawn, budgets) = play(1, std::vec![Some('0')], 1, false);

        assert_eq!(outcomes, std::vec![Outcome::Correct]);
        assert_eq!(state.streak(), 1);
        assert_eq!(state.level(), 0);
        assert_eq!(budgets, std::vec![15_000]);
        assert_eq!(drawn.first(), Some(&Drawn::Text("1-1?".into())));
        assert_eq!(drawn.last(), Some(&Drawn::Image(SUCCESS_IMAGE)));
    }

    #[test]
    fn test_wrong_and_timeout_feedback() {
        let (outcomes, state, drawn, _) = play(1, std::vec![Some('7'), None], 2, false);

        assert_eq!(outcomes, std::vec![Outcome::Wrong, Outcome::Timeout]);
        assert_eq!(state.streak(), 0);
        assert!(drawn.contains(&Drawn::Char(ERROR_GLYPH)));
        assert_eq!(drawn.last(), Some(&Drawn::Image(TIMEOUT_IMAGE)));
    }

    #[test]
    fn test_five_correct_levels_up() {
        let keys = std::vec![Some('0'); 6];
        let (outcomes, state, drawn, budgets) = play(1, keys, 6, false);

        assert!(outcomes.iter().all(|o| *o == Outcome::Correct));
        assert_eq!(state.level(), 1);
        assert_eq!(state.streak(), 1);
        assert_eq!(state.time_budget_ms(), 14_000);
        // The sixth request already carries the shortened budget
        assert_eq!(budgets[4], 15_000);
        assert_eq!(budgets[5], 14_000);

        let celebration = [
            Drawn::Char('0'),
            Drawn::Text(LEVEL_UP_BANNER.into()),
            Drawn::Char('1'),
            Drawn::Text(LEVEL_UP_BANNER.into()),
        ];
        assert!(drawn
            .windows(celebration.len())
            .any(|w| w == celebration.as_slice()));
    }

    #[test]
    fn test_display_failure_does_not_stop_quiz() {
        let (outcomes, state, drawn, _) = play(1, std::vec![Some('0')], 1, true);

        assert_eq!(outcomes, std::vec![Outcome::Correct]);
        assert_eq!(state.streak(), 1);
        assert!(drawn.is_empty());
    }

    #[test]
    fn test_level_glyph() {
        assert_eq!(level_glyph(0), '0');
        assert_eq!(level_glyph(7), '7');
        assert_eq!(level_glyph(12), '2');
    }
}
