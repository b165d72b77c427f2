//! Problem generation

use core::fmt::Write;

use heapless::String;

use crate::traits::RandomSource;

/// Largest operand bound that keeps every answer a single keypad digit
pub const MAX_OPERAND_BOUND: u8 = 5;

/// Problem text length, e.g. `"3-1?"`
pub const PROBLEM_TEXT_LEN: usize = 4;

/// Arithmetic operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Operator {
    /// Addition
    Add,
    /// Subtraction (operands ordered so the result is non-negative)
    Sub,
}

impl Operator {
    /// Display character
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
        }
    }
}

/// A single quiz question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Problem {
    /// Left operand
    pub a: u8,
    /// Right operand
    pub b: u8,
    /// Operator
    pub op: Operator,
}

impl Problem {
    /// Build a problem, swapping operands of a subtraction if needed
    pub fn new(a: u8, b: u8, op: Operator) -> Self {
        let (a, b) = match op {
            Operator::Sub if a < b => (b, a),
            _ => (a, b),
        };
        Self { a, b, op }
    }

    /// Draw a random problem with operands in `0..max_operand`
    ///
    /// `max_operand` is clamped to `1..=MAX_OPERAND_BOUND`. Values are drawn
    /// in the order left operand, right operand, operator.
    pub fn generate<R: RandomSource>(rng: &mut R, max_operand: u8) -> Self {
        let bound = u32::from(max_operand.clamp(1, MAX_OPERAND_BOUND));
        let a = (rng.next_u32() % bound) as u8;
        let b = (rng.next_u32() % bound) as u8;
        let op = if rng.next_u32() % 2 != 0 {
            Operator::Sub
        } else {
            Operator::Add
        };
        Self::new(a, b, op)
    }

    /// The correct result
    pub fn answer(&self) -> u8 {
        match self.op {
            Operator::Add => self.a + self.b,
            Operator::Sub => self.a - self.b,
        }
    }

    /// Whether `key` is the digit of the correct result
    pub fn is_answered_by(&self, key: char) -> bool {
        key.to_digit(10) == Some(u32::from(self.answer()))
    }

    /// Text shown on the display, e.g. `"2+3?"`
    pub fn text(&self) -> String<PROBLEM_TEXT_LEN> {
        let mut text = String::new();
        // Operands are single digits, the text always fits
        let _ = write!(text, "{}{}{}?", self.a, self.op.symbol(), self.b);
        text
    }
}
