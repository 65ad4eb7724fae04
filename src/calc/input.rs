use crate::calc::safe_evaluate;
use crate::model::Amount;

const OPERATORS: [char; 4] = ['+', '-', '×', '÷'];

/// The calculator's display buffer and the rules for what each key press may append.
///
/// The buffer holds what the user sees, with `×` and `÷` as operators.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct CalculatorInput {
    buffer: String,
}

impl CalculatorInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing amount. A zero amount starts with an empty display.
    pub fn from_amount(amount: Amount) -> Self {
        let buffer = if amount.is_zero() {
            String::new()
        } else {
            amount.value().normalize().to_string()
        };
        Self { buffer }
    }

    pub fn display(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn has_operator(&self) -> bool {
        self.buffer.contains(|c| OPERATORS.contains(&c))
    }

    /// Appends a digit. Non-digits are ignored.
    pub fn push_digit(&mut self, digit: char) {
        if digit.is_ascii_digit() {
            self.buffer.push(digit);
        }
    }

    /// Appends a decimal point unless the number being typed already has one. A point typed
    /// at the start of a number is written as `0.`.
    pub fn push_dot(&mut self) {
        let current_number = self
            .buffer
            .rsplit(|c| OPERATORS.contains(&c))
            .next()
            .unwrap_or_default();
        if current_number.contains('.') {
            return;
        }
        if current_number.is_empty() {
            self.buffer.push('0');
        }
        self.buffer.push('.');
    }

    /// Appends an operator (`+`, `-`, `×` or `÷`; `*` and `/` are accepted as aliases).
    ///
    /// Nothing is appended to an empty display, after a trailing `.`, or after another operator.
    /// The one exception is `-` after `×` or `÷`, which starts a negative operand.
    pub fn push_operator(&mut self, op: char) {
        let op = match op {
            '*' => '×',
            '/' => '÷',
            other => other,
        };
        if !OPERATORS.contains(&op) {
            return;
        }
        let Some(last) = self.buffer.chars().last() else {
            return;
        };
        if last == '.' {
            return;
        }
        if OPERATORS.contains(&last) && !((last == '×' || last == '÷') && op == '-') {
            return;
        }
        self.buffer.push(op);
    }

    /// Removes the last character.
    pub fn delete(&mut self) {
        self.buffer.pop();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Flips the sign of the whole entry.
    pub fn toggle_sign(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        match self.buffer.strip_prefix('-') {
            Some(rest) => self.buffer = rest.to_string(),
            None => self.buffer.insert(0, '-'),
        }
    }

    /// Produces the value to hand back to the amount field.
    ///
    /// With an operator present the expression is evaluated and the display is replaced by the
    /// result; `None` means it could not be computed and the display is left as is. Without one
    /// the display is read as a plain number, where an empty display is `0`.
    pub fn commit(&mut self) -> Option<f64> {
        if self.has_operator() {
            let result = safe_evaluate(&self.buffer)?;
            self.buffer = result.to_string();
            return Some(result);
        }
        if self.buffer.is_empty() {
            return Some(0.0);
        }
        self.buffer.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(keys: &str) -> CalculatorInput {
        let mut input = CalculatorInput::new();
        for key in keys.chars() {
            match key {
                '0'..='9' => input.push_digit(key),
                '.' => input.push_dot(),
                _ => input.push_operator(key),
            }
        }
        input
    }

    #[test]
    fn test_operator_rules() {
        assert_eq!(typed("+").display(), "");
        assert_eq!(typed("1.+").display(), "1.");
        assert_eq!(typed("1+×").display(), "1+");
        assert_eq!(typed("1+-").display(), "1+");
        assert_eq!(typed("2×-3").display(), "2×-3");
        assert_eq!(typed("2÷-3").display(), "2÷-3");
        assert_eq!(typed("2*3").display(), "2×3");
    }

    #[test]
    fn test_dot_rules() {
        assert_eq!(typed("1.2.3").display(), "1.23");
        assert_eq!(typed(".5").display(), "0.5");
        assert_eq!(typed("1.5+.5").display(), "1.5+0.5");
    }

    #[test]
    fn test_commit_evaluates() {
        let mut input = typed("1200×3+500");
        assert_eq!(input.commit(), Some(4100.0));
        assert_eq!(input.display(), "4100");
    }

    #[test]
    fn test_commit_plain_number() {
        assert_eq!(typed("1500").commit(), Some(1500.0));
        assert_eq!(CalculatorInput::new().commit(), Some(0.0));
    }

    #[test]
    fn test_commit_failure_keeps_display() {
        let mut input = typed("5÷0");
        assert_eq!(input.commit(), None);
        assert_eq!(input.display(), "5÷0");
    }

    #[test]
    fn test_delete_clear_and_sign() {
        let mut input = typed("123");
        input.delete();
        assert_eq!(input.display(), "12");
        input.toggle_sign();
        assert_eq!(input.display(), "-12");
        assert_eq!(input.commit(), Some(-12.0));
        input.toggle_sign();
        assert_eq!(input.display(), "12");
        input.clear();
        assert!(input.is_empty());
    }

    #[test]
    fn test_from_amount() {
        assert_eq!(CalculatorInput::from_amount(Amount::yen(1500)).display(), "1500");
        assert!(CalculatorInput::from_amount(Amount::ZERO).is_empty());
    }
}
