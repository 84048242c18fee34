use serde::{Deserialize, Serialize};

/// Card brand, as derived from the BIN range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CardType {
    Visa,
    MasterCard,
    #[serde(rename = "American Express")]
    AmericanExpress,
    Discover,
    #[serde(rename = "JCB")]
    Jcb,
    Maestro,
    #[default]
    #[serde(other)]
    Unknown,
}

impl CardType {
    /// Detects the brand from the leading digits of a card number.
    pub fn from_number(number: &str) -> Self {
        let prefix = |len: usize| -> Option<u32> { number.get(..len)?.parse().ok() };

        match (prefix(1), prefix(2), prefix(4)) {
            (Some(4), _, _) => CardType::Visa,
            (_, Some(34 | 37), _) => CardType::AmericanExpress,
            (_, Some(51..=55), _) => CardType::MasterCard,
            (_, _, Some(2221..=2720)) => CardType::MasterCard,
            (_, _, Some(6011)) => CardType::Discover,
            (_, Some(65), _) => CardType::Discover,
            (_, _, Some(3528..=3589)) => CardType::Jcb,
            (_, Some(50 | 56..=58), _) | (_, _, Some(6304 | 6759 | 6761..=6763)) => {
                CardType::Maestro
            }
            _ => CardType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::Visa => "Visa",
            CardType::MasterCard => "MasterCard",
            CardType::AmericanExpress => "American Express",
            CardType::Discover => "Discover",
            CardType::Jcb => "JCB",
            CardType::Maestro => "Maestro",
            CardType::Unknown => "Unknown",
        }
    }

    pub fn security_code_length(&self) -> usize {
        match self {
            CardType::AmericanExpress => 4,
            _ => 3,
        }
    }
}

/// Luhn checksum over an all-digit string. Non-digit input never passes.
pub fn luhn_valid(number: &str) -> bool {
    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let sum: u32 = number
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}
