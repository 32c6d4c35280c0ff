// ABOUTME: FRC team number with lenient parsing.
// ABOUTME: Derives the mDNS and subnet addresses a team's controller answers on.

use std::fmt;

/// A team number. Anything that does not parse, or is negative, becomes team 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TeamNumber(u32);

impl TeamNumber {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Parse user input, coercing garbage and negatives to 0.
    pub fn parse_lenient(input: &str) -> Self {
        match input.trim().parse::<i32>() {
            Ok(n) => Self::from_signed(i64::from(n)),
            Err(_) => Self(0),
        }
    }

    pub fn from_signed(value: i64) -> Self {
        Self(u32::try_from(value).unwrap_or(0))
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    /// `roborio-{team}-FRC.local`
    pub fn mdns_host(&self) -> String {
        format!("roborio-{}-FRC.local", self.0)
    }

    /// `10.{team/100}.{team%100}.2`
    pub fn subnet_host(&self) -> String {
        format!("10.{}.{}.2", self.0 / 100, self.0 % 100)
    }
}

impl From<&str> for TeamNumber {
    fn from(value: &str) -> Self {
        Self::parse_lenient(value)
    }
}

impl fmt::Display for TeamNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(TeamNumber::parse_lenient("1234").get(), 1234);
        assert_eq!(TeamNumber::parse_lenient(" 42 ").get(), 42);
        assert_eq!(TeamNumber::parse_lenient("+7").get(), 7);
    }

    #[test]
    fn garbage_and_negatives_become_zero() {
        assert_eq!(TeamNumber::parse_lenient("").get(), 0);
        assert_eq!(TeamNumber::parse_lenient("frc254").get(), 0);
        assert_eq!(TeamNumber::parse_lenient("-5").get(), 0);
        assert_eq!(TeamNumber::parse_lenient("99999999999").get(), 0);
    }

    #[test]
    fn formats_hosts() {
        let team = TeamNumber::new(1234);
        assert_eq!(team.mdns_host(), "roborio-1234-FRC.local");
        assert_eq!(team.subnet_host(), "10.12.34.2");

        let team = TeamNumber::new(5);
        assert_eq!(team.subnet_host(), "10.0.5.2");
    }
}
