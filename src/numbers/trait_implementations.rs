use core::{cmp::Ordering, fmt, str::FromStr};

use crate::arithmetic::cmp_slice;
use crate::{BigInteger, Error};

// Negative values compare with reversed magnitude order.
impl Ord for BigInteger {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => cmp_slice(&self.magnitude, &other.magnitude),
            (true, true) => cmp_slice(&other.magnitude, &self.magnitude),
        }
    }
}

impl PartialOrd for BigInteger {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for BigInteger {
    /// Hexadecimal, since that is how test vectors are usually written down.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BigInteger({:#x})", self)
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.abs().format_radix(10);
        f.pad_integral(!self.negative, "", &rendered)
    }
}

impl fmt::LowerHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.abs().format_radix(16);
        f.pad_integral(!self.negative, "0x", &rendered)
    }
}

impl fmt::UpperHex for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = self.abs().format_radix(16).to_ascii_uppercase();
        f.pad_integral(!self.negative, "0x", &rendered)
    }
}

impl FromStr for BigInteger {
    type Err = Error;

    /// Decimal.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(s, 10)
    }
}

#[cfg(test)]
mod test {
    use crate::fixtures::*;
    use crate::BigInteger;

    #[test]
    fn total_order() {
        let mut values: Vec<BigInteger> =
            ["5", "-3", "0", "18446744073709551616", "-18446744073709551616", "-2", "1"]
                .iter()
                .map(|s| int(s))
                .collect();
        values.sort();
        let sorted: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        assert_eq!(sorted, ["-18446744073709551616", "-3", "-2", "0", "1", "5", "18446744073709551616"]);

        assert_eq!(int("-3").max(int("2")), int("2"));
        assert_eq!(int("-3").min(int("2")), int("-3"));
    }

    #[test]
    fn formatting() {
        let x = int("-255");
        assert_eq!(format!("{}", x), "-255");
        assert_eq!(format!("{:x}", x), "-ff");
        assert_eq!(format!("{:#X}", int("255")), "0xFF");
        assert_eq!(format!("{:>6}", int("42")), "    42");
        assert_eq!(format!("{:?}", int("255")), "BigInteger(0xff)");
        assert_eq!(format!("{}", ZERO), "0");
    }

    #[test]
    fn parse() {
        let x: BigInteger = "-123456789012345678901234567890".parse().unwrap();
        assert_eq!(x.to_string(), "-123456789012345678901234567890");
        assert!("12x".parse::<BigInteger>().is_err());
    }
}
