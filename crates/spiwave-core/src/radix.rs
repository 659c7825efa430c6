use crate::word::Width;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Radix {
    Hex,
    Binary,
    Decimal,
}

impl std::str::FromStr for Radix {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "bin" | "binary" => Self::Binary,
            "dec" | "decimal" => Self::Decimal,
            _ => Self::Hex,
        })
    }
}

impl Radix {
    pub fn format(&self, value: u64, width: Width) -> String {
        let bits = width.bits() as usize;
        match self {
            Self::Hex => format!("{:0digits$X}", value, digits = bits.div_ceil(4)),
            Self::Binary => format!("{:0bits$b}", value, bits = bits),
            Self::Decimal => value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_hex_fallback() {
        assert_eq!("bin".parse::<Radix>(), Ok(Radix::Binary));
        assert_eq!("Decimal".parse::<Radix>(), Ok(Radix::Decimal));
        assert_eq!("whatever".parse::<Radix>(), Ok(Radix::Hex));
    }

    #[test]
    fn pads_to_width() {
        let w = Width::new(12).unwrap();
        assert_eq!(Radix::Hex.format(0xA, w), "00A");
        assert_eq!(Radix::Binary.format(0b101, Width::new(4).unwrap()), "0101");
        assert_eq!(Radix::Decimal.format(171, Width::BYTE), "171");
    }
}
