use crate::word::Width;

/// Receive register. New bits enter at bit 0 and older bits move up.
#[derive(Debug, Clone)]
pub struct RxRegister {
    width: Width,
    value: u64,
}

impl RxRegister {
    pub fn new(width: Width) -> Self {
        Self { width, value: 0 }
    }

    pub fn capture(&mut self, bit: bool) {
        self.value = self.width.truncate((self.value << 1) | bit as u64);
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Transmit register. Rotates left so the loaded word comes back after
/// `width` shifts.
#[derive(Debug, Clone)]
pub struct TxRegister {
    width: Width,
    value: u64,
}

impl TxRegister {
    pub fn new(width: Width) -> Self {
        Self { width, value: 0 }
    }

    pub fn load(&mut self, value: u64) {
        self.value = self.width.truncate(value);
    }

    pub fn rotate(&mut self) {
        let top = self.top_bit() as u64;
        self.value = self.width.truncate(self.value << 1) | top;
    }

    pub fn top_bit(&self) -> bool {
        self.width.top_bit(self.value)
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}
