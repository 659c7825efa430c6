use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("register width must be between 1 and 64 bits, got {0}")]
    InvalidWidth(u32),
    #[error("sclk oversampled {ratio}x, need at least {min}x")]
    Undersampled { ratio: u32, min: u32 },
    #[error("sample rate must be a positive number of Hz, got {0}")]
    InvalidSampleRate(f64),
    #[error("bench service is closed")]
    ServiceClosed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
