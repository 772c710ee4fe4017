/// Setup and backend failures. Everything recoverable inside a tick is
/// handled by skip-and-continue and never reaches this type.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    InvalidConfig(String),
    ConfigParse(String),
    EmptySpawnSource,
    ParticleCountMismatch { expected: usize, got: usize },
    GpuUnavailable(String),
    GpuBufferTooLarge { bytes: u64, limit: u64 },
    GpuSetup(String),
    GpuBufferMap,
    GpuChannelClosed,
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(reason) => write!(f, "invalid world config: {}", reason),
            Self::ConfigParse(reason) => write!(f, "failed to parse world config: {}", reason),
            Self::EmptySpawnSource => write!(f, "spawn source has no vertices"),
            Self::ParticleCountMismatch { expected, got } => write!(
                f,
                "particle count mismatch: backend holds {}, store has {}",
                expected, got
            ),
            Self::GpuUnavailable(reason) => write!(f, "GPU backend unavailable: {}", reason),
            Self::GpuBufferTooLarge { bytes, limit } => write!(
                f,
                "particle buffer of {} bytes exceeds the device limit of {} bytes",
                bytes, limit
            ),
            Self::GpuSetup(reason) => write!(f, "GPU resource setup failed: {}", reason),
            Self::GpuBufferMap => write!(f, "failed to map GPU staging buffer"),
            Self::GpuChannelClosed => write!(f, "staging-map channel closed before completion"),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigParse(err.to_string())
    }
}
