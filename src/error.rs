/// Errors surfaced by the synthesizer core and its sinks.
///
/// Out-of-range parameters are never errors: they are clamped at the boundary
/// and the clamped value is what `Controller::settings` reports afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// Text that does not name a note in the closed note set
    UnknownNote(String),
    /// The output sink could not be acquired or started
    DeviceUnavailable(String),
    /// The control queue is full; the operation was not applied
    QueueFull,
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::UnknownNote(name) => {
                write!(f, "Unknown note identifier: {:?}", name)
            }
            SynthError::DeviceUnavailable(reason) => {
                write!(f, "Audio output device unavailable: {}", reason)
            }
            SynthError::QueueFull => {
                write!(
                    f,
                    "Synth command queue is full; the audio thread is not draining it"
                )
            }
        }
    }
}

impl std::error::Error for SynthError {}
