use thiserror::Error;

/// Errors surfaced by a recording session.
///
/// `Display` is meant for logs. Text shown to the user comes from
/// [`CaptureError::user_message`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("screen capture is not supported in this environment")]
    EnvironmentUnsupported,

    #[error("permission denied")]
    PermissionDenied,

    #[error("acquisition failed: {0}")]
    AcquisitionFailed(String),

    #[error("microphone unavailable")]
    MicrophoneUnavailable,

    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("storage error: {0}")]
    StorageError(String),

    #[error("timeout")]
    Timeout,
}

const UNSUPPORTED_MESSAGE: &str = "La grabación de pantalla no está disponible en este entorno \
    de vista previa. Por favor, despliega la aplicación para usar esta función.";
const SCREEN_MESSAGE: &str =
    "No se pudo acceder a la pantalla. Asegúrate de dar permiso cuando se te solicite.";
const MICROPHONE_MESSAGE: &str =
    "No se pudo acceder al micrófono. La grabación continuará sin audio del micrófono.";
const PROCESSING_MESSAGE: &str = "Error al procesar el video. Por favor, intenta nuevamente.";
const ENCODING_MESSAGE: &str =
    "No se pudo iniciar la grabación. Asegúrate de haber concedido los permisos necesarios.";

impl CaptureError {
    /// Localized message for the presentation layer.
    pub fn user_message(&self) -> String {
        match self {
            Self::EnvironmentUnsupported => UNSUPPORTED_MESSAGE.into(),
            Self::PermissionDenied | Self::AcquisitionFailed(_) => SCREEN_MESSAGE.into(),
            Self::MicrophoneUnavailable => MICROPHONE_MESSAGE.into(),
            Self::ProcessingFailed(_) | Self::Timeout => PROCESSING_MESSAGE.into(),
            Self::EncodingFailed(_) => ENCODING_MESSAGE.into(),
            Self::InvalidState(detail) => format!("Acción no disponible: {}", detail),
            Self::ConfigurationFailed(detail) => format!("Configuración no válida: {}", detail),
            Self::StorageError(_) => "No se pudo guardar la grabación.".into(),
        }
    }

    /// Whether the error aborts the operation that raised it.
    ///
    /// Only the microphone warning lets a start proceed.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MicrophoneUnavailable)
    }
}

/// Failure reported by a platform capture capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AcquireError {
    /// The user (or the platform on their behalf) refused the request.
    #[error("request denied")]
    Denied,

    /// A permission policy of the host forbids capture altogether.
    #[error("disallowed by permission policy")]
    Blocked,

    #[error("capability not supported")]
    Unsupported,

    #[error("{0}")]
    Failed(String),
}
