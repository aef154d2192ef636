use thiserror::Error;

#[derive(Error, Debug)]
pub enum FreightError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid tax identifier: {value}")]
    InvalidTaxId { value: String },

    #[error("Invalid package fields: {}", join_fields(.fields))]
    InvalidPackageFields { fields: Vec<String> },

    #[error("Unknown predefined package: {id}")]
    UnknownPackage { id: String },

    #[error("No predefined package selected")]
    NoPackagesSelected,

    #[error("Package list is empty")]
    EmptyPackageList,

    #[error("A quotation request is already in flight")]
    SubmissionInFlight,

    #[error("Backend rejected the request ({status}): {message}")]
    BackendError { status: u16, message: String },

    #[error("Unexpected backend response: {body}")]
    UnexpectedResponse { body: String },
}

fn join_fields(fields: &[String]) -> String {
    fields.join(", ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Network,
    Backend,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FreightError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FreightError::ApiError(_) => ErrorCategory::Network,
            FreightError::IoError(_) | FreightError::SerializationError(_) => ErrorCategory::System,
            FreightError::ConfigError { .. }
            | FreightError::InvalidConfigValueError { .. }
            | FreightError::MissingConfigError { .. } => ErrorCategory::Configuration,
            FreightError::InvalidTaxId { .. }
            | FreightError::InvalidPackageFields { .. }
            | FreightError::UnknownPackage { .. }
            | FreightError::NoPackagesSelected
            | FreightError::EmptyPackageList
            | FreightError::SubmissionInFlight => ErrorCategory::Validation,
            FreightError::BackendError { .. } | FreightError::UnexpectedResponse { .. } => {
                ErrorCategory::Backend
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 重複送出只是被忽略
            FreightError::SubmissionInFlight => ErrorSeverity::Low,
            FreightError::ApiError(_)
            | FreightError::BackendError { .. }
            | FreightError::UnexpectedResponse { .. } => ErrorSeverity::Medium,
            FreightError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// 給使用者看的訊息 (與表單上的提示一致)
    pub fn user_friendly_message(&self) -> String {
        match self {
            FreightError::ApiError(e) => {
                format!("Erro ao enviar dados das embalagens: {}", e)
            }
            FreightError::BackendError { message, .. } => {
                format!("Erro ao enviar dados das embalagens: {}", message)
            }
            FreightError::UnexpectedResponse { .. } => {
                "Ocorreu um erro inesperado. Resposta recebida sem redirecionamento.".to_string()
            }
            FreightError::InvalidTaxId { .. } => "CNPJ inválido.".to_string(),
            FreightError::InvalidPackageFields { .. } => {
                "Por favor, preencha todos os campos da embalagem com valores numéricos positivos."
                    .to_string()
            }
            FreightError::UnknownPackage { id } => {
                format!("Embalagem pré-definida não encontrada: {}", id)
            }
            FreightError::NoPackagesSelected => {
                "Nenhuma embalagem pré-definida selecionada (quantidade maior que zero)."
                    .to_string()
            }
            FreightError::EmptyPackageList => {
                "Por favor, adicione ao menos uma embalagem antes de solicitar cotações."
                    .to_string()
            }
            FreightError::SubmissionInFlight => "Cotação já está sendo enviada.".to_string(),
            FreightError::ConfigError { .. }
            | FreightError::InvalidConfigValueError { .. }
            | FreightError::MissingConfigError { .. } => format!("Configuração inválida: {}", self),
            FreightError::IoError(_) | FreightError::SerializationError(_) => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the endpoint URL and network connectivity, then retry",
            ErrorCategory::Backend => "Retry the submission; if it keeps failing, contact the backend operator",
            ErrorCategory::Configuration => "Review the configuration file and command line overrides",
            ErrorCategory::Validation => "Correct the flagged fields and try again",
            ErrorCategory::System => "Check that the input files exist and contain valid JSON",
        }
    }
}

pub type Result<T> = std::result::Result<T, FreightError>;
