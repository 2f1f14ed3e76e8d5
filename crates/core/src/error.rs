use crm_types::ResourceKind;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read directory file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to deserialize directory YAML: {0}")]
    DirectoryYaml(String),
    #[error("duplicate {kind} entry in directory: {id}")]
    DuplicateEntry { kind: ResourceKind, id: String },

    #[error("FHIR error: {0}")]
    Fhir(#[from] fhir::FhirError),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
