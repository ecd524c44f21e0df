use crate::config::ConfigError;
use crate::host::EnumeratorError;
use crate::mapping::CatalogError;

/// Any failure while setting up a gamepads context
#[derive(Debug, thiserror::Error)]
pub enum GamepadsError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mapping catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Device enumeration error: {0}")]
    Enumerator(#[from] EnumeratorError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_source_messages() {
        let err = GamepadsError::from(CatalogError::MissingIdentity("pad".to_string()));
        assert!(matches!(err, GamepadsError::Catalog(_)));
        assert!(err.to_string().starts_with("Mapping catalog error: "));

        let err = GamepadsError::from(EnumeratorError::InitializationError("no backend".into()));
        assert_eq!(
            err.to_string(),
            "Device enumeration error: Failed to initialize gilrs: no backend"
        );
    }
}
