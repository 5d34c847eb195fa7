use craftpack_util::errors::CraftpackError;

#[test]
fn test_io_error_display() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
    let err = CraftpackError::from(io_err);
    assert!(err.to_string().contains("I/O error"), "got: {err}");
}

#[test]
fn test_manifest_error_display() {
    let err = CraftpackError::Manifest {
        message: "bad syntax".to_string(),
    };
    assert_eq!(err.to_string(), "Manifest error: bad syntax");
}

#[test]
fn test_index_error_display() {
    let err = CraftpackError::Index {
        message: "missing [[mod]] id".to_string(),
    };
    assert_eq!(err.to_string(), "Index error: missing [[mod]] id");
}

#[test]
fn test_config_error_display() {
    let err = CraftpackError::Config {
        message: "unknown strategy".to_string(),
    };
    assert_eq!(err.to_string(), "Config error: unknown strategy");
}

#[test]
fn test_resolution_error_display() {
    let err = CraftpackError::Resolution {
        message: "2 problems".to_string(),
    };
    assert_eq!(err.to_string(), "Dependency resolution failed: 2 problems");
}

#[test]
fn test_generic_error_display() {
    let err = CraftpackError::Generic {
        message: "something broke".to_string(),
    };
    assert_eq!(err.to_string(), "something broke");
}

#[test]
fn test_io_error_from_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err: CraftpackError = io_err.into();
    assert!(matches!(err, CraftpackError::Io(_)));
}
