pub mod cleanup_service;
pub mod diagnostics_service;
pub mod record_service;
pub mod report_service;
pub mod suite_service;
pub mod verifier_service;
