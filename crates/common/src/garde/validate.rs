//! Garde validation utilities.

use crate::domain::DomainError;
use garde::Validate;

/// Validate a request struct, converting the garde report into a
/// `DomainError::ValidationError` with one line per failed field
pub fn validate_struct<T>(value: &T) -> Result<(), DomainError>
where
    T: Validate,
    T::Context: Default,
{
    value.validate().map_err(|report| {
        let message = report
            .iter()
            .map(|(path, error)| {
                let path = path.to_string();
                if path.is_empty() {
                    error.message().to_string()
                } else {
                    format!("{}: {}", path, error.message())
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        DomainError::ValidationError(message)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Validate;

    #[derive(Validate)]
    struct SampleRequest {
        #[garde(length(min = 1))]
        title: String,
        #[garde(range(min = 1))]
        count: u32,
    }

    #[test]
    fn test_valid_struct_passes() {
        let request = SampleRequest {
            title: "hello".to_string(),
            count: 3,
        };
        assert!(validate_struct(&request).is_ok());
    }

    #[test]
    fn test_invalid_struct_reports_field_path() {
        let request = SampleRequest {
            title: "".to_string(),
            count: 3,
        };
        match validate_struct(&request) {
            Err(DomainError::ValidationError(message)) => assert!(message.contains("title")),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_failures_joined() {
        let request = SampleRequest {
            title: "".to_string(),
            count: 0,
        };
        match validate_struct(&request) {
            Err(DomainError::ValidationError(message)) => {
                assert!(message.contains("title"));
                assert!(message.contains("count"));
            }
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }
}
