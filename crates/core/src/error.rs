use crate::keypoint::BodyPart;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Incomplete detection: missing {}", format_parts(.missing))]
    IncompleteDetection { missing: Vec<BodyPart> },

    #[error("Could not load image: {0}")]
    ImageLoad(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_parts(parts: &[BodyPart]) -> String {
    parts
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}
