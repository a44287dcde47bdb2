use crate::error::AppError;
use crate::models::{normalize_tag_name, NewTag};

pub const MAX_TAG_NAME_LENGTH: usize = 100;
pub const MAX_TAG_DESCRIPTION_LENGTH: usize = 255;

/// Validate a tag and return it with its name normalized.
pub fn validate_new_tag(input: NewTag) -> Result<NewTag, AppError> {
    let name = normalize_tag_name(&input.name);
    let length = name.chars().count();
    if length == 0 || length > MAX_TAG_NAME_LENGTH {
        return Err(AppError::invalid_entity(
            "invalid name",
            format!(
                "name is mandatory and should be less than {} characters",
                MAX_TAG_NAME_LENGTH
            ),
        ));
    }

    if let Some(description) = &input.description {
        if description.chars().count() > MAX_TAG_DESCRIPTION_LENGTH {
            return Err(AppError::invalid_entity(
                "invalid description",
                format!(
                    "description cannot exceed {} characters",
                    MAX_TAG_DESCRIPTION_LENGTH
                ),
            ));
        }
    }

    Ok(NewTag {
        name,
        description: input.description,
    })
}
