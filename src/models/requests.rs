use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::core::adapter::{is_structured_survey, RawInput};

/// Free-text survey carried in a JSON body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TextSurveyRequest {
    #[validate(length(max = 20000))]
    pub text: String,
}

/// Pick the survey shape out of a JSON request body
///
/// A non-empty object with any of the survey keys is structured input;
/// otherwise a string `text` field is free text. Anything else yields
/// `Ok(None)`.
pub fn classify_json_body(body: Value) -> Result<Option<RawInput>, ValidationErrors> {
    let Value::Object(mut map) = body else {
        return Ok(None);
    };

    if is_structured_survey(&map) {
        return Ok(Some(RawInput::Structured(map)));
    }

    match map.remove("text") {
        Some(Value::String(text)) => {
            let request = TextSurveyRequest { text };
            request.validate()?;
            Ok(Some(RawInput::FreeText(request.text)))
        }
        _ => Ok(None),
    }
}

/// Validate a plain-text request body
pub fn classify_text_body(text: String) -> Result<RawInput, ValidationErrors> {
    let request = TextSurveyRequest { text };
    request.validate()?;
    Ok(RawInput::FreeText(request.text))
}
