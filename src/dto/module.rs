// src/dto/module.rs

use serde::Deserialize;
use validator::Validate;

/// Payload for recording that a user opened a module.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct OpenModuleRequest {
    #[validate(range(min = 1, message = "UserId must be positive."))]
    pub user_id: i64,
    #[validate(range(min = 1, message = "ModuleId must be positive."))]
    pub module_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_ids() {
        let req = OpenModuleRequest {
            user_id: 0,
            module_id: 3,
        };
        assert!(req.validate().is_err());

        let req = OpenModuleRequest {
            user_id: 1,
            module_id: -2,
        };
        assert!(req.validate().is_err());

        let req = OpenModuleRequest {
            user_id: 1,
            module_id: 3,
        };
        assert!(req.validate().is_ok());
    }
}
