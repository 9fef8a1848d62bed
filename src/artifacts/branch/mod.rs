pub mod branch_name;

/// Characters that may not appear anywhere in a branch name
pub const INVALID_BRANCH_NAME_REGEX: &str = r"[\s/]";
