//! Roles held by users and required by tasks.

use super::ParseRoleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognised user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages projects and task structure; never fills a task slot.
    ProjectManager,
    /// Java developer.
    JavaProgrammer,
    /// Python developer.
    PythonProgrammer,
    /// System administrator.
    SysAdmin,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ProjectManager => "project_manager",
            Self::JavaProgrammer => "java_programmer",
            Self::PythonProgrammer => "python_programmer",
            Self::SysAdmin => "sys_admin",
        }
    }

    /// Returns whether tasks may require this role.
    #[must_use]
    pub const fn is_developer(self) -> bool {
        !matches!(self, Self::ProjectManager)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    /// Accepts both `java_programmer` and `JAVAPROGRAMMER` spellings.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "projectmanager" => Ok(Self::ProjectManager),
            "javaprogrammer" => Ok(Self::JavaProgrammer),
            "pythonprogrammer" => Ok(Self::PythonProgrammer),
            "sysadmin" => Ok(Self::SysAdmin),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}
