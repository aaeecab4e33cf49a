use serde::{Deserialize, Serialize};

/// Member entry of `GET teams` / `GET teams/{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMember {
    pub user_uuid: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_manager: bool,
    #[serde(default)]
    pub work_session_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
}

impl Team {
    pub fn is_managed_by(&self, user_uuid: &str) -> bool {
        self.team_members
            .iter()
            .any(|member| member.is_manager && member.user_uuid == user_uuid)
    }

    /// Members whose work session is currently running.
    pub fn present_members(&self) -> impl Iterator<Item = &TeamMember> {
        self.team_members
            .iter()
            .filter(|member| member.work_session_status.as_deref() == Some("active"))
    }
}

/// Team summary embedded in a user record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamInfo {
    pub team_uuid: String,
    pub team_name: String,
    #[serde(default)]
    pub team_description: Option<String>,
    #[serde(default)]
    pub is_manager: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMemberAssignment {
    pub user_uuid: String,
    pub is_manager: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamCreateInput {
    pub name: String,
    pub description: String,
    pub member_uuids: Vec<TeamMemberAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMembersInput {
    pub team_uuid: String,
    pub member_uuids: Vec<TeamMemberAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamUpdateInput {
    pub name: String,
    pub description: String,
}
