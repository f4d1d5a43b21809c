/*!
User roles, and what each one gets to see.

Which navigation entries a role sees, and which record lists make up its
dashboard, live in one table here rather than being worked out separately
by every page.
*/
use serde::{Deserialize, Serialize};

use crate::store::Entity;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Role {
    Student,
    Teacher,
    Advisor,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let token = match self {
            Role::Student => "Student",
            Role::Teacher => "Teacher",
            Role::Advisor => "Advisor",
        };

        write!(f, "{}", token)
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Student" => Ok(Role::Student),
            "Teacher" => Ok(Role::Teacher),
            "Advisor" => Ok(Role::Advisor),
            _ => Err(format!("{:?} is not a valid Role.", s)),
        }
    }
}

/// One entry in the side navigation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
}

const fn item(label: &'static str, path: &'static str) -> NavItem {
    NavItem { label, path }
}

const HOME: NavItem = item("Home", "/home");
const CALENDAR: NavItem = item("Calendar", "/calendar");
const SETTINGS: NavItem = item("Settings", "/settings");

static STUDENT_NAV: &[NavItem] = &[
    HOME,
    item("Class", "/class"),
    item("Homework", "/homework"),
    item("Lessons", "/lessons"),
    item("Books", "/books"),
    CALENDAR,
    SETTINGS,
];

static TEACHER_NAV: &[NavItem] = &[
    HOME,
    item("Classes", "/classes"),
    item("Students", "/students"),
    item("Notes", "/notes"),
    item("Reports", "/reports"),
    CALENDAR,
    SETTINGS,
];

static ADVISOR_NAV: &[NavItem] = &[
    HOME,
    item("Classes", "/classes"),
    item("Teachers", "/teachers"),
    item("Students", "/students"),
    item("Notes", "/notes"),
    item("Reports", "/reports"),
    CALENDAR,
    SETTINGS,
];

static STUDENT_DASHBOARD: &[Entity] = &[
    Entity::Homework, Entity::Lessons, Entity::Books, Entity::Events,
];

static TEACHER_DASHBOARD: &[Entity] = &[
    Entity::Students, Entity::Notes, Entity::Reports, Entity::Events,
];

static ADVISOR_DASHBOARD: &[Entity] = &[
    Entity::Teachers, Entity::Students, Entity::Notes, Entity::Reports, Entity::Events,
];

/// Everything about the interface that depends on the role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoleView {
    pub role: Role,
    pub nav: &'static [NavItem],
    /// Record lists fetched for this role's dashboard.
    pub dashboard: &'static [Entity],
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Teacher, Role::Advisor];

    pub fn view(&self) -> RoleView {
        let (nav, dashboard) = match self {
            Role::Student => (STUDENT_NAV, STUDENT_DASHBOARD),
            Role::Teacher => (TEACHER_NAV, TEACHER_DASHBOARD),
            Role::Advisor => (ADVISOR_NAV, ADVISOR_DASHBOARD),
        };
        RoleView { role: *self, nav, dashboard }
    }
}
