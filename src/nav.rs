/*!
Page navigation scoped by role.

`Navigator` is the single place a page's role gets resolved. Every
navigation goes through `Navigator::navigate()`, which either hands the
page a `RoleContext` to render with or redirects to the role picker.
Pages never read the session themselves.
*/
use crate::role::{NavItem, Role};
use crate::session::{NavState, RoleSession, SessionStorage};
use crate::store::Entity;

/// The role-picker view; the only page that doesn't need a role.
pub const ROLE_PICKER: &str = "/";
pub const HOME: &str = "/home";

/// A request to move to `path`, optionally carrying state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEvent {
    pub path: String,
    pub state: Option<NavState>,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

/// What a page gets to render with.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleContext {
    pub role: Role,
    pub path: String,
    pub nav: &'static [NavItem],
    pub dashboard: &'static [Entity],
}

impl RoleContext {
    pub fn new(role: Role, path: &str) -> Self {
        let view = role.view();
        Self {
            role,
            path: path.to_owned(),
            nav: view.nav,
            dashboard: view.dashboard,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Navigation {
    RolePicker,
    Render(RoleContext),
    Redirect(NavEvent),
}

fn redirect_to_picker() -> Navigation {
    Navigation::Redirect(NavEvent {
        path: ROLE_PICKER.to_owned(),
        state: None,
        replace: true,
    })
}

pub struct Navigator<S: SessionStorage> {
    session: RoleSession<S>,
}

impl<S: SessionStorage> Navigator<S> {
    pub fn new(session: RoleSession<S>) -> Self { Self { session } }

    pub fn session(&self) -> &RoleSession<S> { &self.session }

    /// Resolve the page at `path`.
    ///
    /// Any path other than the role picker requires a role; without one
    /// the result is a redirect to the picker. A role-scoped path outside
    /// the role's navigation still renders; nothing here enforces access.
    pub fn navigate(&mut self, path: &str, state: Option<&NavState>) -> Navigation {
        log::trace!("Navigator::navigate( {:?}, {:?} ) called.", path, &state);

        if path == ROLE_PICKER {
            return Navigation::RolePicker;
        }

        match self.session.resolve_role(state) {
            Some(role) => Navigation::Render(RoleContext::new(role, path)),
            None => {
                log::info!("No role for {:?}; redirecting to role selection.", path);
                redirect_to_picker()
            },
        }
    }

    /// The role picker's selection: store the role and go home.
    pub fn pick_role(&mut self, role: Role) -> Navigation {
        let ev = self.session.select_role(role);
        self.navigate(&ev.path, ev.state.as_ref())
    }

    pub fn logout(&mut self) -> Navigation {
        self.session.clear();
        redirect_to_picker()
    }
}
