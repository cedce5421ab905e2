//! Navigation shell for GymTrack
//!
//! The navigation layer is a pure function of session state: the route
//! gate maps the current [`SessionPhase`] to one of three top-level
//! subtrees, and the route types below describe what each subtree holds.
//! No stack management or deep-linking lives here; rendering frameworks
//! own that.

use app_state::SessionPhase;
use serde::{Deserialize, Serialize};

// =============================================================================
// Route Gate
// =============================================================================

/// Top-level navigation subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavTree {
    /// Unauthenticated subtree (sign-in / sign-up)
    Auth,
    /// Authenticated subtree (tab shell)
    App,
    /// Neutral loading view while a sign-in attempt is in flight
    Splash,
}

/// Select the visible navigation subtree for a session phase
///
/// Stateless; callers re-evaluate on every phase change with no
/// debouncing.
pub fn route_gate(phase: &SessionPhase) -> NavTree {
    match phase {
        SessionPhase::SignedIn(_) => NavTree::App,
        SessionPhase::SignedOut => NavTree::Auth,
        SessionPhase::Authenticating => NavTree::Splash,
    }
}

// =============================================================================
// Route Definitions
// =============================================================================

/// Routes inside the unauthenticated subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthRoute {
    /// Sign-in screen
    #[default]
    SignIn,
    /// Account creation screen
    SignUp,
}

impl AuthRoute {
    /// Display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            AuthRoute::SignIn => "Sign In",
            AuthRoute::SignUp => "Create Account",
        }
    }
}

/// Routes inside the authenticated subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "route", content = "params")]
pub enum AppRoute {
    /// Home dashboard
    #[default]
    Home,
    /// Workout history
    History,
    /// Profile view and editing
    Profile,
    /// Exercise detail, pushed from home; not a tab root
    Exercise {
        /// Exercise being viewed
        exercise_id: String,
    },
}

impl AppRoute {
    /// Display title for this route
    pub fn title(&self) -> &'static str {
        match self {
            AppRoute::Home => "Home",
            AppRoute::History => "History",
            AppRoute::Profile => "Profile",
            AppRoute::Exercise { .. } => "Exercise",
        }
    }

    /// The tab this route belongs to, if any
    ///
    /// The exercise detail screen lives on the home tab's stack but is
    /// not itself a tab root.
    pub fn tab(&self) -> Option<AppTab> {
        match self {
            AppRoute::Home | AppRoute::Exercise { .. } => Some(AppTab::Home),
            AppRoute::History => Some(AppTab::History),
            AppRoute::Profile => Some(AppTab::Profile),
        }
    }

    /// Whether the tab bar stays visible on this route
    ///
    /// Hidden on the exercise detail screen so the video content gets
    /// the full height.
    pub fn shows_tab_bar(&self) -> bool {
        !matches!(self, AppRoute::Exercise { .. })
    }
}

// =============================================================================
// Tab Bar
// =============================================================================

/// Bottom tabs of the authenticated shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppTab {
    /// Home tab
    #[default]
    Home,
    /// History tab
    History,
    /// Profile tab
    Profile,
}

impl AppTab {
    /// Get the root route for this tab
    pub fn root_route(&self) -> AppRoute {
        match self {
            AppTab::Home => AppRoute::Home,
            AppTab::History => AppRoute::History,
            AppTab::Profile => AppRoute::Profile,
        }
    }

    /// Get icon name for this tab
    pub fn icon(&self) -> &'static str {
        match self {
            AppTab::Home => "home",
            AppTab::History => "history",
            AppTab::Profile => "user",
        }
    }

    /// Get label for this tab
    pub fn label(&self) -> &'static str {
        match self {
            AppTab::Home => "Home",
            AppTab::History => "History",
            AppTab::Profile => "Profile",
        }
    }

    /// Get all tabs in order
    pub fn all() -> [AppTab; 3] {
        [AppTab::Home, AppTab::History, AppTab::Profile]
    }
}

// =============================================================================
// Tests
// =============================================================================
