//! User-facing strings
//!
//! The fixed English messages and the login form the front end must render.

pub const LOGIN_REQUIRED: &str = "You need to login to access this page";
pub const USERNAME_MISSING: &str = "You must enter a username";
pub const PASSWORD_MISSING: &str = "You must enter a password";
pub const USERNAME_NOT_FOUND: &str = "Could not find a user with that username";
pub const PASSWORD_INCORRECT: &str = "Incorrect password";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";
pub const INTERNAL_ERROR: &str = "Internal error";

/// Input type of a form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Masked input
    Password,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Password => "password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub name: &'static str,
    pub kind: FieldKind,
}

/// What the login page must expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    pub subtitle: &'static str,
    pub fields: Vec<FormField>,
    pub submit_label: &'static str,
}

impl LoginForm {
    pub fn field(&self, label: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.label == label)
    }
}

pub fn login_form() -> LoginForm {
    LoginForm {
        subtitle: LOGIN_REQUIRED,
        fields: vec![
            FormField {
                label: "Username",
                name: "username",
                kind: FieldKind::Text,
            },
            FormField {
                label: "Password",
                name: "password",
                kind: FieldKind::Password,
            },
        ],
        submit_label: "Login",
    }
}
