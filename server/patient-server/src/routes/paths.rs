//! Route path constants

/// Health check and landing page
pub const HOME: &str = "/";
pub const HEALTH: &str = "/health";

/// Patient pages and form targets
pub mod patient {
    pub const LIST: &str = "/patient/list";
    pub const ADD: &str = "/patient/add";
    pub const VALIDATE: &str = "/patient/validate";
    pub const VIEW: &str = "/patient/view/:id";
    pub const UPDATE: &str = "/patient/update/:id";
}

/// Patient JSON API
pub mod patient_api {
    pub const ADD: &str = "/patient/api/add";
    pub const GET: &str = "/patient/api/get/:id";
    pub const UPDATE: &str = "/patient/api/update";
}

/// Lookups called by the assessment and history services
pub mod retro {
    pub const GET: &str = "/patient/api/retro/get/:id";
    pub const INDEX: &str = "/patient/api/retro/get/index";
}
