// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const KVPAIR: &str = "/kvpair";
pub const KVPAIR_ITEM: &str = "/kvpair/{key}";
pub const DOCS: &str = "/docs";
pub const API_SCHEMA: &str = "/api/swagger";
