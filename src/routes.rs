// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const RECORDS: &str = "/records";
pub const RECORD_ITEM: &str = "/records/{key}";
pub const RECORD_UPDATE: &str = "/records/{key}/{value}";
