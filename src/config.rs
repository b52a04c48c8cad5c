use std::path::PathBuf;

pub const DEFAULT_USERS_DB: &str = "voxtree.db";
pub const DEFAULT_TEMPLATES_DB: &str = "famflix.db";
pub const DEFAULT_AUDIT_LOG: &str = "maint_audit.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub users_db: PathBuf,
    pub templates_db: PathBuf,
    pub audit_log: PathBuf,
}

impl Config {
    // Load `.env` (if present) and resolve settings from the process environment.
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                eprintln!("Ignoring unreadable .env file: {e}");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    // Resolve settings through `lookup`, falling back to built-in defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };
        Config {
            users_db: get("MAINT_USERS_DB", DEFAULT_USERS_DB),
            templates_db: get("MAINT_TEMPLATES_DB", DEFAULT_TEMPLATES_DB),
            audit_log: get("MAINT_AUDIT_LOG", DEFAULT_AUDIT_LOG),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(|_| None);
        assert_eq!(cfg.users_db, PathBuf::from("voxtree.db"));
        assert_eq!(cfg.templates_db, PathBuf::from("famflix.db"));
        assert_eq!(cfg.audit_log, PathBuf::from("maint_audit.log"));
    }

    #[test]
    fn environment_overrides_and_blank_values() {
        let env: HashMap<&str, &str> = [
            ("MAINT_USERS_DB", "/srv/voxtree/prod.db"),
            ("MAINT_TEMPLATES_DB", "   "),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.users_db, PathBuf::from("/srv/voxtree/prod.db"));
        assert_eq!(cfg.templates_db, PathBuf::from("famflix.db"));
    }
}
