use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::utils::debug_log;

#[derive(Debug, Clone, Default)]
pub(crate) struct EnvSettings {
    /// Extra variables, applied first
    pub(crate) vars: BTreeMap<String, String>,
    /// Value for DISPLAY when the environment has none
    pub(crate) display: String,
    /// Virtualenv root to activate
    pub(crate) venv: Option<PathBuf>,
}

/// Variables to set on the controller on top of the inherited environment.
///
/// `lookup` reads the inherited environment. Activation of the virtualenv is
/// best-effort: a missing venv is logged and skipped.
pub(crate) fn plan_env(
    settings: &EnvSettings,
    lookup: impl Fn(&str) -> Option<OsString>,
) -> Vec<(String, OsString)> {
    let mut overrides: BTreeMap<String, OsString> = settings
        .vars
        .iter()
        .map(|(k, v)| (k.clone(), OsString::from(v)))
        .collect();
    let current = |key: &str, overrides: &BTreeMap<String, OsString>| {
        overrides.get(key).cloned().or_else(|| lookup(key))
    };

    if current("DISPLAY", &overrides).is_none() {
        overrides.insert("DISPLAY".to_string(), OsString::from(&settings.display));
    }
    // Controller output must reach the log as it is produced
    if current("PYTHONUNBUFFERED", &overrides).is_none() {
        overrides.insert("PYTHONUNBUFFERED".to_string(), OsString::from("1"));
    }

    if let Some(venv) = &settings.venv {
        let bin = venv.join(if cfg!(windows) { "Scripts" } else { "bin" });
        if bin.is_dir() {
            let mut paths = vec![bin];
            if let Some(existing) = current("PATH", &overrides) {
                paths.extend(std::env::split_paths(&existing));
            }
            match std::env::join_paths(paths) {
                Ok(joined) => {
                    overrides.insert("PATH".to_string(), joined);
                    overrides.insert("VIRTUAL_ENV".to_string(), venv.clone().into_os_string());
                }
                Err(e) => debug_log(format!("cannot activate {}: {e}", venv.display())),
            }
        } else {
            debug_log(format!(
                "virtualenv {} not found, launching without it",
                venv.display()
            ));
        }
    }

    overrides.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), OsString::from(v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn get<'a>(plan: &'a [(String, OsString)], key: &str) -> Option<&'a OsString> {
        plan.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    fn display_settings() -> EnvSettings {
        EnvSettings {
            display: ":0".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn display_defaulted_when_unset() {
        let plan = plan_env(&display_settings(), lookup_from(&[]));
        assert_eq!(get(&plan, "DISPLAY"), Some(&OsString::from(":0")));
    }

    #[test]
    fn inherited_display_is_kept() {
        let plan = plan_env(&display_settings(), lookup_from(&[("DISPLAY", ":7")]));
        assert_eq!(get(&plan, "DISPLAY"), None);
    }

    #[test]
    fn configured_display_var_wins_over_default() {
        let mut settings = display_settings();
        settings.vars.insert("DISPLAY".to_string(), ":3".to_string());
        let plan = plan_env(&settings, lookup_from(&[]));
        assert_eq!(get(&plan, "DISPLAY"), Some(&OsString::from(":3")));
    }

    #[test]
    fn extra_vars_are_passed_through() {
        let mut settings = display_settings();
        settings.vars.insert("SITE".to_string(), "ridge".to_string());
        let plan = plan_env(&settings, lookup_from(&[("DISPLAY", ":0")]));
        assert_eq!(get(&plan, "SITE"), Some(&OsString::from("ridge")));
    }

    #[test]
    fn unbuffered_output_defaulted_unless_set() {
        let plan = plan_env(&display_settings(), lookup_from(&[]));
        assert_eq!(get(&plan, "PYTHONUNBUFFERED"), Some(&OsString::from("1")));

        let plan = plan_env(&display_settings(), lookup_from(&[("PYTHONUNBUFFERED", "0")]));
        assert_eq!(get(&plan, "PYTHONUNBUFFERED"), None);

        let mut settings = display_settings();
        settings
            .vars
            .insert("PYTHONUNBUFFERED".to_string(), "0".to_string());
        let plan = plan_env(&settings, lookup_from(&[]));
        assert_eq!(get(&plan, "PYTHONUNBUFFERED"), Some(&OsString::from("0")));
    }

    #[test]
    fn existing_venv_is_prepended_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let venv = dir.path().join("venv");
        let bin = venv.join(if cfg!(windows) { "Scripts" } else { "bin" });
        std::fs::create_dir_all(&bin).unwrap();

        let mut settings = display_settings();
        settings.venv = Some(venv.clone());
        let inherited = std::env::join_paths(["/usr/bin", "/bin"]).unwrap();
        let inherited = inherited.to_string_lossy().into_owned();
        let plan = plan_env(&settings, lookup_from(&[("PATH", inherited.as_str())]));

        let path = get(&plan, "PATH").unwrap();
        let parts: Vec<PathBuf> = std::env::split_paths(path).collect();
        assert_eq!(parts[0], bin);
        assert_eq!(parts.len(), 3);
        assert_eq!(get(&plan, "VIRTUAL_ENV"), Some(&venv.into_os_string()));
    }

    #[test]
    fn missing_venv_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = display_settings();
        settings.venv = Some(dir.path().join("absent"));
        let plan = plan_env(&settings, lookup_from(&[("PATH", "/usr/bin")]));
        assert_eq!(get(&plan, "PATH"), None);
        assert_eq!(get(&plan, "VIRTUAL_ENV"), None);
    }
}
