use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(mew_home: Option<PathBuf>, config_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(home) = mew_home {
        return Some(home.join(".env"));
    }
    Some(config_dir?.join("mew/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("MEW_HOME").map(PathBuf::from),
        dirs::config_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::fallback_dotenv_path;
    use std::path::PathBuf;

    #[test]
    fn fallback_prefers_mew_home() {
        let got = fallback_dotenv_path(
            Some(PathBuf::from("/workspace/mew")),
            Some(PathBuf::from("/home/alice/.config")),
        );

        let want = Some(PathBuf::from("/workspace/mew/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn fallback_uses_config_dir_when_mew_home_unset() {
        let got = fallback_dotenv_path(None, Some(PathBuf::from("/home/alice/.config")));
        let want = Some(PathBuf::from("/home/alice/.config/mew/.env"));
        assert_eq!(got, want);
    }

    #[test]
    fn no_fallback_without_any_base() {
        assert_eq!(fallback_dotenv_path(None, None), None);
    }
}
