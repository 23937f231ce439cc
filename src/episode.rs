//! Canonical episode URLs
//!
//! The podcast renamed its episodes after number 270: earlier episodes live
//! under `/podcast/zsNN/`, later ones under `/archiv/gagNN/`.

/// Last episode published under the old naming scheme
pub const EPISODE_RENAME_THRESHOLD: u32 = 270;

/// Site the episode pages are served from
pub const DEFAULT_BASE_URL: &str = "https://www.geschichte.fm";

/// URL of episode `number` on the public site
pub fn episode_url(number: u32) -> String {
    episode_url_with_base(DEFAULT_BASE_URL, number)
}

/// URL of episode `number` below `base_url`
pub fn episode_url_with_base(base_url: &str, number: u32) -> String {
    let base_url = base_url.trim_end_matches('/');
    if number <= EPISODE_RENAME_THRESHOLD {
        format!("{}/podcast/zs{:02}/", base_url, number)
    } else {
        format!("{}/archiv/gag{:02}/", base_url, number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_uses_old_scheme() {
        assert_eq!(
            episode_url(EPISODE_RENAME_THRESHOLD),
            "https://www.geschichte.fm/podcast/zs270/"
        );
    }

    #[test]
    fn test_after_threshold_uses_archive() {
        assert_eq!(
            episode_url(EPISODE_RENAME_THRESHOLD + 1),
            "https://www.geschichte.fm/archiv/gag271/"
        );
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(episode_url(5), "https://www.geschichte.fm/podcast/zs05/");
        assert_eq!(episode_url(93), "https://www.geschichte.fm/podcast/zs93/");
        assert_eq!(episode_url(0), "https://www.geschichte.fm/podcast/zs00/");
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(episode_url(270), episode_url(270));
    }

    #[test]
    fn test_custom_base() {
        assert_eq!(
            episode_url_with_base("http://127.0.0.1:1234/", 300),
            "http://127.0.0.1:1234/archiv/gag300/"
        );
    }
}
