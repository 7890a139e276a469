//! Build version string shown in `--version` output.

use git_version::git_version;

/// The current version of this build, with a trailing `+` if the tree is dirty and the commit
/// hash omitted if the sources don't include git information.
///
/// ## Example
///
/// `v0.1.0-67da032+`
pub const VERSION: &str = git_version!(
    args = [
        "--always",
        "--dirty=+",
        "--abbrev=7",
        // NOTE: using --match instead of --exclude for compatibility with old Git
        "--match=thiswillnevermatchlol"
    ],
    prefix = "v0.1.0-",
    fallback = "v0.1.0"
);

/// `VERSION` without the crate name prefix clap would otherwise double up with `--version`'s own
/// "ustream " prefix.
pub fn short_version() -> String {
    VERSION.to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use regex::Regex;

    #[test]
    fn version_formatting() {
        let re = Regex::new(r"^v[0-9]+\.[0-9]+\.[0-9]+(-[[:xdigit:]]{7})?\+?$").unwrap();
        assert!(re.is_match(VERSION), "version doesn't match regex: {}", VERSION);
    }
}
