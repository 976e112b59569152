use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

/// `a`, `b` or `rc`, ordered as PEP 440 orders them: `a < b < rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrereleaseKind {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl fmt::Display for PrereleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::ReleaseCandidate => "rc",
        })
    }
}

/// A pre-release qualifier, e.g. the `a1` in `1.0a1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prerelease {
    pub kind: PrereleaseKind,
    pub number: u64,
}

/// A released version, e.g. `1.0`, `2.1.0rc1` or `3.0.post1`.
///
/// Ordered per spec: release components compared element-wise, pre-releases
/// precede their release, post-releases follow it.
#[derive(Debug, Clone, Eq)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<Prerelease>,
    post: Option<u64>,
}

impl Version {
    pub fn new(release: impl IntoIterator<Item = u64>) -> Self {
        Self {
            release: release.into_iter().collect(),
            pre: None,
            post: None,
        }
    }

    pub fn with_pre(mut self, pre: Option<Prerelease>) -> Self {
        self.pre = pre;
        self
    }

    pub fn with_post(mut self, post: Option<u64>) -> Self {
        self.post = post;
        self
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn pre(&self) -> Option<Prerelease> {
        self.pre
    }

    pub fn post(&self) -> Option<u64> {
        self.post
    }

    pub fn is_pre(&self) -> bool {
        self.pre.is_some()
    }

    pub fn is_post(&self) -> bool {
        self.post.is_some()
    }

    pub fn is_stable(&self) -> bool {
        !self.is_pre()
    }

    /// The release with its last component dropped and the preceding one
    /// incremented, per the `~=` (compatible-release) upper bound rule:
    /// `~= 2.2` means `>= 2.2, < 3.0`; `~= 2.2.1` means `>= 2.2.1, < 2.3`.
    pub fn next_breaking(&self) -> Self {
        let mut release = self.release.clone();
        if release.len() > 1 {
            release.pop();
        }
        if let Some(last) = release.last_mut() {
            *last += 1;
        } else {
            release.push(1);
        }
        Self::new(release)
    }

    /// A comparison key in the order the fields must be compared: release
    /// components first, then pre/post placement, so that `1.0a1 < 1.0 <
    /// 1.0.post1` for any shared release prefix.
    fn sort_key(&self) -> (&[u64], (u8, u64), (u8, u64)) {
        let pre_key = match self.pre {
            Some(pre) => (0, (pre.kind as u64) * u64::MAX / 4 + pre.number),
            None => (1, 0),
        };
        let post_key = match self.post {
            Some(post) => (1, post),
            None => (0, 0),
        };
        (&self.release, pre_key, post_key)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.release.len().max(other.release.len());
        for i in 0..max_len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        let (_, pre_a, post_a) = self.sort_key();
        let (_, pre_b, post_b) = other.sort_key();
        pre_a.cmp(&pre_b).then_with(|| post_a.cmp(&post_b))
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let trimmed = {
            let mut end = self.release.len();
            while end > 1 && self.release[end - 1] == 0 {
                end -= 1;
            }
            &self.release[..end]
        };
        trimmed.hash(state);
        self.pre.hash(state);
        self.post.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let release = self
            .release
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{release}")?;
        if let Some(pre) = self.pre {
            write!(f, "{}{}", pre.kind, pre.number)?;
        }
        if let Some(post) = self.post {
            write!(f, ".post{post}")?;
        }
        Ok(())
    }
}

/// A version string that doesn't match the recognized grammar.
#[derive(Debug, thiserror::Error)]
#[error("invalid version: `{0}`")]
pub struct VersionParseError(pub String);

static VERSION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xi)
        ^
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?:(?P<pre_kind>a|b|rc)(?P<pre_num>[0-9]+))?
        (?:\.post(?P<post>[0-9]+))?
        $",
    )
    .unwrap()
});

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let caps = VERSION_RE
            .captures(s)
            .ok_or_else(|| VersionParseError(s.to_string()))?;

        let release = caps["release"]
            .split('.')
            .map(|segment| segment.parse::<u64>().map_err(|_| VersionParseError(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match (caps.name("pre_kind"), caps.name("pre_num")) {
            (Some(kind), Some(num)) => {
                let kind = match kind.as_str() {
                    "a" => PrereleaseKind::Alpha,
                    "b" => PrereleaseKind::Beta,
                    "rc" => PrereleaseKind::ReleaseCandidate,
                    _ => unreachable!("regex only matches a|b|rc"),
                };
                let number = num
                    .as_str()
                    .parse::<u64>()
                    .map_err(|_| VersionParseError(s.to_string()))?;
                Some(Prerelease { kind, number })
            }
            _ => None,
        };

        let post = caps
            .name("post")
            .map(|m| m.as_str().parse::<u64>().map_err(|_| VersionParseError(s.to_string())))
            .transpose()?;

        Ok(Version {
            release,
            pre,
            post,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_release() {
        let v = Version::from_str("1.2.3").unwrap();
        assert_eq!(v.release(), &[1, 2, 3]);
        assert!(v.is_stable());
    }

    #[test]
    fn orders_prerelease_before_release() {
        let pre = Version::from_str("1.0a1").unwrap();
        let release = Version::from_str("1.0").unwrap();
        assert!(pre < release);
    }

    #[test]
    fn orders_post_after_release() {
        let release = Version::from_str("1.0").unwrap();
        let post = Version::from_str("1.0.post1").unwrap();
        assert!(release < post);
    }

    #[test]
    fn orders_release_components_numerically() {
        let a = Version::from_str("2.9").unwrap();
        let b = Version::from_str("2.10").unwrap();
        assert!(a < b);
    }

    #[test]
    fn pads_missing_release_components_with_zero() {
        let a = Version::from_str("1.0").unwrap();
        let b = Version::from_str("1.0.0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn next_breaking_drops_last_component() {
        let v = Version::from_str("2.2.1").unwrap();
        assert_eq!(v.next_breaking().to_string(), "2.3");
        let v = Version::from_str("2.2").unwrap();
        assert_eq!(v.next_breaking().to_string(), "3");
    }

    #[test]
    fn rejects_malformed_version() {
        assert!(Version::from_str("not-a-version").is_err());
    }
}
