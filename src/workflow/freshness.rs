/// Tags outgoing requests with a monotonic sequence so that only the response
/// to the most recently issued request is applied.
#[derive(Debug, Default)]
pub struct FreshnessGuard {
    latest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTag(u64);

impl FreshnessGuard {
    pub fn issue(&mut self) -> RequestTag {
        self.latest += 1;
        RequestTag(self.latest)
    }

    pub fn is_current(&self, tag: RequestTag) -> bool {
        tag.0 == self.latest
    }
}
