/// Classification for fallback policy.
///
/// Used to determine how the resolver should respond to errors from
/// providers. There is deliberately no retry-with-backoff class and no
/// circuit state: a failed provider is simply skipped for the current
/// resolution attempt, and a fresh resolution re-tries all providers.
///
/// | Class | Try next provider? |
/// |-------|--------------------|
/// | `NextProvider` | Yes |
/// | `Terminal` | No |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// This provider can't serve the request right now (timeout, transport
    /// failure, malformed payload, rejected data), but another provider
    /// might. The failure is logged, never surfaced individually.
    NextProvider,

    /// Nothing further to try - bad input, exhausted chain, or a local
    /// persistence failure. The error is returned to the caller.
    Terminal,
}
