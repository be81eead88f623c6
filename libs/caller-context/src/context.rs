use parking_lot::Mutex;

use crate::principal::{AuthenticatedPrincipal, SystemPrincipal};

/// Identity installed as the current caller of a call context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    /// An end user resolved by the `AuthN` resolver.
    User(AuthenticatedPrincipal),
    /// The platform's system identity, present only inside a privileged lookup.
    System(SystemPrincipal),
    /// An identity written by some other authentication provider.
    External { provider: String, subject: String },
}

impl CallerIdentity {
    /// Short label of the variant, for logs and error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::User(_) => "user",
            Self::System(_) => "system",
            Self::External { .. } => "external",
        }
    }

    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System(_))
    }
}

/// Current-caller storage for one logical call context.
///
/// One `CallerContext` is created per inbound request (or task) and passed
/// by reference to everything running on its behalf. It is never shared
/// between concurrent requests, so an identity installed here cannot leak
/// into another request.
///
/// Holds at most one [`CallerIdentity`]. The lock is held only for the
/// duration of a read or write and never across an `.await`.
#[derive(Debug, Default)]
pub struct CallerContext {
    current: Mutex<Option<CallerIdentity>>,
}

impl CallerContext {
    /// Create an empty (unauthenticated) context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context with `identity` already installed.
    #[must_use]
    pub fn with_caller(identity: CallerIdentity) -> Self {
        Self {
            current: Mutex::new(Some(identity)),
        }
    }

    /// Snapshot of the current caller.
    #[must_use]
    pub fn get(&self) -> Option<CallerIdentity> {
        self.current.lock().clone()
    }

    /// Overwrite the current caller.
    pub fn set(&self, identity: Option<CallerIdentity>) {
        *self.current.lock() = identity;
    }

    /// Remove and return the current caller.
    #[must_use = "use `set(None)` to clear without reading"]
    pub fn take(&self) -> Option<CallerIdentity> {
        self.current.lock().take()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.current.lock().is_some()
    }

    /// Install `identity` until the returned guard is dropped.
    ///
    /// The previous value is captured here and written back when the guard
    /// goes out of scope, on every exit path: normal return, `?`, panic
    /// unwinding, or the owning future being dropped.
    #[must_use = "the identity is restored as soon as the guard is dropped"]
    pub fn impersonate(&self, identity: CallerIdentity) -> ScopedCaller<'_> {
        let previous = self.current.lock().replace(identity);
        ScopedCaller {
            ctx: self,
            previous: Some(previous),
        }
    }
}

/// Guard returned by [`CallerContext::impersonate`].
pub struct ScopedCaller<'a> {
    ctx: &'a CallerContext,
    // Outer `Option` is only emptied by `Drop`.
    previous: Option<Option<CallerIdentity>>,
}

impl ScopedCaller<'_> {
    /// The caller that was current before the guard was created.
    #[must_use]
    pub fn previous(&self) -> Option<&CallerIdentity> {
        self.previous.as_ref().and_then(Option::as_ref)
    }
}

impl Drop for ScopedCaller<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.ctx.set(previous);
        }
    }
}

impl std::fmt::Debug for ScopedCaller<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedCaller")
            .field("previous", &self.previous().map(CallerIdentity::kind))
            .finish_non_exhaustive()
    }
}
