//! Session gate: tracks whether a signed-in user is known yet.
//!
//! The gate starts `Unknown` until the server has been probed, then settles
//! into `Present` or `Absent`. The only later transition is `Present` to
//! `Absent` on sign-out.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionGate {
    Unknown,
    Absent,
    Present,
}

impl SessionGate {
    /// Settles the gate after a credentials probe. Only an `Unknown` gate
    /// moves; a settled gate keeps its state.
    pub fn resolve(self, authenticated: bool) -> SessionGate {
        match self {
            SessionGate::Unknown if authenticated => SessionGate::Present,
            SessionGate::Unknown => SessionGate::Absent,
            settled => settled,
        }
    }

    pub fn sign_out(self) -> SessionGate {
        match self {
            SessionGate::Present => SessionGate::Absent,
            other => other,
        }
    }

    pub fn is_present(self) -> bool {
        self == SessionGate::Present
    }
}
